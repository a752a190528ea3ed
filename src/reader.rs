//! Line acquisition: a byte-at-a-time reader over any stream, and a `rustyline`
//! editor for interactive terminals.

use crate::config::Config;
use crate::error::FatalError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{Read, Write};
use tracing::{debug, trace};

/// One line of input with its terminator stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    /// The read stopped at end of input rather than at a newline.
    pub eof: bool,
}

/// Anything the read loop can pull lines from.
pub trait LineSource {
    /// Show `prompt` and return the next line.
    fn read_line(&mut self, prompt: &str) -> Result<Line, FatalError>;
}

/// Read bytes from `input` until `\n` or end of input.
///
/// The buffer starts with `capacity` bytes and grows by `increment` bytes whenever it
/// is full. A failed growth is reported as [`FatalError::Allocation`]; bytes already
/// read are never dropped. Invalid UTF-8 is replaced with U+FFFD.
pub fn read_line<R: Read>(
    input: &mut R,
    capacity: usize,
    increment: usize,
) -> Result<Line, FatalError> {
    let increment = increment.max(1);
    let mut buffer: Vec<u8> = Vec::new();
    buffer.try_reserve_exact(capacity.max(1))?;
    let mut growths = 0usize;
    let mut eof = true;

    for byte in input.bytes() {
        let byte = byte?;
        if byte == b'\n' {
            eof = false;
            break;
        }
        if buffer.len() == buffer.capacity() {
            buffer.try_reserve_exact(increment)?;
            growths += 1;
        }
        buffer.push(byte);
    }

    trace!(len = buffer.len(), growths, eof, "read line");
    let text = match String::from_utf8(buffer) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    };
    Ok(Line { text, eof })
}

/// [`LineSource`] over a plain byte stream, writing the prompt to `prompt_out`.
pub struct StreamReader<R, W> {
    input: R,
    prompt_out: W,
    capacity: usize,
    increment: usize,
}

impl<R: Read, W: Write> StreamReader<R, W> {
    pub fn new(input: R, prompt_out: W, config: &Config) -> Self {
        Self {
            input,
            prompt_out,
            capacity: config.line_capacity,
            increment: config.line_increment,
        }
    }
}

impl<R: Read, W: Write> LineSource for StreamReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Line, FatalError> {
        self.prompt_out.write_all(prompt.as_bytes())?;
        self.prompt_out.flush()?;
        read_line(&mut self.input, self.capacity, self.increment)
    }
}

/// [`LineSource`] backed by a `rustyline` editor, for use on a terminal.
pub struct EditorSource {
    editor: DefaultEditor,
}

impl EditorSource {
    pub fn new() -> Result<Self, FatalError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Line, FatalError> {
        match self.editor.readline(prompt) {
            Ok(text) => {
                if !text.trim().is_empty() {
                    self.editor.add_history_entry(text.as_str())?;
                }
                Ok(Line { text, eof: false })
            }
            Err(ReadlineError::Interrupted) => {
                debug!("line discarded by interrupt");
                Ok(Line::default())
            }
            Err(ReadlineError::Eof) => Ok(Line {
                text: String::new(),
                eof: true,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn stops_at_newline_and_strips_it() {
        let mut input = Cursor::new(b"echo hi\nsecond\n".to_vec());
        let first = read_line(&mut input, 16, 16).unwrap();
        assert_eq!(first.text, "echo hi");
        assert!(!first.eof);

        let second = read_line(&mut input, 16, 16).unwrap();
        assert_eq!(second.text, "second");
        assert!(!second.eof);
    }

    #[test]
    fn empty_stream_yields_empty_line() {
        let mut input = Cursor::new(Vec::new());
        let line = read_line(&mut input, 16, 16).unwrap();
        assert_eq!(line.text, "");
        assert!(line.eof);
    }

    #[test]
    fn long_line_without_newline_survives_growth() {
        let data: String = (0..2000).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let mut input = Cursor::new(data.clone().into_bytes());

        let line = read_line(&mut input, 1024, 1024).unwrap();

        assert_eq!(line.text.len(), 2000);
        assert_eq!(line.text, data);
        assert!(line.eof);
    }

    #[test]
    fn tiny_buffer_grows_many_times() {
        let mut input = Cursor::new(b"a rather long command line\n".to_vec());
        let line = read_line(&mut input, 1, 1).unwrap();
        assert_eq!(line.text, "a rather long command line");
    }

    #[test]
    fn zero_sizes_are_clamped() {
        let mut input = Cursor::new(b"ok\n".to_vec());
        let line = read_line(&mut input, 0, 0).unwrap();
        assert_eq!(line.text, "ok");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut input = Cursor::new(vec![b'a', 0xff, b'b', b'\n']);
        let line = read_line(&mut input, 8, 8).unwrap();
        assert_eq!(line.text, "a\u{fffd}b");
    }

    #[test]
    fn stream_reader_writes_prompt_before_reading() {
        let mut prompt_out = Vec::new();
        {
            let mut reader = StreamReader::new(
                Cursor::new(b"help\n".to_vec()),
                &mut prompt_out,
                &Config::default(),
            );
            let line = reader.read_line("$$ ").unwrap();
            assert_eq!(line.text, "help");
        }
        assert_eq!(prompt_out, b"$$ ");
    }
}
