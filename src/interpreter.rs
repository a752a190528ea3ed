use crate::builtin;
use crate::command::{Launcher, Status, Streams};
use crate::config::Config;
use crate::error::FatalError;
use crate::external::{self, SystemLauncher};
use crate::reader::LineSource;
use crate::tokenizer::{self, Tokens};
use tracing::{debug, trace};

/// The read-eval loop and the dispatch of a single command.
///
/// Builtins are looked up first; anything else is handed to the [`Launcher`].
///
/// Example
/// ```
/// use minish::{Interpreter, Status, Streams};
/// let sh = Interpreter::default();
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let status = sh.run_line("exit now", &mut Streams::new(&mut out, &mut err)).unwrap();
/// assert_eq!(status, Status::Stop);
/// ```
pub struct Interpreter {
    config: Config,
    launcher: Box<dyn Launcher>,
}

impl Interpreter {
    /// Create an interpreter that starts external programs through `launcher`.
    pub fn new(launcher: Box<dyn Launcher>) -> Self {
        Self {
            config: Config::default(),
            launcher,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one tokenized command.
    ///
    /// A blank command does nothing and continues.
    pub fn execute(&self, tokens: &Tokens<'_>, streams: &mut Streams<'_>) -> Status {
        let Some(name) = tokens.first() else {
            return Status::Continue;
        };
        match builtin::find(name) {
            Some(builtin) => {
                debug!(command = name, "builtin");
                (builtin.run)(tokens.as_slice(), streams)
            }
            None => {
                debug!(command = name, args = tokens.len() - 1, "external");
                external::launch(self.launcher.as_ref(), tokens.as_slice(), streams)
            }
        }
    }

    /// Tokenize `line` and run it.
    pub fn run_line(&self, line: &str, streams: &mut Streams<'_>) -> Result<Status, FatalError> {
        let tokens = tokenizer::split_line(
            line,
            self.config.token_capacity,
            self.config.token_increment,
        )?;
        Ok(self.execute(&tokens, streams))
    }

    /// Prompt, read, run, repeat.
    ///
    /// Returns once a command asks to stop or `source` runs out of input. The line
    /// and its tokens are dropped at the end of every iteration.
    pub fn repl(
        &self,
        source: &mut dyn LineSource,
        streams: &mut Streams<'_>,
    ) -> Result<(), FatalError> {
        loop {
            let line = source.read_line(&self.config.prompt)?;
            let status = self.run_line(&line.text, streams)?;
            trace!(?status, eof = line.eof, "iteration done");
            if !status.should_continue() {
                debug!("stop requested");
                return Ok(());
            }
            if line.eof {
                debug!("end of input");
                return Ok(());
            }
        }
    }
}

impl Default for Interpreter {
    /// Interpreter that launches programs found on `PATH`.
    fn default() -> Self {
        Self::new(Box::new(SystemLauncher::new()))
    }
}
