use minish::{EditorSource, FatalError, Interpreter, LineSource, StreamReader, Streams};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sh: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), FatalError> {
    let sh = Interpreter::default();
    let mut source: Box<dyn LineSource> = if io::stdin().is_terminal() {
        Box::new(EditorSource::new()?)
    } else {
        Box::new(StreamReader::new(io::stdin().lock(), io::stdout(), sh.config()))
    };

    let (mut out, mut err) = (io::stdout(), io::stderr());
    sh.repl(source.as_mut(), &mut Streams::new(&mut out, &mut err))
}
