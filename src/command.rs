use crate::error::LaunchError;
use std::io::Write;

/// What the read loop should do after a command has run.
///
/// Only `exit` ever returns [`Status::Stop`]; the exit code of an external
/// program has no influence on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    Stop,
}

impl Status {
    pub fn should_continue(self) -> bool {
        self == Status::Continue
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Exited normally with this code.
    Exited(i32),
    /// Killed by this signal.
    Signaled(i32),
    /// Neither an exit code nor a signal was reported.
    Unknown,
}

/// Output and error streams handed to every command.
///
/// The interpreter writes to the process's stdout and stderr; tests pass in buffers.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Self { out, err }
    }
}

/// Spawn a program and block until it terminates.
///
/// `argv[0]` is both the name to resolve and the child's own `argv[0]`.
/// Implementations must not return before the child has finished.
pub trait Launcher {
    fn launch(&self, argv: &[&str]) -> Result<Termination, LaunchError>;
}
