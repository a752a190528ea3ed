use std::io;
use thiserror::Error;

/// Errors after which there is no usable shell state left.
///
/// These propagate out of the read loop and end the process with a failure code.
#[derive(Debug, Error)]
pub enum FatalError {
    /// A line or token buffer could not grow.
    #[error("allocation error")]
    Allocation(#[from] std::collections::TryReserveError),
    /// The input stream failed for a reason other than end of input.
    #[error("input error: {0}")]
    Io(#[from] io::Error),
    /// The interactive line editor failed.
    #[error("line editor error: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),
}

/// Reasons an external program could not be started.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{0}: command not found")]
    NotFound(String),
    #[error("{name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}
