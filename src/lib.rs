//! A minimal interactive command interpreter.
//!
//! Each line read from the input is split on whitespace. The first word names either
//! a builtin (`cd`, `help`, `exit`) run inside the shell, or an external program
//! looked up on `PATH`, started, and waited for. The loop ends on `exit` or at end
//! of input.
//!
//! The main entry point is [`Interpreter`]. Lines come from a [`LineSource`]:
//! [`StreamReader`] for any byte stream, [`EditorSource`] for a terminal. Process
//! creation sits behind the [`Launcher`] trait so the loop itself is platform
//! independent.

mod builtin;
pub mod command;
pub mod config;
pub mod error;
pub mod external;
mod interpreter;
pub mod reader;
pub mod tokenizer;

pub use builtin::{BUILTINS, Builtin};
pub use command::{Launcher, Status, Streams, Termination};
pub use config::Config;
pub use error::{FatalError, LaunchError};
pub use external::SystemLauncher;
pub use interpreter::Interpreter;
pub use reader::{EditorSource, Line, LineSource, StreamReader};
