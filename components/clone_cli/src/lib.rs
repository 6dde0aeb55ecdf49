//! Deep clone CLI library
//!
//! Provides argument parsing, logging setup and the clone runner for the
//! `deepclone` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod runner;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runner::{read_input, run, verify_isolation, Report};
