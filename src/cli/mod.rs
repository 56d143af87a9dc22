//! CLI module for adminql
//!
//! Provides command-line access to:
//! - describe: fields and associations of a record type
//! - filter: compile a filter map read from stdin
//! - search: compile a free-text search

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Target};
pub use commands::{init_logging, run, run_command, Workspace};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_error, write_response};
