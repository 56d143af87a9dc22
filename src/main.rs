//! adminql CLI entry point
//!
//! Parses arguments, dispatches to the CLI module, and prints fatal errors
//! to stderr with a non-zero exit code. All logic lives in `cli`.

use adminql::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
