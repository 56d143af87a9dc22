//! CLI argument definitions using clap
//!
//! Commands:
//! - adminql describe --catalog <path> --type <Name>
//! - adminql filter --catalog <path> --type <Name>   (filter map on stdin)
//! - adminql search --catalog <path> --type <Name> --term <text>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// adminql - record type introspection and admin query compilation
#[derive(Parser, Debug)]
#[command(name = "adminql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Record type a command operates on
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Path to the catalog file
    #[arg(long, default_value = "./catalog.json")]
    pub catalog: PathBuf,

    /// Path to configuration file; defaults apply when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record type name
    #[arg(long = "type")]
    pub type_name: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Describe the fields and associations of a record type
    Describe {
        #[command(flatten)]
        target: Target,
    },

    /// Compile a filter map read from stdin
    Filter {
        #[command(flatten)]
        target: Target,
    },

    /// Compile a free-text search
    Search {
        #[command(flatten)]
        target: Target,

        /// Search term
        #[arg(long)]
        term: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
