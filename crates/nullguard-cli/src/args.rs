//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "nullguard")]
#[command(author, version, about = "Finds outer-join fields used without null guards")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check syntax tree documents (JSON) for unguarded outer-join fields
    Check {
        /// Tree documents to check (supports glob patterns)
        files: Vec<PathBuf>,

        /// Configuration file (defaults to the nearest nullguard.toml)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Rule codes to disable (e.g. E1000)
        #[arg(long, value_name = "CODE")]
        disable: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Print the syntax tree of a document (for debugging)
    Tree {
        /// Tree document to print
        file: PathBuf,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output
    Json,
    /// SARIF output (for GitHub Code Scanning)
    Sarif,
}
