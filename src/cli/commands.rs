//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Security advisor findings and compliance CLI
#[derive(Parser, Debug)]
#[command(name = "secadv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SDK configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Paging controls shared by every listing
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageArgs {
    /// Items requested per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Stop after this many pages (default: fetch everything)
    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the notes of a findings provider
    Notes {
        /// Provider id
        #[arg(long)]
        provider: String,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// List the occurrences of a findings provider
    Occurrences {
        /// Provider id
        #[arg(long)]
        provider: String,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// List the occurrences of one note
    NoteOccurrences {
        /// Provider id
        #[arg(long)]
        provider: String,

        /// Note id
        #[arg(long)]
        note: String,

        #[command(flatten)]
        paging: PageArgs,
    },

    /// List compliance profiles
    Profiles {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// List scopes
    Scopes {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// List the latest scan of every scope and profile
    Scans {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// List collector credentials
    Credentials {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// List collectors
    Collectors {
        #[command(flatten)]
        paging: PageArgs,
    },

    /// List the goals of a profile
    Goals {
        /// Profile id
        #[arg(long)]
        profile: String,

        #[command(flatten)]
        paging: PageArgs,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
