//! CLI module
//!
//! Command-line interface over the paginated listings.
//!
//! # Commands
//!
//! - `notes`, `occurrences`, `note-occurrences` - findings service
//! - `profiles`, `scopes`, `scans`, `credentials`, `collectors`, `goals` -
//!   compliance service
//!
//! Every command takes `--page-size` and `--max-pages`.

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PageArgs};
pub use runner::{write_items, Runner};
