//! secadv CLI
//!
//! Lists findings and compliance resources, one page request at a time

use anyhow::Context;
use clap::Parser;
use security_advisor_sdk::cli::{Cli, Runner};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // Logs go to stderr so stdout stays one item per line
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    Runner::new(cli).run().await.context("secadv command failed")
}
