//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PageArgs};
use crate::compliance::{ComplianceClient, ListOptions, ListProfileGoalsOptions};
use crate::config::SdkConfig;
use crate::error::{Error, Result, ResultExt};
use crate::findings::{
    FindingsClient, ListNoteOccurrencesOptions, ListNotesOptions, ListOccurrencesOptions,
};
use crate::pagination::{ListOperation, Pager};
use serde::Serialize;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Notes { provider, paging } => {
                let options = with_size(ListNotesOptions::new(provider), paging, |o, n| {
                    o.page_size(n)
                });
                let pager = FindingsClient::from_config(&config)?.notes_pager(options)?;
                self.drain(pager, paging).await
            }
            Commands::Occurrences { provider, paging } => {
                let options = with_size(ListOccurrencesOptions::new(provider), paging, |o, n| {
                    o.page_size(n)
                });
                let pager = FindingsClient::from_config(&config)?.occurrences_pager(options)?;
                self.drain(pager, paging).await
            }
            Commands::NoteOccurrences {
                provider,
                note,
                paging,
            } => {
                let options = with_size(
                    ListNoteOccurrencesOptions::new(provider, note),
                    paging,
                    |o, n| o.page_size(n),
                );
                let pager =
                    FindingsClient::from_config(&config)?.note_occurrences_pager(options)?;
                self.drain(pager, paging).await
            }
            Commands::Profiles { paging } => {
                let pager =
                    ComplianceClient::from_config(&config)?.profiles_pager(list_options(paging))?;
                self.drain(pager, paging).await
            }
            Commands::Scopes { paging } => {
                let pager =
                    ComplianceClient::from_config(&config)?.scopes_pager(list_options(paging))?;
                self.drain(pager, paging).await
            }
            Commands::Scans { paging } => {
                let pager = ComplianceClient::from_config(&config)?
                    .latest_scans_pager(list_options(paging))?;
                self.drain(pager, paging).await
            }
            Commands::Credentials { paging } => {
                let pager = ComplianceClient::from_config(&config)?
                    .credentials_pager(list_options(paging))?;
                self.drain(pager, paging).await
            }
            Commands::Collectors { paging } => {
                let pager = ComplianceClient::from_config(&config)?
                    .collectors_pager(list_options(paging))?;
                self.drain(pager, paging).await
            }
            Commands::Goals { profile, paging } => {
                let options = with_size(ListProfileGoalsOptions::new(profile), paging, |o, n| {
                    o.limit(n)
                });
                let pager = ComplianceClient::from_config(&config)?.profile_goals_pager(options)?;
                self.drain(pager, paging).await
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<SdkConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use --config)"))?;
        SdkConfig::from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))
    }

    /// Print every item of a listing
    ///
    /// Without `--max-pages` the whole listing is collected first; with it,
    /// pages are printed as they arrive.
    async fn drain<O>(&self, mut pager: Pager<O>, paging: &PageArgs) -> Result<()>
    where
        O: ListOperation,
        O::Item: Serialize,
    {
        match paging.max_pages {
            None => {
                let items = pager.get_all().await?;
                write_items(&mut std::io::stdout().lock(), self.cli.format, &items)?;
            }
            Some(max_pages) => {
                while pager.has_next() && pager.pages_fetched() < max_pages {
                    let items = pager.get_next().await?;
                    write_items(&mut std::io::stdout().lock(), self.cli.format, &items)?;
                }
            }
        }

        info!(
            pages = pager.pages_fetched(),
            complete = !pager.has_next(),
            "Listing finished"
        );
        Ok(())
    }
}

fn with_size<T>(options: T, paging: &PageArgs, set: impl FnOnce(T, u32) -> T) -> T {
    match paging.page_size {
        Some(n) => set(options, n),
        None => options,
    }
}

fn list_options(paging: &PageArgs) -> ListOptions {
    with_size(ListOptions::new(), paging, ListOptions::limit)
}

/// Write items one JSON document per line, or pretty-printed
pub fn write_items<W: Write, T: Serialize>(
    out: &mut W,
    format: OutputFormat,
    items: &[T],
) -> Result<()> {
    for item in items {
        match format {
            OutputFormat::Json => serde_json::to_writer(&mut *out, item)?,
            OutputFormat::Pretty => serde_json::to_writer_pretty(&mut *out, item)?,
        }
        writeln!(out)?;
    }
    Ok(())
}
