//! # Security Advisor SDK
//!
//! Client for the security findings and compliance posture services,
//! built around one generic cursor pager.
//!
//! ## Features
//!
//! - **Generic Pager**: One `Pager` drives every cursor-paginated listing
//! - **Findings**: Notes and occurrences by provider and by note
//! - **Compliance**: Profiles, scopes, scans, credentials, collectors, goals
//! - **Auth**: Bearer, Basic, and IAM API key exchange with token caching
//! - **Transport**: Retries with backoff and client-side rate limiting
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use security_advisor_sdk::findings::{FindingsClient, ListNotesOptions};
//! use security_advisor_sdk::{Result, SdkConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SdkConfig::from_file("sdk.yaml")?;
//!     let findings = FindingsClient::from_config(&config)?;
//!
//!     let mut pager = findings.notes_pager(ListNotesOptions::new("my-provider").page_size(50))?;
//!     while pager.has_next() {
//!         for note in pager.get_next().await? {
//!             println!("{}: {}", note.id, note.short_description);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │         Pager<O: ListOperation>                             │
//! │  has_next()   get_next()   get_all()   into_pages/items()   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────────────┬──────┴───────────────────────────────┐
//! │      Findings        │             Compliance               │
//! ├──────────────────────┼──────────────────────────────────────┤
//! │ ListNotes            │ ListProfiles     ListCredentials     │
//! │ ListOccurrences      │ ListScopes       ListCollectors      │
//! │ ListNoteOccurrences  │ ListLatestScans  ListProfileGoals    │
//! └──────────────────────┴──────────────────────────────────────┘
//!                               │
//! ┌──────────────────────┬──────┴─────┬─────────────────────────┐
//! │         HTTP         │    Auth    │         Config          │
//! │ Retry  Rate Limit    │ Bearer     │ YAML                    │
//! │ Backoff  Paths       │ Basic  IAM │                         │
//! └──────────────────────┴────────────┴─────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Generic cursor pager
pub mod pagination;

/// SDK configuration
pub mod config;

/// Findings service bindings
pub mod findings;

/// Compliance posture service bindings
pub mod compliance;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::SdkConfig;
pub use error::{Error, Result};
pub use pagination::{list_fn, ListOperation, Page, PageRequest, Paginated, Pager, PagerPhase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
