//! Findings wire models
//!
//! Only the fields callers routinely read are typed. Everything else lands
//! in `extra` so that a round trip through these types keeps the payload.

use crate::pagination::Paginated;
use crate::types::ValueMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a note or occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteKind {
    Finding,
    Kpi,
    Card,
    CardConfigured,
    Section,
    #[serde(other)]
    Unknown,
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[serde(other)]
    Unknown,
}

/// A note: the type-level description of a finding or metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiNote {
    /// Note identifier, unique within its provider
    pub id: String,
    /// What the note describes
    pub kind: NoteKind,
    /// One-line summary
    #[serde(default)]
    pub short_description: String,
    /// Detailed description
    #[serde(default)]
    pub long_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    /// Whether other accounts may attach occurrences
    #[serde(default)]
    pub shared: bool,
    /// Remaining fields as returned by the service
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// Finding details attached to an occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// An occurrence: one instance of a note on a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiOccurrence {
    /// Occurrence identifier
    pub id: String,
    /// Name of the note this occurrence instantiates
    #[serde(default)]
    pub note_name: String,
    /// Kind of the parent note
    pub kind: NoteKind,
    /// Affected resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,
    /// Suggested remediation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    /// Present when `kind` is `FINDING`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finding: Option<Finding>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// One page of notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListNotesResponse {
    #[serde(default)]
    pub notes: Vec<ApiNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl Paginated for ListNotesResponse {
    type Item = ApiNote;

    fn next_cursor(&self) -> Option<String> {
        self.next_page_token.clone()
    }

    fn into_items(self) -> Vec<ApiNote> {
        self.notes
    }
}

/// One page of occurrences, for a provider or for a single note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOccurrencesResponse {
    #[serde(default)]
    pub occurrences: Vec<ApiOccurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl Paginated for ListOccurrencesResponse {
    type Item = ApiOccurrence;

    fn next_cursor(&self) -> Option<String> {
        self.next_page_token.clone()
    }

    fn into_items(self) -> Vec<ApiOccurrence> {
        self.occurrences
    }
}
