//! Compliance posture wire models

use crate::pagination::Paginated;
use crate::types::ValueMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

// ============================================================================
// Page Links
// ============================================================================

/// Link to another page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    /// Full link to the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Cursor of the page, when the service reports it directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
}

impl PageLink {
    /// The cursor this link points at
    ///
    /// Prefers `start`; otherwise reads the `start` query parameter of
    /// `href`, which may be absolute or relative.
    pub fn cursor(&self) -> Option<String> {
        if let Some(start) = self.start.as_deref().filter(|s| !s.is_empty()) {
            return Some(start.to_string());
        }
        self.href.as_deref().and_then(start_from_href)
    }
}

fn start_from_href(href: &str) -> Option<String> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(href).ok()?
        }
        Err(_) => return None,
    };
    url.query_pairs()
        .find(|(key, _)| key == "start")
        .map(|(_, value)| value.into_owned())
}

macro_rules! paginated_response {
    ($(#[$doc:meta])* $name:ident, $field:ident, $item:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub offset: Option<u64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub limit: Option<u64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub total_count: Option<u64>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub first: Option<PageLink>,
            /// Absent on the last page
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub next: Option<PageLink>,
            #[serde(default)]
            pub $field: Vec<$item>,
        }

        impl Paginated for $name {
            type Item = $item;

            fn next_cursor(&self) -> Option<String> {
                self.next.as_ref().and_then(PageLink::cursor)
            }

            fn into_items(self) -> Vec<$item> {
                self.$field
            }
        }
    };
}

// ============================================================================
// Enums
// ============================================================================

/// Whether a profile ships with the service or was authored by the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    Predefined,
    Custom,
    #[serde(other)]
    Unknown,
}

/// Lifecycle state of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Installation state of a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectorStatus {
    ReadyToInstall,
    CoreDownloaded,
    ApprovalRequired,
    ApprovedDownloadCore,
    ApprovedInstallCore,
    Installed,
    Active,
    Suspended,
    Unable,
    #[serde(other)]
    Unknown,
}

// ============================================================================
// Items
// ============================================================================

/// A compliance profile: a named set of goals and controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<ProfileType>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// A scope: the set of resources a scan runs against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Cloud environment, e.g. `ibm`, `aws`, `azure`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_type: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// Summary of the most recent scan of a scope against a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: String,
    #[serde(default)]
    pub scan_name: String,
    #[serde(default)]
    pub scope_id: String,
    #[serde(default)]
    pub scope_name: String,
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub profile_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ScanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// Credentials a collector uses to reach a target environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// A collector agent installed in a customer environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CollectorStatus>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ValueMap,
}

/// A goal checked by a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(alias = "id")]
    pub goal_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default)]
    pub is_manual: bool,
    #[serde(default)]
    pub is_remediable: bool,
    #[serde(flatten)]
    pub extra: ValueMap,
}

// ============================================================================
// Responses
// ============================================================================

paginated_response!(
    /// One page of profiles
    ListProfilesResponse,
    profiles,
    Profile
);

paginated_response!(
    /// One page of scopes
    ListScopesResponse,
    scopes,
    Scope
);

paginated_response!(
    /// One page of latest scan summaries
    ListLatestScansResponse,
    latest_scans,
    ScanSummary
);

paginated_response!(
    /// One page of credentials
    ListCredentialsResponse,
    credentials,
    Credential
);

paginated_response!(
    /// One page of collectors
    ListCollectorsResponse,
    collectors,
    Collector
);

paginated_response!(
    /// One page of goals of a profile
    ListProfileGoalsResponse,
    goals,
    Goal
);
