//! Compliance posture service
//!
//! Profiles, scopes, scans, credentials, collectors and goals under
//! `/posture/v2`. Every request carries the `account_id` query parameter.
//! The cursor travels as `start` and comes back inside the `next` link.

mod client;
mod models;

pub use client::{
    ComplianceClient, ListCollectors, ListCredentials, ListLatestScans, ListOptions,
    ListProfileGoals, ListProfileGoalsOptions, ListProfiles, ListScopes,
};
pub use models::{
    Collector, CollectorStatus, Credential, Goal, ListCollectorsResponse, ListCredentialsResponse,
    ListLatestScansResponse, ListProfileGoalsResponse, ListProfilesResponse, ListScopesResponse,
    PageLink, Profile, ProfileType, ScanStatus, ScanSummary, Scope,
};
