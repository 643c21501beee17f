//! Compliance posture client and its paginated list operations

use super::models::{
    Collector, Credential, Goal, ListCollectorsResponse, ListCredentialsResponse,
    ListLatestScansResponse, ListProfileGoalsResponse, ListProfilesResponse, ListScopesResponse,
    Profile, ScanSummary, Scope,
};
use crate::auth::AuthConfig;
use crate::config::SdkConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{ListOperation, Page, PageRequest, Paginated, Pager};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const PROFILES_PATH: &str = "/posture/v2/profiles";
const SCOPES_PATH: &str = "/posture/v2/scopes";
const LATEST_SCANS_PATH: &str = "/posture/v2/scans/summaries";
const CREDENTIALS_PATH: &str = "/posture/v2/credentials";
const COLLECTORS_PATH: &str = "/posture/v2/collectors";
const PROFILE_GOALS_PATH: &str = "/posture/v2/profiles/{profile_id}/goals";

/// Query parameter carrying the cursor
const START: &str = "start";

// ============================================================================
// Request Options
// ============================================================================

/// Options for the account-wide listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    limit: Option<u32>,
    start: Option<String>,
    transaction_id: Option<String>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of items per page
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resume at a cursor from a previous response
    ///
    /// Only for single-page calls; a pager rejects options that already
    /// carry a cursor.
    #[must_use]
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Correlation id sent as the `Transaction-Id` header
    #[must_use]
    pub fn transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    fn apply(&self, config: RequestConfig) -> RequestConfig {
        config
            .query_opt("limit", self.limit)
            .query_opt(START, self.start.as_deref())
            .header_opt("Transaction-Id", self.transaction_id.clone())
    }
}

impl PageRequest for ListOptions {
    const CURSOR_FIELD: &'static str = START;

    fn cursor(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn with_cursor(&self, cursor: &str) -> Self {
        Self {
            start: Some(cursor.to_string()),
            ..self.clone()
        }
    }

    fn without_cursor(&self) -> Self {
        Self {
            start: None,
            ..self.clone()
        }
    }
}

/// Options for listing the goals of one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProfileGoalsOptions {
    /// Profile whose goals are listed
    pub profile_id: String,
    /// Paging of the listing
    pub list: ListOptions,
}

impl ListProfileGoalsOptions {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            list: ListOptions::default(),
        }
    }

    /// Maximum number of goals per page
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.list = self.list.limit(limit);
        self
    }

    /// Correlation id sent as the `Transaction-Id` header
    #[must_use]
    pub fn transaction_id(mut self, id: impl Into<String>) -> Self {
        self.list = self.list.transaction_id(id);
        self
    }
}

impl PageRequest for ListProfileGoalsOptions {
    const CURSOR_FIELD: &'static str = START;

    fn cursor(&self) -> Option<&str> {
        self.list.cursor()
    }

    fn with_cursor(&self, cursor: &str) -> Self {
        Self {
            profile_id: self.profile_id.clone(),
            list: self.list.with_cursor(cursor),
        }
    }

    fn without_cursor(&self) -> Self {
        Self {
            profile_id: self.profile_id.clone(),
            list: self.list.without_cursor(),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the compliance posture service
///
/// Cheap to clone; clones share one HTTP client and its token cache.
#[derive(Debug, Clone)]
pub struct ComplianceClient {
    http: Arc<HttpClient>,
    account_id: String,
}

impl ComplianceClient {
    /// Create a client for `account_id` over an existing HTTP client
    pub fn new(http: HttpClient, account_id: impl Into<String>) -> Self {
        Self {
            http: Arc::new(http),
            account_id: account_id.into(),
        }
    }

    /// Create a client rooted at `service_url`
    pub fn with_auth(
        service_url: &str,
        account_id: impl Into<String>,
        auth: AuthConfig,
    ) -> Self {
        let config = HttpClientConfig::builder().base_url(service_url).build();
        Self::new(HttpClient::with_auth(config, auth), account_id)
    }

    /// Create a client from the `compliance` section of a config
    pub fn from_config(config: &SdkConfig) -> Result<Self> {
        let service = config.compliance_service()?;
        let http = HttpClient::with_auth(
            config.http_client_config(service.service_url),
            config.auth.clone(),
        );
        Ok(Self::new(http, service.account_id))
    }

    /// Account every request is scoped to
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, config: RequestConfig) -> Result<T> {
        let config = config.query("account_id", self.account_id.as_str());
        self.http.get_json(path, config).await
    }

    /// Fetch one page of profiles
    pub async fn list_profiles(&self, options: &ListOptions) -> Result<ListProfilesResponse> {
        self.get(PROFILES_PATH, options.apply(RequestConfig::new()))
            .await
    }

    /// Fetch one page of scopes
    pub async fn list_scopes(&self, options: &ListOptions) -> Result<ListScopesResponse> {
        self.get(SCOPES_PATH, options.apply(RequestConfig::new()))
            .await
    }

    /// Fetch one page of latest scan summaries
    pub async fn list_latest_scans(
        &self,
        options: &ListOptions,
    ) -> Result<ListLatestScansResponse> {
        self.get(LATEST_SCANS_PATH, options.apply(RequestConfig::new()))
            .await
    }

    /// Fetch one page of credentials
    pub async fn list_credentials(
        &self,
        options: &ListOptions,
    ) -> Result<ListCredentialsResponse> {
        self.get(CREDENTIALS_PATH, options.apply(RequestConfig::new()))
            .await
    }

    /// Fetch one page of collectors
    pub async fn list_collectors(&self, options: &ListOptions) -> Result<ListCollectorsResponse> {
        self.get(COLLECTORS_PATH, options.apply(RequestConfig::new()))
            .await
    }

    /// Fetch one page of goals of a profile
    pub async fn list_profile_goals(
        &self,
        options: &ListProfileGoalsOptions,
    ) -> Result<ListProfileGoalsResponse> {
        let config = RequestConfig::new().path_param("profile_id", options.profile_id.as_str());
        self.get(PROFILE_GOALS_PATH, options.list.apply(config))
            .await
    }

    /// Pager over all profiles
    pub fn profiles_pager(&self, options: ListOptions) -> Result<Pager<ListProfiles>> {
        Pager::new(ListProfiles::new(self.clone()), options)
    }

    /// Pager over all scopes
    pub fn scopes_pager(&self, options: ListOptions) -> Result<Pager<ListScopes>> {
        Pager::new(ListScopes::new(self.clone()), options)
    }

    /// Pager over all latest scan summaries
    pub fn latest_scans_pager(&self, options: ListOptions) -> Result<Pager<ListLatestScans>> {
        Pager::new(ListLatestScans::new(self.clone()), options)
    }

    /// Pager over all credentials
    pub fn credentials_pager(&self, options: ListOptions) -> Result<Pager<ListCredentials>> {
        Pager::new(ListCredentials::new(self.clone()), options)
    }

    /// Pager over all collectors
    pub fn collectors_pager(&self, options: ListOptions) -> Result<Pager<ListCollectors>> {
        Pager::new(ListCollectors::new(self.clone()), options)
    }

    /// Pager over all goals of a profile
    pub fn profile_goals_pager(
        &self,
        options: ListProfileGoalsOptions,
    ) -> Result<Pager<ListProfileGoals>> {
        Pager::new(ListProfileGoals::new(self.clone()), options)
    }
}

// ============================================================================
// List Operations
// ============================================================================

macro_rules! list_operation {
    ($(#[$doc:meta])* $name:ident, $options:ty, $item:ty, $method:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            client: ComplianceClient,
        }

        impl $name {
            pub fn new(client: ComplianceClient) -> Self {
                Self { client }
            }
        }

        #[async_trait]
        impl ListOperation for $name {
            type Request = $options;
            type Item = $item;

            async fn list(&self, request: &$options) -> Result<Page<$item>> {
                Ok(self.client.$method(request).await?.into_page())
            }
        }
    };
}

list_operation!(
    /// `GET /posture/v2/profiles`
    ListProfiles,
    ListOptions,
    Profile,
    list_profiles
);

list_operation!(
    /// `GET /posture/v2/scopes`
    ListScopes,
    ListOptions,
    Scope,
    list_scopes
);

list_operation!(
    /// `GET /posture/v2/scans/summaries`
    ListLatestScans,
    ListOptions,
    ScanSummary,
    list_latest_scans
);

list_operation!(
    /// `GET /posture/v2/credentials`
    ListCredentials,
    ListOptions,
    Credential,
    list_credentials
);

list_operation!(
    /// `GET /posture/v2/collectors`
    ListCollectors,
    ListOptions,
    Collector,
    list_collectors
);

list_operation!(
    /// `GET /posture/v2/profiles/{profile_id}/goals`
    ListProfileGoals,
    ListProfileGoalsOptions,
    Goal,
    list_profile_goals
);
