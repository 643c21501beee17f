//! Findings service client and its paginated list operations

use super::models::{ApiNote, ApiOccurrence, ListNotesResponse, ListOccurrencesResponse};
use crate::auth::AuthConfig;
use crate::config::SdkConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::pagination::{ListOperation, Page, PageRequest, Paginated, Pager};
use async_trait::async_trait;
use std::sync::Arc;

const NOTES_PATH: &str = "/v1/{account_id}/providers/{provider_id}/notes";
const OCCURRENCES_PATH: &str = "/v1/{account_id}/providers/{provider_id}/occurrences";
const NOTE_OCCURRENCES_PATH: &str =
    "/v1/{account_id}/providers/{provider_id}/notes/{note_id}/occurrences";

/// Query parameter carrying the cursor
const PAGE_TOKEN: &str = "page_token";

// ============================================================================
// Request Options
// ============================================================================

/// Parameters shared by every findings listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Paging {
    page_size: Option<u32>,
    page_token: Option<String>,
    transaction_id: Option<String>,
}

impl Paging {
    fn apply(&self, config: RequestConfig) -> RequestConfig {
        config
            .query_opt("page_size", self.page_size)
            .query_opt(PAGE_TOKEN, self.page_token.as_deref())
            .header_opt("Transaction-Id", self.transaction_id.clone())
    }
}

macro_rules! paging_builders {
    ($options:ty) => {
        impl $options {
            /// Maximum number of items per page
            #[must_use]
            pub fn page_size(mut self, page_size: u32) -> Self {
                self.paging.page_size = Some(page_size);
                self
            }

            /// Resume at a cursor from a previous response
            ///
            /// Only for single-page calls; a pager rejects options that
            /// already carry a cursor.
            #[must_use]
            pub fn page_token(mut self, token: impl Into<String>) -> Self {
                self.paging.page_token = Some(token.into());
                self
            }

            /// Correlation id sent as the `Transaction-Id` header
            #[must_use]
            pub fn transaction_id(mut self, id: impl Into<String>) -> Self {
                self.paging.transaction_id = Some(id.into());
                self
            }
        }

        impl PageRequest for $options {
            const CURSOR_FIELD: &'static str = PAGE_TOKEN;

            fn cursor(&self) -> Option<&str> {
                self.paging.page_token.as_deref()
            }

            fn with_cursor(&self, cursor: &str) -> Self {
                let mut next = self.clone();
                next.paging.page_token = Some(cursor.to_string());
                next
            }

            fn without_cursor(&self) -> Self {
                let mut next = self.clone();
                next.paging.page_token = None;
                next
            }
        }
    };
}

/// Options for listing the notes of a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNotesOptions {
    /// Provider whose notes are listed
    pub provider_id: String,
    paging: Paging,
}

impl ListNotesOptions {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            paging: Paging::default(),
        }
    }
}

paging_builders!(ListNotesOptions);

/// Options for listing the occurrences of a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOccurrencesOptions {
    /// Provider whose occurrences are listed
    pub provider_id: String,
    paging: Paging,
}

impl ListOccurrencesOptions {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            paging: Paging::default(),
        }
    }
}

paging_builders!(ListOccurrencesOptions);

/// Options for listing the occurrences of a single note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNoteOccurrencesOptions {
    /// Provider that owns the note
    pub provider_id: String,
    /// Note whose occurrences are listed
    pub note_id: String,
    paging: Paging,
}

impl ListNoteOccurrencesOptions {
    pub fn new(provider_id: impl Into<String>, note_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            note_id: note_id.into(),
            paging: Paging::default(),
        }
    }
}

paging_builders!(ListNoteOccurrencesOptions);

// ============================================================================
// Client
// ============================================================================

/// Client for the findings service
///
/// Cheap to clone; clones share one HTTP client and its token cache.
#[derive(Debug, Clone)]
pub struct FindingsClient {
    http: Arc<HttpClient>,
    account_id: String,
}

impl FindingsClient {
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

    /// Create a client from the `findings` section of a config
    pub fn from_config(config: &SdkConfig) -> Result<Self> {
        let service = config.findings_service()?;
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

    fn request(&self, provider_id: &str) -> RequestConfig {
        RequestConfig::new()
            .path_param("account_id", self.account_id.as_str())
            .path_param("provider_id", provider_id)
    }

    /// Fetch one page of notes
    pub async fn list_notes(&self, options: &ListNotesOptions) -> Result<ListNotesResponse> {
        let config = options.paging.apply(self.request(&options.provider_id));
        self.http.get_json(NOTES_PATH, config).await
    }

    /// Fetch one page of provider occurrences
    pub async fn list_occurrences(
        &self,
        options: &ListOccurrencesOptions,
    ) -> Result<ListOccurrencesResponse> {
        let config = options.paging.apply(self.request(&options.provider_id));
        self.http.get_json(OCCURRENCES_PATH, config).await
    }

    /// Fetch one page of occurrences of a note
    pub async fn list_note_occurrences(
        &self,
        options: &ListNoteOccurrencesOptions,
    ) -> Result<ListOccurrencesResponse> {
        let config = options.paging.apply(
            self.request(&options.provider_id)
                .path_param("note_id", options.note_id.as_str()),
        );
        self.http
            .get_json(NOTE_OCCURRENCES_PATH, config)
            .await
    }

    /// Pager over all notes of a provider
    pub fn notes_pager(&self, options: ListNotesOptions) -> Result<Pager<ListNotes>> {
        Pager::new(ListNotes::new(self.clone()), options)
    }

    /// Pager over all occurrences of a provider
    pub fn occurrences_pager(
        &self,
        options: ListOccurrencesOptions,
    ) -> Result<Pager<ListOccurrences>> {
        Pager::new(ListOccurrences::new(self.clone()), options)
    }

    /// Pager over all occurrences of a note
    pub fn note_occurrences_pager(
        &self,
        options: ListNoteOccurrencesOptions,
    ) -> Result<Pager<ListNoteOccurrences>> {
        Pager::new(ListNoteOccurrences::new(self.clone()), options)
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
            client: FindingsClient,
        }

        impl $name {
            pub fn new(client: FindingsClient) -> Self {
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
    /// `GET /v1/{account_id}/providers/{provider_id}/notes`
    ListNotes,
    ListNotesOptions,
    ApiNote,
    list_notes
);

list_operation!(
    /// `GET /v1/{account_id}/providers/{provider_id}/occurrences`
    ListOccurrences,
    ListOccurrencesOptions,
    ApiOccurrence,
    list_occurrences
);

list_operation!(
    /// `GET /v1/{account_id}/providers/{provider_id}/notes/{note_id}/occurrences`
    ListNoteOccurrences,
    ListNoteOccurrencesOptions,
    ApiOccurrence,
    list_note_occurrences
);
