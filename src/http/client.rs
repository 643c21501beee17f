//! JSON transport for the list operations
//!
//! Every listing is a GET against a path template such as
//! `/v1/{account_id}/providers/{provider_id}/notes`. The client fills the
//! template, authenticates the request, waits on the rate limiter and
//! retries transient failures with backoff.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use crate::types::{BackoffType, StringMap};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Service root every path template is joined to
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Attempts after the first one for transient failures
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound for any retry delay
    pub max_backoff: Duration,
    /// How the delay grows between retries
    pub backoff_type: BackoffType,
    /// Client-side throttling, `None` to disable
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: StringMap,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: StringMap::new(),
            user_agent: format!("security-advisor-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the backoff strategy and its bounds
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a header sent with every request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Parameters of one list call
///
/// Bindings fill this from their options: path parameters for the
/// template, the query string (including the cursor) and extra headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Values for `{name}` segments of the path template
    pub path_params: StringMap,
    pub query: StringMap,
    pub headers: StringMap,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a path template parameter
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter when a value is present
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v.to_string()),
            None => self,
        }
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a header when a value is present
    #[must_use]
    pub fn header_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.header(key, v),
            None => self,
        }
    }
}

/// A failed attempt, classified for the retry loop
enum Failure {
    /// Worth another attempt after `delay`
    Transient { error: Error, delay: Duration },
    /// Returned to the caller as is
    Fatal(Error),
}

/// HTTP client shared by the service bindings
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Option<Authenticator>,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create an unauthenticated client with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create an unauthenticated client
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized.
    pub fn with_config(config: HttpClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            rate_limiter: config.rate_limit.as_ref().map(RateLimiter::new),
            client,
            config,
            authenticator: None,
        }
    }

    /// Create a client that authenticates every request
    ///
    /// Token exchanges go through the same connection pool.
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Self {
        let mut http = Self::with_config(config);
        if !matches!(auth_config, AuthConfig::None) {
            let auth = Authenticator::with_client(auth_config, http.client.clone());
            http.authenticator = Some(auth);
        }
        http
    }

    /// GET `path` and decode the JSON body
    ///
    /// The body is read in full before decoding so that a malformed payload
    /// surfaces as [`Error::JsonParse`] rather than a transport error.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let url = self.build_url(path, &request.path_params)?;
        let response = self.send(&url, &request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send(&self, url: &str, request: &RequestConfig) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            match self.attempt(url, request, attempt).await {
                Ok(response) => {
                    debug!(url, attempt, "request succeeded");
                    return Ok(response);
                }
                Err(Failure::Transient { error, delay }) if attempt < max_retries => {
                    warn!(
                        url,
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        ?delay,
                        "{error}, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(Failure::Transient { error, .. } | Failure::Fatal(error)) => return Err(error),
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        request: &RequestConfig,
        attempt: u32,
    ) -> std::result::Result<Response, Failure> {
        let mut req = self.build_request(url, request);
        if let Some(auth) = &self.authenticator {
            req = auth.apply(req).await.map_err(Failure::Fatal)?;
        }

        match req.send().await {
            Ok(response) => self.check_status(response, attempt).await,
            Err(e) if e.is_timeout() => Err(Failure::Transient {
                error: Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                },
                delay: self.backoff_delay(attempt),
            }),
            Err(e) if e.is_connect() => Err(Failure::Transient {
                error: Error::Http(e),
                delay: self.backoff_delay(attempt),
            }),
            Err(e) => Err(Failure::Fatal(Error::Http(e))),
        }
    }

    async fn check_status(
        &self,
        response: Response,
        attempt: u32,
    ) -> std::result::Result<Response, Failure> {
        let status = response.status();
        if !(status.is_client_error() || status.is_server_error()) {
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response);
            return Err(Failure::Transient {
                error: Error::RateLimited {
                    retry_after_seconds: retry_after,
                },
                delay: Duration::from_secs(retry_after),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), body);
        if error.is_retryable() {
            Err(Failure::Transient {
                error,
                delay: self.backoff_delay(attempt),
            })
        } else {
            Err(Failure::Fatal(error))
        }
    }

    fn build_request(&self, url: &str, request: &RequestConfig) -> RequestBuilder {
        let mut req = self.client.get(url);
        for (key, value) in self.config.default_headers.iter().chain(&request.headers) {
            req = req.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        req
    }

    fn build_url(&self, path: &str, path_params: &StringMap) -> Result<String> {
        let path = expand_path(path, path_params)?;
        Ok(match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path,
        })
    }

    /// Delay before retry number `attempt + 1`
    pub(crate) fn backoff_delay(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.config.max_backoff)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("rate_limited", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Substitute `{name}` segments of a path template
///
/// Each value is percent-encoded as a single path segment, so a `/` inside
/// a value cannot change the route. Missing or empty values are rejected.
pub fn expand_path(template: &str, params: &StringMap) -> Result<String> {
    if !template.contains('{') {
        return Ok(template.to_string());
    }

    let mut expanded = String::with_capacity(template.len());
    for (i, segment) in template.split('/').enumerate() {
        if i > 0 {
            expanded.push('/');
        }
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                let value = params
                    .get(name)
                    .ok_or_else(|| Error::invalid_parameter(name, "no value bound"))?;
                if value.is_empty() {
                    return Err(Error::invalid_parameter(name, "must not be empty"));
                }
                expanded.push_str(&encode_segment(value));
            }
            None => expanded.push_str(segment),
        }
    }
    Ok(expanded)
}

/// Percent-encode a path segment
fn encode_segment(value: &str) -> String {
    // form encoding writes spaces as '+'; a literal '+' is already %2B
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Seconds to wait from a `Retry-After` header, 60 when absent
fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(60)
}
