//! SDK configuration loaded from YAML
//!
//! ```yaml
//! findings:
//!   service_url: https://us-south.secadvisor.cloud.ibm.com/findings
//!   account_id: abc123
//! compliance:
//!   service_url: https://us.compliance.cloud.ibm.com
//!   account_id: abc123
//! auth:
//!   type: iam
//!   api_key: my-key
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: exponential
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, OptionStringExt, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete SDK configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkConfig {
    /// Findings service endpoint
    #[serde(default)]
    pub findings: Option<ServiceConfig>,

    /// Compliance service endpoint
    #[serde(default)]
    pub compliance: Option<ServiceConfig>,

    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,
}

impl SdkConfig {
    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document is an empty config, not a parse error
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// The findings section, checked for required fields
    pub fn findings_service(&self) -> Result<ResolvedService<'_>> {
        ServiceConfig::resolve(self.findings.as_ref(), "findings")
    }

    /// The compliance section, checked for required fields
    pub fn compliance_service(&self) -> Result<ResolvedService<'_>> {
        ServiceConfig::resolve(self.compliance.as_ref(), "compliance")
    }

    /// HTTP client config rooted at `service_url`
    pub fn http_client_config(&self, service_url: &str) -> HttpClientConfig {
        self.http.to_client_config(service_url)
    }
}

// ============================================================================
// Service Config
// ============================================================================

/// Endpoint of one service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Base URL of the service
    #[serde(default)]
    pub service_url: Option<String>,

    /// Account every request is scoped to
    #[serde(default)]
    pub account_id: Option<String>,
}

/// A service section with every required field present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedService<'a> {
    /// Base URL of the service
    pub service_url: &'a str,
    /// Account every request is scoped to
    pub account_id: &'a str,
}

impl ServiceConfig {
    fn resolve<'a>(section: Option<&'a Self>, name: &str) -> Result<ResolvedService<'a>> {
        let section = section.ok_or_else(|| Error::missing_field(name))?;

        let service_url = section
            .service_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_field(format!("{name}.service_url")))?;
        let account_id = section
            .account_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_field(format!("{name}.account_id")))?;

        Ok(ResolvedService {
            service_url,
            account_id,
        })
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client settings shared by both services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: StringMap,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: default_rate_limit(),
            user_agent: None,
            headers: StringMap::new(),
        }
    }
}

impl HttpConfig {
    /// Build the transport config for one service
    pub fn to_client_config(&self, service_url: &str) -> HttpClientConfig {
        let defaults = HttpClientConfig::default();
        HttpClientConfig {
            base_url: Some(service_url.to_string()),
            timeout: Duration::from_secs(self.timeout_secs),
            max_retries: self.max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            backoff_type: self.backoff,
            rate_limit: self.rate_limit.clone(),
            default_headers: self.headers.clone(),
            user_agent: self
                .user_agent
                .clone()
                .none_if_empty()
                .unwrap_or(defaults.user_agent),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    60_000
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}
