//! Auth configuration types

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Default IAM token endpoint
pub const DEFAULT_IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

fn default_iam_token_url() -> String {
    DEFAULT_IAM_TOKEN_URL.to_string()
}

/// Authentication configuration
///
/// Deserializes from a section tagged by `type`:
///
/// ```yaml
/// auth:
///   type: iam
///   api_key: my-key
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Static bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// HTTP Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },

    /// API key exchanged for a short-lived bearer token
    Iam {
        /// The API key
        api_key: String,
        /// Token endpoint URL
        #[serde(default = "default_iam_token_url")]
        token_url: String,
    },
}

impl AuthConfig {
    /// IAM exchange against the default token endpoint
    pub fn iam(api_key: impl Into<String>) -> Self {
        Self::Iam {
            api_key: api_key.into(),
            token_url: default_iam_token_url(),
        }
    }

    /// Short name of the auth type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bearer { .. } => "bearer",
            Self::Basic { .. } => "basic",
            Self::Iam { .. } => "iam",
        }
    }
}

// Secrets never reach log output
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bearer { .. } => f.debug_struct("Bearer").finish_non_exhaustive(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Iam { token_url, .. } => f
                .debug_struct("Iam")
                .field("token_url", token_url)
                .finish_non_exhaustive(),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn expires_in(token: String, seconds: i64) -> Option<Self> {
        let expires_at = Utc::now().checked_add_signed(TimeDelta::try_seconds(seconds)?)?;
        Some(Self {
            token,
            expires_at: Some(expires_at),
        })
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = TimeDelta::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false, // No expiration = never expires
        }
    }
}
