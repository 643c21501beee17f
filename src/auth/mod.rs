//! Authentication module
//!
//! Supports: Bearer, Basic, IAM API key exchange
//!
//! The `Authenticator` handles all auth types and caches the exchanged
//! IAM token until shortly before it expires.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, DEFAULT_IAM_TOKEN_URL};
