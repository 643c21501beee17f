//! Shared aliases and small helpers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query parameters, headers and path parameters
pub type StringMap = HashMap<String, String>;

/// Service fields a model does not type explicitly
///
/// Models flatten every unknown member into one of these, so a field the
/// service adds later still reaches the caller.
pub type ValueMap = HashMap<String, serde_json::Value>;

/// How the retry delay grows between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Same delay every time
    Constant,
    /// `initial * (attempt + 1)`
    Linear,
    /// `initial * 2^attempt`
    #[default]
    Exponential,
}

/// Treat an empty string as absent
///
/// Cursors, tokens and optional config strings all follow this rule.
pub trait OptionStringExt {
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}
