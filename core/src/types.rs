//! Domain types for the cat facts relay.
//!
//! # Design
//! `FactsRequest` is built once per inbound call from untrusted input, so
//! `count` is a wide signed integer: out-of-range values stay representable
//! and are rejected by `validate` with a precise message instead of failing
//! somewhere in parsing. `FactsEnvelope` is the JSON shape handed back to the
//! browser; it lives here so callers can deserialize it with the same type.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Language codes the remote service accepts for `lang`.
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["eng", "ces-cz", "ger"];

pub const MIN_COUNT: i64 = 1;
pub const MAX_COUNT: i64 = 100;

/// Parameters of a single facts lookup. Absent fields are left to the
/// remote service's own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Forwarded verbatim; the remote service owns ID validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Default for FactsRequest {
    fn default() -> Self {
        Self {
            count: Some(1),
            lang: None,
            id: None,
        }
    }
}

impl FactsRequest {
    pub fn new(count: Option<i64>, lang: Option<&str>, id: Option<&str>) -> Self {
        Self {
            count,
            lang: lang.map(str::to_string),
            id: id.map(str::to_string),
        }
    }

    /// Checks `count` then `lang`.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if let Some(count) = self.count {
            if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
                return Err(ParameterError::CountOutOfRange(count));
            }
        }
        if let Some(lang) = self.lang.as_deref() {
            if !is_supported_language(lang) {
                return Err(ParameterError::UnsupportedLanguage(lang.to_string()));
            }
        }
        Ok(())
    }

    /// Present parameters as query pairs, in `count`, `lang`, `id` order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(count) = self.count {
            pairs.push(("count", count.to_string()));
        }
        if let Some(lang) = &self.lang {
            pairs.push(("lang", lang.clone()));
        }
        if let Some(id) = &self.id {
            pairs.push(("id", id.clone()));
        }
        pairs
    }
}

/// Exact, case-sensitive allow-list membership.
pub fn is_supported_language(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&lang)
}

/// Body the remote service is expected to return.
#[derive(Debug, Deserialize)]
pub(crate) struct FactsPayload {
    pub data: Vec<String>,
}

/// JSON wrapper returned by the relay endpoint: `facts` on success,
/// `error` on failure, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FactsEnvelope {
    pub fn success(facts: Vec<String>) -> Self {
        Self {
            success: true,
            facts: Some(facts),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            facts: None,
            error: Some(message.into()),
        }
    }
}
