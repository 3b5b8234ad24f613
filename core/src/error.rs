//! Error types for the cat facts client.
//!
//! # Design
//! Three kinds of failure reach the caller: bad input caught locally, an
//! upstream call that never produced a usable body, and a body that does not
//! have the expected shape. Display strings are the stable, user-facing
//! messages; the upstream variants additionally carry a `reason` that is only
//! meant for logs.

use thiserror::Error;

/// Errors returned by `FactsClient`.
#[derive(Debug, Error)]
pub enum FactsError {
    /// `count` or `lang` failed local validation. No network call was made.
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    /// The outbound call could not be completed or returned a non-2xx status.
    #[error("Failed to connect to Meow Facts API.")]
    UpstreamUnavailable { reason: String },

    /// The call completed but the body is not JSON with a `data` array of strings.
    #[error("Invalid response from Meow Facts API.")]
    UpstreamInvalidResponse { reason: String },
}

/// A caller-supplied parameter outside its accepted domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("Parameter 'count' must be between 1 and 100.")]
    CountOutOfRange(i64),

    #[error("Unsupported language '{0}'.")]
    UnsupportedLanguage(String),
}

/// The transport could not produce a response at all.
#[derive(Debug, Clone, Error)]
#[error("{reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<TransportError> for FactsError {
    fn from(err: TransportError) -> Self {
        FactsError::UpstreamUnavailable { reason: err.reason }
    }
}
