//! `GET /api/facts`: query parameters in, JSON envelope out.
//!
//! # Design
//! The query is decoded from the raw query string so that no input can make
//! the extractor reject the request with a non-JSON body. The blocking
//! `FactsClient` call runs on the blocking pool. Every failure becomes an
//! `ApiError`, rendered as HTTP 400 with `{"success": false, "error": ...}`.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meowfacts_core::{FactsEnvelope, FactsError, FactsRequest};
use thiserror::Error;
use tokio::task::JoinError;

use crate::server::AppState;

/// `count` used when the query does not mention it.
pub const DEFAULT_COUNT: i64 = 1;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Facts(#[from] FactsError),

    #[error("Request could not be completed.")]
    Worker(#[from] JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Facts(FactsError::InvalidParameter(e)) => {
                tracing::debug!(error = %e, "rejected facts request");
            }
            // Upstream failures are already logged with their reason by the client.
            ApiError::Facts(_) => {}
            ApiError::Worker(e) => tracing::error!(error = %e, "facts worker failed"),
        }
        (
            StatusCode::BAD_REQUEST,
            Json(FactsEnvelope::failure(self.to_string())),
        )
            .into_response()
    }
}

pub async fn get_facts(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<FactsEnvelope>, ApiError> {
    let request = parse_query(raw.as_deref());
    let client = state.client.clone();
    let facts = tokio::task::spawn_blocking(move || client.fetch(&request)).await??;
    Ok(Json(FactsEnvelope::success(facts)))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(FactsEnvelope::failure("Not found.")),
    )
}

/// Known path, unsupported method.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(FactsEnvelope::failure("Method not allowed.")),
    )
}

/// Build a `FactsRequest` from a raw `application/x-www-form-urlencoded`
/// query. Last value wins for repeated keys; unknown keys are ignored.
pub fn parse_query(raw: Option<&str>) -> FactsRequest {
    let (mut count, mut lang, mut id) = (None, None, None);
    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "count" => count = Some(coerce_count(&value)),
            "lang" => lang = Some(value.into_owned()),
            "id" => id = Some(value.into_owned()),
            _ => {}
        }
    }
    FactsRequest {
        count: Some(count.unwrap_or(DEFAULT_COUNT)),
        lang,
        id,
    }
}

/// Truncating text-to-integer conversion for `count`.
///
/// Leading whitespace and an optional sign are accepted, then the leading run
/// of ASCII digits is read and the rest ignored (`"12abc"` is 12, `"2.9"` is
/// 2). No digits gives 0. Overflow saturates. Every value that is not a
/// plain 1..=100 still goes through range validation afterwards.
pub fn coerce_count(raw: &str) -> i64 {
    let s = raw.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            let digit = i64::from(b - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(digit)
            } else {
                acc.saturating_mul(10).saturating_add(digit)
            }
        })
}
