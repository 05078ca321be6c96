//! Error types for Checks API operations.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::http::{HttpError, HttpHeaders, HttpResponse, header_get};

/// Errors that can occur when interacting with the Checks API.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport failed before a response was received.
    #[error("HTTP error: {0}")]
    Transport(#[from] HttpError),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication missing or invalid (401).
    #[error("Authentication required")]
    AuthRequired,

    /// Credential lacks the required scope (403), e.g. a user token
    /// attempting a mutation that needs an installation token.
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Resource not found under the given address (404).
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The request body was rejected by the API (422), e.g. a head SHA
    /// that does not resolve to a reachable commit.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Resets at {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    /// Any other non-2xx response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for Checks API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body shape returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// Map a non-2xx response to an error, preserving the API's own message.
pub(crate) fn classify_response(resource: &str, response: &HttpResponse) -> Error {
    let message = error_message(&response.body);
    match response.status {
        401 => Error::AuthRequired,
        403 if rate_limit_exhausted(&response.headers) => Error::RateLimited {
            reset_at: reset_from_headers(&response.headers),
        },
        403 => Error::Forbidden { message },
        404 => Error::NotFound {
            resource: resource.to_string(),
        },
        422 => Error::Validation { message },
        429 => Error::RateLimited {
            reset_at: reset_from_headers(&response.headers),
        },
        status => Error::Api { status, message },
    }
}

/// Extract the API's error message from a response body.
///
/// Falls back to the raw body text when the body is not the usual
/// `{"message": …}` shape.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}

/// A 403 with an exhausted primary quota is a rate limit, not a scope issue.
fn rate_limit_exhausted(headers: &HttpHeaders) -> bool {
    header_get(headers, "x-ratelimit-remaining") == Some("0")
}

/// Resolve the reset instant from response headers.
///
/// Prefers the `x-ratelimit-reset` epoch, then `retry-after` seconds, then a
/// one-minute fallback.
fn reset_from_headers(headers: &HttpHeaders) -> DateTime<Utc> {
    if let Some(epoch) = header_get(headers, "x-ratelimit-reset").and_then(|v| v.parse::<i64>().ok())
        && let Some(reset_at) = DateTime::from_timestamp(epoch, 0)
    {
        return reset_at;
    }
    if let Some(secs) = header_get(headers, "retry-after").and_then(|v| v.parse::<i64>().ok()) {
        return Utc::now() + chrono::Duration::seconds(secs);
    }
    Utc::now() + chrono::Duration::minutes(1)
}

/// Check if an error is a rate limit error (retryable).
pub fn is_rate_limit_error(err: &Error) -> bool {
    matches!(err, Error::RateLimited { .. })
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &Error) -> String {
    match err {
        Error::Transport(_) => "Network error".to_string(),
        Error::Json(_) => "JSON parse error".to_string(),
        Error::AuthRequired => "Authentication required".to_string(),
        Error::Forbidden { .. } => "Forbidden".to_string(),
        Error::NotFound { resource } => format!("Not found: {}", resource),
        Error::Validation { message } => format!("Validation: {}", truncate(message)),
        Error::RateLimited { .. } => "Rate limited".to_string(),
        Error::Api { status, message } => format!("HTTP {}: {}", status, truncate(message)),
        Error::Config(msg) => format!("Config: {}", msg),
    }
}

fn truncate(message: &str) -> String {
    if message.chars().count() > 50 {
        let truncated: String = message.chars().take(47).collect();
        format!("{}...", truncated)
    } else {
        message.to_string()
    }
}
