//! Error types for the API client.

use reqwest::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur when talking to the backend.
///
/// Transport failures and non-2xx responses are the two cases callers see
/// in practice; `Display` always yields a message fit for showing to the
/// user as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout...).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the body's `message` field, or the status text.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Server-provided message or status text.
        message: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// A request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The base URL or an endpoint path does not form a valid URL.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A configured header or token cannot be sent as an HTTP header.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Persisting or loading the session failed.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),

    /// The operation needs credentials that are not stored.
    #[error("not signed in: {0}")]
    NotAuthenticated(&'static str),
}

impl ApiError {
    /// HTTP status of the response, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the backend rejected the credentials (401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Whether the resource does not exist (404).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Pick the human-readable message out of an error body.
///
/// Validation failures carry an array of messages, which are joined.
pub(crate) fn error_message(body: &serde_json::Value) -> Option<String> {
    match body.get("message")? {
        serde_json::Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        serde_json::Value::Array(messages) => {
            let joined = messages
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}
