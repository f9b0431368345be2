//! Remote resolution error types.

use thiserror::Error;

/// Errors that can occur while resolving a message remotely.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// URL, host or key is missing (only surfaced by the connection probe;
    /// chat resolution answers with the local-mode advisory instead).
    #[error("API settings incomplete: URL, host and key are required")]
    IncompleteSettings,

    /// The exchange did not finish within the bound and was cancelled.
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Http {
        /// Status code returned by the endpoint.
        status: u16,
        /// JSON text of the body's `error` member, when there was one.
        detail: Option<String>,
    },

    /// Success status, but the body was neither JSON nor non-empty text.
    #[error("response had neither a JSON nor a text body")]
    Unparsable,

    /// Connection-level failure (DNS, refused, TLS, reset).
    #[error("request failed: {0}")]
    Transport(String),

    /// The request could not be built (bad URL, invalid header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ResolveError {
    /// HTTP status carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ResolveError::Timeout(0)
        } else if err.is_builder() {
            ResolveError::InvalidRequest(err.to_string())
        } else {
            ResolveError::Transport(err.to_string())
        }
    }
}
