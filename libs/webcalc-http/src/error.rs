use std::time::Duration;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a URL was rejected before any connection was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidUriKind {
    ParseError,
    MissingAuthority,
    MissingScheme,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HttpError {
    #[error("could not build request: {0}")]
    RequestBuild(#[from] http::Error),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// The exchange, body included, did not finish within the request timeout.
    #[error("no complete response within {0:?}")]
    Timeout(Duration),

    /// Connect, DNS, TLS handshake or stream failure.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The TLS connector could not be set up.
    #[error("TLS setup failed: {0}")]
    Tls(#[source] BoxError),

    #[error("response body exceeds {limit} bytes (read {actual})")]
    BodyTooLarge { limit: usize, actual: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The buffer worker that owns the connection pool has stopped.
    #[error("HTTP client worker stopped")]
    ServiceClosed,

    /// `reason` is diagnostic text; match on `kind`.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUri {
        url: String,
        kind: InvalidUriKind,
        reason: String,
    },

    #[error("URL scheme '{scheme}' rejected: {reason}")]
    InvalidScheme { scheme: String, reason: String },
}

impl HttpError {
    /// The peer never delivered a complete response: refused, reset,
    /// stalled past the deadline, or the worker is gone.
    #[must_use]
    pub fn is_no_response(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Timeout(_) | Self::ServiceClosed
        )
    }

    /// The URL itself was unusable.
    #[must_use]
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Self::InvalidUri { .. } | Self::InvalidScheme { .. })
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
