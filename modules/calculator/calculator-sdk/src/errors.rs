//! Error types for the calculator SDK.

use thiserror::Error;

/// Banner text shown for every failure that is not a server-reported
/// calculation error.
pub const SERVER_UNAVAILABLE: &str = "Server unavailable";

/// Fallback message when the server reports failure without an explanation.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Why a calculation produced no result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// The endpoint is not a valid absolute URL, or its scheme is not allowed.
    #[error("Invalid calculator endpoint")]
    InvalidEndpoint,

    /// No response was received (connection failure or timeout).
    #[error("No connection to the calculator server")]
    NoConnection,

    /// The body did not decode as a calculation response.
    #[error("Invalid response from the calculator server")]
    InvalidResponse,

    /// The server answered with a status other than 200.
    #[error("Calculator server returned HTTP {0}")]
    ServerError(u16),

    /// The server reported the calculation as failed.
    #[error("{0}")]
    CalculationFailed(String),
}

impl CalculationError {
    #[must_use]
    pub fn calculation_failed(message: Option<String>) -> Self {
        Self::CalculationFailed(message.unwrap_or_else(|| UNKNOWN_ERROR.to_owned()))
    }

    /// True for every kind except [`CalculationError::CalculationFailed`].
    #[must_use]
    pub fn is_server_unavailable(&self) -> bool {
        !matches!(self, Self::CalculationFailed(_))
    }

    /// Text for the error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::CalculationFailed(message) => message.clone(),
            _ => SERVER_UNAVAILABLE.to_owned(),
        }
    }
}
