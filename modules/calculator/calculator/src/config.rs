//! Configuration for the calculator module.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use webcalc_http::{HttpError, TransportSecurity};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8083/api/calc";

/// Remote calculation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Absolute URL every calculation is POSTed to.
    pub endpoint: String,

    /// Rounding hint forwarded to the server.
    pub precision: u32,

    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Permit `http://` endpoints.
    pub allow_insecure_http: bool,

    /// User-Agent override; the HTTP client default is used when unset.
    pub user_agent: Option<String>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            precision: 2,
            timeout_ms: 10_000,
            allow_insecure_http: true,
            user_agent: None,
        }
    }
}

impl CalculatorConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn transport_security(&self) -> TransportSecurity {
        if self.allow_insecure_http {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        }
    }

    /// Run the same URL check a request runs before it connects.
    ///
    /// # Errors
    /// `InvalidUri` or `InvalidScheme` describing why the endpoint would be
    /// rejected.
    pub fn check_endpoint(&self) -> Result<(), HttpError> {
        webcalc_http::check_target(&self.endpoint, self.transport_security()).map(drop)
    }
}

/// Where calculation history is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryBackend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,

    /// `SQLite` connection URL. The host fills in a file under its home
    /// directory when unset.
    pub database_url: Option<String>,
}
