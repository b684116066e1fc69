use std::time::Duration;

/// Sent when the caller sets no User-Agent of its own.
pub const DEFAULT_USER_AGENT: &str = concat!("webcalc-http/", env!("CARGO_PKG_VERSION"));

/// Whether plain `http://` URLs are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// `http://` is accepted next to `https://`. Meant for a calculator
    /// server on a trusted network or a local mock.
    AllowInsecureHttp,
}

/// Settings consumed by [`crate::HttpClientBuilder`].
///
/// HTTPS is verified against the bundled webpki roots.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Deadline for one whole exchange, from send until the last body byte.
    pub request_timeout: Duration,

    /// Response bodies longer than this fail with `BodyTooLarge`.
    pub max_body_size: usize,

    pub user_agent: String,

    pub transport: TransportSecurity,

    /// Pending requests queued in front of the pool. Never below one.
    pub buffer_capacity: usize,

    /// `None` keeps idle connections until the server closes them.
    pub pool_idle_timeout: Option<Duration>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 64 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            buffer_capacity: 8,
            pool_idle_timeout: Some(Duration::from_secs(30)),
        }
    }
}
