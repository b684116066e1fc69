use crate::client::{BufferedService, HttpClient};
use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::header::USER_AGENT;
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::crypto::CryptoProvider;
use std::sync::Arc;
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::{ServiceBuilder, ServiceExt};

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Fluent construction of an [`HttpClient`]; every setter overrides one
/// field of the starting [`HttpClientConfig`].
#[derive(Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    /// Deadline for connect, response head and body read together.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// Zero is raised to one.
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    /// Assemble the service stack.
    ///
    /// Spawns the buffer worker, so a tokio runtime must be running.
    ///
    /// # Errors
    /// `HttpError::Tls` when the connector cannot be set up and
    /// `HttpError::InvalidHeaderValue` for an unusable user agent.
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let HttpClientConfig {
            request_timeout,
            max_body_size,
            user_agent,
            transport,
            buffer_capacity,
            pool_idle_timeout,
        } = self.config;

        if transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!(
                "insecure HTTP enabled; requests to http:// endpoints travel unencrypted"
            );
        }

        let connector = https_connector(transport)?;
        let hyper_client = hyper_client(connector, pool_idle_timeout);
        let user_agent = HeaderValue::from_str(&user_agent)?;

        // Buffer -> error mapping -> timeout -> User-Agent -> hyper.
        // Any HTTP status is an Ok response; Err is reserved for failures
        // that produced no response at all.
        let stack = ServiceBuilder::new()
            .layer(TimeoutLayer::new(request_timeout))
            .map_request(move |request: Request<Full<Bytes>>| {
                with_default_user_agent(request, &user_agent)
            })
            .service(hyper_client)
            .map_response(box_body)
            .map_err(move |err: tower::BoxError| map_tower_error(err, request_timeout))
            .boxed_clone();

        let service: BufferedService = Buffer::new(stack, buffer_capacity.max(1));

        Ok(HttpClient {
            service,
            max_body_size,
            request_timeout,
            transport_security: transport,
        })
    }
}

fn hyper_client(
    connector: HttpsConnector<HttpConnector>,
    pool_idle_timeout: Option<Duration>,
) -> HyperClient {
    let mut builder = Client::builder(TokioExecutor::new());
    // The idle timeout is only enforced when a pool timer is installed.
    builder.pool_timer(TokioTimer::new());
    if let Some(idle) = pool_idle_timeout {
        builder.pool_idle_timeout(idle);
    }
    builder.build(connector)
}

/// Translate a failure from the inner stack into an [`HttpError`].
fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    let err = match err.downcast::<HttpError>() {
        Ok(http_err) => return *http_err,
        Err(other) => other,
    };
    match err.downcast::<hyper_util::client::legacy::Error>() {
        Ok(hyper_err) => HttpError::from(*hyper_err),
        Err(other) => HttpError::Transport(other),
    }
}

fn box_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    response.map(|body| body.map_err(Into::into).boxed())
}

fn with_default_user_agent(
    mut request: Request<Full<Bytes>>,
    user_agent: &HeaderValue,
) -> Request<Full<Bytes>> {
    request
        .headers_mut()
        .entry(USER_AGENT)
        .or_insert_with(|| user_agent.clone());
    request
}

/// The installed process-wide rustls provider, else aws-lc-rs.
fn crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// webpki-rooted connector negotiating h2 or http/1.1 via ALPN.
///
/// # Errors
/// `HttpError::Tls` when the provider rejects the default protocol versions.
fn https_connector(
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let with_roots = HttpsConnectorBuilder::new()
        .with_provider_and_webpki_roots(crypto_provider())
        .map_err(|e| HttpError::Tls(Box::new(e)))?;

    Ok(match transport {
        TransportSecurity::AllowInsecureHttp => {
            with_roots.https_or_http().enable_all_versions().build()
        }
        TransportSecurity::TlsOnly => with_roots.https_only().enable_all_versions().build(),
    })
}
