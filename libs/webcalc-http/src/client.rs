use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tower::buffer::Buffer;

pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Handle to the buffer worker; clones share one worker and one pool.
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// Cloneable JSON-over-POST client bound to one configuration.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) request_timeout: Duration,
    pub(crate) transport_security: TransportSecurity,
}

impl HttpClient {
    /// Start a POST to `url`. The URL is checked by [`crate::check_target`]
    /// when the request is sent.
    pub fn post(&self, url: &str) -> RequestBuilder {
        RequestBuilder::post(
            self.service.clone(),
            self.max_body_size,
            self.request_timeout,
            self.transport_security,
            url.to_owned(),
        )
    }
}

/// Unwrap an [`HttpError`] passed through the buffer; any other error means
/// the worker is gone.
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    err.downcast::<HttpError>().map_or_else(
        |other| {
            tracing::error!(error = %other, "HTTP client worker stopped");
            HttpError::ServiceClosed
        },
        |http_err| *http_err,
    )
}
