use crate::client::{BufferedService, map_buffer_error};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, Uri};
use http_body_util::Full;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use tower::{Service, ServiceExt};

/// One pending POST, created by [`crate::HttpClient::post`].
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    request_timeout: Duration,
    transport_security: TransportSecurity,
    url: String,
    json_body: Option<Bytes>,
}

impl RequestBuilder {
    pub(crate) fn post(
        service: BufferedService,
        max_body_size: usize,
        request_timeout: Duration,
        transport_security: TransportSecurity,
        url: String,
    ) -> Self {
        Self {
            service,
            max_body_size,
            request_timeout,
            transport_security,
            url,
            json_body: None,
        }
    }

    /// Serialize `body` as the payload, sent as `application/json`.
    ///
    /// # Errors
    /// `HttpError::Json` if `body` does not serialize.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, HttpError> {
        self.json_body = Some(Bytes::from(serde_json::to_vec(body)?));
        Ok(self)
    }

    /// Send the request and wait for the response head.
    ///
    /// Any status resolves to `Ok`. The request timeout starts here and also
    /// bounds the later body read.
    ///
    /// # Errors
    /// `InvalidUri` or `InvalidScheme` for a rejected URL, `Transport` or
    /// `Timeout` when no response arrived, `ServiceClosed` if the client
    /// worker has stopped.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        let deadline = Instant::now() + self.request_timeout;
        let uri = check_target(&self.url, self.transport_security)?;

        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if self.json_body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder.body(Full::new(self.json_body.unwrap_or_default()))?;

        tracing::debug!(uri = %request.uri(), "sending request");

        let ready = ServiceExt::<Request<Full<Bytes>>>::ready(&mut self.service)
            .await
            .map_err(map_buffer_error)?;
        let inner = ready.call(request).await.map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
            deadline,
            request_timeout: self.request_timeout,
        })
    }
}

/// Parse `url` and check it is absolute with a scheme `transport` permits.
///
/// Requests run the same check at send time, so a URL accepted here is only
/// rejected later if the transport policy differs.
///
/// # Errors
/// `InvalidUri` for an unparsable or relative URL, `InvalidScheme` for a
/// scheme other than `https` (or `http` when insecure transport is allowed).
pub fn check_target(url: &str, transport: TransportSecurity) -> Result<Uri, HttpError> {
    let invalid = |kind, reason: String| HttpError::InvalidUri {
        url: url.to_owned(),
        kind,
        reason,
    };

    let uri: Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;
    let Some(scheme) = uri.scheme_str() else {
        let kind = if uri.authority().is_some() {
            InvalidUriKind::MissingScheme
        } else {
            InvalidUriKind::MissingAuthority
        };
        return Err(invalid(kind, "not an absolute URL".to_owned()));
    };
    if uri.host().is_none_or(str::is_empty) {
        return Err(invalid(
            InvalidUriKind::MissingAuthority,
            "missing host".to_owned(),
        ));
    }

    match (scheme, transport) {
        ("https", _) | ("http", TransportSecurity::AllowInsecureHttp) => Ok(uri),
        ("http", _) => Err(HttpError::InvalidScheme {
            scheme: "http".to_owned(),
            reason: "plain HTTP is not allowed".to_owned(),
        }),
        (other, _) => Err(HttpError::InvalidScheme {
            scheme: other.to_owned(),
            reason: "expected http or https".to_owned(),
        }),
    }
}
