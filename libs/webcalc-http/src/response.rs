use crate::error::HttpError;
use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::time::Instant;

/// Body type of every response the client yields.
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// A received response head. Reading the body is capped at the size limit
/// and must finish before the deadline set when the request was sent.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
    pub(crate) deadline: Instant,
    pub(crate) request_timeout: Duration,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Read the whole body, whatever the status.
    ///
    /// # Errors
    /// `BodyTooLarge` past the limit, `Timeout` if the body stalls past the
    /// deadline, `Transport` if the stream breaks.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        let Self {
            inner,
            max_body_size,
            deadline,
            request_timeout,
        } = self;
        tokio::time::timeout_at(deadline, read_body_limited(inner, max_body_size))
            .await
            .map_err(|_| {
                tracing::debug!(timeout = ?request_timeout, "response body stalled");
                HttpError::Timeout(request_timeout)
            })?
    }

    /// Read the body and decode it as JSON, whatever the status.
    ///
    /// # Errors
    /// `Json` on decode failure plus the errors of [`HttpResponse::bytes`].
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn read_body_limited(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut buf = Vec::new();
    while let Some(frame) = body.frame().await {
        let Ok(data) = frame.map_err(HttpError::Transport)?.into_data() else {
            continue;
        };
        let total = buf.len() + data.len();
        if total > limit {
            return Err(HttpError::BodyTooLarge {
                limit,
                actual: total,
            });
        }
        buf.extend_from_slice(&data);
    }
    Ok(Bytes::from(buf))
}
