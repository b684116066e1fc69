use async_trait::async_trait;
use calculator_sdk::{CalculationError, CalculatorClientV1, Operator};
use tracing::{debug, warn};
use webcalc_http::{HttpClient, HttpClientBuilder, HttpError, StatusCode};

use super::dto::{CalculationRequestDto, CalculationResponseDto};
use crate::config::CalculatorConfig;

const USER_AGENT: &str = concat!("webcalc/", env!("CARGO_PKG_VERSION"));

/// [`CalculatorClientV1`] that POSTs each calculation to one HTTP endpoint.
#[derive(Clone)]
pub struct RemoteCalculatorClient {
    http: HttpClient,
    endpoint: String,
}

impl RemoteCalculatorClient {
    /// Build a client from module configuration. `timeout_ms` bounds each
    /// call from send until the last body byte.
    ///
    /// Must run inside a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed (TLS setup,
    /// invalid user agent).
    pub fn new(config: &CalculatorConfig) -> Result<Self, HttpError> {
        let http = HttpClientBuilder::new()
            .timeout(config.timeout())
            .transport(config.transport_security())
            .user_agent(config.user_agent.as_deref().unwrap_or(USER_AGENT))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, body: &CalculationRequestDto) -> Result<f64, CalculationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(body)
            .map_err(|e| self.request_error(&e))?
            .send()
            .await
            .map_err(|e| self.request_error(&e))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), endpoint = %self.endpoint, "calculator server returned an error status");
            return Err(CalculationError::ServerError(status.as_u16()));
        }

        let reply: CalculationResponseDto = response.json().await.map_err(|e| {
            if e.is_no_response() {
                warn!(error = %e, endpoint = %self.endpoint, "calculator response body never completed");
                CalculationError::NoConnection
            } else {
                warn!(error = %e, endpoint = %self.endpoint, "undecodable calculator response");
                CalculationError::InvalidResponse
            }
        })?;

        match reply {
            CalculationResponseDto {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            CalculationResponseDto { error, .. } => {
                Err(CalculationError::calculation_failed(error))
            }
        }
    }

    /// Classify a failure that happened before any response arrived.
    fn request_error(&self, err: &HttpError) -> CalculationError {
        let mapped = if err.is_invalid_target()
            || matches!(
                err,
                HttpError::RequestBuild(_)
                    | HttpError::InvalidHeaderValue(_)
                    | HttpError::Json(_)
            ) {
            CalculationError::InvalidEndpoint
        } else {
            CalculationError::NoConnection
        };
        warn!(error = %err, endpoint = %self.endpoint, "calculator request failed");
        mapped
    }
}

#[async_trait]
impl CalculatorClientV1 for RemoteCalculatorClient {
    async fn calculate(
        &self,
        operator: Operator,
        a: f64,
        b: f64,
        precision: u32,
    ) -> Result<f64, CalculationError> {
        let body = CalculationRequestDto {
            op: operator,
            a,
            b,
            precision,
        };
        let outcome = self.post(&body).await;
        debug!(op = operator.wire_name(), a, b, ok = outcome.is_ok(), "calculation finished");
        outcome
    }
}
