use std::sync::Arc;

use calculator_sdk::HistoryRecord;
use thiserror::Error;
use tokio::sync::Mutex;

use super::input::InputEvent;
use super::service::{Calculator, InputState};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A previous event is still being processed; the new one was dropped.
    #[error("a calculation is already in progress")]
    Busy,
}

/// Shared handle to one [`Calculator`] that admits a single event at a time.
///
/// While an event is in progress (typically a remote request) every other
/// dispatch is rejected with [`SessionError::Busy`] instead of queueing, the
/// same way a keypad is disabled during a request.
#[derive(Clone)]
pub struct CalculatorSession {
    inner: Arc<Mutex<Calculator>>,
}

impl CalculatorSession {
    #[must_use]
    pub fn new(calculator: Calculator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(calculator)),
        }
    }

    /// Apply one event and return the resulting state.
    ///
    /// # Errors
    /// `SessionError::Busy` when another event holds the calculator; the
    /// state is left untouched.
    pub async fn dispatch(&self, event: InputEvent) -> Result<InputState, SessionError> {
        let mut calculator = self.inner.try_lock().map_err(|_| {
            tracing::debug!(?event, "input rejected while a calculation is in progress");
            SessionError::Busy
        })?;
        calculator.apply(event).await;
        Ok(calculator.state().clone())
    }

    /// Current state, waiting for an in-progress event to finish.
    pub async fn snapshot(&self) -> InputState {
        self.inner.lock().await.state().clone()
    }

    /// # Errors
    /// Returns the repository error.
    pub async fn history(&self) -> anyhow::Result<Vec<HistoryRecord>> {
        self.inner.lock().await.history().await
    }

    /// # Errors
    /// Returns the repository error.
    pub async fn clear_history(&self) -> anyhow::Result<u64> {
        self.inner.lock().await.clear_history().await
    }
}
