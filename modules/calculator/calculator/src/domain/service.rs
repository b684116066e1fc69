use std::sync::Arc;

use calculator_sdk::{
    CalculationError, CalculatorClientV1, HistoryRecord, NewHistoryRecord, Operator,
};
use tracing::{debug, info, warn};

use super::format::{format_result, parse_display};
use super::input::{Digit, InputEvent};
use super::repo::HistoryRepository;

/// Display text while an error is active.
pub const ERROR_DISPLAY: &str = "Error";

pub const DEFAULT_PRECISION: u32 = 2;

/// Everything the keypad front-end renders.
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub display: String,
    pub first_operand: Option<f64>,
    pub pending_operator: Option<Operator>,
    pub awaiting_second_operand: bool,
    pub error_message: Option<String>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            display: "0".to_owned(),
            first_operand: None,
            pending_operator: None,
            awaiting_second_operand: false,
            error_message: None,
        }
    }
}

impl InputState {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }

    fn pending_pair(&self) -> Option<(Operator, f64)> {
        self.pending_operator.zip(self.first_operand)
    }

    fn clear_pending(&mut self) {
        self.first_operand = None;
        self.pending_operator = None;
    }
}

/// Keypad input state machine.
///
/// Arithmetic goes through the injected [`CalculatorClientV1`]; every
/// successful equals is appended to the injected [`HistoryRepository`]. The
/// async operations borrow `self` mutably for their whole duration, so at
/// most one request per calculator is ever in flight.
pub struct Calculator {
    client: Arc<dyn CalculatorClientV1>,
    history: Arc<dyn HistoryRepository>,
    precision: u32,
    state: InputState,
}

impl Calculator {
    #[must_use]
    pub fn new(client: Arc<dyn CalculatorClientV1>, history: Arc<dyn HistoryRepository>) -> Self {
        Self {
            client,
            history,
            precision: DEFAULT_PRECISION,
            state: InputState::default(),
        }
    }

    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn state(&self) -> &InputState {
        &self.state
    }

    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn input_digit(&mut self, digit: Digit) {
        let state = &mut self.state;
        if state.is_error() {
            state.error_message = None;
            state.awaiting_second_operand = false;
            state.display = digit.to_string();
        } else if state.awaiting_second_operand {
            state.awaiting_second_operand = false;
            state.display = digit.to_string();
        } else if state.display == "0" {
            state.display = digit.to_string();
        } else {
            state.display.push(digit.as_char());
        }
    }

    pub fn input_decimal(&mut self) {
        let state = &mut self.state;
        if state.is_error() {
            state.error_message = None;
            state.awaiting_second_operand = false;
            "0.".clone_into(&mut state.display);
        } else if state.awaiting_second_operand {
            state.awaiting_second_operand = false;
            "0.".clone_into(&mut state.display);
        } else if !state.display.contains('.') {
            state.display.push('.');
        }
    }

    pub fn clear(&mut self) {
        self.state = InputState::default();
    }

    /// Record `operator` as pending, folding an already pending pair first.
    ///
    /// A failed fold enters the error state and leaves `operator` unrecorded.
    pub async fn choose_operator(&mut self, operator: Operator) {
        self.state.error_message = None;
        let current = parse_display(&self.state.display);

        if let Some((pending, first)) = self.state.pending_pair() {
            match self.request(pending, first, current).await {
                Ok(result) => {
                    self.state.first_operand = Some(result);
                    self.state.display = format_result(result);
                }
                Err(err) => {
                    self.enter_error(&err);
                    return;
                }
            }
        } else {
            self.state.first_operand = Some(current);
        }

        self.state.pending_operator = Some(operator);
        self.state.awaiting_second_operand = true;
    }

    /// Complete the pending calculation against the displayed operand.
    ///
    /// Does nothing without a pending pair.
    pub async fn equals(&mut self) {
        let Some((operator, first)) = self.state.pending_pair() else {
            debug!("equals without a pending operator ignored");
            return;
        };
        let second = parse_display(&self.state.display);

        match self.request(operator, first, second).await {
            Ok(result) => {
                self.state.display = format_result(result);
                self.state.clear_pending();
                self.state.awaiting_second_operand = true;
                self.record(NewHistoryRecord {
                    operator,
                    operand_a: first,
                    operand_b: second,
                    result,
                })
                .await;
            }
            Err(err) => self.enter_error(&err),
        }
    }

    pub async fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Digit(digit) => self.input_digit(digit),
            InputEvent::Decimal => self.input_decimal(),
            InputEvent::Operator(operator) => self.choose_operator(operator).await,
            InputEvent::Equals => self.equals().await,
            InputEvent::Clear => self.clear(),
        }
    }

    /// Stored history, newest first.
    ///
    /// # Errors
    /// Returns the repository error.
    pub async fn history(&self) -> anyhow::Result<Vec<HistoryRecord>> {
        self.history.list().await
    }

    /// Delete all stored history.
    ///
    /// # Errors
    /// Returns the repository error.
    pub async fn clear_history(&self) -> anyhow::Result<u64> {
        let removed = self.history.delete_all().await?;
        info!(removed, "calculation history cleared");
        Ok(removed)
    }

    async fn request(&self, operator: Operator, a: f64, b: f64) -> Result<f64, CalculationError> {
        debug!(op = operator.wire_name(), a, b, "requesting calculation");
        self.client.calculate(operator, a, b, self.precision).await
    }

    async fn record(&self, record: NewHistoryRecord) {
        if let Err(err) = self.history.insert(record).await {
            warn!(error = %err, op = record.operator.wire_name(), "failed to save history record");
        }
    }

    fn enter_error(&mut self, err: &CalculationError) {
        warn!(error = %err, server_unavailable = err.is_server_unavailable(), "calculation failed");
        let state = &mut self.state;
        state.error_message = Some(err.user_message());
        ERROR_DISPLAY.clone_into(&mut state.display);
        state.clear_pending();
        state.awaiting_second_operand = false;
    }
}
