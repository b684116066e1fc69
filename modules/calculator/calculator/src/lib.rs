#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Calculator module
//!
//! Drives a keypad-style input state machine whose arithmetic is delegated to
//! a remote HTTP endpoint, and records every completed calculation.
//!
//! The public contract lives in `calculator-sdk` and is re-exported here.

pub use calculator_sdk::{
    CalculationError, CalculatorClientV1, HistoryRecord, NewHistoryRecord, Operator,
};

pub mod config;
pub mod domain;
pub mod infra;

pub use config::{CalculatorConfig, HistoryBackend, HistoryConfig};
pub use domain::format::format_result;
pub use domain::input::{Digit, InputEvent, InvalidDigit};
pub use domain::repo::HistoryRepository;
pub use domain::service::{Calculator, ERROR_DISPLAY, InputState};
pub use domain::session::{CalculatorSession, SessionError};
pub use infra::remote::RemoteCalculatorClient;
pub use infra::storage::{InMemoryHistoryRepository, SeaOrmHistoryRepository, open_history};
