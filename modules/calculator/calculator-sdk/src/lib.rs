#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Calculator SDK
//!
//! The transport-agnostic contract of the calculator module:
//! - `CalculatorClientV1` trait for computing one binary operation
//! - Model types (`Operator`, `HistoryRecord`, `NewHistoryRecord`)
//! - Error type (`CalculationError`)
//!
//! The calculator module ships the remote implementation; tests inject their
//! own:
//! ```ignore
//! let client: Arc<dyn CalculatorClientV1> = Arc::new(RemoteCalculatorClient::new(cfg)?);
//! let sum = client.calculate(Operator::Add, 2.0, 3.0, 2).await?;
//! ```

#![forbid(unsafe_code)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::CalculatorClientV1;
pub use errors::CalculationError;
pub use models::{HistoryRecord, NewHistoryRecord, Operator, ParseOperatorError};
