//! `CalculatorClientV1` trait definition.

use async_trait::async_trait;

use crate::errors::CalculationError;
use crate::models::Operator;

/// Computes a single binary operation (Version 1).
///
/// Each call resolves exactly once with either the numeric result or a
/// [`CalculationError`]. Implementations never retry.
#[async_trait]
pub trait CalculatorClientV1: Send + Sync {
    /// Compute `a <operator> b`.
    ///
    /// `precision` is a rounding hint forwarded to the implementation; the
    /// caller never enforces it.
    async fn calculate(
        &self,
        operator: Operator,
        a: f64,
        b: f64,
        precision: u32,
    ) -> Result<f64, CalculationError>;
}
