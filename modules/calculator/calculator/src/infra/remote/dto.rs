//! Wire format of the calculator endpoint.

use calculator_sdk::Operator;
use serde::{Deserialize, Serialize};

/// Body POSTed for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationRequestDto {
    pub op: Operator,
    pub a: f64,
    pub b: f64,
    pub precision: u32,
}

/// Body returned by the server. Missing optional fields decode as `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalculationResponseDto {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}
