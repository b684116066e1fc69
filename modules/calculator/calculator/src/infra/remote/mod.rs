mod client;
mod dto;

pub use client::RemoteCalculatorClient;
pub use dto::{CalculationRequestDto, CalculationResponseDto};
