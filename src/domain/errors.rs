use rust_decimal::Decimal;
use thiserror::Error;

/// Root error type for the crate
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Domain Error: {0}")]
    Domain(#[from] DomainError),
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the aggregation and viewport math.
///
/// A failed recompute never replaces the committed chart state; the
/// controller keeps the last good curves and reports the error once.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("invalid price domain: lo {lo} is above hi {hi}")]
    InvalidDomain { lo: Decimal, hi: Decimal },
    #[error("non-finite value for {0}")]
    NonFiniteValue(&'static str),
    #[error("zoom factor must be finite and positive, got {0}")]
    InvalidZoomFactor(f64),
    #[error("invalid viewport dimensions {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("invalid price level {price} @ {size}")]
    InvalidLevel { price: Decimal, size: Decimal },
    #[error("decimal overflow in {0}")]
    Overflow(&'static str),
    #[error("crossed book: best bid {bid} >= best ask {ask}")]
    CrossedBook { bid: Decimal, ask: Decimal },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse chart config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid chart config: {0}")]
    Invalid(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
