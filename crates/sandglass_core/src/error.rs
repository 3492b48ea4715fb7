use thiserror::Error;

/// Errors raised while validating physics parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must lie strictly between 0 and 1, got {value}")]
    OutsideUnitInterval { field: &'static str, value: f32 },
}
