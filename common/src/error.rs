//! Error types for user input and rate values.

use thiserror::Error;

/// Errors raised while validating a conversion request.
///
/// The `Display` text of the input variants is what the widget shows in its
/// blocking notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount is not a number, or is zero or negative.
    #[error("Please enter a valid amount.")]
    InvalidAmount { input: String },

    /// Unit selector is not one of rupees, lakhs or crores.
    #[error("Invalid currency type selected.")]
    UnknownUnit(String),

    /// Rate is zero, negative or not representable.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(String),

    /// Amount is a positive number the decimal type cannot hold, either too
    /// large or finer than its precision.
    #[error("Amount {0} is outside the supported range")]
    AmountOutOfRange(String),
}

impl ValidationError {
    /// Get a stable error code for logs and machine output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::InvalidAmount { .. } => "INVALID_AMOUNT",
            ValidationError::UnknownUnit(_) => "UNKNOWN_UNIT",
            ValidationError::InvalidRate(_) => "INVALID_RATE",
            ValidationError::AmountOutOfRange(_) => "AMOUNT_OUT_OF_RANGE",
        }
    }

    /// Shorthand for an invalid amount.
    pub fn invalid_amount(input: impl Into<String>) -> Self {
        ValidationError::InvalidAmount {
            input: input.into(),
        }
    }
}

/// Result type alias for validation.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
