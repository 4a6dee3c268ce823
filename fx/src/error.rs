//! Rate acquisition error types.

use thiserror::Error;

/// Errors that can occur while acquiring a live exchange rate.
///
/// None of these reach the user directly: the fallback provider logs them and
/// substitutes the fallback rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    /// The request could not be sent or the connection failed.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("Rate request timed out: {0}")]
    Timeout(String),

    /// The rate service answered with a non-success status.
    #[error("Rate service returned HTTP {0}")]
    HttpStatus(u16),

    /// The response body was not the expected JSON.
    #[error("Unable to parse rate response: {0}")]
    Parse(String),

    /// The rate service reported a failure in its `result` field.
    #[error("Rate service reported failure: {0}")]
    ApiFailure(String),

    /// The conversion table has no entry for the currency.
    #[error("Rate not available for {0}")]
    MissingRate(String),

    /// The reported rate is zero, negative or not representable.
    #[error("Invalid rate: {0}")]
    InvalidRate(String),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FxError {
    /// Map a transport error from reqwest.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FxError::Timeout(err.to_string())
        } else if err.is_decode() {
            FxError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            FxError::HttpStatus(status.as_u16())
        } else {
            FxError::Network(err.to_string())
        }
    }
}

/// Result type for rate operations.
pub type FxResult<T> = Result<T, FxError>;
