//! Rate provider trait, the fixed-rate strategy and the fallback policy.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rupeeconv_common::{ExchangeRate, RateOrigin};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FxResult;

/// Notice shown when the live rate could not be fetched.
pub const FALLBACK_NOTICE: &str = "Failed to fetch exchange rate. Using fallback rate of 1/82";

/// Trait for INR/USD rate providers.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Whether fetching goes to the network and has a loading phase.
    fn is_live(&self) -> bool;

    /// Get the current rate.
    async fn get_rate(&self) -> FxResult<ExchangeRate>;

    /// Rate to use when `get_rate` fails or has not completed yet.
    fn fallback_rate(&self) -> ExchangeRate {
        ExchangeRate::fallback()
    }
}

/// How the widget acquires its rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateStrategy {
    /// Fetch once from the rate service, falling back to 1/82 on failure.
    #[default]
    Live,
    /// Use the constant 82 INR per USD and never fetch.
    Fixed,
}

impl fmt::Display for RateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateStrategy::Live => write!(f, "live"),
            RateStrategy::Fixed => write!(f, "fixed"),
        }
    }
}

impl std::str::FromStr for RateStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(RateStrategy::Live),
            "fixed" => Ok(RateStrategy::Fixed),
            other => Err(format!("unknown rate strategy '{}'", other)),
        }
    }
}

/// Provider for the fixed-rate widget: 82 INR per USD, no network access.
#[derive(Debug, Clone, Default)]
pub struct FixedRateProvider;

impl FixedRateProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RateProvider for FixedRateProvider {
    fn name(&self) -> &str {
        "FIXED"
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn get_rate(&self) -> FxResult<ExchangeRate> {
        Ok(ExchangeRate::fixed())
    }

    fn fallback_rate(&self) -> ExchangeRate {
        ExchangeRate::fixed()
    }
}

/// Outcome of a rate acquisition: always a usable rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateResolution {
    /// Rate to convert with.
    pub rate: ExchangeRate,
    /// Informational notice, set when the fallback is in use.
    pub diagnostic: Option<String>,
}

impl RateResolution {
    /// Resolution for a successfully obtained rate.
    pub fn resolved(rate: ExchangeRate) -> Self {
        Self {
            rate,
            diagnostic: None,
        }
    }

    /// Resolution after a failed fetch.
    pub fn fallback(rate: ExchangeRate) -> Self {
        Self {
            rate,
            diagnostic: Some(FALLBACK_NOTICE.to_string()),
        }
    }

    pub fn origin(&self) -> RateOrigin {
        self.rate.origin()
    }

    pub fn is_fallback(&self) -> bool {
        self.origin() == RateOrigin::Fallback
    }
}

/// Wraps a provider so that every failure converges on its fallback rate.
#[derive(Clone)]
pub struct FallbackRateProvider {
    inner: Arc<dyn RateProvider>,
}

impl FallbackRateProvider {
    /// Wrap a provider.
    pub fn new(inner: Arc<dyn RateProvider>) -> Self {
        Self { inner }
    }

    /// Name of the wrapped provider.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Whether the wrapped provider fetches over the network.
    pub fn is_live(&self) -> bool {
        self.inner.is_live()
    }

    /// Rate substituted while no resolution exists.
    pub fn fallback_rate(&self) -> ExchangeRate {
        self.inner.fallback_rate()
    }

    /// Acquire a rate. Never fails.
    pub async fn fetch_rate(&self) -> RateResolution {
        match self.inner.get_rate().await {
            Ok(rate) => {
                info!(
                    provider = self.inner.name(),
                    origin = %rate.origin(),
                    inr_per_usd = %rate.inr_per_usd().round_dp(4),
                    "Exchange rate acquired"
                );
                RateResolution::resolved(rate)
            }
            Err(e) => {
                warn!(
                    provider = self.inner.name(),
                    error = %e,
                    "Failed to fetch exchange rate, using fallback"
                );
                RateResolution::fallback(self.inner.fallback_rate())
            }
        }
    }
}

/// Scripted rate provider for testing.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    outcome: FxResult<ExchangeRate>,
    delay: Option<std::time::Duration>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    /// Provider that returns a live rate of `usd_per_inr`.
    pub fn succeeding(usd_per_inr: rust_decimal::Decimal) -> Self {
        Self::with_outcome(
            ExchangeRate::live(usd_per_inr)
                .map_err(|e| crate::error::FxError::InvalidRate(e.to_string())),
        )
    }

    /// Provider that always fails with `error`.
    pub fn failing(error: crate::error::FxError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(outcome: FxResult<ExchangeRate>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `get_rate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl RateProvider for MockRateProvider {
    fn name(&self) -> &str {
        "MOCK"
    }

    fn is_live(&self) -> bool {
        true
    }

    async fn get_rate(&self) -> FxResult<ExchangeRate> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use rupeeconv_common::RateQuote;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_successful_fetch_is_live() {
        let provider = FallbackRateProvider::new(Arc::new(MockRateProvider::succeeding(dec!(0.012))));

        let resolution = provider.fetch_rate().await;

        assert_eq!(resolution.origin(), RateOrigin::Live);
        assert_eq!(resolution.rate.quote(), RateQuote::UsdPerInr(dec!(0.012)));
        assert!(resolution.diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_every_failure_uses_fallback() {
        let failures = vec![
            FxError::Network("connection refused".into()),
            FxError::Timeout("10s".into()),
            FxError::HttpStatus(503),
            FxError::Parse("expected value".into()),
            FxError::ApiFailure("invalid-key".into()),
            FxError::MissingRate("USD".into()),
        ];

        for failure in failures {
            let provider = FallbackRateProvider::new(Arc::new(MockRateProvider::failing(failure)));
            let resolution = provider.fetch_rate().await;

            assert!(resolution.is_fallback());
            assert_eq!(
                resolution.rate.quote(),
                RateQuote::UsdPerInr(dec!(1) / dec!(82))
            );
            assert_eq!(resolution.diagnostic.as_deref(), Some(FALLBACK_NOTICE));
        }
    }

    #[tokio::test]
    async fn test_fixed_provider_never_falls_back() {
        let provider = FallbackRateProvider::new(Arc::new(FixedRateProvider::new()));

        assert!(!provider.is_live());
        let resolution = provider.fetch_rate().await;

        assert_eq!(resolution.origin(), RateOrigin::Fixed);
        assert_eq!(resolution.rate.quote(), RateQuote::InrPerUsd(dec!(82)));
        assert!(resolution.diagnostic.is_none());
        assert_eq!(provider.fallback_rate().origin(), RateOrigin::Fixed);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("live".parse::<RateStrategy>().unwrap(), RateStrategy::Live);
        assert_eq!(" FIXED ".parse::<RateStrategy>().unwrap(), RateStrategy::Fixed);
        assert!("cached".parse::<RateStrategy>().is_err());
    }
}
