//! RupeeConv FX Engine
//!
//! Exchange rate acquisition and INR to USD conversion.
//!
//! # Features
//!
//! - Live rate from ExchangeRate-API with a 1/82 fallback on any failure
//! - Fixed 82 INR per USD strategy that never touches the network
//! - Conversion of rupees, lakhs and crores with cent rounding
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rupeeconv_fx::{ConversionEngine, ExchangeRateApiConfig, ExchangeRateApiProvider, FallbackRateProvider};
//!
//! let provider = FallbackRateProvider::new(Arc::new(ExchangeRateApiProvider::new(ExchangeRateApiConfig::default())?));
//! let resolution = provider.fetch_rate().await;
//!
//! let conversion = ConversionEngine::new().convert("5", "lakhs", &resolution.rate)?;
//! println!("{}", conversion);
//! ```

pub mod engine;
pub mod provider;
pub mod exchange_rate_api;
pub mod conversion;
pub mod error;

pub use engine::ConversionEngine;
pub use provider::{
    FallbackRateProvider, FixedRateProvider, RateProvider, RateResolution, RateStrategy,
    FALLBACK_NOTICE,
};
pub use exchange_rate_api::{ExchangeRateApiConfig, ExchangeRateApiProvider};
pub use conversion::Conversion;
pub use error::{FxError, FxResult};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockRateProvider;
