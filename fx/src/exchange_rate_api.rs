//! Live rate provider backed by the ExchangeRate-API `latest` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use rupeeconv_common::ExchangeRate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::error::{FxError, FxResult};
use crate::provider::RateProvider;

/// Default base URL of the rate service.
pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com";

/// Configuration for the ExchangeRate-API provider.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiConfig {
    /// Scheme and host, without the `/v6` path.
    pub base_url: String,
    /// API key placed in the request path.
    pub api_key: Option<String>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for ExchangeRateApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Fetches the latest INR conversion table and extracts the USD rate.
pub struct ExchangeRateApiProvider {
    client: reqwest::Client,
    config: ExchangeRateApiConfig,
}

impl ExchangeRateApiProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: ExchangeRateApiConfig) -> FxResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FxError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Full request URL. Contains the API key, so it is never logged.
    fn latest_url(&self) -> String {
        format!(
            "{}/v6/{}/latest/INR",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key.as_deref().unwrap_or_default()
        )
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "EXCHANGE_RATE_API"
    }

    fn is_live(&self) -> bool {
        true
    }

    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    async fn get_rate(&self) -> FxResult<ExchangeRate> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => info!("Fetching INR rates, API key configured"),
            _ => warn!("Fetching INR rates without an API key"),
        }

        let response = self
            .client
            .get(self.latest_url())
            .send()
            .await
            .map_err(FxError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::HttpStatus(status.as_u16()));
        }

        let body: api::LatestResponse = response
            .json()
            .await
            .map_err(|e| FxError::Parse(e.to_string()))?;

        debug!(result = %body.result, currencies = body.conversion_rates.len(), "Rate service responded");

        if body.result != "success" {
            return Err(FxError::ApiFailure(
                body.error_type.unwrap_or(body.result),
            ));
        }

        let usd = body
            .conversion_rates
            .get("USD")
            .copied()
            .ok_or_else(|| FxError::MissingRate("USD".to_string()))?;

        let usd_per_inr = Decimal::from_f64(usd)
            .filter(|rate| *rate > Decimal::ZERO)
            .ok_or_else(|| FxError::InvalidRate(usd.to_string()))?;

        ExchangeRate::live(usd_per_inr).map_err(|e| FxError::InvalidRate(e.to_string()))
    }
}

mod api {
    use std::collections::HashMap;

    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    pub struct LatestResponse {
        pub result: String,
        #[serde(rename = "error-type")]
        pub error_type: Option<String>,
        #[serde(default)]
        pub conversion_rates: HashMap<String, f64>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ConversionEngine;
    use httpmock::prelude::*;
    use rupeeconv_common::{RateOrigin, RateQuote};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn provider_for(server: &MockServer, api_key: Option<&str>) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(ExchangeRateApiConfig {
            base_url: server.base_url(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_live_rate() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v6/test-key/latest/INR");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "result": "success",
                    "base_code": "INR",
                    "conversion_rates": { "INR": 1, "USD": 0.012, "EUR": 0.011 }
                }));
        });

        let rate = provider_for(&server, Some("test-key")).get_rate().await.unwrap();

        assert_eq!(rate.origin(), RateOrigin::Live);
        assert!(matches!(rate.quote(), RateQuote::UsdPerInr(_)));
        assert_eq!(rate.usd_per_inr().round_dp(6), dec!(0.012));
        mock.assert();
    }

    #[tokio::test]
    async fn test_live_rate_drives_conversion() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v6/test-key/latest/INR");
            then.status(200).json_body(json!({
                "result": "success",
                "conversion_rates": { "USD": 0.012 }
            }));
        });

        let rate = provider_for(&server, Some("test-key")).get_rate().await.unwrap();
        let conversion = ConversionEngine::new().convert("5", "lakhs", &rate).unwrap();

        assert_eq!(conversion.message(), "5 lakhs = $6,000.00 USD");
    }

    #[tokio::test]
    async fn test_api_reported_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v6/bad-key/latest/INR");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "result": "error", "error-type": "invalid-key" }));
        });

        let result = provider_for(&server, Some("bad-key")).get_rate().await;

        assert_eq!(result, Err(FxError::ApiFailure("invalid-key".into())));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v6/k/latest/INR");
            then.status(500).body("Internal Server Error");
        });

        let result = provider_for(&server, Some("k")).get_rate().await;

        assert_eq!(result, Err(FxError::HttpStatus(500)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v6/k/latest/INR");
            then.status(200).body("<html>not json</html>");
        });

        let result = provider_for(&server, Some("k")).get_rate().await;

        assert!(matches!(result, Err(FxError::Parse(_))));
    }

    #[tokio::test]
    async fn test_missing_usd_rate() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v6/k/latest/INR");
            then.status(200)
                .json_body(json!({ "result": "success", "conversion_rates": { "EUR": 0.011 } }));
        });

        let result = provider_for(&server, Some("k")).get_rate().await;

        assert_eq!(result, Err(FxError::MissingRate("USD".into())));
    }

    #[tokio::test]
    async fn test_non_positive_usd_rate() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v6/k/latest/INR");
            then.status(200)
                .json_body(json!({ "result": "success", "conversion_rates": { "USD": 0 } }));
        });

        let result = provider_for(&server, Some("k")).get_rate().await;

        assert!(matches!(result, Err(FxError::InvalidRate(_))));
    }

    #[tokio::test]
    async fn test_missing_key_still_requests() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v6//latest/INR");
            then.status(403)
                .json_body(json!({ "result": "error", "error-type": "invalid-key" }));
        });

        let result = provider_for(&server, None).get_rate().await;

        assert_eq!(result, Err(FxError::HttpStatus(403)));
        mock.assert();
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let provider = ExchangeRateApiProvider::new(ExchangeRateApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("k".to_string()),
            timeout: Duration::from_secs(2),
        })
        .unwrap();

        let result = provider.get_rate().await;

        assert!(matches!(
            result,
            Err(FxError::Network(_)) | Err(FxError::Timeout(_))
        ));
    }
}
