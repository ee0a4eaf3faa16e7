use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Number;
use tracing::{debug, warn};

use crate::conversion::domain::CurrencyCode;

use super::{RateFetchError, RateProvider};

/// Value of `result` in a successful response.
const SUCCESS_RESULT: &str = "success";

/// Body returned by the pair conversion endpoint.
#[derive(Debug, Deserialize)]
struct PairRateResponse {
    result: String,
    conversion_rate: Option<Number>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

/// Client for the pair conversion endpoint of exchangerate-api.com.
pub struct ExchangeRateApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ExchangeRateApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Access key for the service.
    /// * `base_url` - Base URL of the API, including the version segment.
    /// * `timeout` - How long to wait for a response before giving up.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn pair_url(&self, from: &CurrencyCode, to: &CurrencyCode) -> String {
        format!("{}/{}/pair/{}/{}", self.base_url, self.api_key, from, to)
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    async fn pair_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, RateFetchError> {
        debug!(%from, %to, "Fetching pair rate.");

        let response = self
            .client
            .get(self.pair_url(from, to))
            .send()
            .await
            .map_err(|error| RateFetchError::Unavailable(Box::new(error)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| RateFetchError::Unavailable(Box::new(error)))?;

        rate_from_response(status, &body)
    }
}

/// Interpret a response from the pair conversion endpoint.
fn rate_from_response(status: StatusCode, body: &[u8]) -> Result<Decimal, RateFetchError> {
    if status != StatusCode::OK {
        warn!(%status, "Exchange rate service responded with an unexpected status.");

        return Err(RateFetchError::Rejected(format!(
            "unexpected status {}",
            status
        )));
    }

    let response: PairRateResponse =
        serde_json::from_slice(body).map_err(|error| RateFetchError::Unavailable(Box::new(error)))?;

    if response.result != SUCCESS_RESULT {
        warn!(
            result = %response.result,
            error_type = ?response.error_type,
            "Exchange rate service reported a failure."
        );

        return Err(RateFetchError::Rejected(
            response
                .error_type
                .unwrap_or_else(|| format!("result was {:?}", response.result)),
        ));
    }

    let rate = response
        .conversion_rate
        .ok_or_else(|| RateFetchError::Rejected("response has no conversion rate".to_owned()))?;

    decimal_from_number(&rate)
        .ok_or_else(|| RateFetchError::Rejected(format!("unreadable conversion rate {}", rate)))
}

/// Convert a JSON number to a decimal through its text so that no binary
/// floating point rounding is introduced.
fn decimal_from_number(number: &Number) -> Option<Decimal> {
    let text = number.to_string();

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
