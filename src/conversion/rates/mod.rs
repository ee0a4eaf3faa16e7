//! Sources of exchange rates.
//!
//! Rates are always fetched fresh from the provider. Nothing is cached and
//! failed requests are not retried.

mod exchange_rate_api;

use std::{error::Error as StdError, sync::Arc};

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use super::domain::CurrencyCode;

pub use self::exchange_rate_api::ExchangeRateApiClient;

/// The ways fetching an exchange rate can fail.
///
/// The two variants are reported to clients differently, so providers must
/// pick the one that matches where the failure happened.
#[derive(Debug, Error)]
pub enum RateFetchError {
    /// The provider was reached but did not produce a rate.
    #[error("exchange rate provider rejected the request: {0}")]
    Rejected(String),

    /// The provider could not be reached or answered with something that
    /// could not be read.
    #[error("exchange rate provider is unavailable")]
    Unavailable(#[source] Box<dyn StdError + Send + Sync>),
}

pub type DynRateProvider = Arc<dyn RateProvider + Send + Sync>;

#[async_trait]
pub trait RateProvider {
    /// Fetch the current rate for a currency pair.
    ///
    /// # Arguments
    ///
    /// * `from` - The source currency.
    /// * `to` - The destination currency.
    ///
    /// # Returns
    ///
    /// The number of units of `to` that one unit of `from` is worth.
    async fn pair_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, RateFetchError>;
}
