use thiserror::Error;
use tracing::{debug, error};

use super::{
    domain::{ConversionRequest, ConversionResult},
    rates::{DynRateProvider, RateFetchError},
};

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    RateFetch(#[from] RateFetchError),

    /// The converted amount is too large to represent.
    #[error("converted amount overflowed")]
    Overflow,
}

/// A service object converting amounts between currencies.
#[derive(Clone)]
pub struct ConversionService {
    rate_provider: DynRateProvider,
}

impl ConversionService {
    pub fn new(rate_provider: DynRateProvider) -> Self {
        Self { rate_provider }
    }

    /// Convert an amount at the current rate for its currency pair.
    ///
    /// Every call fetches a fresh rate from the provider.
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let rate = self
            .rate_provider
            .pair_rate(request.from_currency(), request.to_currency())
            .await?;

        debug!(
            from = %request.from_currency(),
            to = %request.to_currency(),
            %rate,
            "Received pair rate."
        );

        ConversionResult::calculate(&request, rate).ok_or_else(|| {
            error!(amount = %request.amount(), %rate, "Converted amount overflowed.");

            ConversionError::Overflow
        })
    }
}
