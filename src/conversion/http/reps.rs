use rust_decimal::Decimal;
use serde::Serialize;

use crate::conversion::domain;

/// A successful conversion.
///
/// Decimal values are written as JSON numbers using their exact decimal
/// text.
#[derive(Debug, Serialize)]
pub struct Conversion {
    pub from_currency: String,
    pub to_currency: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub exchange_rate: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub original_amount: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub converted_amount: Decimal,
}

impl From<&domain::ConversionResult> for Conversion {
    fn from(result: &domain::ConversionResult) -> Self {
        Self {
            from_currency: result.from_currency().to_string(),
            to_currency: result.to_currency().to_string(),
            exchange_rate: result.exchange_rate(),
            original_amount: result.original_amount(),
            converted_amount: result.converted_amount(),
        }
    }
}
