use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};
use validator::{Validate, ValidationError};

use crate::validation::{
    self, check_text, invalid, text_value, FieldErrors, NOT_A_STRING_MESSAGE,
};

use super::amount::parse_json_amount;

/// The longest currency code accepted.
pub const CURRENCY_CODE_MAX_CHARS: usize = 3;

/// Message reported when a conversion would not change currencies.
pub const SAME_CURRENCY_MESSAGE: &str = "Source and destination currencies must be different.";

/// A currency code normalized to upper case.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Normalize a raw currency code.
    ///
    /// Surrounding whitespace is removed and the code is upper cased, so
    /// `" usd"` and `"USD"` produce the same code. No check is made that the
    /// code names a real currency.
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversion parameters as provided by a client.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_distinct_currencies", skip_on_field_errors = true))]
pub struct ConversionRequestData {
    /// The amount to convert. Clients may send it as a string or a number.
    #[validate(required(message = "This field is required."), custom = "validate_amount")]
    pub amount: Option<Value>,

    /// Code of the currency the amount is in.
    #[validate(
        required(message = "This field is required."),
        custom = "validate_currency_code"
    )]
    pub from_currency: Option<Value>,

    /// Code of the currency to convert the amount into.
    #[validate(
        required(message = "This field is required."),
        custom = "validate_currency_code"
    )]
    pub to_currency: Option<Value>,
}

impl ConversionRequestData {
    /// Fields in the order their errors are reported.
    const FIELDS: &'static [&'static str] = &["amount", "from_currency", "to_currency"];
}

fn validate_amount(amount: &Value) -> Result<(), ValidationError> {
    parse_json_amount(amount)
        .map(|_| ())
        .map_err(|invalidity| invalid(invalidity.code(), invalidity.message()))
}

fn validate_currency_code(code: &Value) -> Result<(), ValidationError> {
    check_text(&text_value(code)?, CURRENCY_CODE_MAX_CHARS)
}

fn validate_distinct_currencies(data: &ConversionRequestData) -> Result<(), ValidationError> {
    let code = |value: &Option<Value>| {
        value
            .as_ref()
            .and_then(|value| text_value(value).ok())
            .map(|text| CurrencyCode::normalized(&text))
    };

    if let (Some(from), Some(to)) = (code(&data.from_currency), code(&data.to_currency)) {
        if from == to {
            return Err(invalid("same_currency", SAME_CURRENCY_MESSAGE));
        }
    }

    Ok(())
}

/// A validated request to convert an amount between two currencies.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionRequest {
    amount: Decimal,
    from_currency: CurrencyCode,
    to_currency: CurrencyCode,
}

impl ConversionRequest {
    /// Construct a conversion request from client provided data.
    ///
    /// # Returns
    ///
    /// The request if the data is valid, or the [`FieldErrors`] describing
    /// every invalid field otherwise. No request is constructed when the
    /// source and destination currencies are the same.
    pub fn from_data(data: ConversionRequestData) -> Result<Self, FieldErrors> {
        if let Err(validation_error) = data.validate() {
            debug!(?validation_error, "Conversion request failed validation.");

            return Err(FieldErrors::ordered(
                validation_error,
                ConversionRequestData::FIELDS,
            ));
        }

        trace!("Conversion request passed validation.");

        let amount = parse_json_amount(&required_field("amount", data.amount)?)
            .map_err(|invalidity| field_error("amount", invalidity.message()))?;
        let from_currency = currency_field("from_currency", data.from_currency)?;
        let to_currency = currency_field("to_currency", data.to_currency)?;

        Ok(Self {
            amount,
            from_currency,
            to_currency,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn from_currency(&self) -> &CurrencyCode {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &CurrencyCode {
        &self.to_currency
    }
}

fn field_error<M: Into<String>>(field: &'static str, message: M) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add(field, message);

    errors
}

fn required_field(field: &'static str, value: Option<Value>) -> Result<Value, FieldErrors> {
    value.ok_or_else(|| field_error(field, validation::REQUIRED_MESSAGE))
}

fn currency_field(field: &'static str, value: Option<Value>) -> Result<CurrencyCode, FieldErrors> {
    let value = required_field(field, value)?;
    let text = text_value(&value).map_err(|_| field_error(field, NOT_A_STRING_MESSAGE))?;

    Ok(CurrencyCode::normalized(&text))
}

/// The outcome of converting an amount at a specific exchange rate.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionResult {
    from_currency: CurrencyCode,
    to_currency: CurrencyCode,
    exchange_rate: Decimal,
    original_amount: Decimal,
    converted_amount: Decimal,
}

impl ConversionResult {
    /// Convert the requested amount using the provided rate.
    ///
    /// # Arguments
    ///
    /// * `request` - The validated conversion request.
    /// * `exchange_rate` - Units of the destination currency per unit of the
    ///   source currency.
    ///
    /// # Returns
    ///
    /// The conversion, or [`None`] if the product can't be represented.
    pub fn calculate(request: &ConversionRequest, exchange_rate: Decimal) -> Option<Self> {
        let converted_amount = request.amount.checked_mul(exchange_rate)?;

        Some(Self {
            from_currency: request.from_currency.clone(),
            to_currency: request.to_currency.clone(),
            exchange_rate,
            original_amount: request.amount,
            converted_amount,
        })
    }

    pub fn from_currency(&self) -> &CurrencyCode {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &CurrencyCode {
        &self.to_currency
    }

    pub fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }

    pub fn original_amount(&self) -> Decimal {
        self.original_amount
    }

    pub fn converted_amount(&self) -> Decimal {
        self.converted_amount
    }
}
