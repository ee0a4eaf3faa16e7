use std::num::IntErrorKind;

use rust_decimal::Decimal;
use serde_json::Value;

/// The maximum number of significant digits an amount may contain.
pub const MAX_DIGITS: u32 = 12;

/// The maximum number of digits after the decimal point.
pub const DECIMAL_PLACES: u32 = 2;

/// Exponents are clamped to this magnitude. Any literal that reaches it has
/// far more digits than [`MAX_DIGITS`], so clamping never changes whether an
/// amount is accepted.
const EXPONENT_LIMIT: i64 = 1_000;

/// Reasons an amount may be rejected.
#[derive(Debug, Eq, PartialEq)]
pub enum AmountInvalidity {
    /// The amount could not be read as a decimal number.
    InvalidNumber,
    /// The amount has more digits in total than allowed.
    TooManyDigits(u32),
    /// The amount has more digits after the decimal point than allowed.
    TooManyDecimalPlaces(u32),
    /// The amount has more digits before the decimal point than allowed.
    TooManyWholeDigits(u32),
    /// The amount is zero or negative.
    NotPositive,
}

impl AmountInvalidity {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidNumber => "invalid",
            Self::TooManyDigits(_) => "max_digits",
            Self::TooManyDecimalPlaces(_) => "max_decimal_places",
            Self::TooManyWholeDigits(_) => "max_whole_digits",
            Self::NotPositive => "min_value",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InvalidNumber => "A valid number is required.".to_owned(),
            Self::TooManyDigits(max) => format!(
                "Ensure that there are no more than {} digits in total.",
                max
            ),
            Self::TooManyDecimalPlaces(max) => format!(
                "Ensure that there are no more than {} decimal places.",
                max
            ),
            Self::TooManyWholeDigits(max) => format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                max
            ),
            Self::NotPositive => "Ensure this value is greater than 0.".to_owned(),
        }
    }
}

/// The pieces of a decimal literal.
///
/// `digits` holds the coefficient without leading zeros (a lone `0` for
/// zero), and the value of the literal is `digits * 10^exponent`.
#[derive(Debug, Eq, PartialEq)]
struct DecimalParts {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl DecimalParts {
    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
            Some(index) => (&unsigned[..index], parse_exponent(&unsigned[index + 1..])?),
            None => (unsigned, 0),
        };

        let (whole_part, decimal_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole_part.is_empty() && decimal_part.is_empty())
            || !all_digits(whole_part)
            || !all_digits(decimal_part)
        {
            return None;
        }

        let coefficient = format!("{}{}", whole_part, decimal_part);
        let digits = match coefficient.trim_start_matches('0') {
            "" => "0".to_owned(),
            significant => significant.to_owned(),
        };

        let decimal_len = i64::try_from(decimal_part.len()).unwrap_or(i64::MAX);
        let exponent = exponent.saturating_sub(decimal_len);

        Some(Self {
            negative,
            digits,
            exponent: exponent.clamp(-EXPONENT_LIMIT, EXPONENT_LIMIT),
        })
    }

    /// Count the total, decimal, and whole digits of the literal.
    fn digit_counts(&self) -> (i64, i64, i64) {
        let coefficient_len = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
        let fraction_len = self.exponent.saturating_neg();

        let (total, decimals) = if self.exponent >= 0 {
            (coefficient_len.saturating_add(self.exponent), 0)
        } else if fraction_len > coefficient_len {
            (fraction_len, fraction_len)
        } else {
            (coefficient_len, fraction_len)
        };

        (total, decimals, total.saturating_sub(decimals))
    }
}

/// Parse the exponent of a literal in scientific notation.
///
/// Exponents too large for an `i64` saturate at the clamping limit rather
/// than making the whole literal unreadable.
fn parse_exponent(raw: &str) -> Option<i64> {
    match raw.parse::<i64>() {
        Ok(exponent) => Some(exponent),
        Err(error) => match error.kind() {
            IntErrorKind::PosOverflow => Some(EXPONENT_LIMIT),
            IntErrorKind::NegOverflow => Some(-EXPONENT_LIMIT),
            _ => None,
        },
    }
}

/// Parse an amount from its textual representation.
///
/// The amount may use scientific notation, but once expanded it must fit in
/// [`MAX_DIGITS`] digits with at most [`DECIMAL_PLACES`] of them after the
/// decimal point. The amount must also be greater than zero.
///
/// # Returns
///
/// The exact decimal value of the amount. Trailing zeros in the fractional
/// part are preserved, so `"100.00"` keeps a scale of two.
pub fn parse_amount(raw_amount: &str) -> Result<Decimal, AmountInvalidity> {
    let parts = DecimalParts::parse(raw_amount).ok_or(AmountInvalidity::InvalidNumber)?;

    let max_whole_digits = MAX_DIGITS - DECIMAL_PLACES;
    let (total, decimals, whole) = parts.digit_counts();
    if total > MAX_DIGITS.into() {
        return Err(AmountInvalidity::TooManyDigits(MAX_DIGITS));
    }
    if decimals > DECIMAL_PLACES.into() {
        return Err(AmountInvalidity::TooManyDecimalPlaces(DECIMAL_PLACES));
    }
    if whole > max_whole_digits.into() {
        return Err(AmountInvalidity::TooManyWholeDigits(max_whole_digits));
    }

    // The checks above bound the coefficient to twelve digits and the scale
    // to two places.
    let coefficient: i128 = parts
        .digits
        .parse()
        .map_err(|_| AmountInvalidity::InvalidNumber)?;
    let (mantissa, scale) = if parts.exponent >= 0 {
        let exponent = u32::try_from(parts.exponent).map_err(|_| AmountInvalidity::InvalidNumber)?;
        let scaled = 10i128
            .checked_pow(exponent)
            .and_then(|factor| coefficient.checked_mul(factor))
            .ok_or(AmountInvalidity::InvalidNumber)?;

        (scaled, 0)
    } else {
        let scale = u32::try_from(parts.exponent.unsigned_abs())
            .map_err(|_| AmountInvalidity::InvalidNumber)?;

        (coefficient, scale)
    };
    let mantissa = if parts.negative { -mantissa } else { mantissa };

    let amount = Decimal::from_i128_with_scale(mantissa, scale);
    if amount <= Decimal::ZERO {
        return Err(AmountInvalidity::NotPositive);
    }

    Ok(amount)
}

/// Parse an amount provided as either a JSON string or a JSON number.
pub fn parse_json_amount(value: &Value) -> Result<Decimal, AmountInvalidity> {
    match value {
        Value::String(raw) => parse_amount(raw),
        // Numbers keep their original text, so they are parsed exactly as
        // written rather than through a float.
        Value::Number(number) => parse_amount(&number.to_string()),
        _ => Err(AmountInvalidity::InvalidNumber),
    }
}
