//! Conversion of amounts between currencies at the current exchange rate.
//!
//! A conversion request is validated, the pair rate is fetched from an
//! external provider, and the converted amount is computed with exact
//! decimal arithmetic.

pub mod domain;
pub mod http;
pub mod rates;
pub mod services;
