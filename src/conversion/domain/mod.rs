pub mod amount;
pub mod conversion;

pub use conversion::{ConversionRequest, ConversionRequestData, ConversionResult, CurrencyCode};
