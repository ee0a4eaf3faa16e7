//! Token based authentication for protected endpoints.

mod tokens;

pub use tokens::{ApiTokens, AuthError, Authenticated};
