use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::debug;

/// Authorization schemes accepted in front of a token.
const SCHEMES: &[&str] = &["Bearer", "Token"];

/// The set of tokens allowed to access protected endpoints.
#[derive(Clone, Debug, Default)]
pub struct ApiTokens(Arc<HashSet<String>>);

impl ApiTokens {
    pub fn new<I: IntoIterator<Item = String>>(tokens: I) -> Self {
        Self(Arc::new(
            tokens
                .into_iter()
                .map(|token| token.trim().to_owned())
                .filter(|token| !token.is_empty())
                .collect(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }
}

/// Proof that a request carried one of the configured tokens.
///
/// Adding this extractor to a handler makes the handler require
/// authentication.
#[derive(Debug)]
pub struct Authenticated;

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    ApiTokens: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = ApiTokens::from_ref(state);

        let header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
            debug!("Request is missing an authentication token.");

            AuthError::Missing
        })?;

        let token = header
            .to_str()
            .ok()
            .and_then(token_from_header)
            .ok_or_else(|| {
                debug!("Authorization header is malformed.");

                AuthError::Invalid
            })?;

        if tokens.contains(token) {
            Ok(Authenticated)
        } else {
            debug!("Unknown authentication token received.");

            Err(AuthError::Invalid)
        }
    }
}

fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;

    if SCHEMES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(scheme))
    {
        Some(token.trim())
    } else {
        None
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    Invalid,
    Missing,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            Self::Invalid => (StatusCode::UNAUTHORIZED, "Invalid authentication token."),
            Self::Missing => (
                StatusCode::UNAUTHORIZED,
                "No authentication token provided.",
            ),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod test {
    use axum::http::Request;

    use super::*;

    async fn authenticate(tokens: &ApiTokens, header: Option<&str>) -> Result<(), AuthError> {
        let mut builder = Request::builder().uri("/categories/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }

        let (mut parts, _) = builder
            .body(())
            .expect("failed to build request")
            .into_parts();

        Authenticated::from_request_parts(&mut parts, tokens)
            .await
            .map(|_| ())
    }

    #[tokio::test]
    async fn accepts_bearer_token() {
        let tokens = ApiTokens::new(vec!["s3cret".to_owned()]);

        authenticate(&tokens, Some("Bearer s3cret"))
            .await
            .expect("token should be accepted");
    }

    #[tokio::test]
    async fn accepts_token_scheme() {
        let tokens = ApiTokens::new(vec!["s3cret".to_owned()]);

        authenticate(&tokens, Some("Token s3cret"))
            .await
            .expect("token should be accepted");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let tokens = ApiTokens::new(vec!["s3cret".to_owned()]);

        let error = authenticate(&tokens, None)
            .await
            .expect_err("missing token should be rejected");

        assert_eq!(AuthError::Missing, error);
    }

    #[tokio::test]
    async fn rejects_unknown_token() {
        let tokens = ApiTokens::new(vec!["s3cret".to_owned()]);

        let error = authenticate(&tokens, Some("Bearer guess"))
            .await
            .expect_err("unknown token should be rejected");

        assert_eq!(AuthError::Invalid, error);
    }

    #[tokio::test]
    async fn rejects_unknown_scheme() {
        let tokens = ApiTokens::new(vec!["s3cret".to_owned()]);

        let error = authenticate(&tokens, Some("Basic s3cret"))
            .await
            .expect_err("basic auth is not supported");

        assert_eq!(AuthError::Invalid, error);
    }

    #[test]
    fn blank_tokens_are_ignored() {
        let tokens = ApiTokens::new(vec!["".to_owned(), "  ".to_owned()]);

        assert!(tokens.is_empty());
    }
}
