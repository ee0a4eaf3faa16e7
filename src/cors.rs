use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    HeaderValue, Method,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build a layer that attaches CORS headers to responses.
///
/// Only the listed origins are allowed. Credentialed requests require the
/// allowed origin to match the request origin, so wildcards are not
/// supported. With no origins, cross-origin requests get no CORS headers.
pub fn layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS, Method::POST])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN])
        .allow_credentials(true))
}
