use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::error;

use crate::{
    conversion::{
        domain::{ConversionRequest, ConversionRequestData},
        rates::RateFetchError,
        services::{ConversionError, ConversionService},
    },
    http_err::{ApiError, ApiResponse},
    server::AppState,
};

pub mod reps;

pub fn routes() -> Router<AppState> {
    Router::new().route("/currency-convert/", post(convert_currency))
}

impl From<ConversionError> for ApiError {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::RateFetch(RateFetchError::Rejected(reason)) => {
                error!(%reason, "Exchange rate service rejected the request.");

                ApiError::BadRequestReason("Failed to fetch exchange rate.".to_owned())
            }
            ConversionError::RateFetch(error @ RateFetchError::Unavailable(_)) => {
                error!(?error, "Failed to reach the exchange rate service.");

                ApiError::InternalServerErrorReason(
                    "Error connecting to the exchange rate service.".to_owned(),
                )
            }
            ConversionError::Overflow => ApiError::InternalServerError,
        }
    }
}

async fn convert_currency(
    State(conversion_service): State<ConversionService>,
    payload: Result<Json<ConversionRequestData>, JsonRejection>,
) -> ApiResponse<Json<reps::Conversion>> {
    let Json(data) = payload?;
    let request = ConversionRequest::from_data(data)?;

    let result = conversion_service.convert(request).await?;

    Ok(Json(reps::Conversion::from(&result)))
}
