use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::debug;

use crate::validation::FieldErrors;

pub enum ApiError {
    /// The request failed validation. Field errors are sent as the body.
    BadRequest(FieldErrors),
    BadRequestReason(String),
    InternalServerError,
    InternalServerErrorReason(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::BadRequestReason(reason) => {
                (StatusCode::BAD_REQUEST, Json(ErrorRep { error: reason })).into_response()
            }
            Self::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRep {
                    error: "Internal server error.".to_owned(),
                }),
            )
                .into_response(),
            Self::InternalServerErrorReason(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRep { error: reason }),
            )
                .into_response(),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::BadRequest(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(%rejection, "Rejected request body.");

        Self::BadRequestReason(INVALID_BODY_MESSAGE.to_owned())
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

/// Message sent when a request body can't be decoded.
pub const INVALID_BODY_MESSAGE: &str = "Invalid JSON request body.";

#[derive(Serialize)]
pub struct ErrorRep {
    pub error: String,
}
