use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{debug, error};

use crate::{
    authentication::Authenticated,
    categories::{
        domain::NewCategoryData,
        services::{CategoryService, CreateCategoryError},
    },
    http_err::INVALID_BODY_MESSAGE,
    server::AppState,
    validation::{FieldErrors, NON_FIELD_ERRORS},
};

pub mod reps;

/// Number of categories created by each call to the populate endpoint.
const POPULATE_BATCH_SIZE: usize = 10;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories/", get(get_categories).post(create_category))
        .route("/populate-categories/", get(populate_categories))
}

/// Failures of the category endpoints.
///
/// Storage errors are logged but never described to the client.
pub enum CategoryApiError {
    Invalid(FieldErrors),
    Internal,
}

impl IntoResponse for CategoryApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Invalid(errors) => (
                StatusCode::BAD_REQUEST,
                Json(reps::InvalidCategory {
                    message: "Invalid data",
                    errors,
                }),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(reps::CategoryFailure {
                    message: "An error occurred",
                    error: "Internal server error.",
                }),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for CategoryApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(%rejection, "Rejected category body.");

        let mut errors = FieldErrors::new();
        errors.add(NON_FIELD_ERRORS, INVALID_BODY_MESSAGE);

        Self::Invalid(errors)
    }
}

impl From<CreateCategoryError> for CategoryApiError {
    fn from(error: CreateCategoryError) -> Self {
        match error {
            CreateCategoryError::InvalidCategory(errors) => Self::Invalid(errors),
            CreateCategoryError::Other(error) => {
                error!(?error, "Failed to create category.");

                Self::Internal
            }
        }
    }
}

async fn get_categories(
    _: Authenticated,
    State(category_service): State<CategoryService>,
) -> Result<Json<reps::CategoryList>, CategoryApiError> {
    match category_service.list_categories().await {
        Ok(categories) => Ok(Json(reps::CategoryList {
            message: "Data retrieved successfully",
            categories: categories.iter().map(reps::Category::from).collect(),
        })),
        Err(error) => {
            error!(?error, "Failed to list categories.");

            Err(CategoryApiError::Internal)
        }
    }
}

async fn create_category(
    _: Authenticated,
    State(category_service): State<CategoryService>,
    payload: Result<Json<NewCategoryData>, JsonRejection>,
) -> Result<(StatusCode, Json<reps::CreatedCategory>), CategoryApiError> {
    let Json(data) = payload?;

    let category = category_service.create_category(data).await?;

    Ok((
        StatusCode::CREATED,
        Json(reps::CreatedCategory {
            message: "Category created successfully",
            category: reps::Category::from(&category),
        }),
    ))
}

async fn populate_categories(
    _: Authenticated,
    State(category_service): State<CategoryService>,
) -> Result<Json<reps::PopulatedCategories>, CategoryApiError> {
    match category_service
        .populate_categories(POPULATE_BATCH_SIZE)
        .await
    {
        Ok(categories) => Ok(Json(reps::PopulatedCategories {
            message: "successfully created data",
            data: categories.iter().map(reps::Category::from).collect(),
        })),
        Err(error) => {
            error!(?error, "Failed to populate categories.");

            Err(CategoryApiError::Internal)
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::testing::{self, FailingCategoryRepo, InMemoryCategoryRepo, TEST_TOKEN};

    use super::*;

    async fn create(app: Router, body: Value) -> (StatusCode, Value) {
        testing::send(
            app,
            testing::json_request("POST", "/categories/", &body, Some(TEST_TOKEN)),
        )
        .await
    }

    async fn list(app: Router) -> (StatusCode, Value) {
        testing::send(app, testing::get_request("/categories/", Some(TEST_TOKEN))).await
    }

    #[tokio::test]
    async fn list_empty() {
        let app = testing::app_with_categories(Arc::new(InMemoryCategoryRepo::default()));

        let (status, body) = list(app).await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!(
            json!({"message": "Data retrieved successfully", "categories": []}),
            body
        );
    }

    #[tokio::test]
    async fn list_after_creating() {
        let repo = Arc::new(InMemoryCategoryRepo::default());

        for index in 0..3 {
            let (status, _) = create(
                testing::app_with_categories(repo.clone()),
                json!({
                    "category_code": format!("CAT{}", index),
                    "name": format!("Category {}", index),
                }),
            )
            .await;
            assert_eq!(StatusCode::CREATED, status);
        }

        let (status, body) = list(testing::app_with_categories(repo)).await;

        assert_eq!(StatusCode::OK, status);
        let categories = body["categories"]
            .as_array()
            .expect("categories should be a list");
        assert_eq!(3, categories.len());
        assert_eq!(
            json!({"category_code": "CAT0", "name": "Category 0", "description": null}),
            categories[0]
        );
        assert_eq!("CAT2", categories[2]["category_code"]);
    }

    #[tokio::test]
    async fn create_category_response() {
        let app = testing::app_with_categories(Arc::new(InMemoryCategoryRepo::default()));

        let (status, body) = create(
            app,
            json!({
                "category_code": "FOOD",
                "name": "Food",
                "description": "Things to eat.",
            }),
        )
        .await;

        assert_eq!(StatusCode::CREATED, status);
        assert_eq!(
            json!({
                "message": "Category created successfully",
                "category": {
                    "category_code": "FOOD",
                    "name": "Food",
                    "description": "Things to eat.",
                },
            }),
            body
        );
    }

    #[tokio::test]
    async fn create_duplicate_codes_allowed() {
        let repo = Arc::new(InMemoryCategoryRepo::default());

        for _ in 0..2 {
            let (status, _) = create(
                testing::app_with_categories(repo.clone()),
                json!({"category_code": "DUP", "name": "Duplicate"}),
            )
            .await;
            assert_eq!(StatusCode::CREATED, status);
        }

        assert_eq!(2, repo.len());
    }

    #[tokio::test]
    async fn create_invalid_category() {
        let repo = Arc::new(InMemoryCategoryRepo::default());

        let (status, body) = create(
            testing::app_with_categories(repo.clone()),
            json!({"name": "N".repeat(51)}),
        )
        .await;

        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(
            json!({
                "message": "Invalid data",
                "errors": {
                    "category_code": ["This field is required."],
                    "name": ["Ensure this field has no more than 50 characters."],
                },
            }),
            body
        );
        assert_eq!(0, repo.len());
    }

    #[tokio::test]
    async fn create_category_fields_of_wrong_type() {
        let repo = Arc::new(InMemoryCategoryRepo::default());

        let (status, body) = create(
            testing::app_with_categories(repo.clone()),
            json!({"category_code": ["CAT001"], "name": true, "description": null}),
        )
        .await;

        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!(
            json!({
                "message": "Invalid data",
                "errors": {
                    "category_code": ["Not a valid string."],
                    "name": ["Not a valid string."],
                },
            }),
            body
        );
        assert_eq!(0, repo.len());
    }

    #[tokio::test]
    async fn create_store_failure_hides_details() {
        let app = testing::app_with_categories(Arc::new(FailingCategoryRepo));

        let (status, body) = create(app, json!({"category_code": "X", "name": "X"})).await;

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
        assert_eq!(
            json!({"message": "An error occurred", "error": "Internal server error."}),
            body
        );
    }

    #[tokio::test]
    async fn list_store_failure() {
        let app = testing::app_with_categories(Arc::new(FailingCategoryRepo));

        let (status, _) = list(app).await;

        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
    }

    #[tokio::test]
    async fn populate_creates_ten_categories() {
        let repo = Arc::new(InMemoryCategoryRepo::default());

        let (status, body) = testing::send(
            testing::app_with_categories(repo.clone()),
            testing::get_request("/populate-categories/", Some(TEST_TOKEN)),
        )
        .await;

        assert_eq!(StatusCode::OK, status);
        assert_eq!("successfully created data", body["message"]);
        assert_eq!(
            10,
            body["data"].as_array().expect("data should be a list").len()
        );

        let (_, body) = list(testing::app_with_categories(repo)).await;
        let categories = body["categories"]
            .as_array()
            .expect("categories should be a list");
        assert_eq!(10, categories.len());
        for category in categories {
            assert!(category["category_code"].is_string());
            assert!(category["name"].is_string());
            assert!(category["description"].is_string());
        }
    }

    #[tokio::test]
    async fn categories_require_authentication() {
        let app = testing::app_with_categories(Arc::new(InMemoryCategoryRepo::default()));

        let (status, body) = testing::send(app, testing::get_request("/categories/", None)).await;

        assert_eq!(StatusCode::UNAUTHORIZED, status);
        assert_eq!(json!({"error": "No authentication token provided."}), body);
    }

    #[tokio::test]
    async fn populate_rejects_unknown_token() {
        let repo = Arc::new(InMemoryCategoryRepo::default());

        let (status, _) = testing::send(
            testing::app_with_categories(repo.clone()),
            testing::get_request("/populate-categories/", Some("wrong")),
        )
        .await;

        assert_eq!(StatusCode::UNAUTHORIZED, status);
        assert_eq!(0, repo.len());
    }
}
