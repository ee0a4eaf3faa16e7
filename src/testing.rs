//! Test doubles and helpers for exercising the HTTP routes.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Request, StatusCode,
    },
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    authentication::ApiTokens,
    categories::{
        domain::{Category, NewCategory},
        seeder::RandomCategorySeeder,
        services::CategoryService,
    },
    conversion::{
        domain::CurrencyCode,
        rates::{RateFetchError, RateProvider},
        services::ConversionService,
    },
    repos::CategoryRepo,
    server::{self, AppState},
};

pub const TEST_TOKEN: &str = "test-token";

enum StubOutcome {
    Rate(Decimal),
    Rejected,
    Unavailable,
}

/// A rate provider returning a fixed outcome and recording each request.
pub struct StubRateProvider {
    outcome: StubOutcome,
    calls: AtomicUsize,
    pairs: Mutex<Vec<(String, String)>>,
}

impl StubRateProvider {
    fn new(outcome: StubOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            pairs: Mutex::new(Vec::new()),
        })
    }

    pub fn with_rate(rate: Decimal) -> Arc<Self> {
        Self::new(StubOutcome::Rate(rate))
    }

    pub fn rejecting() -> Arc<Self> {
        Self::new(StubOutcome::Rejected)
    }

    pub fn unavailable() -> Arc<Self> {
        Self::new(StubOutcome::Unavailable)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_pairs(&self) -> Vec<(String, String)> {
        self.pairs.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateProvider for StubRateProvider {
    async fn pair_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, RateFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pairs
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string()));

        match self.outcome {
            StubOutcome::Rate(rate) => Ok(rate),
            StubOutcome::Rejected => Err(RateFetchError::Rejected("result was \"error\"".into())),
            StubOutcome::Unavailable => Err(RateFetchError::Unavailable("connection refused".into())),
        }
    }
}

/// A category store kept in memory.
#[derive(Default)]
pub struct InMemoryCategoryRepo(Mutex<Vec<Category>>);

impl InMemoryCategoryRepo {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn insert(&self, category: &NewCategory) -> Category {
        let category = Category {
            category_code: category.category_code().to_owned(),
            name: category.name().to_owned(),
            description: category.description().map(str::to_owned),
        };

        self.0.lock().unwrap().push(category.clone());

        category
    }
}

#[async_trait]
impl CategoryRepo for InMemoryCategoryRepo {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn persist_category(&self, category: &NewCategory) -> anyhow::Result<Category> {
        Ok(self.insert(category))
    }

    async fn persist_categories(
        &self,
        categories: &[NewCategory],
    ) -> anyhow::Result<Vec<Category>> {
        Ok(categories
            .iter()
            .map(|category| self.insert(category))
            .collect())
    }
}

/// A category store that fails every operation.
pub struct FailingCategoryRepo;

#[async_trait]
impl CategoryRepo for FailingCategoryRepo {
    async fn list_categories(&self) -> anyhow::Result<Vec<Category>> {
        Err(anyhow!("relation \"category\" does not exist"))
    }

    async fn persist_category(&self, _: &NewCategory) -> anyhow::Result<Category> {
        Err(anyhow!("relation \"category\" does not exist"))
    }

    async fn persist_categories(&self, _: &[NewCategory]) -> anyhow::Result<Vec<Category>> {
        Err(anyhow!("relation \"category\" does not exist"))
    }
}

fn app(
    rate_provider: Arc<dyn RateProvider + Send + Sync>,
    category_repo: Arc<dyn CategoryRepo + Send + Sync>,
) -> Router {
    let state = AppState::new(
        ApiTokens::new(vec![TEST_TOKEN.to_owned()]),
        CategoryService::new(category_repo, Arc::new(RandomCategorySeeder)),
        ConversionService::new(rate_provider),
    );

    server::router(state)
}

pub fn app_with_rates(rate_provider: Arc<StubRateProvider>) -> Router {
    app(rate_provider, Arc::new(InMemoryCategoryRepo::default()))
}

pub fn app_with_categories(category_repo: Arc<dyn CategoryRepo + Send + Sync>) -> Router {
    app(
        StubRateProvider::with_rate(Decimal::ONE),
        category_repo,
    )
}

pub fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn raw_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

/// Send a request through the router and decode the JSON response.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
