use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{extract::FromRef, Router};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    authentication::ApiTokens,
    categories::{
        seeder::{DynCategorySeeder, RandomCategorySeeder},
        services::CategoryService,
    },
    conversion::{
        rates::{DynRateProvider, ExchangeRateApiClient},
        services::ConversionService,
    },
    cors,
    database::PostgresConnection,
    repos::DynCategoryRepo,
};

pub struct Options {
    pub address: SocketAddr,
    pub api_tokens: Vec<String>,
    pub cors_allowed_origins: Vec<String>,

    pub database_pool_size: u32,
    pub database_timeout_seconds: u8,
    pub database_url: String,

    pub exchange_rate_api_key: String,
    pub exchange_rate_api_url: String,
    pub exchange_rate_timeout_seconds: u8,
}

#[derive(Clone)]
pub struct AppState {
    api_tokens: ApiTokens,
    category_service: CategoryService,
    conversion_service: ConversionService,
}

impl AppState {
    pub fn new(
        api_tokens: ApiTokens,
        category_service: CategoryService,
        conversion_service: ConversionService,
    ) -> Self {
        Self {
            api_tokens,
            category_service,
            conversion_service,
        }
    }
}

/// Build the application's routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(crate::conversion::http::routes())
        .merge(crate::categories::http::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let db_connection = PostgresConnection::connect(
        &opts.database_url,
        opts.database_pool_size,
        opts.database_timeout_seconds,
    )
    .await?;

    let rate_provider: DynRateProvider = Arc::new(ExchangeRateApiClient::new(
        opts.exchange_rate_api_key,
        opts.exchange_rate_api_url,
        Duration::from_secs(opts.exchange_rate_timeout_seconds.into()),
    )?);

    let category_repo: DynCategoryRepo = Arc::new(db_connection);
    let seeder: DynCategorySeeder = Arc::new(RandomCategorySeeder);

    let api_tokens = ApiTokens::new(opts.api_tokens);
    if api_tokens.is_empty() {
        warn!("No API tokens configured. Authenticated endpoints will reject every request.");
    }

    let state = AppState::new(
        api_tokens,
        CategoryService::new(category_repo, seeder),
        ConversionService::new(rate_provider),
    );

    let app = router(state).layer(cors::layer(&opts.cors_allowed_origins)?);

    info!(address = %opts.address, "Starting server.");

    axum::Server::bind(&opts.address)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

impl FromRef<AppState> for ApiTokens {
    fn from_ref(state: &AppState) -> Self {
        state.api_tokens.clone()
    }
}

impl FromRef<AppState> for CategoryService {
    fn from_ref(state: &AppState) -> Self {
        state.category_service.clone()
    }
}

impl FromRef<AppState> for ConversionService {
    fn from_ref(state: &AppState) -> Self {
        state.conversion_service.clone()
    }
}
