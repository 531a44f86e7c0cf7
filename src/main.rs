mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    ledger_service::LedgerService, notification_service::NotificationService,
    restriction_service::RestrictionService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub ledger_service: Arc<LedgerService>,
    pub restriction_service: Arc<RestrictionService>,
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let notification_service = Arc::new(NotificationService::new(db_client_arc.clone()));
        let ledger_service = Arc::new(LedgerService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));
        let restriction_service = Arc::new(RestrictionService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            ledger_service,
            restriction_service,
            notification_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("Connection to the database is successful");
            pool
        }
        Err(err) => {
            tracing::error!("Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        tracing::error!("Failed to run database migrations: {:?}", err);
        std::process::exit(1);
    }

    let db_client = if let Some(ref redis_url) = config.redis_url {
        match DBClient::with_redis(pool.clone(), redis_url).await {
            Ok(client) => {
                if client.is_redis_available() {
                    tracing::info!("Redis caching is active");
                } else {
                    tracing::warn!("Redis connection failed - running without cache");
                }
                client
            }
            Err(e) => {
                tracing::warn!("Redis initialization error: {} - running without cache", e);
                DBClient::new(pool)
            }
        }
    } else {
        tracing::info!("Redis not configured - running without cache (set REDIS_URL to enable)");
        DBClient::new(pool)
    };

    let allowed_origins = [
        config.app_url.as_str(),
        "http://localhost:3000",
        "http://localhost:8000",
    ]
    .iter()
    .filter_map(|origin| origin.parse::<HeaderValue>().ok())
    .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    tracing::info!("Server is running on http://localhost:{}", config.port);
    tracing::info!("Cache status: {}", app_state.db_client.cache_status());

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind to port {}: {:?}", config.port, err);
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {:?}", err);
        std::process::exit(1);
    }
}
