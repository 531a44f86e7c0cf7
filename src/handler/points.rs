use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        cache::{CacheHelper, STATS_CACHE_TTL},
        pointsdb::PointsExt,
    },
    dtos::pointsdtos::{
        BalanceResponseDto, BatchPointsDto, BatchPointsResponseDto, StatsResponseDto,
        TransactionLogQuery, TransactionLogResponseDto,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::{pointsmodel::SystemStats, usermodel::UserRole},
    service::{
        ledger_service::BatchPointsInput,
        levels::level_for_balance,
    },
    AppState,
};

pub fn points_handler() -> Router {
    Router::new()
        .route(
            "/batch",
            post(batch_add_points).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::Teacher])
            })),
        )
        .route("/balance", get(get_my_balance))
        .route(
            "/balance/:user_id",
            get(get_user_balance).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::Teacher])
            })),
        )
        .route(
            "/transactions",
            get(get_transaction_log).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin, UserRole::Teacher])
            })),
        )
        .route(
            "/stats",
            get(get_system_stats).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
}

pub async fn batch_add_points(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<BatchPointsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let outcome = app_state
        .ledger_service
        .batch_add_points(
            BatchPointsInput {
                user_codes: body.user_codes,
                points: body.points,
                is_positive: body.is_positive,
                category_id: body.category_id,
                item_id: body.item_id,
                description: body.description,
            },
            user.user.id,
        )
        .await?;

    // Balances changed, so cached aggregates are stale.
    if let Some(redis) = &app_state.db_client.redis_client {
        let _ = CacheHelper::delete(redis, "stats:system").await;
        let _ = CacheHelper::delete(redis, "leaderboard:top").await;
    }

    let message = if outcome.missing_user_codes.is_empty() {
        format!("Points recorded for {} users", outcome.processed_count)
    } else {
        format!(
            "Points recorded for {} users; {} codes were not found",
            outcome.processed_count,
            outcome.missing_user_codes.len()
        )
    };

    Ok(Json(BatchPointsResponseDto {
        status: "success".to_string(),
        message,
        processed_count: outcome.processed_count,
        missing_user_codes: outcome.missing_user_codes,
    }))
}

pub async fn get_my_balance(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    balance_response(&app_state, user.user.id).await
}

pub async fn get_user_balance(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    balance_response(&app_state, user_id).await
}

async fn balance_response(
    app_state: &Arc<AppState>,
    user_id: Uuid,
) -> Result<Json<BalanceResponseDto>, HttpError> {
    let balance = app_state
        .db_client
        .get_balance(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(BalanceResponseDto {
        status: "success".to_string(),
        user_id,
        balance,
        level: level_for_balance(balance),
    }))
}

pub async fn get_transaction_log(
    Query(query): Query<TransactionLogQuery>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);
    let offset = (page as i64 - 1) * limit as i64;

    let cutoff = query.period.and_then(|p| p.cutoff(Utc::now()));
    let sign = query.sign_filter();

    let transactions = app_state
        .db_client
        .get_transaction_log(cutoff, sign, limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(TransactionLogResponseDto {
        status: "success".to_string(),
        transactions,
        page,
        limit,
    }))
}

pub async fn get_system_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let cache_key = "stats:system";

    if let Some(redis) = &app_state.db_client.redis_client {
        if let Ok(Some(cached)) = CacheHelper::get::<SystemStats>(redis, cache_key).await {
            return Ok(Json(StatsResponseDto {
                status: "success".to_string(),
                stats: cached,
            }));
        }
    }

    let stats = app_state
        .db_client
        .get_system_stats()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Some(redis) = &app_state.db_client.redis_client {
        let _ = CacheHelper::set(redis, cache_key, &stats, STATS_CACHE_TTL).await;
    }

    Ok(Json(StatsResponseDto {
        status: "success".to_string(),
        stats,
    }))
}
