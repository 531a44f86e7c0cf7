use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    dtos::{pointsdtos::RestrictionListResponseDto, userdtos::Response},
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    service::restriction_service::ResolveOutcome,
    AppState,
};

pub fn restrictions_handler() -> Router {
    Router::new()
        .route("/", get(list_restrictions))
        .route("/:restriction_id/resolve", post(resolve_restriction))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin, UserRole::Teacher])
        }))
}

pub async fn list_restrictions(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let restrictions = app_state.restriction_service.list_unresolved().await?;

    Ok(Json(RestrictionListResponseDto {
        status: "success".to_string(),
        restrictions,
    }))
}

pub async fn resolve_restriction(
    Path(restriction_id): Path<i32>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state
        .restriction_service
        .resolve_restriction(restriction_id)
        .await?;

    let message = match outcome {
        ResolveOutcome::Resolved => "Restriction resolved".to_string(),
        ResolveOutcome::AlreadyResolved => "Restriction was already resolved".to_string(),
    };

    Ok(Json(Response {
        status: "success",
        message,
    }))
}
