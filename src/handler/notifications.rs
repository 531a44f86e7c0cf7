use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::notificationdb::NotificationExt,
    dtos::{
        notificationdtos::{NotificationListResponseDto, UnreadCountResponseDto},
        userdtos::{RequestQueryDto, Response},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn notifications_handler() -> Router {
    Router::new()
        .route("/", get(get_notifications))
        .route("/unread-count", get(get_unread_count))
        .route("/:notification_id/read", put(mark_notification_read))
        .route("/read-all", post(mark_all_read))
}

pub async fn get_notifications(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(20);
    let offset = (page as i64 - 1) * limit as i64;

    let notifications = app_state
        .db_client
        .get_notifications(user.user.id, limit as i64, offset)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = app_state
        .db_client
        .get_notification_count(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(NotificationListResponseDto {
        status: "success".to_string(),
        notifications,
        results,
    }))
}

pub async fn get_unread_count(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let unread_count = app_state
        .db_client
        .get_unread_count(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UnreadCountResponseDto {
        status: "success".to_string(),
        unread_count,
    }))
}

pub async fn mark_notification_read(
    Path(notification_id): Path<i64>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .db_client
        .mark_notification_read(notification_id, user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if updated == 0 {
        return Err(HttpError::not_found(format!(
            "Notification {} not found",
            notification_id
        )));
    }

    Ok(Json(Response {
        status: "success",
        message: "Notification marked as read".to_string(),
    }))
}

pub async fn mark_all_read(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let updated = app_state
        .db_client
        .mark_all_notifications_read(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(Response {
        status: "success",
        message: format!("{} notifications marked as read", updated),
    }))
}
