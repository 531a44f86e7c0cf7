use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::categorydb::CategoryExt,
    dtos::pointsdtos::{
        CategoryListQuery, CategoryListResponseDto, CreateCategoryDto, CreateItemDto,
        ItemListQuery, ItemListResponseDto,
    },
    dtos::userdtos::Response,
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn categories_handler() -> Router {
    let admin_only = || {
        middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        })
    };

    Router::new()
        .route("/", get(list_categories))
        .route("/", post(create_category).layer(admin_only()))
        .route("/:category_id", put(update_category).layer(admin_only()))
        .route("/:category_id", delete(delete_category).layer(admin_only()))
        .route("/:category_id/items", get(list_category_items))
}

pub fn items_handler() -> Router {
    let admin_only = || {
        middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        })
    };

    Router::new()
        .route("/", get(list_items))
        .route("/", post(create_item).layer(admin_only()))
        .route("/:item_id", put(update_item).layer(admin_only()))
        .route("/:item_id", delete(delete_item).layer(admin_only()))
}

pub async fn list_categories(
    Query(query): Query<CategoryListQuery>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let is_positive = match query.kind.as_deref() {
        Some("positive") => Some(true),
        Some("negative") => Some(false),
        _ => None,
    };

    let categories = app_state
        .db_client
        .get_categories(is_positive)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(CategoryListResponseDto {
        status: "success".to_string(),
        categories,
    }))
}

pub async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // The mandatory/restricted flags only apply to negative categories.
    let is_mandatory = !body.is_positive && body.is_mandatory;
    let is_restricted = !body.is_positive && body.is_restricted;

    let category = app_state
        .db_client
        .create_category(
            body.name,
            body.description,
            body.default_points,
            body.is_positive,
            is_mandatory,
            is_restricted,
            user.user.id,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!("Category created: {} (id {})", category.name, category.id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "category": category,
        })),
    ))
}

pub async fn update_category(
    Path(category_id): Path<i32>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let is_mandatory = !body.is_positive && body.is_mandatory;
    let is_restricted = !body.is_positive && body.is_restricted;

    let category = app_state
        .db_client
        .update_category(
            category_id,
            body.name,
            body.description,
            body.default_points,
            body.is_positive,
            is_mandatory,
            is_restricted,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Category {} not found", category_id)))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "category": category,
    })))
}

pub async fn delete_category(
    Path(category_id): Path<i32>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let references = app_state
        .db_client
        .category_transaction_count(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if references > 0 {
        return Err(HttpError::bad_request(format!(
            "Category {} has {} recorded transactions and cannot be deleted",
            category_id, references
        )));
    }

    let deleted = app_state
        .db_client
        .delete_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if deleted == 0 {
        return Err(HttpError::not_found(format!(
            "Category {} not found",
            category_id
        )));
    }

    tracing::info!("Category {} deleted", category_id);

    Ok(Json(Response {
        status: "success",
        message: "Category deleted".to_string(),
    }))
}

pub async fn list_category_items(
    Path(category_id): Path<i32>,
    Query(query): Query<ItemListQuery>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let items = app_state
        .db_client
        .get_items(Some(category_id), query.active_only)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ItemListResponseDto {
        status: "success".to_string(),
        items,
    }))
}

pub async fn list_items(
    Query(query): Query<ItemListQuery>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let items = app_state
        .db_client
        .get_items(None, query.active_only)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ItemListResponseDto {
        status: "success".to_string(),
        items,
    }))
}

pub async fn create_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateItemDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let category = app_state
        .db_client
        .get_category(body.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if category.is_none() {
        return Err(HttpError::not_found(format!(
            "Category {} not found",
            body.category_id
        )));
    }

    let item = app_state
        .db_client
        .create_item(
            body.category_id,
            body.name,
            body.description,
            body.points,
            body.is_active,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "item": item,
        })),
    ))
}

pub async fn update_item(
    Path(item_id): Path<i32>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateItemDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let item = app_state
        .db_client
        .update_item(item_id, body.name, body.description, body.points, body.is_active)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Item {} not found", item_id)))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "item": item,
    })))
}

pub async fn delete_item(
    Path(item_id): Path<i32>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let deleted = app_state
        .db_client
        .delete_item(item_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if deleted == 0 {
        return Err(HttpError::not_found(format!("Item {} not found", item_id)));
    }

    Ok(Json(Response {
        status: "success",
        message: "Item deleted".to_string(),
    }))
}
