use std::sync::Arc;

use axum::{
    extract::{Multipart, Query},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        cache::{CacheHelper, LEADERBOARD_CACHE_TTL},
        userdb::UserExt,
    },
    dtos::{
        pointsdtos::LeaderboardResponseDto,
        userdtos::{
            FilterUserDto, NameUpdateDto, RequestQueryDto, Response, UserData, UserListResponseDto,
            UserPasswordUpdateDto, UserResponseDto,
        },
    },
    error::{ErrorMessage, HttpError},
    middleware::{role_check, JWTAuthMiddeware},
    models::{pointsmodel::LeaderboardEntry, usermodel::UserRole},
    utils::password,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route(
            "/",
            get(get_users).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route("/leaderboard", get(get_leaderboard))
        .route("/name", put(update_user_name))
        .route("/password", put(update_user_password))
        .route("/avatar", put(update_user_avatar))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let filtered_user = FilterUserDto::filter_user(&user.user);

    let response_data = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: filtered_user,
        },
    };

    Ok(Json(response_data))
}

pub async fn get_users(
    Query(query_params): Query<RequestQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let users = app_state
        .db_client
        .get_users(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user_count = app_state
        .db_client
        .get_user_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = UserListResponseDto {
        status: "success".to_string(),
        users: users.iter().map(FilterUserDto::filter_user).collect(),
        results: user_count,
    };

    Ok(Json(response))
}

pub async fn get_leaderboard(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let cache_key = "leaderboard:top";

    if let Some(redis) = &app_state.db_client.redis_client {
        if let Ok(Some(cached)) =
            CacheHelper::get::<Vec<LeaderboardEntry>>(redis, cache_key).await
        {
            return Ok(Json(LeaderboardResponseDto {
                status: "success".to_string(),
                leaderboard: cached,
            }));
        }
    }

    let leaderboard = app_state
        .db_client
        .get_leaderboard(50)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Some(redis) = &app_state.db_client.redis_client {
        let _ = CacheHelper::set(redis, cache_key, &leaderboard, LEADERBOARD_CACHE_TTL).await;
    }

    Ok(Json(LeaderboardResponseDto {
        status: "success".to_string(),
        leaderboard,
    }))
}

pub async fn update_user_name(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<NameUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user_id = user.user.id;

    let updated = app_state
        .db_client
        .update_user_name(user_id, body.full_name, body.phone)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    };

    Ok(Json(response))
}

pub async fn update_user_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UserPasswordUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user_id = user.user.id;

    let current_user = app_state
        .db_client
        .get_user(Some(user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::UserNoLongerExist.to_string()))?;

    let password_match = password::compare(&body.old_password, &current_user.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !password_match {
        return Err(HttpError::bad_request(
            "Old password is incorrect".to_string(),
        ));
    }

    let hash_password = password::hash(&body.new_password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .update_user_password(user_id, hash_password)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = Response {
        status: "success",
        message: "Password updated successfully".to_string(),
    };

    Ok(Json(response))
}

const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

pub async fn update_user_avatar(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut saved_url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        if field.name() != Some("avatar") {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()))
            .unwrap_or_else(|| "png".to_string());

        if !matches!(extension.as_str(), "png" | "jpg" | "jpeg" | "webp") {
            return Err(HttpError::bad_request(
                "Avatar must be a png, jpg, jpeg or webp image".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| HttpError::bad_request(e.to_string()))?;

        if data.len() > MAX_AVATAR_BYTES {
            return Err(HttpError::bad_request(
                "Avatar must be smaller than 2MB".to_string(),
            ));
        }

        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let uploads_dir = std::path::Path::new(&app_state.env.uploads_dir);

        tokio::fs::create_dir_all(uploads_dir)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        tokio::fs::write(uploads_dir.join(&file_name), &data)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;

        saved_url = Some(format!("/uploads/{}", file_name));
    }

    let avatar_url =
        saved_url.ok_or_else(|| HttpError::bad_request("No avatar file provided".to_string()))?;

    let updated = app_state
        .db_client
        .update_user_avatar(user.user.id, avatar_url)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    };

    Ok(Json(response))
}
