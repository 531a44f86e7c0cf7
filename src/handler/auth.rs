use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{
        FilterUserDto, LoginUserDto, RegisterUserDto, Response, UserData, UserLoginResponseDto,
        UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    models::usermodel::UserRole,
    utils::{password, token, user_code::generate_user_code},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let hash_password = password::hash(&body.password)
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Retry in the unlikely case a random code collides with an
    // existing one.
    let mut user_code = generate_user_code();
    for _ in 0..5 {
        let exists = app_state
            .db_client
            .user_code_exists(&user_code)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        if !exists {
            break;
        }
        user_code = generate_user_code();
    }

    let result = app_state
        .db_client
        .save_user(
            body.full_name.clone(),
            body.email.clone(),
            hash_password,
            user_code,
            UserRole::Student,
            body.phone.clone(),
        )
        .await;

    match result {
        Ok(user) => {
            tracing::info!("New user registered: {} ({})", user.email, user.user_code);

            // Best-effort; registration already succeeded.
            if let Err(e) = app_state
                .notification_service
                .notify_user(
                    user.id,
                    "Welcome",
                    &format!("Your student code is {}. Points you earn will show up here.", user.user_code),
                )
                .await
            {
                tracing::warn!("Failed to store welcome notification: {}", e);
            }

            Ok((
                StatusCode::CREATED,
                Json(UserResponseDto {
                    status: "success".to_string(),
                    data: UserData {
                        user: FilterUserDto::filter_user(&user),
                    },
                }),
            ))
        }
        Err(sqlx::Error::Database(db_err)) => {
            if db_err.is_unique_violation() {
                Err(map_unique_violation(db_err.constraint()))
            } else {
                Err(HttpError::server_error(db_err.to_string()))
            }
        }
        Err(e) => Err(HttpError::server_error(e.to_string())),
    }
}

/// A duplicate email is the caller's mistake; a user_code collision
/// that survived the retry loop is ours.
fn map_unique_violation(constraint: Option<&str>) -> HttpError {
    match constraint {
        Some("users_user_code_key") => HttpError::server_error(
            "Could not allocate a unique student code, please try again".to_string(),
        ),
        _ => HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string()),
    }
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matches = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matches {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage * 60,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie header".to_string()))?,
    );

    let mut response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::minutes(-1))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build cookie header".to_string()))?,
    );

    let mut response = Json(Response {
        status: "success",
        message: "Logged out".to_string(),
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_reports_conflict() {
        let err = map_unique_violation(Some("users_email_key"));
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.message, ErrorMessage::EmailExist.to_string());
    }

    #[test]
    fn user_code_collision_is_not_blamed_on_the_email() {
        let err = map_unique_violation(Some("users_user_code_key"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("student code"));
    }
}
