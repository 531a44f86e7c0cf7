use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use serde_json::json;

use crate::{
    handler::{
        auth::auth_handler,
        categories::{categories_handler, items_handler},
        notifications::notifications_handler,
        points::points_handler,
        restrictions::restrictions_handler,
        users::users_handler,
    },
    middleware::{auth, rate_limit},
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest(
            "/auth",
            auth_handler().layer(middleware::from_fn(rate_limit)),
        )
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/categories",
            categories_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/items", items_handler().layer(middleware::from_fn(auth)))
        .nest("/points", points_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/restrictions",
            restrictions_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/notifications",
            notifications_handler().layer(middleware::from_fn(auth)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state.clone()));

    Router::new()
        .route("/health", get(health_check))
        .nest_service("/uploads", ServeDir::new(&app_state.env.uploads_dir))
        .nest("/api", api_route)
}
