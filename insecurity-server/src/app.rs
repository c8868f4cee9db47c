use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::state::AppState;

/// Build the application router. Kept separate from `main` so integration
/// tests can drive the same routes against an in-memory database.
pub fn build_router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let uploads_service = ServeDir::new(&state.uploads_dir);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Index page; login and registration are discriminated endpoints
        // rather than one composite form.
        .route("/", get(api::index::index))
        .route("/index", get(api::index::index))
        .route("/auth/login", post(api::index::login))
        .route("/auth/register", post(api::index::register))
        // Pages
        .route(
            "/stream/:username",
            get(api::stream::view_stream).post(api::stream::create_post),
        )
        .route(
            "/comments/:username/:post_id",
            get(api::comments::view_comments).post(api::comments::create_comment),
        )
        .route(
            "/friends/:username",
            get(api::friends::view_friends).post(api::friends::add_friend),
        )
        .route(
            "/profile/:username",
            get(api::profile::view_profile).post(api::profile::update_profile),
        )
        // Post images are served straight from the uploads directory
        .nest_service("/uploads", uploads_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_check() -> &'static str {
    "OK"
}
