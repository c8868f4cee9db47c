use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use insecurity_types::{IndexPage, LoginRequest, RegisterRequest};

use crate::{
    api::ApiResult,
    db::repositories::UserRepository,
    state::AppState,
};

/// Re-render the index page with a flash message.
fn flash(message: &str) -> Response {
    Json(IndexPage {
        flash: Some(message.to_string()),
    })
    .into_response()
}

/// GET / and GET /index - The landing page, before any form submission.
pub async fn index() -> Json<IndexPage> {
    Json(IndexPage { flash: None })
}

/// POST /auth/login - Log a user in.
///
/// A matching username/password pair redirects to that user's stream; an
/// unknown user or wrong password re-renders the index with a flash.
pub async fn login(
    State(state): State<AppState>,
    Form(payload): Form<LoginRequest>,
) -> ApiResult<Response> {
    let repo = UserRepository::new(state.db.pool.clone());

    let user = match repo.get_by_username(&payload.username)? {
        Some(user) => user,
        None => return Ok(flash("Sorry, this user does not exist!")),
    };

    // Plaintext comparison; password hashing is out of scope here.
    if user.password != payload.password {
        return Ok(flash("Sorry, wrong password!"));
    }

    tracing::debug!("User {} logged in", user.username);
    Ok(Redirect::to(&format!("/stream/{}", user.username)).into_response())
}

/// POST /auth/register - Create a new user, then redirect to the index page.
pub async fn register(
    State(state): State<AppState>,
    Form(payload): Form<RegisterRequest>,
) -> ApiResult<Response> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Ok(flash("Username and password are required!"));
    }
    if payload.password != payload.confirm_password {
        return Ok(flash("Sorry, the passwords do not match!"));
    }

    // The insert itself detects a taken username, so two concurrent
    // registrations cannot both pass a separate existence check.
    let repo = UserRepository::new(state.db.pool.clone());
    let created = repo.create(
        &payload.username,
        &payload.first_name,
        &payload.last_name,
        &payload.password,
    )?;
    if created.is_none() {
        return Ok(flash("Sorry, this username is already taken!"));
    }

    tracing::info!("Registered new user {}", payload.username);
    Ok(Redirect::to("/").into_response())
}
