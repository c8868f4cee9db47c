use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};
use chrono::NaiveDate;

use insecurity_types::{ProfilePage, ProfileUpdate, UpdateProfileRequest};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::UserRepository,
    state::AppState,
};

/// GET /profile/:username - The user's profile fields. The password is never
/// part of the payload.
pub async fn view_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfilePage>> {
    let user = UserRepository::new(state.db.pool.clone())
        .get_by_username(&username)?
        .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", username)))?;

    Ok(Json(ProfilePage { username, user }))
}

/// POST /profile/:username - Update the six editable profile fields, then
/// redirect back to the profile page.
pub async fn update_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Form(payload): Form<UpdateProfileRequest>,
) -> ApiResult<Redirect> {
    let repo = UserRepository::new(state.db.pool.clone());
    let user = repo
        .get_by_username(&username)?
        .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", username)))?;

    // A blank birthday clears the field; anything else must parse.
    let birthday = if payload.birthday.trim().is_empty() {
        None
    } else {
        Some(
            NaiveDate::parse_from_str(payload.birthday.trim(), "%Y-%m-%d").map_err(|_| {
                ApiError::BadRequest(format!("Invalid birthday '{}'", payload.birthday))
            })?,
        )
    };

    let update = ProfileUpdate {
        education: payload.education,
        employment: payload.employment,
        music: payload.music,
        movie: payload.movie,
        nationality: payload.nationality,
        birthday,
    };
    repo.update_profile(user.id, &update)?;

    Ok(Redirect::to(&format!("/profile/{}", username)))
}
