use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use insecurity_types::{AddFriendRequest, FriendsPage, User};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{FriendRepository, UserRepository},
    state::AppState,
};

fn get_user(state: &AppState, username: &str) -> Result<User, ApiError> {
    UserRepository::new(state.db.pool.clone())
        .get_by_username(username)?
        .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", username)))
}

/// Re-render the friends page with a flash message.
fn flash(state: &AppState, user: &User, message: &str) -> Result<Response, ApiError> {
    let friends = FriendRepository::new(state.db.pool.clone()).list_friends(user.id)?;
    Ok(Json(FriendsPage {
        username: user.username.clone(),
        friends,
        flash: Some(message.to_string()),
    })
    .into_response())
}

/// GET /friends/:username - The user's friends. The list is symmetric: it
/// shows everyone whose posts appear in the user's stream.
pub async fn view_friends(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<FriendsPage>> {
    let user = get_user(&state, &username)?;

    let friends = FriendRepository::new(state.db.pool.clone()).list_friends(user.id)?;

    Ok(Json(FriendsPage {
        username,
        friends,
        flash: None,
    }))
}

/// POST /friends/:username - Add a friend by username, then redirect back.
///
/// An unknown friend or a self-add re-renders the page with a flash and
/// stores nothing.
pub async fn add_friend(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Form(payload): Form<AddFriendRequest>,
) -> ApiResult<Response> {
    let user = get_user(&state, &username)?;

    let friend = match UserRepository::new(state.db.pool.clone())
        .get_by_username(&payload.username)?
    {
        Some(friend) => friend,
        None => return flash(&state, &user, "User does not exist"),
    };

    if friend.id == user.id {
        return flash(&state, &user, "You cannot be friends with yourself");
    }

    FriendRepository::new(state.db.pool.clone()).add(user.id, friend.id)?;
    tracing::debug!("{} added {} as a friend", user.username, friend.username);

    Ok(Redirect::to(&format!("/friends/{}", username)).into_response())
}
