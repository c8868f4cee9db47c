use axum::{
    extract::{Path, State},
    response::Redirect,
    Form, Json,
};

use insecurity_types::{CommentsPage, CreateCommentRequest};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{CommentRepository, PostRepository, UserRepository},
    state::AppState,
};

/// GET /comments/:username/:post_id - A post and its comments, newest first.
pub async fn view_comments(
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, i64)>,
) -> ApiResult<Json<CommentsPage>> {
    let post = PostRepository::new(state.db.pool.clone())
        .get_by_id(post_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Post {} not found", post_id)))?;

    let comments = CommentRepository::new(state.db.pool.clone()).list_for_post(post_id)?;

    Ok(Json(CommentsPage {
        username,
        post,
        comments,
    }))
}

/// POST /comments/:username/:post_id - Add a comment as the named user,
/// then redirect back to the comments page.
pub async fn create_comment(
    State(state): State<AppState>,
    Path((username, post_id)): Path<(String, i64)>,
    Form(payload): Form<CreateCommentRequest>,
) -> ApiResult<Redirect> {
    let user = UserRepository::new(state.db.pool.clone())
        .get_by_username(&username)?
        .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", username)))?;

    PostRepository::new(state.db.pool.clone())
        .get_by_id(post_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Post {} not found", post_id)))?;

    CommentRepository::new(state.db.pool.clone()).create(post_id, user.id, &payload.content)?;

    Ok(Redirect::to(&format!("/comments/{}/{}", username, post_id)))
}
