use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};

use insecurity_types::{StreamPage, User};

use crate::{
    api::{ApiError, ApiResult},
    db::repositories::{PostRepository, UserRepository},
    state::AppState,
    uploads,
};

fn get_user(state: &AppState, username: &str) -> Result<User, ApiError> {
    UserRepository::new(state.db.pool.clone())
        .get_by_username(username)?
        .ok_or_else(|| ApiError::NotFound(format!("User '{}' not found", username)))
}

/// GET /stream/:username - The user's combined friend+self stream.
pub async fn view_stream(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<StreamPage>> {
    let user = get_user(&state, &username)?;

    let posts = PostRepository::new(state.db.pool.clone()).get_stream(user.id)?;

    Ok(Json(StreamPage {
        username,
        posts,
        flash: None,
    }))
}

/// POST /stream/:username - Create a post, with an optional image upload,
/// then redirect back to the stream.
///
/// The body is multipart: a `content` text field and an optional `image`
/// file field. An image with a disallowed extension re-renders the stream
/// with a flash instead of storing anything.
pub async fn create_post(
    State(state): State<AppState>,
    Path(username): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let user = get_user(&state, &username)?;

    let mut content = String::new();
    let mut image: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        // `text()`/`bytes()` consume the field, so take the name first.
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("content") => {
                content = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid content field: {}", e)))?;
            }
            Some("image") => {
                // An empty filename means the file input was left blank.
                let filename = match field.file_name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Invalid image field: {}", e)))?;
                if data.is_empty() {
                    continue;
                }

                let extension = match uploads::allowed_extension(&filename) {
                    Some(ext) => ext,
                    None => {
                        let posts =
                            PostRepository::new(state.db.pool.clone()).get_stream(user.id)?;
                        return Ok(Json(StreamPage {
                            username,
                            posts,
                            flash: Some("Sorry, that file type is not allowed!".to_string()),
                        })
                        .into_response());
                    }
                };

                image = Some(uploads::store_image(&state.uploads_dir, &extension, &data).await?);
            }
            _ => {}
        }
    }

    PostRepository::new(state.db.pool.clone()).create(user.id, &content, image.as_deref())?;
    tracing::debug!("User {} posted to their stream", username);

    Ok(Redirect::to(&format!("/stream/{}", username)).into_response())
}
