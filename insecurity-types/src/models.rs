use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored and compared as plaintext. Never serialized into page payloads.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub education: Option<String>,
    pub employment: Option<String>,
    pub music: Option<String>,
    pub movie: Option<String>,
    pub nationality: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    /// Stored filename under the uploads directory, if the post had an image.
    pub image: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// A post as it appears on the stream page: joined with its author and
/// carrying the comment count shown next to the "Comments" link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamPost {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub content: String,
    pub image: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    pub comment_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendView {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Profile fields a user may edit, already validated by the handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub education: String,
    pub employment: String,
    pub music: String,
    pub movie: String,
    pub nationality: String,
    pub birthday: Option<NaiveDate>,
}

// Request types for API (form-encoded bodies)

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddFriendRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub employment: String,
    #[serde(default)]
    pub music: String,
    #[serde(default)]
    pub movie: String,
    #[serde(default)]
    pub nationality: String,
    /// "YYYY-MM-DD", or empty when the field was left blank.
    #[serde(default)]
    pub birthday: String,
}

// Page payloads: the data the HTML template for each page would receive.
// A `flash` field carries the one-shot message the original app flashed
// before re-rendering.

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexPage {
    pub flash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreamPage {
    pub username: String,
    pub posts: Vec<StreamPost>,
    pub flash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentsPage {
    pub username: String,
    pub post: Post,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FriendsPage {
    pub username: String,
    pub friends: Vec<FriendView>,
    pub flash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilePage {
    pub username: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
