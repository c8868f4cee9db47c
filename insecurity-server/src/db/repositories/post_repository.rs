use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;

use insecurity_types::{Post, StreamPost};

use crate::db::DbPool;

pub struct PostRepository {
    pool: DbPool,
}

impl PostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new post, returning the new row id.
    pub fn create(&self, author_id: i64, content: &str, image: Option<&str>) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO posts (author_id, content, image, created_at) VALUES (?, ?, ?, ?)",
            (author_id, content, image, Utc::now().to_rfc3339()),
        )
        .context("Failed to create post")?;
        Ok(conn.last_insert_rowid())
    }

    /// Get post by ID
    pub fn get_by_id(&self, post_id: i64) -> Result<Option<Post>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, author_id, content, image, created_at FROM posts WHERE id = ?",
        )?;

        let post = stmt
            .query_row([post_id], |row| {
                Ok(Post {
                    id: row.get(0)?,
                    author_id: row.get(1)?,
                    content: row.get(2)?,
                    image: row.get(3)?,
                    created_at: row.get::<_, String>(4)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })
            .optional()?;

        Ok(post)
    }

    /// Get the stream for a user: their own posts plus posts from anyone
    /// they share a friend row with, in either direction, newest first.
    /// Each post carries its author and comment count.
    pub fn get_stream(&self, user_id: i64) -> Result<Vec<StreamPost>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.author_id, u.username, u.first_name, u.last_name,
                    p.content, p.image, p.created_at,
                    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
             FROM posts p
             JOIN users u ON u.id = p.author_id
             WHERE p.author_id = ?1
                OR p.author_id IN (SELECT friend_id FROM friends WHERE user_id = ?1)
                OR p.author_id IN (SELECT user_id FROM friends WHERE friend_id = ?1)
             ORDER BY p.created_at DESC",
        )?;

        let posts = stmt
            .query_map([user_id], |row| {
                Ok(StreamPost {
                    id: row.get(0)?,
                    author_id: row.get(1)?,
                    author_username: row.get(2)?,
                    author_first_name: row.get(3)?,
                    author_last_name: row.get(4)?,
                    content: row.get(5)?,
                    image: row.get(6)?,
                    created_at: row.get::<_, String>(7)?.parse::<DateTime<Utc>>().unwrap(),
                    comment_count: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }
}
