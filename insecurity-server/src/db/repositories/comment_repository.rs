use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use insecurity_types::CommentView;

use crate::db::DbPool;

pub struct CommentRepository {
    pool: DbPool,
}

impl CommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Add a comment to a post, returning the new row id.
    pub fn create(&self, post_id: i64, author_id: i64, content: &str) -> Result<i64> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO comments (post_id, author_id, content, created_at) VALUES (?, ?, ?, ?)",
            (post_id, author_id, content, Utc::now().to_rfc3339()),
        )
        .context("Failed to create comment")?;
        Ok(conn.last_insert_rowid())
    }

    /// All comments on a post with their authors, newest first.
    pub fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentView>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT c.id, c.post_id, c.author_id, u.username, u.first_name, u.last_name,
                    c.content, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.author_id
             WHERE c.post_id = ?
             ORDER BY c.created_at DESC",
        )?;

        let comments = stmt
            .query_map([post_id], |row| {
                Ok(CommentView {
                    id: row.get(0)?,
                    post_id: row.get(1)?,
                    author_id: row.get(2)?,
                    author_username: row.get(3)?,
                    author_first_name: row.get(4)?,
                    author_last_name: row.get(5)?,
                    content: row.get(6)?,
                    created_at: row.get::<_, String>(7)?.parse::<DateTime<Utc>>().unwrap(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(comments)
    }
}
