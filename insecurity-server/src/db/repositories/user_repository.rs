use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row};

use insecurity_types::{ProfileUpdate, User};

use crate::db::DbPool;

const USER_COLUMNS: &str = "id, username, first_name, last_name, password, \
     education, employment, music, movie, nationality, birthday";

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            first_name: row.get(2)?,
            last_name: row.get(3)?,
            password: row.get(4)?,
            education: row.get(5)?,
            employment: row.get(6)?,
            music: row.get(7)?,
            movie: row.get(8)?,
            nationality: row.get(9)?,
            birthday: row
                .get::<_, Option<String>>(10)?
                .map(|s| s.parse::<NaiveDate>().unwrap()),
        })
    }

    /// Create a new user, returning the new row id, or `None` when the
    /// username is already taken. A single `INSERT OR IGNORE` so that two
    /// concurrent registrations cannot race a separate existence check.
    pub fn create(
        &self,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Option<i64>> {
        let conn = self.pool.get()?;
        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO users (username, first_name, last_name, password) \
                 VALUES (?, ?, ?, ?)",
                [username, first_name, last_name, password],
            )
            .context("Failed to create user")?;
        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(conn.last_insert_rowid()))
    }

    /// Get user by username
    pub fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))?;

        let user = stmt
            .query_row([username], Self::user_from_row)
            .optional()?;

        Ok(user)
    }

    /// Get user by ID
    pub fn get_by_id(&self, user_id: i64) -> Result<Option<User>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))?;

        let user = stmt.query_row([user_id], Self::user_from_row).optional()?;

        Ok(user)
    }

    /// Update the editable profile fields of a user
    pub fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE users SET education = ?, employment = ?, music = ?, movie = ?, \
             nationality = ?, birthday = ? WHERE id = ?",
            (
                &update.education,
                &update.employment,
                &update.music,
                &update.movie,
                &update.nationality,
                update.birthday.map(|d| d.to_string()),
                user_id,
            ),
        )
        .context("Failed to update user profile")?;
        Ok(())
    }
}
