use anyhow::{Context, Result};
use chrono::Utc;

use insecurity_types::FriendView;

use crate::db::DbPool;

pub struct FriendRepository {
    pool: DbPool,
}

impl FriendRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record a friendship between two users. The row is a directed edge but
    /// every consumer treats it as symmetric; re-adding is a no-op.
    pub fn add(&self, user_id: i64, friend_id: i64) -> Result<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR IGNORE INTO friends (user_id, friend_id, created_at) VALUES (?, ?, ?)",
            (user_id, friend_id, Utc::now().to_rfc3339()),
        )
        .context("Failed to add friend")?;
        Ok(())
    }

    /// Check whether two users share a friend row in either direction.
    pub fn are_friends(&self, a: i64, b: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM friends
             WHERE (user_id = ?1 AND friend_id = ?2)
                OR (user_id = ?2 AND friend_id = ?1)",
            (a, b),
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Everyone the user shares a friend row with, in either direction,
    /// matching the visibility rule the stream uses. Self is excluded.
    pub fn list_friends(&self, user_id: i64) -> Result<Vec<FriendView>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.first_name, u.last_name
             FROM users u
             WHERE u.id IN (SELECT friend_id FROM friends WHERE user_id = ?1
                            UNION
                            SELECT user_id FROM friends WHERE friend_id = ?1)
               AND u.id != ?1
             ORDER BY u.username",
        )?;

        let friends = stmt
            .query_map([user_id], |row| {
                Ok(FriendView {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(friends)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::UserRepository;
    use crate::db::Database;

    fn setup_test_db() -> (Database, FriendRepository) {
        let db = Database::in_memory().expect("Failed to create test database");
        db.initialize().expect("Failed to initialize schema");
        let pool = db.pool.clone();
        let repo = FriendRepository::new(pool);
        (db, repo)
    }

    fn make_user(db: &Database, username: &str) -> i64 {
        UserRepository::new(db.pool.clone())
            .create(username, "Test", "User", "pw")
            .expect("Failed to create user")
            .expect("Username should be free")
    }

    #[test]
    fn test_friend_list_is_symmetric() {
        let (db, repo) = setup_test_db();
        let alice = make_user(&db, "alice");
        let bob = make_user(&db, "bob");

        // Single directed row, visible from both sides
        repo.add(alice, bob).unwrap();

        let alices = repo.list_friends(alice).unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].username, "bob");

        let bobs = repo.list_friends(bob).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].username, "alice");

        assert!(repo.are_friends(alice, bob).unwrap());
        assert!(repo.are_friends(bob, alice).unwrap());
    }

    #[test]
    fn test_re_adding_friend_is_noop() {
        let (db, repo) = setup_test_db();
        let alice = make_user(&db, "alice");
        let bob = make_user(&db, "bob");

        repo.add(alice, bob).unwrap();
        repo.add(alice, bob).unwrap();

        assert_eq!(repo.list_friends(alice).unwrap().len(), 1);
    }

    #[test]
    fn test_reverse_edge_does_not_duplicate_listing() {
        let (db, repo) = setup_test_db();
        let alice = make_user(&db, "alice");
        let bob = make_user(&db, "bob");

        repo.add(alice, bob).unwrap();
        repo.add(bob, alice).unwrap();

        // Both directions stored, still one friend each
        assert_eq!(repo.list_friends(alice).unwrap().len(), 1);
        assert_eq!(repo.list_friends(bob).unwrap().len(), 1);
    }

    #[test]
    fn test_strangers_are_not_friends() {
        let (db, repo) = setup_test_db();
        let alice = make_user(&db, "alice");
        let bob = make_user(&db, "bob");

        assert!(!repo.are_friends(alice, bob).unwrap());
        assert!(repo.list_friends(alice).unwrap().is_empty());
    }
}
