use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use super::schema::SCHEMA;

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

/// Counter so each in-memory database gets its own shared-cache name.
static MEMORY_DB_SEQ: AtomicU64 = AtomicU64::new(0);

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = Self::create_connection_manager(path)?;
        let pool = Pool::new(manager).context("Failed to create database connection pool")?;
        Ok(Self { pool })
    }

    /// Create appropriate connection manager based on path
    ///
    /// # Arguments
    /// * `path` - Database file path or ":memory:" for an in-memory database
    fn create_connection_manager<P: AsRef<Path>>(path: P) -> Result<SqliteConnectionManager> {
        let path_str = path.as_ref().to_string_lossy();
        let trimmed_path = path_str.trim();

        if trimmed_path.eq_ignore_ascii_case(MEMORY_DB_PATH) {
            // Every pooled connection must see the same data, so a named
            // shared-cache URI is used instead of one anonymous :memory:
            // database per connection.
            let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
            let uri = format!("file:insecurity_mem_{}?mode=memory&cache=shared", seq);
            Ok(SqliteConnectionManager::file(uri).with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            ))
        } else {
            Ok(SqliteConnectionManager::file(path))
        }
    }

    /// Create an in-memory database pool (useful for testing)
    pub fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DB_PATH)
    }

    /// Initialize the database schema. Safe to run on every startup; the
    /// schema script only creates what is missing.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .context("Failed to get database connection from pool")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_creation() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");

        // Verify tables exist
        let conn = db.connection().expect("Failed to get connection");
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .expect("Failed to prepare statement");

        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .expect("Failed to query tables")
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to collect tables");

        assert!(tables.contains(&"users".to_string()));
        assert!(tables.contains(&"posts".to_string()));
        assert!(tables.contains(&"comments".to_string()));
        assert!(tables.contains(&"friends".to_string()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");
        db.initialize().expect("Second initialize should succeed");
    }

    #[test]
    fn test_memory_databases_are_isolated() {
        let db1 = Database::in_memory().expect("Failed to create database");
        db1.initialize().expect("Failed to initialize schema");
        let db2 = Database::in_memory().expect("Failed to create second database");
        db2.initialize().expect("Failed to initialize second schema");

        db1.connection()
            .unwrap()
            .execute(
                "INSERT INTO users (username, first_name, last_name, password) VALUES (?, ?, ?, ?)",
                ["solo", "Solo", "User", "pw"],
            )
            .expect("Failed to insert user");

        let count: i64 = db2
            .connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .expect("Failed to count users");
        assert_eq!(count, 0, "Second memory database should not see first");
    }

    #[test]
    fn test_memory_database_shared_across_pool() {
        let db = Database::in_memory().expect("Failed to create database");
        db.initialize().expect("Failed to initialize schema");

        // Two simultaneous checkouts are distinct connections; both must see
        // the same database.
        let conn_a = db.connection().expect("Failed to get first connection");
        let conn_b = db.connection().expect("Failed to get second connection");

        conn_a
            .execute(
                "INSERT INTO users (username, first_name, last_name, password) VALUES (?, ?, ?, ?)",
                ["shared", "Shared", "User", "pw"],
            )
            .expect("Failed to insert user");

        let count: i64 = conn_b
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .expect("Failed to count users");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_file_database_detection() {
        let temp_path = std::env::temp_dir().join("test_insecurity.db");
        let db = Database::new(&temp_path).expect("Failed to create file database");
        db.initialize().expect("Failed to initialize file schema");
        assert!(temp_path.exists());

        // Cleanup
        drop(db);
        let _ = std::fs::remove_file(&temp_path);
    }
}
