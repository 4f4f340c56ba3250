/// Database connection management with connection pooling
///
/// Provides a thread-safe connection pool to the SQLite glossary file.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Maximum number of database connections in the pool
const MAX_CONNECTIONS: u32 = 5;

const SCHEMA: &str = include_str!("../../database/schema.sql");

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Open (or create) the glossary database
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(Database)` - Successfully created database instance
    /// * `Err(GlossError)` - If connection fails
    ///
    /// # Examples
    /// ```no_run
    /// use gloss_lib::db::Database;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::new("/tmp/glossary.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
        };

        db.initialize_schema().await?;
        debug!(path = %db_path.display(), "glossary database ready");

        Ok(db)
    }

    /// Create a test database in memory
    ///
    /// Every in-memory connection is its own database, so the pool is
    /// pinned to a single connection.
    #[cfg(test)]
    pub async fn new_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self {
            pool: Arc::new(pool),
        };

        db.initialize_schema().await?;

        Ok(db)
    }

    /// Create all tables and indexes if they don't exist
    async fn initialize_schema(&self) -> Result<()> {
        for statement in schema_statements(SCHEMA) {
            sqlx::query(&statement).execute(self.pool.as_ref()).await?;
        }

        Ok(())
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Split the schema into single statements
///
/// SQLite won't run several statements in one execute call. Comment lines
/// go first so a stray `;` in prose can't cut a statement in half.
fn schema_statements(schema: &str) -> Vec<String> {
    let code: String = schema
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    code.split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_creation() {
        let db = Database::new_test().await;
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_statements_skip_comments() {
        let schema = "-- header; with a semicolon\nCREATE TABLE a (x INT);\n\n  -- note\nCREATE INDEX i ON a(x);\n";
        assert_eq!(
            schema_statements(schema),
            vec!["CREATE TABLE a (x INT)", "CREATE INDEX i ON a(x)"]
        );
    }

    #[tokio::test]
    async fn test_bundled_schema_creates_both_tables() {
        let db = Database::new_test().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('definitions', 'interactions') ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(names, vec!["definitions", "interactions"]);
        assert_eq!(schema_statements(SCHEMA).len(), 5);
    }

    #[tokio::test]
    async fn test_schema_is_reapplied_safely() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("glossary.db");

        let db = Database::new(&path).await.unwrap();
        db.close().await;

        // Opening again runs the schema a second time
        let db = Database::new(&path).await.unwrap();
        assert!(path.exists());
        db.close().await;
    }

    #[tokio::test]
    async fn test_schema_initialization() {
        let db = Database::new_test().await.unwrap();

        let result: std::result::Result<(i64,), sqlx::Error> =
            sqlx::query_as("SELECT COUNT(*) FROM interactions")
                .fetch_one(db.pool())
                .await;

        assert!(result.is_ok());
    }
}
