//! Database Connection and Setup
//!
//! Manages the SQLite document database connection and migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handle; `None` until initialized or after close
pub type SharedConnection = Arc<Mutex<Option<Connection>>>;

/// Database state wrapper
#[derive(Clone, Default)]
pub struct DbState {
    conn: SharedConnection,
}

impl DbState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for repositories
    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub async fn is_ready(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Drop the connection; repositories sharing it start failing
    pub async fn close(&self) {
        self.conn.lock().await.take();
    }
}

/// Initialize database at `db_path` (`:memory:` for an in-memory store)
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Internal(format!("Failed to open db {}: {}", db_path.display(), e)))?;

    run_migrations(&conn)?;

    let state = DbState::new();
    *state.conn.lock().await = Some(conn);
    log::info!("Document store ready at {}", db_path.display());

    Ok(state)
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS objectives (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            title TEXT NOT NULL,
            progress INTEGER NOT NULL DEFAULT 0,
            is_open INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0,
            key_results TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER,
            updated_at INTEGER
        )",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    // Schedule columns were added after the first release
    for column in ["start_date", "due_date"] {
        if !column_exists(conn, "objectives", column) {
            conn.execute(&format!("ALTER TABLE objectives ADD COLUMN {} TEXT", column), [])
                .map_err(|e| DomainError::Internal(format!("Failed to add {}: {}", column, e)))?;
        }
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_objectives_owner ON objectives(owner_id, position)",
        [],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert!(column_exists(&conn, "objectives", "due_date"));
        assert!(!column_exists(&conn, "objectives", "missing"));
    }

    #[tokio::test]
    async fn test_close_releases_connection() {
        let state = init_db(Path::new(":memory:")).await.unwrap();
        assert!(state.is_ready().await);
        state.close().await;
        assert!(!state.is_ready().await);
    }
}
