//! Objective Repository - Document CRUD
//!
//! SQLite-backed document store. Each objective is one row; its key results
//! (with their action items) are kept as a JSON array column.
//! Order operations are in objective_positioning.

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, ToSql};

use crate::domain::{DomainError, DomainResult, KeyResult, Objective, OrderEntry, SiblingList};
use crate::repository::db::SharedConnection;
use crate::repository::traits::{ObjectivePatch, ObjectiveRepository};

pub(super) const OBJECTIVE_COLUMNS: &str =
    "id, owner_id, title, progress, is_open, position, key_results, start_date, due_date";

/// SQLite implementation of the objective document store
pub struct SqliteObjectiveRepository {
    pub(super) conn: SharedConnection,
}

impl SqliteObjectiveRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Load one document regardless of owner
    pub async fn find_by_id(&self, id: &str) -> DomainResult<Option<Objective>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized_read)?;

        conn.query_row(
            &format!("SELECT {} FROM objectives WHERE id = ?", OBJECTIVE_COLUMNS),
            params![id],
            row_to_objective,
        )
        .optional()
        .map_err(read_err)
    }
}

#[async_trait]
impl ObjectiveRepository for SqliteObjectiveRepository {
    async fn list_objectives(&self, owner_id: &str) -> DomainResult<Vec<Objective>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized_read)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM objectives WHERE owner_id = ? ORDER BY position ASC, id ASC",
                OBJECTIVE_COLUMNS
            ))
            .map_err(read_err)?;

        let rows = stmt.query_map(params![owner_id], row_to_objective).map_err(read_err)?;

        let mut objectives = Vec::new();
        for row in rows {
            objectives.push(row.map_err(read_err)?);
        }
        Ok(objectives)
    }

    async fn create_objective(&self, objective: &Objective) -> DomainResult<String> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized_write)?;

        let key_results = encode_key_results(&objective.key_results)?;
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO objectives (id, owner_id, title, progress, is_open, position, key_results, start_date, due_date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
             ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                title = excluded.title,
                progress = excluded.progress,
                is_open = excluded.is_open,
                position = excluded.position,
                key_results = excluded.key_results,
                start_date = excluded.start_date,
                due_date = excluded.due_date,
                updated_at = excluded.updated_at",
            params![
                objective.id,
                objective.owner_id,
                objective.title,
                i64::from(objective.progress),
                objective.is_open,
                objective.order,
                key_results,
                objective.start_date,
                objective.due_date,
                now,
            ],
        )
        .map_err(write_err)?;

        Ok(objective.id.clone())
    }

    async fn delete_objective(&self, id: &str) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized_write)?;

        // Nested key results and action items go with the document
        let deleted = conn
            .execute("DELETE FROM objectives WHERE id = ?", params![id])
            .map_err(write_err)?;

        if deleted == 0 {
            return Err(DomainError::NotFound(format!("objective document {}", id)));
        }
        Ok(())
    }

    async fn update_objective(&self, id: &str, patch: &ObjectivePatch) -> DomainResult<()> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql + Send>> = Vec::new();

        if let Some(title) = &patch.title {
            assignments.push("title = ?");
            values.push(Box::new(title.clone()));
        }
        if let Some(progress) = patch.progress {
            assignments.push("progress = ?");
            values.push(Box::new(i64::from(progress)));
        }
        if let Some(is_open) = patch.is_open {
            assignments.push("is_open = ?");
            values.push(Box::new(is_open));
        }
        if let Some(start_date) = patch.start_date {
            assignments.push("start_date = ?");
            values.push(Box::new(start_date));
        }
        if let Some(due_date) = patch.due_date {
            assignments.push("due_date = ?");
            values.push(Box::new(due_date));
        }
        if let Some(order) = patch.order {
            assignments.push("position = ?");
            values.push(Box::new(order));
        }
        if let Some(key_results) = &patch.key_results {
            assignments.push("key_results = ?");
            values.push(Box::new(encode_key_results(key_results)?));
        }
        assignments.push("updated_at = ?");
        values.push(Box::new(chrono::Utc::now().timestamp_millis()));
        values.push(Box::new(id.to_string()));

        let sql = format!("UPDATE objectives SET {} WHERE id = ?", assignments.join(", "));

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized_write)?;

        let params: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref() as &dyn ToSql).collect();

        let updated = conn.execute(&sql, params.as_slice()).map_err(write_err)?;
        if updated == 0 {
            return Err(DomainError::NotFound(format!("objective document {}", id)));
        }
        Ok(())
    }

    async fn batch_update_order(&self, list: &SiblingList, entries: &[OrderEntry]) -> DomainResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized_write)?;

        super::objective_positioning::apply_order(conn, list, entries)
    }
}

/// Convert a database row to Objective
pub(super) fn row_to_objective(row: &rusqlite::Row) -> rusqlite::Result<Objective> {
    let key_results: String = row.get(6)?;
    let key_results = decode_key_results(&key_results)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(Objective {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        progress: row.get::<_, i64>(3)?.clamp(0, 100) as u8,
        is_open: row.get(4)?,
        order: row.get(5)?,
        key_results,
        start_date: row.get(7)?,
        due_date: row.get(8)?,
    })
}

pub(super) fn encode_key_results(key_results: &[KeyResult]) -> DomainResult<String> {
    serde_json::to_string(key_results).map_err(write_err)
}

pub(super) fn decode_key_results(json: &str) -> Result<Vec<KeyResult>, serde_json::Error> {
    serde_json::from_str(json)
}

pub(super) fn read_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::RemoteRead(e.to_string())
}

pub(super) fn write_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::RemoteWrite(e.to_string())
}

fn not_initialized_read() -> DomainError {
    DomainError::RemoteRead("Database not initialized".to_string())
}

pub(super) fn not_initialized_write() -> DomainError {
    DomainError::RemoteWrite("Database not initialized".to_string())
}
