//! Objective Positioning Operations
//!
//! Batched order updates for one sibling list, applied in a single
//! transaction. Objectives are rows; key results and action items are
//! rewritten inside their owning document.

use rusqlite::{params, Connection};

use crate::domain::{sort_by_order, DomainError, DomainResult, KeyResult, OrderEntry, SiblingList};

use super::objective_repo::{decode_key_results, encode_key_results, read_err, write_err};

/// Apply `entries` to `list`. Any unknown id rolls back the whole batch.
pub(super) fn apply_order(conn: &mut Connection, list: &SiblingList, entries: &[OrderEntry]) -> DomainResult<()> {
    let tx = conn.transaction().map_err(write_err)?;

    match list {
        SiblingList::Objectives => {
            let now = chrono::Utc::now().timestamp_millis();
            for entry in entries {
                let updated = tx
                    .execute(
                        "UPDATE objectives SET position = ?, updated_at = ? WHERE id = ?",
                        params![entry.order, now, entry.id],
                    )
                    .map_err(write_err)?;
                if updated == 0 {
                    return Err(DomainError::NotFound(format!("objective document {}", entry.id)));
                }
            }
        }
        SiblingList::KeyResults { objective_id } => {
            let mut key_results = load_key_results(&tx, objective_id)?;
            for entry in entries {
                let kr = key_results
                    .iter_mut()
                    .find(|kr| kr.id == entry.id)
                    .ok_or_else(|| DomainError::NotFound(format!("key result {}", entry.id)))?;
                kr.order = entry.order;
            }
            sort_by_order(&mut key_results);
            store_key_results(&tx, objective_id, &key_results)?;
        }
        SiblingList::ActionItems { objective_id, key_result_id } => {
            let mut key_results = load_key_results(&tx, objective_id)?;
            let kr = key_results
                .iter_mut()
                .find(|kr| kr.id == *key_result_id)
                .ok_or_else(|| DomainError::NotFound(format!("key result {}", key_result_id)))?;
            for entry in entries {
                let item = kr
                    .action_items
                    .iter_mut()
                    .find(|a| a.id == entry.id)
                    .ok_or_else(|| DomainError::NotFound(format!("action item {}", entry.id)))?;
                item.order = entry.order;
            }
            sort_by_order(&mut kr.action_items);
            store_key_results(&tx, objective_id, &key_results)?;
        }
    }

    tx.commit().map_err(write_err)
}

fn load_key_results(conn: &Connection, objective_id: &str) -> DomainResult<Vec<KeyResult>> {
    let json: String = conn
        .query_row(
            "SELECT key_results FROM objectives WHERE id = ?",
            params![objective_id],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DomainError::NotFound(format!("objective document {}", objective_id))
            }
            other => read_err(other),
        })?;

    decode_key_results(&json).map_err(read_err)
}

fn store_key_results(conn: &Connection, objective_id: &str, key_results: &[KeyResult]) -> DomainResult<()> {
    conn.execute(
        "UPDATE objectives SET key_results = ?, updated_at = ? WHERE id = ?",
        params![
            encode_key_results(key_results)?,
            chrono::Utc::now().timestamp_millis(),
            objective_id
        ],
    )
    .map_err(write_err)?;
    Ok(())
}
