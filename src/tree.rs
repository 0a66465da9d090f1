//! Tree Utilities
//!
//! Flattens the objective tree into indented display rows.

use chrono::NaiveDate;
use okr_remote_lib::domain::{Node, NodeKind, Objective};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    /// Derived percentage of an objective or key result
    Progress(u8),
    /// Completion of an action item
    Done(bool),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: NodeKind,
    pub id: String,
    pub title: String,
    pub depth: usize,
    pub status: RowStatus,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

impl Row {
    fn of<N: Node>(node: &N, depth: usize, status: RowStatus) -> Self {
        Self {
            kind: N::KIND,
            id: node.id().to_string(),
            title: node.title().to_string(),
            depth,
            status,
            start_date: node.start_date(),
            due_date: node.due_date(),
        }
    }
}

/// Rows in display order. Children of collapsed nodes are skipped.
pub fn visible_rows(objectives: &[Objective]) -> Vec<Row> {
    let mut rows = Vec::new();
    for objective in objectives {
        rows.push(Row::of(objective, 0, RowStatus::Progress(objective.progress)));
        if !objective.is_open {
            continue;
        }
        for kr in &objective.key_results {
            rows.push(Row::of(kr, 1, RowStatus::Progress(kr.progress)));
            if !kr.is_open {
                continue;
            }
            rows.extend(
                kr.action_items
                    .iter()
                    .map(|item| Row::of(item, 2, RowStatus::Done(item.is_completed))),
            );
        }
    }
    rows
}
