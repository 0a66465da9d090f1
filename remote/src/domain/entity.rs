//! Domain Layer - Core Node Trait
//!
//! Objectives, key results and action items share one contract so titles,
//! dates and sibling order can be handled without caring which level a node
//! lives on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three levels of the objective tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Objective,
    KeyResult,
    ActionItem,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Objective => "objective",
            NodeKind::KeyResult => "key result",
            NodeKind::ActionItem => "action item",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields a user may edit on any node. `None` leaves a field untouched;
/// `Some(None)` clears a date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub start_date: Option<Option<NaiveDate>>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl NodePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_start_date(mut self, start_date: Option<NaiveDate>) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// Core trait for all tree nodes
pub trait Node: Sized + Send + Sync + Clone {
    /// Level of the tree this node type lives on
    const KIND: NodeKind;

    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn order(&self) -> i64;
    fn start_date(&self) -> Option<NaiveDate>;
    fn due_date(&self) -> Option<NaiveDate>;

    fn set_title(&mut self, title: String);
    fn set_order(&mut self, order: i64);
    fn set_start_date(&mut self, date: Option<NaiveDate>);
    fn set_due_date(&mut self, date: Option<NaiveDate>);

    /// Apply a user edit. The title is validated before anything changes.
    fn apply_patch(&mut self, patch: &NodePatch) -> DomainResult<()> {
        let title = patch.title.as_deref().map(validate_title).transpose()?;
        if let Some(title) = title {
            self.set_title(title);
        }
        if let Some(start) = patch.start_date {
            self.set_start_date(start);
        }
        if let Some(due) = patch.due_date {
            self.set_due_date(due);
        }
        Ok(())
    }
}

/// Reject blank titles; returns the trimmed title
pub fn validate_title(title: &str) -> DomainResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation("title must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),
    #[error("Remote read failed: {0}")]
    RemoteRead(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(kind: NodeKind, id: &str) -> Self {
        DomainError::NotFound(format!("{} {}", kind, id))
    }
}
