//! Repository Layer - Core Traits
//!
//! Defines the document store contract the client persists through.
//! Key results and action items are not stored on their own: they live as one
//! nested array field on the owning objective document.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DomainResult, KeyResult, Objective, OrderEntry, SiblingList};

/// Partial update of an objective document. Only `Some` fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectivePatch {
    pub title: Option<String>,
    pub progress: Option<u8>,
    pub is_open: Option<bool>,
    pub start_date: Option<Option<NaiveDate>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub order: Option<i64>,
    /// Replaces the whole nested array
    pub key_results: Option<Vec<KeyResult>>,
}

impl ObjectivePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Title and dates of an objective after a user edit
    pub fn header_of(objective: &Objective) -> Self {
        Self {
            title: Some(objective.title.clone()),
            start_date: Some(objective.start_date),
            due_date: Some(objective.due_date),
            ..Default::default()
        }
    }

    /// Rewrite of the nested key results together with the derived progress
    pub fn key_results_of(objective: &Objective) -> Self {
        Self {
            progress: Some(objective.progress),
            key_results: Some(objective.key_results.clone()),
            ..Default::default()
        }
    }

    pub fn open_state(is_open: bool) -> Self {
        Self {
            is_open: Some(is_open),
            ..Default::default()
        }
    }
}

/// Document store for objective trees
///
/// All operations are async to support hosted backends.
#[async_trait]
pub trait ObjectiveRepository: Send + Sync {
    /// Objectives owned by `owner_id`, sorted by order ascending
    async fn list_objectives(&self, owner_id: &str) -> DomainResult<Vec<Objective>>;

    /// Write a whole objective document, returning its id
    async fn create_objective(&self, objective: &Objective) -> DomainResult<String>;

    async fn delete_objective(&self, id: &str) -> DomainResult<()>;

    async fn update_objective(&self, id: &str, patch: &ObjectivePatch) -> DomainResult<()>;

    /// Apply every entry of one sibling list atomically
    async fn batch_update_order(&self, list: &SiblingList, entries: &[OrderEntry]) -> DomainResult<()>;
}
