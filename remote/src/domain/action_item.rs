//! Action Item Entity
//!
//! Leaf of the objective tree: a single completable task.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{Node, NodeKind};
use super::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// Client-generated unique identifier
    pub id: String,
    pub title: String,
    /// Completion status
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Position within sibling action items
    #[serde(default)]
    pub order: i64,
}

impl ActionItem {
    pub fn new(id: String, title: String, schedule: Schedule, order: i64) -> Self {
        Self {
            id,
            title,
            is_completed: false,
            start_date: schedule.start_date,
            due_date: schedule.due_date,
            order,
        }
    }

    /// Flip completion, returning the new state
    pub fn toggle(&mut self) -> bool {
        self.is_completed = !self.is_completed;
        self.is_completed
    }
}

impl Node for ActionItem {
    const KIND: NodeKind = NodeKind::ActionItem;

    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn set_title(&mut self, title: String) {
        self.title = title;
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn set_start_date(&mut self, date: Option<NaiveDate>) {
        self.start_date = date;
    }

    fn set_due_date(&mut self, date: Option<NaiveDate>) {
        self.due_date = date;
    }
}
