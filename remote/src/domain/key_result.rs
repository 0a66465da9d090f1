//! Key Result Entity
//!
//! Measurable sub-goal of an objective. Owns its action items; progress is
//! derived from their completion.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::action_item::ActionItem;
use super::entity::{Node, NodeKind};
use super::progress::completion_percent;
use super::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    pub id: String,
    pub title: String,
    /// Derived completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    /// Whether action items are expanded in the UI
    #[serde(default)]
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub order: i64,
}

impl KeyResult {
    pub fn new(id: String, title: String, schedule: Schedule, order: i64) -> Self {
        Self {
            id,
            title,
            progress: 0,
            action_items: Vec::new(),
            is_open: false,
            start_date: schedule.start_date,
            due_date: schedule.due_date,
            order,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.action_items.iter().filter(|a| a.is_completed).count()
    }

    /// Recompute progress from action item completion
    pub fn recompute_progress(&mut self) -> u8 {
        self.progress = completion_percent(self.completed_count(), self.action_items.len());
        self.progress
    }

    pub fn action_item(&self, id: &str) -> Option<&ActionItem> {
        self.action_items.iter().find(|a| a.id == id)
    }
}

impl Node for KeyResult {
    const KIND: NodeKind = NodeKind::KeyResult;

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

#[cfg(test)]
mod tests {
    use super::*;

    fn key_result_with(done: usize, total: usize) -> KeyResult {
        let mut kr = KeyResult::new("kr".into(), "KR".into(), Schedule::default(), 0);
        for i in 0..total {
            let mut item = ActionItem::new(format!("ai-{}", i), "task".into(), Schedule::default(), i as i64);
            item.is_completed = i < done;
            kr.action_items.push(item);
        }
        kr
    }

    #[test]
    fn test_progress_empty_is_zero() {
        let mut kr = key_result_with(0, 0);
        assert_eq!(kr.recompute_progress(), 0);
    }

    #[test]
    fn test_progress_ratio() {
        assert_eq!(key_result_with(2, 2).recompute_progress(), 100);
        assert_eq!(key_result_with(1, 4).recompute_progress(), 25);
        assert_eq!(key_result_with(1, 3).recompute_progress(), 33);
        assert_eq!(key_result_with(2, 3).recompute_progress(), 67);
    }

    #[test]
    fn test_stored_progress_is_overwritten() {
        let mut kr = key_result_with(0, 2);
        kr.progress = 90;
        assert_eq!(kr.recompute_progress(), 0);
    }
}
