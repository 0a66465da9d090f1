//! Objective Entity
//!
//! Root of the tree: a user-owned goal made of key results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{Node, NodeKind};
use super::key_result::KeyResult;
use super::progress::mean_percent;
use super::schedule::Schedule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub id: String,
    /// Owning user; every read and write is scoped by it
    #[serde(alias = "userId")]
    pub owner_id: String,
    pub title: String,
    /// Derived from key result progress (0-100)
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub order: i64,
}

impl Objective {
    pub fn new(id: String, owner_id: String, title: String, schedule: Schedule, order: i64) -> Self {
        Self {
            id,
            owner_id,
            title,
            progress: 0,
            key_results: Vec::new(),
            is_open: false,
            start_date: schedule.start_date,
            due_date: schedule.due_date,
            order,
        }
    }

    /// Recompute key results first, then this objective's mean
    pub fn recompute_progress(&mut self) -> u8 {
        for kr in &mut self.key_results {
            kr.recompute_progress();
        }
        self.progress = mean_percent(self.key_results.iter().map(|kr| kr.progress));
        self.progress
    }

    pub fn key_result(&self, id: &str) -> Option<&KeyResult> {
        self.key_results.iter().find(|kr| kr.id == id)
    }

    pub fn is_complete(&self) -> bool {
        self.progress == 100
    }
}

impl Node for Objective {
    const KIND: NodeKind = NodeKind::Objective;

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
    use crate::domain::ActionItem;

    fn key_result(id: &str, done: usize, total: usize) -> KeyResult {
        let mut kr = KeyResult::new(id.into(), id.into(), Schedule::default(), 0);
        kr.action_items = (0..total)
            .map(|i| {
                let mut item = ActionItem::new(format!("{}-{}", id, i), "task".into(), Schedule::default(), i as i64);
                item.is_completed = i < done;
                item
            })
            .collect();
        kr
    }

    #[test]
    fn test_objective_without_key_results_is_zero() {
        let mut objective = Objective::new("o".into(), "u".into(), "Goal".into(), Schedule::default(), 0);
        assert_eq!(objective.recompute_progress(), 0);
    }

    #[test]
    fn test_mixed_key_results_round_up() {
        let mut objective = Objective::new("o".into(), "u".into(), "Goal".into(), Schedule::default(), 0);
        objective.key_results = vec![key_result("a", 2, 2), key_result("b", 1, 4)];
        assert_eq!(objective.recompute_progress(), 63);
        assert_eq!(objective.key_results[0].progress, 100);
        assert_eq!(objective.key_results[1].progress, 25);
    }

    #[test]
    fn test_empty_key_result_counts_as_zero() {
        let mut objective = Objective::new("o".into(), "u".into(), "Goal".into(), Schedule::default(), 0);
        objective.key_results = vec![key_result("a", 2, 2), key_result("b", 0, 0)];
        assert_eq!(objective.recompute_progress(), 50);
    }

    #[test]
    fn test_legacy_user_id_field() {
        let objective: Objective =
            serde_json::from_str(r#"{"id":"o","userId":"u-1","title":"Goal","keyResults":[]}"#).unwrap();
        assert_eq!(objective.owner_id, "u-1");
        assert!(!objective.is_open);
    }
}
