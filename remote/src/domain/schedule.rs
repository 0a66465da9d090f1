//! Optional start/due dates carried by every node.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

impl Schedule {
    pub fn new(start_date: Option<NaiveDate>, due_date: Option<NaiveDate>) -> Self {
        Self { start_date, due_date }
    }

    pub fn due(due_date: NaiveDate) -> Self {
        Self {
            start_date: None,
            due_date: Some(due_date),
        }
    }
}
