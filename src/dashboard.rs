//! Dashboard figures and due-date labels.

use std::fmt;

use chrono::NaiveDate;
use okr_remote_lib::domain::{mean_percent, Objective};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_objectives: usize,
    /// Rounded mean of objective progress
    pub average_progress: u8,
    pub completed_objectives: usize,
}

impl Summary {
    pub fn of(objectives: &[Objective]) -> Self {
        Self {
            total_objectives: objectives.len(),
            average_progress: mean_percent(objectives.iter().map(|o| o.progress)),
            completed_objectives: objectives.iter().filter(|o| o.is_complete()).count(),
        }
    }

    pub fn band(&self) -> ProgressBand {
        ProgressBand::of(self.average_progress)
    }
}

/// Coarse bucket for colouring a percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Low,
    Medium,
    High,
}

impl ProgressBand {
    pub fn of(percent: u8) -> Self {
        match percent {
            71.. => ProgressBand::High,
            31..=70 => ProgressBand::Medium,
            _ => ProgressBand::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Upcoming,
    Today,
    Overdue,
}

/// Days from today to a due date; positive means still ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DDay {
    days_left: i64,
}

impl DDay {
    pub fn between(due: NaiveDate, today: NaiveDate) -> Self {
        Self {
            days_left: (due - today).num_days(),
        }
    }

    /// Label relative to the local calendar date
    pub fn from_today(due: NaiveDate) -> Self {
        Self::between(due, chrono::Local::now().date_naive())
    }

    pub fn days_left(&self) -> i64 {
        self.days_left
    }

    pub fn urgency(&self) -> Urgency {
        match self.days_left {
            0 => Urgency::Today,
            d if d < 0 => Urgency::Overdue,
            _ => Urgency::Upcoming,
        }
    }
}

impl fmt::Display for DDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.urgency() {
            Urgency::Today => f.write_str("D-Day"),
            Urgency::Overdue => write!(f, "D+{}", -self.days_left),
            Urgency::Upcoming => write!(f, "D-{}", self.days_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okr_remote_lib::domain::Schedule;

    fn objective(progress: u8) -> Objective {
        let mut o = Objective::new("o".into(), "u".into(), "Goal".into(), Schedule::default(), 0);
        o.progress = progress;
        o
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_summary() {
        let summary = Summary::of(&[objective(100), objective(25), objective(0)]);
        assert_eq!(
            summary,
            Summary {
                total_objectives: 3,
                average_progress: 42,
                completed_objectives: 1,
            }
        );
        assert_eq!(summary.band(), ProgressBand::Medium);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(Summary::of(&[]), Summary::default());
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(Summary::of(&[objective(100), objective(25)]).average_progress, 63);
    }

    #[test]
    fn test_bands() {
        assert_eq!(ProgressBand::of(30), ProgressBand::Low);
        assert_eq!(ProgressBand::of(70), ProgressBand::Medium);
        assert_eq!(ProgressBand::of(71), ProgressBand::High);
    }

    #[test]
    fn test_dday_labels() {
        let today = date(10);
        assert_eq!(DDay::between(date(13), today).to_string(), "D-3");
        assert_eq!(DDay::between(date(10), today).to_string(), "D-Day");
        assert_eq!(DDay::between(date(8), today).to_string(), "D+2");
    }

    #[test]
    fn test_urgency() {
        let today = date(10);
        assert_eq!(DDay::between(date(11), today).urgency(), Urgency::Upcoming);
        assert_eq!(DDay::between(date(10), today).urgency(), Urgency::Today);
        assert_eq!(DDay::between(date(1), today).urgency(), Urgency::Overdue);
    }
}
