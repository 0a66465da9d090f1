//! Domain Layer
//!
//! Contains the objective tree entities and core abstractions.
//! This layer has no storage dependencies.

mod action_item;
mod entity;
mod key_result;
mod objective;
mod progress;
mod schedule;
mod sibling;

pub use action_item::ActionItem;
pub use entity::{validate_title, DomainError, DomainResult, Node, NodeKind, NodePatch};
pub use key_result::KeyResult;
pub use objective::Objective;
pub use progress::{completion_percent, mean_percent};
pub use schedule::Schedule;
pub use sibling::{move_within, next_order, order_entries, renumber, sort_by_order, OrderEntry, SiblingList};
