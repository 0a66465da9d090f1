//! Sibling Positioning
//!
//! Identifies one sibling list in the tree and manages `order` values within
//! it: next position on append, array-move on drop, sequential reindex.

use serde::{Deserialize, Serialize};

use super::entity::{Node, NodeKind};

/// One list of siblings: all objectives, the key results of one objective, or
/// the action items of one key result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SiblingList {
    Objectives,
    KeyResults {
        objective_id: String,
    },
    ActionItems {
        objective_id: String,
        key_result_id: String,
    },
}

impl SiblingList {
    /// Kind of node held by this list
    pub fn kind(&self) -> NodeKind {
        match self {
            SiblingList::Objectives => NodeKind::Objective,
            SiblingList::KeyResults { .. } => NodeKind::KeyResult,
            SiblingList::ActionItems { .. } => NodeKind::ActionItem,
        }
    }

    /// Objective document that stores this list, if it is nested
    pub fn objective_id(&self) -> Option<&str> {
        match self {
            SiblingList::Objectives => None,
            SiblingList::KeyResults { objective_id } | SiblingList::ActionItems { objective_id, .. } => {
                Some(objective_id.as_str())
            }
        }
    }
}

/// New `order` for one node in a batched order sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub id: String,
    pub order: i64,
}

/// Next order for an appended sibling: one past the largest in use.
/// Equals the sibling count while there are no gaps.
pub fn next_order<N: Node>(siblings: &[N]) -> i64 {
    siblings.iter().map(N::order).max().map_or(0, |max| max + 1)
}

/// Reindex siblings to be sequential (0, 1, 2, ...) in their current order
pub fn renumber<N: Node>(siblings: &mut [N]) {
    for (position, node) in siblings.iter_mut().enumerate() {
        node.set_order(position as i64);
    }
}

/// Stable sort by `order`; ties keep their incoming sequence
pub fn sort_by_order<N: Node>(siblings: &mut [N]) {
    siblings.sort_by_key(N::order);
}

/// Remove the element at `from` and insert it at `to` (array move, not swap)
pub fn move_within<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= list.len() || to >= list.len() {
        return;
    }
    let moved = list.remove(from);
    list.insert(to, moved);
}

pub fn order_entries<N: Node>(siblings: &[N]) -> Vec<OrderEntry> {
    siblings
        .iter()
        .map(|node| OrderEntry {
            id: node.id().to_string(),
            order: node.order(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionItem, Schedule};

    fn items(orders: &[i64]) -> Vec<ActionItem> {
        orders
            .iter()
            .enumerate()
            .map(|(i, order)| ActionItem::new(format!("ai-{}", i), format!("Item {}", i), Schedule::default(), *order))
            .collect()
    }

    fn ids(list: &[ActionItem]) -> Vec<&str> {
        list.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_next_order_empty() {
        assert_eq!(next_order::<ActionItem>(&[]), 0);
    }

    #[test]
    fn test_next_order_skips_gaps() {
        assert_eq!(next_order(&items(&[0, 1, 2])), 3);
        // after deleting the first of three
        assert_eq!(next_order(&items(&[1, 2])), 3);
    }

    #[test]
    fn test_move_forward_is_positional() {
        let mut list = items(&[0, 1, 2, 3]);
        move_within(&mut list, 0, 2);
        assert_eq!(ids(&list), vec!["ai-1", "ai-2", "ai-0", "ai-3"]);
    }

    #[test]
    fn test_move_backward() {
        let mut list = items(&[0, 1, 2, 3]);
        move_within(&mut list, 3, 1);
        assert_eq!(ids(&list), vec!["ai-0", "ai-3", "ai-1", "ai-2"]);
    }

    #[test]
    fn test_move_out_of_range_is_noop() {
        let mut list = items(&[0, 1]);
        move_within(&mut list, 0, 5);
        assert_eq!(ids(&list), vec!["ai-0", "ai-1"]);
    }

    #[test]
    fn test_renumber_and_entries() {
        let mut list = items(&[4, 9, 12]);
        renumber(&mut list);
        let entries = order_entries(&list);
        assert_eq!(entries.iter().map(|e| e.order).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(entries[2].id, "ai-2");
    }

    #[test]
    fn test_sort_by_order() {
        let mut list = items(&[2, 0, 1]);
        sort_by_order(&mut list);
        assert_eq!(ids(&list), vec!["ai-1", "ai-2", "ai-0"]);
    }

    #[test]
    fn test_sibling_list_kind() {
        let list = SiblingList::ActionItems {
            objective_id: "o".into(),
            key_result_id: "k".into(),
        };
        assert_eq!(list.kind(), NodeKind::ActionItem);
        assert_eq!(list.objective_id(), Some("o"));
        assert_eq!(SiblingList::Objectives.objective_id(), None);
    }
}
