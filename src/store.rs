//! Objective Tree Store
//!
//! Single owner of the in-memory objective tree. Every mutation is
//! synchronous; persistence is queued separately by the session.

use drag_session::{DragSession, DragState, DropEvent};
use okr_remote_lib::domain::{
    move_within, next_order, order_entries, renumber, sort_by_order, validate_title, ActionItem, DomainError,
    DomainResult, KeyResult, Node, NodeKind, NodePatch, Objective, OrderEntry, Schedule, SiblingList,
};

/// Where a node sits: its sibling list and index within it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub list: SiblingList,
    pub index: usize,
}

impl Location {
    pub fn kind(&self) -> NodeKind {
        self.list.kind()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    owner_id: Option<String>,
    objectives: Vec<Objective>,
    drag: DragSession<String>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            ..Default::default()
        }
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    /// Objectives in display order
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn find_objective(&self, id: &str) -> Option<&Objective> {
        self.objectives.iter().find(|o| o.id == id)
    }

    /// Replace the whole tree with fetched documents
    pub fn replace_all(&mut self, owner_id: impl Into<String>, mut objectives: Vec<Objective>) {
        sort_by_order(&mut objectives);
        for objective in &mut objectives {
            sort_by_order(&mut objective.key_results);
            for kr in &mut objective.key_results {
                sort_by_order(&mut kr.action_items);
            }
            objective.recompute_progress();
        }
        self.owner_id = Some(owner_id.into());
        self.objectives = objectives;
        self.drag.cancel();
    }

    /// Drop the tree and the owner (sign-out)
    pub fn clear(&mut self) {
        self.owner_id = None;
        self.objectives.clear();
        self.drag.cancel();
    }

    // ========================
    // Lookup
    // ========================

    pub fn locate(&self, id: &str) -> Option<Location> {
        for (oi, objective) in self.objectives.iter().enumerate() {
            if objective.id == id {
                return Some(Location {
                    list: SiblingList::Objectives,
                    index: oi,
                });
            }
            for (ki, kr) in objective.key_results.iter().enumerate() {
                if kr.id == id {
                    return Some(Location {
                        list: SiblingList::KeyResults {
                            objective_id: objective.id.clone(),
                        },
                        index: ki,
                    });
                }
                if let Some(ai) = kr.action_items.iter().position(|a| a.id == id) {
                    return Some(Location {
                        list: SiblingList::ActionItems {
                            objective_id: objective.id.clone(),
                            key_result_id: kr.id.clone(),
                        },
                        index: ai,
                    });
                }
            }
        }
        None
    }

    pub fn sibling_list_of(&self, id: &str) -> Option<SiblingList> {
        self.locate(id).map(|location| location.list)
    }

    /// Objective document that stores `id` (itself for an objective)
    pub fn owning_objective_id(&self, id: &str) -> Option<String> {
        let location = self.locate(id)?;
        match location.list {
            SiblingList::Objectives => Some(id.to_string()),
            other => other.objective_id().map(str::to_string),
        }
    }

    /// Current `{id, order}` of every node in `list`; empty if the parent is gone
    pub fn order_entries(&self, list: &SiblingList) -> Vec<OrderEntry> {
        match list {
            SiblingList::Objectives => order_entries(&self.objectives),
            SiblingList::KeyResults { objective_id } => self
                .find_objective(objective_id)
                .map(|o| order_entries(&o.key_results))
                .unwrap_or_default(),
            SiblingList::ActionItems {
                objective_id,
                key_result_id,
            } => self
                .find_objective(objective_id)
                .and_then(|o| o.key_result(key_result_id))
                .map(|kr| order_entries(&kr.action_items))
                .unwrap_or_default(),
        }
    }

    fn objective_mut(&mut self, id: &str) -> DomainResult<&mut Objective> {
        self.objectives
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DomainError::not_found(NodeKind::Objective, id))
    }

    fn key_result_mut(&mut self, objective_id: &str, key_result_id: &str) -> DomainResult<&mut KeyResult> {
        self.objective_mut(objective_id)?
            .key_results
            .iter_mut()
            .find(|kr| kr.id == key_result_id)
            .ok_or_else(|| DomainError::not_found(NodeKind::KeyResult, key_result_id))
    }

    fn locate_kind(&self, kind: NodeKind, id: &str) -> DomainResult<Location> {
        self.locate(id)
            .filter(|location| location.kind() == kind)
            .ok_or_else(|| DomainError::not_found(kind, id))
    }

    // ========================
    // Mutations
    // ========================

    pub fn add_objective(&mut self, title: &str, schedule: Schedule) -> DomainResult<String> {
        let title = validate_title(title)?;
        let owner_id = self
            .owner_id
            .clone()
            .ok_or_else(|| DomainError::Validation("no user is signed in".to_string()))?;

        let id = new_id();
        let order = next_order(&self.objectives);
        self.objectives
            .push(Objective::new(id.clone(), owner_id, title, schedule, order));
        Ok(id)
    }

    pub fn add_key_result(&mut self, objective_id: &str, title: &str, schedule: Schedule) -> DomainResult<String> {
        let title = validate_title(title)?;
        let objective = self.objective_mut(objective_id)?;

        let id = new_id();
        let order = next_order(&objective.key_results);
        objective
            .key_results
            .push(KeyResult::new(id.clone(), title, schedule, order));
        objective.recompute_progress();
        Ok(id)
    }

    pub fn add_action_item(
        &mut self,
        objective_id: &str,
        key_result_id: &str,
        title: &str,
        schedule: Schedule,
    ) -> DomainResult<String> {
        let title = validate_title(title)?;
        let kr = self.key_result_mut(objective_id, key_result_id)?;

        let id = new_id();
        let order = next_order(&kr.action_items);
        kr.action_items
            .push(ActionItem::new(id.clone(), title, schedule, order));
        self.objective_mut(objective_id)?.recompute_progress();
        Ok(id)
    }

    pub fn edit_entity(&mut self, kind: NodeKind, id: &str, patch: &NodePatch) -> DomainResult<()> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        let location = self.locate_kind(kind, id)?;
        match &location.list {
            SiblingList::Objectives => self.objective_mut(id)?.apply_patch(patch),
            SiblingList::KeyResults { objective_id } => self.key_result_mut(objective_id, id)?.apply_patch(patch),
            SiblingList::ActionItems {
                objective_id,
                key_result_id,
            } => self
                .key_result_mut(objective_id, key_result_id)?
                .action_items
                .iter_mut()
                .find(|a| a.id == id)
                .ok_or_else(|| DomainError::not_found(kind, id))?
                .apply_patch(patch),
        }
    }

    /// Remove a node with its descendants. Remaining siblings keep their order.
    pub fn delete_entity(&mut self, kind: NodeKind, id: &str) -> DomainResult<()> {
        let location = self.locate_kind(kind, id)?;
        match &location.list {
            SiblingList::Objectives => {
                self.objectives.remove(location.index);
            }
            SiblingList::KeyResults { objective_id } => {
                let objective = self.objective_mut(objective_id)?;
                objective.key_results.remove(location.index);
                objective.recompute_progress();
            }
            SiblingList::ActionItems {
                objective_id,
                key_result_id,
            } => {
                self.key_result_mut(objective_id, key_result_id)?
                    .action_items
                    .remove(location.index);
                self.objective_mut(objective_id)?.recompute_progress();
            }
        }
        Ok(())
    }

    /// Flip completion and recompute the owning key result and objective.
    /// Returns the new completion state.
    pub fn toggle_action_item_completion(&mut self, id: &str) -> DomainResult<bool> {
        let location = self.locate_kind(NodeKind::ActionItem, id)?;
        let SiblingList::ActionItems {
            objective_id,
            key_result_id,
        } = &location.list
        else {
            return Err(DomainError::not_found(NodeKind::ActionItem, id));
        };

        let completed = self
            .key_result_mut(objective_id, key_result_id)?
            .action_items
            .get_mut(location.index)
            .map(ActionItem::toggle)
            .ok_or_else(|| DomainError::not_found(NodeKind::ActionItem, id))?;
        self.objective_mut(objective_id)?.recompute_progress();
        Ok(completed)
    }

    /// Flip the expanded flag. Returns the new state.
    pub fn toggle_open(&mut self, kind: NodeKind, id: &str) -> DomainResult<bool> {
        if kind == NodeKind::ActionItem {
            return Err(DomainError::Validation("action items cannot be expanded".to_string()));
        }
        let location = self.locate_kind(kind, id)?;
        let is_open = match &location.list {
            SiblingList::KeyResults { objective_id } => &mut self.key_result_mut(objective_id, id)?.is_open,
            _ => &mut self.objective_mut(id)?.is_open,
        };
        *is_open = !*is_open;
        Ok(*is_open)
    }

    /// Move `moved_id` to the position `target_id` holds
    pub fn reorder(&mut self, moved_id: &str, target_id: &str) -> bool {
        self.reorder_siblings(moved_id, target_id).is_some()
    }

    /// Like [`reorder`](Self::reorder), returning the renumbered sibling list
    pub fn reorder_siblings(&mut self, moved_id: &str, target_id: &str) -> Option<SiblingList> {
        if moved_id == target_id {
            return None;
        }
        let list = self.sibling_list_of(moved_id)?;
        if self.sibling_list_of(target_id).as_ref() != Some(&list) {
            log::debug!("reorder ignored: {} and {} are not siblings", moved_id, target_id);
            return None;
        }

        let moved = match &list {
            SiblingList::Objectives => move_and_renumber(&mut self.objectives, moved_id, target_id),
            SiblingList::KeyResults { objective_id } => {
                let objective = self.objective_mut(objective_id).ok()?;
                move_and_renumber(&mut objective.key_results, moved_id, target_id)
            }
            SiblingList::ActionItems {
                objective_id,
                key_result_id,
            } => {
                let kr = self.key_result_mut(objective_id, key_result_id).ok()?;
                move_and_renumber(&mut kr.action_items, moved_id, target_id)
            }
        };
        moved.then_some(list)
    }

    /// Recompute every derived progress value, bottom-up
    pub fn recompute_progress(&mut self) {
        for objective in &mut self.objectives {
            objective.recompute_progress();
        }
    }

    // ========================
    // Drag gestures
    // ========================

    pub fn drag_state(&self) -> &DragState<String> {
        self.drag.state()
    }

    pub fn drag_press(&mut self, id: &str, x: i32, y: i32) {
        self.drag.press(id.to_string(), x, y);
    }

    /// Returns true when the motion started the drag
    pub fn drag_motion(&mut self, x: i32, y: i32) -> bool {
        self.drag.pointer_move(x, y)
    }

    pub fn drag_start(&mut self, id: &str) {
        self.drag.start(id.to_string());
    }

    pub fn drag_hover(&mut self, id: &str) {
        self.drag.hover(id.to_string());
    }

    pub fn drag_leave(&mut self) {
        self.drag.leave();
    }

    /// Pointer released; commits a drop over the current target
    pub fn drag_release(&mut self) -> Option<SiblingList> {
        let event = self.drag.release()?;
        self.commit_drop(event)
    }

    /// Drop reported by a gesture source
    pub fn drag_end(&mut self, active: &str, over: Option<&str>) -> Option<SiblingList> {
        let event = self
            .drag
            .drop_on(active.to_string(), over.map(str::to_string))?;
        self.commit_drop(event)
    }

    fn commit_drop(&mut self, event: DropEvent<String>) -> Option<SiblingList> {
        let list = self.reorder_siblings(&event.active, &event.over);
        self.drag.finish();
        list
    }
}

fn move_and_renumber<N: Node>(list: &mut Vec<N>, moved_id: &str, target_id: &str) -> bool {
    let from = list.iter().position(|n| n.id() == moved_id);
    let to = list.iter().position(|n| n.id() == target_id);
    match (from, to) {
        (Some(from), Some(to)) => {
            move_within(list, from, to);
            renumber(list);
            true
        }
        _ => false,
    }
}
