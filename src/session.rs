//! Session
//!
//! Owns the tree store for the signed-in user. Mutations apply locally first
//! and then queue the matching document write; a failed write is logged by
//! the sync worker and never undone here.

use std::sync::Arc;

use drag_session::{DragState, GestureHandler};
use okr_remote_lib::domain::{DomainResult, NodeKind, NodePatch, Schedule, SiblingList};
use okr_remote_lib::repository::{ObjectivePatch, ObjectiveRepository};

use crate::auth::{AuthProvider, User};
use crate::store::TreeStore;
use crate::sync::{RemoteOp, RemoteSync, SyncSnapshot};

pub struct Session {
    auth: Arc<dyn AuthProvider>,
    store: TreeStore,
    sync: RemoteSync,
}

impl Session {
    /// Must be called inside a tokio runtime (starts the sync worker)
    pub fn new(auth: Arc<dyn AuthProvider>, repo: Arc<dyn ObjectiveRepository>) -> Self {
        Self {
            auth,
            store: TreeStore::new(),
            sync: RemoteSync::spawn(repo),
        }
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn sync_stats(&self) -> SyncSnapshot {
        self.sync.stats()
    }

    pub fn current_user(&self) -> Option<User> {
        self.auth.current_user()
    }

    /// Sign in and load the user's objectives
    pub async fn sign_in(&mut self) -> DomainResult<User> {
        let user = self.auth.sign_in().await?;
        self.load(&user.id).await;
        Ok(user)
    }

    /// Load the tree for an already signed-in user. Returns false if nobody is.
    pub async fn restore(&mut self) -> bool {
        match self.auth.current_user() {
            Some(user) => {
                self.load(&user.id).await;
                true
            }
            None => false,
        }
    }

    /// Replace the tree with the store's documents; empty if the fetch fails
    pub async fn load(&mut self, owner_id: &str) {
        let objectives = self.sync.fetch(owner_id).await;
        self.store.replace_all(owner_id, objectives);
    }

    /// Let pending writes land, then drop the tree and the user
    pub async fn sign_out(&mut self) -> DomainResult<()> {
        self.sync.flush().await;
        self.store.clear();
        self.auth.sign_out().await
    }

    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    // ========================
    // Mutations
    // ========================

    pub fn add_objective(&mut self, title: &str, schedule: Schedule) -> DomainResult<String> {
        let id = self.store.add_objective(title, schedule)?;
        if let Some(objective) = self.store.find_objective(&id) {
            self.sync.enqueue(RemoteOp::CreateObjective(objective.clone()));
        }
        Ok(id)
    }

    pub fn add_key_result(&mut self, objective_id: &str, title: &str, schedule: Schedule) -> DomainResult<String> {
        let id = self.store.add_key_result(objective_id, title, schedule)?;
        self.push_key_results(objective_id);
        Ok(id)
    }

    pub fn add_action_item(
        &mut self,
        objective_id: &str,
        key_result_id: &str,
        title: &str,
        schedule: Schedule,
    ) -> DomainResult<String> {
        let id = self
            .store
            .add_action_item(objective_id, key_result_id, title, schedule)?;
        self.push_key_results(objective_id);
        Ok(id)
    }

    pub fn edit_entity(&mut self, kind: NodeKind, id: &str, patch: &NodePatch) -> DomainResult<()> {
        let owner = self.store.owning_objective_id(id);
        self.store.edit_entity(kind, id, patch)?;
        match kind {
            NodeKind::Objective => {
                if let Some(objective) = self.store.find_objective(id) {
                    self.sync.enqueue(RemoteOp::UpdateObjective {
                        id: id.to_string(),
                        patch: ObjectivePatch::header_of(objective),
                    });
                }
            }
            _ => {
                if let Some(owner) = owner {
                    self.push_key_results(&owner);
                }
            }
        }
        Ok(())
    }

    pub fn delete_entity(&mut self, kind: NodeKind, id: &str) -> DomainResult<()> {
        let owner = self.store.owning_objective_id(id);
        self.store.delete_entity(kind, id)?;
        match (kind, owner) {
            (NodeKind::Objective, _) => self.sync.enqueue(RemoteOp::DeleteObjective { id: id.to_string() }),
            (_, Some(owner)) => self.push_key_results(&owner),
            (_, None) => {}
        }
        Ok(())
    }

    pub fn toggle_action_item_completion(&mut self, id: &str) -> DomainResult<bool> {
        let owner = self.store.owning_objective_id(id);
        let completed = self.store.toggle_action_item_completion(id)?;
        if let Some(owner) = owner {
            self.push_key_results(&owner);
        }
        Ok(completed)
    }

    pub fn toggle_open(&mut self, kind: NodeKind, id: &str) -> DomainResult<bool> {
        let owner = self.store.owning_objective_id(id);
        let is_open = self.store.toggle_open(kind, id)?;
        match (kind, owner) {
            (NodeKind::Objective, _) => self.sync.enqueue(RemoteOp::UpdateObjective {
                id: id.to_string(),
                patch: ObjectivePatch::open_state(is_open),
            }),
            // the flag lives inside the nested array
            (_, Some(owner)) => self.push_key_results(&owner),
            (_, None) => {}
        }
        Ok(is_open)
    }

    /// Reorder siblings and queue one batched order write for the list
    pub fn reorder(&mut self, moved_id: &str, target_id: &str) -> bool {
        match self.store.reorder_siblings(moved_id, target_id) {
            Some(list) => {
                self.sync_order(list);
                true
            }
            None => false,
        }
    }

    // ========================
    // Drag gestures
    // ========================

    pub fn drag_state(&self) -> &DragState<String> {
        self.store.drag_state()
    }

    pub fn drag_press(&mut self, id: &str, x: i32, y: i32) {
        self.store.drag_press(id, x, y);
    }

    pub fn drag_motion(&mut self, x: i32, y: i32) -> bool {
        self.store.drag_motion(x, y)
    }

    pub fn drag_hover(&mut self, id: &str) {
        self.store.drag_hover(id);
    }

    pub fn drag_leave(&mut self) {
        self.store.drag_leave();
    }

    /// Pointer released; returns true if a reorder was committed
    pub fn drag_release(&mut self) -> bool {
        match self.store.drag_release() {
            Some(list) => {
                self.sync_order(list);
                true
            }
            None => false,
        }
    }

    fn sync_order(&self, list: SiblingList) {
        let entries = self.store.order_entries(&list);
        self.sync.enqueue(RemoteOp::SyncOrder { list, entries });
    }

    /// Rewrite the nested key results of one objective document
    fn push_key_results(&self, objective_id: &str) {
        if let Some(objective) = self.store.find_objective(objective_id) {
            self.sync.enqueue(RemoteOp::UpdateObjective {
                id: objective.id.clone(),
                patch: ObjectivePatch::key_results_of(objective),
            });
        }
    }
}

impl GestureHandler<String> for Session {
    fn on_drag_start(&mut self, id: String) {
        self.store.drag_start(&id);
    }

    fn on_drag_end(&mut self, active: String, over: Option<String>) -> bool {
        match self.store.drag_end(&active, over.as_deref()) {
            Some(list) => {
                self.sync_order(list);
                true
            }
            None => false,
        }
    }
}
