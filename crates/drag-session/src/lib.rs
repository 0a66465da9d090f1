//! Drag Session
//!
//! Drag-and-drop state for reordering, independent of any UI toolkit.
//! Uses a movement threshold to distinguish click from drag. The session only
//! tracks the gesture; the caller commits the drop.

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// Gesture state: `Idle → (Pending →) Dragging → Committing | Idle`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragState<Id> {
    Idle,
    /// Pointer is down on an item but has not moved past the threshold
    Pending { id: Id, start_x: i32, start_y: i32 },
    /// Item picked up; `over` is the current drop target
    Dragging { id: Id, over: Option<Id> },
    /// Dropped; the caller is applying the reorder
    Committing { active: Id, over: Id },
}

impl<Id> Default for DragState<Id> {
    fn default() -> Self {
        DragState::Idle
    }
}

/// A completed drop: `active` released over `over`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropEvent<Id> {
    pub active: Id,
    pub over: Id,
}

/// Receiver of gesture start/end notifications from a drag source
pub trait GestureHandler<Id> {
    fn on_drag_start(&mut self, id: Id);

    /// Returns true if the drop changed anything
    fn on_drag_end(&mut self, active: Id, over: Option<Id>) -> bool;
}

/// Drag gesture tracker for one list view
#[derive(Clone, Debug)]
pub struct DragSession<Id> {
    state: DragState<Id>,
}

impl<Id> Default for DragSession<Id> {
    fn default() -> Self {
        Self { state: DragState::Idle }
    }
}

impl<Id: Clone + PartialEq> DragSession<Id> {
    pub fn new() -> Self {
        Self { state: DragState::Idle }
    }

    pub fn state(&self) -> &DragState<Id> {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Id being dragged, if a drag has started
    pub fn dragging_id(&self) -> Option<&Id> {
        match &self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Committing { active, .. } => Some(active),
            _ => None,
        }
    }

    /// Current drop target while dragging
    pub fn drop_target(&self) -> Option<&Id> {
        match &self.state {
            DragState::Dragging { over, .. } => over.as_ref(),
            _ => None,
        }
    }

    /// Pointer down on an item: record a pending drag with its start position
    pub fn press(&mut self, id: Id, x: i32, y: i32) {
        if self.is_idle() {
            self.state = DragState::Pending {
                id,
                start_x: x,
                start_y: y,
            };
        }
    }

    /// Pointer moved; starts the drag once past the threshold.
    /// Returns true when this call started the drag.
    pub fn pointer_move(&mut self, x: i32, y: i32) -> bool {
        let DragState::Pending { id, start_x, start_y } = &self.state else {
            return false;
        };
        let dx = (x - start_x).abs();
        let dy = (y - start_y).abs();
        if dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX {
            let id = id.clone();
            self.state = DragState::Dragging { id, over: None };
            return true;
        }
        false
    }

    /// Pick-up reported directly by a drag source
    pub fn start(&mut self, id: Id) {
        match self.state {
            DragState::Idle | DragState::Pending { .. } => {
                self.state = DragState::Dragging { id, over: None };
            }
            _ => log::debug!("drag start ignored: gesture already in progress"),
        }
    }

    /// Pointer entered an item; the dragged item itself is never a target
    pub fn hover(&mut self, target: Id) {
        if let DragState::Dragging { id, over } = &mut self.state {
            if *id != target {
                *over = Some(target);
            }
        }
    }

    /// Pointer left the current target
    pub fn leave(&mut self) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = None;
        }
    }

    /// Pointer released. With a target the session enters `Committing` and
    /// returns the drop; otherwise it goes back to `Idle` (a plain click).
    pub fn release(&mut self) -> Option<DropEvent<Id>> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { id, over: Some(over) } => Some(self.commit(id, over)),
            _ => None,
        }
    }

    /// Drop reported directly by a drag source
    pub fn drop_on(&mut self, active: Id, over: Option<Id>) -> Option<DropEvent<Id>> {
        self.state = DragState::Idle;
        match over {
            Some(over) if over != active => Some(self.commit(active, over)),
            _ => None,
        }
    }

    /// Commit finished (whatever its outcome)
    pub fn finish(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    fn commit(&mut self, active: Id, over: Id) -> DropEvent<Id> {
        self.state = DragState::Committing {
            active: active.clone(),
            over: over.clone(),
        };
        DropEvent { active, over }
    }
}
