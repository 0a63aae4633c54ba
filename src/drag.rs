//! Drag session controller
//!
//! Tracks one pointer or keyboard interaction at a time:
//!
//! ```text
//! Idle --pointer_down--> Armed --move beyond threshold--> Dragging
//! Armed --pointer_up--> Idle (click)
//! Dragging --pointer_up over column--> Idle (proposal emitted)
//! Dragging --pointer_up elsewhere / cancel--> Idle (cancelled)
//! Idle --select--> Dragging (keyboard, hovering the item's own column)
//! ```
//!
//! The controller never waits for the coordinator. A drop yields a
//! [`TransitionProposal`] and the controller is idle again.

use crate::board::{ColumnSet, Item};
use std::sync::Arc;
use tracing::debug;

/// Movement (in device-independent pixels) needed to turn a press into a drag
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A request to move an item between columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionProposal {
    pub item_id: String,
    pub from_column: String,
    pub to_column: String,
}

/// What a finished gesture amounts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released before the threshold: open the item, do not move it
    Click { item_id: String },
    /// Dropped on a column
    Proposed(TransitionProposal),
    /// Released outside any column, or cancelled explicitly
    Cancelled { item_id: String },
    /// The event made no sense in the current state
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Armed,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq)]
enum DragState {
    Idle,
    Armed {
        item_id: String,
        from_column: String,
        origin: Point,
    },
    Dragging {
        item_id: String,
        from_column: String,
        hovered: Option<String>,
    },
}

pub struct DragController {
    columns: Arc<ColumnSet>,
    threshold: f64,
    state: DragState,
}

impl DragController {
    pub fn new(columns: Arc<ColumnSet>, threshold: f64) -> Self {
        Self {
            columns,
            threshold,
            state: DragState::Idle,
        }
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Armed { .. } => DragPhase::Armed,
            DragState::Dragging { .. } => DragPhase::Dragging,
        }
    }

    /// Item being pressed or dragged
    pub fn dragged_item(&self) -> Option<&str> {
        match &self.state {
            DragState::Idle => None,
            DragState::Armed { item_id, .. } | DragState::Dragging { item_id, .. } => {
                Some(item_id)
            }
        }
    }

    /// Column under the pointer while dragging, for drop-target highlighting
    pub fn hovered_column(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { hovered, .. } => hovered.as_deref(),
            _ => None,
        }
    }

    /// Press on an item. Ignored unless idle.
    pub fn pointer_down(&mut self, item: &Item, at: Point) -> bool {
        if self.state != DragState::Idle {
            debug!(item_id = %item.id, "pointer down ignored, interaction in progress");
            return false;
        }
        debug!(item_id = %item.id, "armed");
        self.state = DragState::Armed {
            item_id: item.id.clone(),
            from_column: item.status.clone(),
            origin: at,
        };
        true
    }

    /// Pointer moved to `at`, currently over `over` (if it is a column)
    pub fn pointer_move(&mut self, at: Point, over: Option<&str>) {
        let hovered = self.valid_target(over);
        let threshold = self.threshold;
        self.state = match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Armed {
                item_id,
                from_column,
                origin,
            } if origin.distance_to(at) > threshold => {
                debug!(item_id = %item_id, "dragging");
                DragState::Dragging {
                    item_id,
                    from_column,
                    hovered,
                }
            }
            DragState::Dragging {
                item_id,
                from_column,
                ..
            } => DragState::Dragging {
                item_id,
                from_column,
                hovered,
            },
            unchanged => unchanged,
        };
    }

    /// Release, currently over `over` (if it is a column)
    pub fn pointer_up(&mut self, over: Option<&str>) -> DragOutcome {
        let target = self.valid_target(over);
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Armed { item_id, .. } => {
                debug!(item_id = %item_id, "released before threshold, treated as click");
                DragOutcome::Click { item_id }
            }
            DragState::Dragging {
                item_id,
                from_column,
                ..
            } => match target {
                Some(to_column) => {
                    debug!(item_id = %item_id, from = %from_column, to = %to_column, "resolving drop");
                    DragOutcome::Proposed(TransitionProposal {
                        item_id,
                        from_column,
                        to_column,
                    })
                }
                None => {
                    debug!(item_id = %item_id, "dropped outside any column");
                    DragOutcome::Cancelled { item_id }
                }
            },
        }
    }

    /// Abort the current interaction (escape key)
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Armed { item_id, .. } | DragState::Dragging { item_id, .. } => {
                debug!(item_id = %item_id, "drag cancelled");
                DragOutcome::Cancelled { item_id }
            }
        }
    }

    /// Keyboard: pick up an item, hovering its own column
    ///
    /// An orphaned item hovers the first column.
    pub fn select(&mut self, item: &Item) -> bool {
        if self.state != DragState::Idle {
            return false;
        }
        let hovered = if self.columns.contains(&item.status) {
            Some(item.status.clone())
        } else {
            self.columns.at(0).map(|c| c.key.clone())
        };
        debug!(item_id = %item.id, "selected with keyboard");
        self.state = DragState::Dragging {
            item_id: item.id.clone(),
            from_column: item.status.clone(),
            hovered,
        };
        true
    }

    /// Keyboard: move the target to the next or previous column, wrapping
    pub fn cycle_target(&mut self, direction: Direction) -> Option<&str> {
        let DragState::Dragging { hovered, .. } = &mut self.state else {
            return None;
        };
        let count = self.columns.len();
        let next = match hovered.as_deref().and_then(|key| self.columns.position(key)) {
            Some(i) => match direction {
                Direction::Next => (i + 1) % count,
                Direction::Previous => (i + count - 1) % count,
            },
            None => match direction {
                Direction::Next => 0,
                Direction::Previous => count - 1,
            },
        };
        *hovered = self.columns.at(next).map(|c| c.key.clone());
        hovered.as_deref()
    }

    /// Keyboard: drop on the current target
    pub fn confirm(&mut self) -> DragOutcome {
        let target = match &self.state {
            DragState::Dragging { hovered, .. } => hovered.clone(),
            _ => return DragOutcome::Ignored,
        };
        self.pointer_up(target.as_deref())
    }

    fn valid_target(&self, over: Option<&str>) -> Option<String> {
        over.filter(|key| self.columns.contains(key))
            .map(str::to_string)
    }
}
