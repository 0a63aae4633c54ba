//! One running board: columns, items, drag controller, coordinator and
//! notification channel wired together.

use crate::board::{ColumnDescriptor, ColumnSet, Item, ItemStore, project};
use crate::coordinator::{BoardState, Coordinator, Submission};
use crate::drag::{DragController, DragOutcome};
use crate::error::BoardError;
use crate::notification::NotificationChannel;
use crate::persistence::PersistenceClient;
use crate::settings::DisplaySettings;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Owned copy of one projected column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSnapshot {
    pub column: ColumnDescriptor,
    pub items: Vec<ItemSnapshot>,
}

/// Owned copy of an item plus whether a change of it is still being saved
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSnapshot {
    pub item: Item,
    pub saving: bool,
}

/// Owned copy of a projection, safe to hand to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub columns: Vec<ColumnSnapshot>,
    pub orphans: Vec<Item>,
}

impl BoardSnapshot {
    pub fn column(&self, key: &str) -> Option<&ColumnSnapshot> {
        self.columns.iter().find(|c| c.column.key == key)
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }
}

pub struct BoardSession {
    columns: Arc<ColumnSet>,
    state: Arc<Mutex<BoardState>>,
    coordinator: Coordinator,
    notifications: NotificationChannel,
    drag: Mutex<DragController>,
}

impl BoardSession {
    /// Build a board
    ///
    /// # Errors
    /// Fails fast on invalid display settings, an invalid column
    /// configuration or duplicate item ids, so a misconfigured board never
    /// renders.
    pub fn new(
        columns: Vec<ColumnDescriptor>,
        items: Vec<Item>,
        client: Arc<dyn PersistenceClient>,
        display: &DisplaySettings,
    ) -> Result<Self, BoardError> {
        display.validate()?;
        let columns = Arc::new(ColumnSet::new(columns)?);
        let store = ItemStore::from_items(items)?;

        let orphans: Vec<&str> = project(store.iter(), &columns)
            .orphan_ids();
        if !orphans.is_empty() {
            warn!(count = orphans.len(), ids = ?orphans, "items with a status matching no column");
        }
        info!(
            columns = columns.len(),
            items = store.len(),
            "board session created"
        );

        let state = Arc::new(Mutex::new(BoardState::new(store)));
        let notifications = NotificationChannel::new(display.notification_interval());
        let coordinator = Coordinator::new(
            Arc::clone(&state),
            Arc::clone(&columns),
            client,
            notifications.clone(),
        );
        let drag = Mutex::new(DragController::new(
            Arc::clone(&columns),
            display.drag_threshold,
        ));

        Ok(Self {
            columns,
            state,
            coordinator,
            notifications,
            drag,
        })
    }

    fn lock_state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the drag controller
    pub fn drag(&self) -> MutexGuard<'_, DragController> {
        self.drag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    /// Current copy of an item
    pub fn item(&self, id: &str) -> Option<Item> {
        self.lock_state().items.get(id).cloned()
    }

    /// Project the current items onto the columns
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.lock_state();
        let projection = project(state.items.iter(), &self.columns);

        if projection.orphan_count() > 0 {
            warn!(
                count = projection.orphan_count(),
                ids = ?projection.orphan_ids(),
                "snapshot contains orphaned items"
            );
        }

        let columns = projection
            .columns
            .iter()
            .map(|c| ColumnSnapshot {
                column: c.column.clone(),
                items: c
                    .items
                    .iter()
                    .map(|&item| ItemSnapshot {
                        item: item.clone(),
                        saving: state.is_pending(&item.id),
                    })
                    .collect(),
            })
            .collect();
        let orphans = projection.orphans.iter().map(|&i| i.clone()).collect();

        BoardSnapshot { columns, orphans }
    }

    /// Forward a finished gesture to the coordinator
    ///
    /// Clicks, cancellations and ignored events produce no submission.
    pub fn dispatch(&self, outcome: DragOutcome) -> Option<Submission> {
        match outcome {
            DragOutcome::Proposed(proposal) => {
                Some(self.propose(&proposal.item_id, &proposal.to_column))
            }
            DragOutcome::Click { item_id } => {
                debug!(item_id = %item_id, "item clicked");
                None
            }
            DragOutcome::Cancelled { .. } | DragOutcome::Ignored => None,
        }
    }

    /// Propose a status change directly
    pub fn propose(&self, item_id: &str, to_column: &str) -> Submission {
        self.coordinator.propose(item_id, to_column)
    }

    /// Add an item, or refresh the display attributes of an existing one
    pub fn insert_item(&self, item: Item) -> bool {
        let id = item.id.clone();
        let inserted = self.lock_state().items.upsert(item);
        debug!(item_id = %id, inserted, "item upserted");
        inserted
    }

    /// Remove an item (e.g., deleted elsewhere)
    pub fn remove_item(&self, id: &str) -> Option<Item> {
        let removed = self.lock_state().items.remove(id);
        if removed.is_some() {
            debug!(item_id = id, "item removed");
        }
        removed
    }
}
