//! Optimistic mutation coordinator
//!
//! A proposed status change is applied to the item collection right away,
//! then confirmed with the persistence client in a background task. The
//! task's result is fed to [`reconcile`], which either keeps the change or
//! puts the previous status back.
//!
//! Only one mutation per item may be in flight. A proposal for an item that
//! is still being saved is rejected with a warning notification; the user
//! can move it again once the first change has settled.

use crate::board::{ColumnSet, ItemStore};
use crate::error::PersistenceError;
use crate::notification::{Notification, NotificationChannel};
use crate::persistence::{PersistenceClient, UpdatedItem};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// An optimistic change awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    pub item_id: String,
    pub previous_status: String,
    pub proposed_status: String,
    pub submitted_at: DateTime<Utc>,
}

/// Items plus the mutations currently in flight
pub struct BoardState {
    pub items: ItemStore,
    pending: HashMap<String, PendingMutation>,
}

impl BoardState {
    pub fn new(items: ItemStore) -> Self {
        Self {
            items,
            pending: HashMap::new(),
        }
    }

    pub fn is_pending(&self, item_id: &str) -> bool {
        self.pending.contains_key(item_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Why a proposal did not lead to a network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The item no longer exists locally
    NotFound,
    /// The item already has the target status
    NoOp,
    /// A previous change of the same item is still being saved
    Pending,
    /// The target is not a column of this board
    UnknownColumn,
}

/// Result of [`Coordinator::propose`]
#[derive(Debug)]
pub enum Submission {
    Skipped(Skip),
    /// The change is applied locally and the confirmation is running
    Submitted(JoinHandle<Resolution>),
}

impl Submission {
    pub fn skipped(&self) -> Option<Skip> {
        match self {
            Submission::Skipped(skip) => Some(*skip),
            Submission::Submitted(_) => None,
        }
    }
}

/// How a pending mutation settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The remote store accepted the change
    Committed { item_id: String, status: String },
    /// The remote store refused; the previous status was restored
    RolledBack {
        item_id: String,
        restored_status: String,
        error: PersistenceError,
    },
    /// The item vanished (or changed underneath) while the change was in
    /// flight, so there was nothing to commit or restore
    Abandoned {
        item_id: String,
        error: Option<PersistenceError>,
    },
}

/// Settle a pending mutation against the confirmation outcome
///
/// Success keeps the optimistic status. Failure restores the snapshot, but
/// only on the item the mutation belongs to, and only if the item still
/// carries the proposed status. In every case the pending record is gone
/// afterwards.
pub fn reconcile(
    state: &mut BoardState,
    pending: &PendingMutation,
    outcome: Result<UpdatedItem, PersistenceError>,
) -> Resolution {
    if state
        .pending
        .get(&pending.item_id)
        .is_some_and(|p| p == pending)
    {
        state.pending.remove(&pending.item_id);
    }

    let current = state
        .items
        .get(&pending.item_id)
        .map(|item| item.status.clone());

    match (outcome, current) {
        (Ok(_), Some(_)) => Resolution::Committed {
            item_id: pending.item_id.clone(),
            status: pending.proposed_status.clone(),
        },
        (Ok(_), None) => Resolution::Abandoned {
            item_id: pending.item_id.clone(),
            error: None,
        },
        (Err(error), Some(status)) if status == pending.proposed_status => {
            state
                .items
                .set_status(&pending.item_id, &pending.previous_status);
            Resolution::RolledBack {
                item_id: pending.item_id.clone(),
                restored_status: pending.previous_status.clone(),
                error,
            }
        }
        (Err(error), _) => Resolution::Abandoned {
            item_id: pending.item_id.clone(),
            error: Some(error),
        },
    }
}

/// Owns all writes to item status
#[derive(Clone)]
pub struct Coordinator {
    state: Arc<Mutex<BoardState>>,
    columns: Arc<ColumnSet>,
    client: Arc<dyn PersistenceClient>,
    notifications: NotificationChannel,
}

impl Coordinator {
    pub fn new(
        state: Arc<Mutex<BoardState>>,
        columns: Arc<ColumnSet>,
        client: Arc<dyn PersistenceClient>,
        notifications: NotificationChannel,
    ) -> Self {
        Self {
            state,
            columns,
            client,
            notifications,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `item_id` to `to_column`
    ///
    /// Returns as soon as the local state reflects the change. The outcome
    /// is reported through the notification channel and the item
    /// collection; the returned handle can be awaited but does not have to
    /// be. Must be called from within a tokio runtime.
    pub fn propose(&self, item_id: &str, to_column: &str) -> Submission {
        let pending = match self.begin(item_id, to_column) {
            Ok(pending) => pending,
            Err(skip) => return Submission::Skipped(skip),
        };

        let coordinator = self.clone();
        Submission::Submitted(tokio::spawn(async move {
            let outcome = coordinator
                .client
                .commit_status(&pending.item_id, &pending.proposed_status)
                .await;
            coordinator.settle(&pending, outcome)
        }))
    }

    /// Apply the optimistic change and record the pending mutation
    fn begin(&self, item_id: &str, to_column: &str) -> Result<PendingMutation, Skip> {
        if !self.columns.contains(to_column) {
            warn!(item_id, to_column, "proposal for unknown column ignored");
            return Err(Skip::UnknownColumn);
        }

        let mut state = self.lock();

        let Some(item) = state.items.get(item_id) else {
            debug!(item_id, "proposal for missing item ignored");
            return Err(Skip::NotFound);
        };

        if item.status == to_column {
            debug!(item_id, to_column, "item already in target column");
            return Err(Skip::NoOp);
        }

        if state.is_pending(item_id) {
            let title = display_title(&item.title, item_id).to_string();
            drop(state);
            info!(item_id, "item still saving, proposal rejected");
            self.notifications.emit(
                Notification::warning(format!("\"{}\" is still being saved", title))
                    .with_message("Wait for the previous move to finish before moving it again."),
            );
            return Err(Skip::Pending);
        }

        let previous_status = item.status.clone();
        state.items.set_status(item_id, to_column);

        let pending = PendingMutation {
            item_id: item_id.to_string(),
            previous_status,
            proposed_status: to_column.to_string(),
            submitted_at: Utc::now(),
        };
        state.pending.insert(item_id.to_string(), pending.clone());

        info!(
            item_id,
            from = %pending.previous_status,
            to = %pending.proposed_status,
            "optimistic status change applied"
        );
        Ok(pending)
    }

    /// Reconcile a finished confirmation and tell the user what happened
    pub fn settle(
        &self,
        pending: &PendingMutation,
        outcome: Result<UpdatedItem, PersistenceError>,
    ) -> Resolution {
        if let Ok(updated) = &outcome
            && updated.status != pending.proposed_status
        {
            warn!(
                item_id = %pending.item_id,
                proposed = %pending.proposed_status,
                reported = %updated.status,
                "remote store reported a different status"
            );
        }

        let mut state = self.lock();
        let resolution = reconcile(&mut state, pending, outcome);
        let current = state
            .items
            .get(&pending.item_id)
            .map(|item| display_title(&item.title, &item.id).to_string());
        drop(state);

        let on_board = current.is_some();
        let title = current.unwrap_or_else(|| pending.item_id.clone());
        if let Some(notification) = self.notification_for(&resolution, &title, on_board) {
            self.notifications.emit(notification);
        }
        resolution
    }

    fn notification_for(
        &self,
        resolution: &Resolution,
        title: &str,
        on_board: bool,
    ) -> Option<Notification> {
        match resolution {
            Resolution::Committed { item_id, status } => {
                info!(item_id = %item_id, status = %status, "status change confirmed");
                let label = self.columns.label(status);
                Some(Notification::success(format!(
                    "\"{}\" moved to {}",
                    title, label
                )))
            }
            Resolution::RolledBack {
                item_id,
                restored_status,
                error,
            } => {
                warn!(item_id = %item_id, error = %error, "status change failed, rolled back");
                let label = self.columns.label(restored_status);
                Some(
                    Notification::error(format!("Could not move \"{}\"", title)).with_message(
                        format!(
                            "{} The change was not saved and \"{}\" was reverted to {}.",
                            failure_reason(error),
                            title,
                            label
                        ),
                    ),
                )
            }
            Resolution::Abandoned {
                item_id,
                error: Some(error),
            } => {
                warn!(item_id = %item_id, error = %error, "status change failed for an item that changed in flight");
                Some(
                    Notification::error(format!("Could not move \"{}\"", title)).with_message(
                        format!(
                            "{} The change was not saved. {}",
                            failure_reason(error),
                            abandoned_note(title, on_board)
                        ),
                    ),
                )
            }
            Resolution::Abandoned {
                item_id,
                error: None,
            } => {
                info!(item_id = %item_id, "status change confirmed for an item that no longer exists");
                None
            }
        }
    }

    pub fn is_pending(&self, item_id: &str) -> bool {
        self.lock().is_pending(item_id)
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending_count()
    }
}

fn display_title<'a>(title: &'a str, id: &'a str) -> &'a str {
    if title.trim().is_empty() { id } else { title }
}

fn abandoned_note(title: &str, on_board: bool) -> String {
    if on_board {
        format!("\"{}\" was changed elsewhere and keeps its current column.", title)
    } else {
        format!("\"{}\" is no longer on the board.", title)
    }
}

fn failure_reason(error: &PersistenceError) -> String {
    match error {
        PersistenceError::Transport(_) => {
            format!("The server could not be reached ({}).", error.detail())
        }
        PersistenceError::Rejected { .. } => format!(
            "The server rejected the change: {}.",
            error.detail().trim_end_matches('.')
        ),
        PersistenceError::InvalidUrl(_) => {
            format!("The request could not be built ({}).", error.detail())
        }
    }
}
