//! Single-slot notification channel
//!
//! The channel holds at most one notification. A newer notification
//! replaces the current one immediately. Each notification owns its own
//! auto-clear timer, and that timer can only ever clear the notification it
//! was started for.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long a notification stays visible unless replaced
pub const DEFAULT_DISPLAY_INTERVAL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
        };
        f.write_str(s)
    }
}

/// A short-lived message reporting the outcome of a mutation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            created_at: Utc::now(),
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Identity of one emitted notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

struct Posted {
    id: NotificationId,
    notification: Notification,
    timer: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Slot {
    current: Option<Posted>,
    next_id: u64,
}

/// Holds zero or one notification for the presentation layer
#[derive(Clone)]
pub struct NotificationChannel {
    slot: Arc<Mutex<Slot>>,
    display_for: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_INTERVAL)
    }
}

impl NotificationChannel {
    pub fn new(display_for: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            display_for,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show a notification, replacing whatever is currently shown
    ///
    /// The auto-clear timer is spawned on the current tokio runtime. Outside
    /// a runtime the notification stays until replaced or cleared.
    pub fn emit(&self, notification: Notification) -> NotificationId {
        let mut slot = self.lock();
        let id = NotificationId(slot.next_id);
        slot.next_id += 1;

        debug!(kind = %notification.kind, title = %notification.title, "notification emitted");

        let timer = match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let channel = self.clone();
                let display_for = self.display_for;
                Some(handle.spawn(async move {
                    tokio::time::sleep(display_for).await;
                    channel.expire(id);
                }))
            }
            Err(_) => {
                warn!("no async runtime, notification will not auto-clear");
                None
            }
        };

        let previous = slot.current.replace(Posted {
            id,
            notification,
            timer,
        });
        if let Some(Posted {
            timer: Some(stale), ..
        }) = previous
        {
            stale.abort();
        }
        id
    }

    /// Remove the current notification, if any
    pub fn clear(&self) {
        if let Some(Posted {
            timer: Some(timer), ..
        }) = self.lock().current.take()
        {
            timer.abort();
        }
    }

    /// Remove the notification `id` if it is still the one shown
    fn expire(&self, id: NotificationId) {
        let mut slot = self.lock();
        if slot.current.as_ref().is_some_and(|p| p.id == id) {
            debug!("notification expired");
            slot.current = None;
        }
    }

    /// The notification currently shown
    pub fn current(&self) -> Option<Notification> {
        self.lock().current.as_ref().map(|p| p.notification.clone())
    }

    /// Id of the notification currently shown
    pub fn current_id(&self) -> Option<NotificationId> {
        self.lock().current.as_ref().map(|p| p.id)
    }

    pub fn display_interval(&self) -> Duration {
        self.display_for
    }
}
