//! Board settings read from the `[sync]` and `[display]` tables of the board file

use crate::drag::DEFAULT_DRAG_THRESHOLD;
use crate::error::BoardError;
use crate::notification::DEFAULT_DISPLAY_INTERVAL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where and how status changes are persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Root of the REST API; `None` runs the board offline
    pub base_url: Option<String>,
    /// Collection the items live in (`PUT {base_url}/{resource}/{id}`)
    pub resource: String,
    /// Environment variable holding the bearer token
    pub token_env: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            resource: "tickets".to_string(),
            token_env: "KANBAN_API_TOKEN".to_string(),
            timeout_secs: 10,
        }
    }
}

impl SyncSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Bearer token from the configured environment variable, if set
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// How long a notification stays visible, in seconds
    pub notification_secs: u64,
    /// Pointer travel (device-independent pixels) that starts a drag
    pub drag_threshold: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            notification_secs: DEFAULT_DISPLAY_INTERVAL.as_secs(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl DisplaySettings {
    pub fn notification_interval(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
    /// Reject a threshold that is negative, infinite or NaN, and a zero
    /// notification interval
    pub fn validate(&self) -> Result<(), BoardError> {
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(BoardError::InvalidDragThreshold {
                value: self.drag_threshold,
            });
        }
        if self.notification_secs == 0 {
            return Err(BoardError::InvalidNotificationInterval);
        }
        Ok(())
    }
}
