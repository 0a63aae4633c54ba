//! Error types for the kanban board
//!
//! Configuration problems are raised once, when a board is constructed.
//! Persistence failures are recovered locally by the coordinator and only
//! ever reach the user as a notification.

use thiserror::Error;

/// Errors raised while building or validating a board
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoardError {
    /// The board configuration defines no columns at all
    #[error("board configuration defines no columns")]
    NoColumns,

    /// A column descriptor has an empty (or whitespace-only) key
    #[error("column #{position} has an empty key")]
    EmptyColumnKey {
        /// Zero-based position of the descriptor in the configuration
        position: usize,
    },

    /// Two column descriptors share the same key
    #[error("column key '{key}' is defined more than once")]
    DuplicateColumnKey { key: String },

    /// Two column keys only differ by surrounding whitespace or letter case
    #[error("column keys '{first}' and '{second}' collide")]
    CollidingColumnKeys { first: String, second: String },

    /// Two items in the initial collection share the same id
    #[error("item id '{id}' appears more than once")]
    DuplicateItem { id: String },

    /// The drag threshold is negative or not a number
    #[error("drag threshold must be a non-negative number, got {value}")]
    InvalidDragThreshold { value: f64 },

    /// Notifications would disappear as soon as they are shown
    #[error("notification_secs must be at least 1")]
    InvalidNotificationInterval,
}

/// Errors reported by a [`PersistenceClient`](crate::persistence::PersistenceClient)
///
/// Both variants are handled identically for rollback purposes; they only
/// differ in the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The request never produced a response (connection, timeout, TLS...)
    #[error("network error: {0}")]
    Transport(String),

    /// The remote store answered with a non-success status
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// No valid request URL could be built (bad base URL or item id)
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl PersistenceError {
    /// Human-readable reason suitable for a notification body
    pub fn detail(&self) -> &str {
        match self {
            PersistenceError::Transport(message) | PersistenceError::InvalidUrl(message) => message,
            PersistenceError::Rejected { detail, .. } => detail,
        }
    }
}

impl From<reqwest::Error> for PersistenceError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}
