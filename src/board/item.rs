use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work shown as a card on the board
///
/// Only `id` and `status` matter to the board itself. The remaining fields
/// are display attributes that are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier, unique for the lifetime of the board
    pub id: String,
    /// Key of the column the item belongs to
    pub status: String,
    /// Short description shown on the card
    #[serde(default)]
    pub title: String,
    /// Person the item is assigned to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Effort estimate (story points, hours... whatever the board uses)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f32>,
    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// When the item was last changed on the remote store, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create an item with only the fields the board needs
    pub fn new(id: impl Into<String>, status: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            title: title.into(),
            assignee: None,
            estimate: None,
            tags: Vec::new(),
            updated_at: None,
        }
    }
}

/// A column as supplied by the board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Canonical key matched against `Item::status`
    pub key: String,
    /// Text shown in the column header and in notifications
    pub label: String,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}
