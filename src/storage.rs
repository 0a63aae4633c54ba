use crate::board::{ColumnDescriptor, Item};
use crate::settings::{DisplaySettings, SyncSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a board file
///
/// ```toml
/// [sync]
/// base_url = "https://api.example.com/v1"
///
/// [[columns]]
/// key = "todo"
/// label = "To Do"
///
/// [[items]]
/// id = "T1"
/// status = "todo"
/// title = "Fix bug"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardFile {
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Reads the board configuration and the initial items from a TOML file
pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn load(&self) -> Result<BoardFile> {
        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read board file {}", self.file_path.display()))?;
        let board: BoardFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse board file {}", self.file_path.display()))?;
        Ok(board)
    }
}
