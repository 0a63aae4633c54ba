//! Kanban MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for a kanban
//! board whose items are kept in sync with a remote system of record. Moving
//! an item between columns is applied to the board immediately and confirmed
//! with the remote store in the background; if confirmation fails the move is
//! reverted and the user is told why.
//!
//! # Architecture
//!
//! - **MCP Layer**: `KanbanServerHandler` - Handles MCP protocol communication
//! - **Interaction Layer**: `drag` - The drag session controller (pointer and keyboard)
//! - **Domain Layer**: `board` - Items, columns, the item store and the column projector
//! - **Sync Layer**: `coordinator`, `persistence`, `notification` - Optimistic
//!   updates, the REST client and the single-slot notification channel
//!
//! # Example
//!
//! ```no_run
//! use kanban_mcp::KanbanServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = KanbanServerHandler::new("board.toml", false)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod coordinator;
pub mod drag;
pub mod error;
pub mod formatting;
mod handlers;
pub mod notification;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod storage;
pub mod validation;

use anyhow::{Context, Result};
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// Re-export commonly used types
pub use board::{ColumnDescriptor, ColumnSet, Item, ItemStore, Projection, project};
pub use coordinator::{Coordinator, PendingMutation, Resolution, Skip, Submission};
pub use drag::{Direction, DragController, DragOutcome, DragPhase, Point, TransitionProposal};
pub use error::{BoardError, PersistenceError};
pub use notification::{Notification, NotificationChannel, NotificationKind};
pub use persistence::{HttpPersistenceClient, OfflinePersistence, PersistenceClient, UpdatedItem};
pub use session::{BoardSession, BoardSnapshot};
pub use storage::Storage;

/// MCP Server handler for one kanban board
///
/// Exposes the board, direct moves, the keyboard move path and the current
/// notification as MCP tools.
pub struct KanbanServerHandler {
    pub(crate) session: BoardSession,
}

impl KanbanServerHandler {
    /// Create a handler from a board file
    ///
    /// # Arguments
    /// * `board_path` - Path to the board file (TOML format)
    /// * `offline` - Confirm changes locally instead of calling the remote store
    ///
    /// # Returns
    /// Result containing the handler or an error
    ///
    /// # Example
    /// ```no_run
    /// # use kanban_mcp::KanbanServerHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = KanbanServerHandler::new("board.toml", false)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(board_path: impl AsRef<Path>, offline: bool) -> Result<Self> {
        let storage = Storage::new(board_path);
        let board = storage.load()?;
        info!(path = %storage.file_path().display(), "board file loaded");

        let client: Arc<dyn PersistenceClient> = match (&board.sync.base_url, offline) {
            (Some(base_url), false) => {
                info!(%base_url, resource = %board.sync.resource, "persisting to remote store");
                let token = board.sync.token();
                if token.is_none() {
                    warn!(token_env = %board.sync.token_env, "no bearer token set");
                }
                Arc::new(
                    HttpPersistenceClient::new(
                        base_url.clone(),
                        board.sync.resource.clone(),
                        token,
                        board.sync.timeout(),
                    )
                    .context("Failed to build HTTP client")?,
                )
            }
            _ => {
                warn!("no remote store configured, changes are confirmed locally");
                Arc::new(OfflinePersistence)
            }
        };

        let session = BoardSession::new(board.columns, board.items, client, &board.display)
            .context("Invalid board configuration")?;
        Ok(Self { session })
    }

    /// Create a handler around an existing session
    pub fn from_session(session: BoardSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &BoardSession {
        &self.session
    }
}

/// Kanban board server with optimistic status synchronization.
///
/// Items live in columns; an item's column is its status. Moving an item shows
/// the new column right away and saves the change in the background. If the
/// save fails the item goes back to its previous column and a notification
/// explains what happened.
///
/// Key concepts:
/// - **board**: All columns with their items (or one column)
/// - **move_item**: Move an item to a column in one step
/// - **select_item / cycle_target / confirm_move / cancel_move**: Keyboard-style move
/// - **notification**: Outcome of the most recent change (disappears after a few seconds)
#[mcp_server]
impl McpServer for KanbanServerHandler {
    /// **Board**: Show the board, column by column, in configured order.
    /// Items still being saved are marked "[saving...]". Orphaned items (status matching no column) are listed at the end.
    #[tool]
    async fn board(
        &self,
        /// Column key to show (optional, empty=all)
        column: Option<String>,
    ) -> McpResult<String> {
        self.handle_board(column).await
    }

    /// **Move**: Move an item to another column. Applied immediately, saved in the background.
    /// **Tip**: Call notification afterwards to see whether the change was saved or reverted.
    #[tool]
    async fn move_item(
        &self,
        /// Item ID
        id: String,
        /// Target column key
        column: String,
    ) -> McpResult<String> {
        self.handle_move_item(id, column).await
    }

    /// **Keyboard move, step 1**: Pick up an item. The target starts at its current column.
    #[tool]
    async fn select_item(
        &self,
        /// Item ID
        id: String,
    ) -> McpResult<String> {
        self.handle_select_item(id).await
    }

    /// **Keyboard move, step 2**: Move the target to the next or previous column (wraps around).
    #[tool]
    async fn cycle_target(
        &self,
        /// Direction: next (default) or prev
        direction: Option<String>,
    ) -> McpResult<String> {
        self.handle_cycle_target(direction).await
    }

    /// **Keyboard move, step 3**: Drop the selected item on the current target column.
    #[tool]
    async fn confirm_move(&self) -> McpResult<String> {
        self.handle_confirm_move().await
    }

    /// **Keyboard move, abort**: Put the selected item down without moving it.
    #[tool]
    async fn cancel_move(&self) -> McpResult<String> {
        self.handle_cancel_move().await
    }

    /// **Notification**: The outcome of the most recent change, if it is still shown.
    #[tool]
    async fn notification(&self) -> McpResult<String> {
        self.handle_notification().await
    }

    /// **Dismiss**: Hide the current notification.
    #[tool]
    async fn dismiss_notification(&self) -> McpResult<String> {
        self.handle_dismiss_notification().await
    }
}
