//! Notification handlers

use crate::KanbanServerHandler;
use crate::formatting;
use mcp_attr::Result as McpResult;

impl KanbanServerHandler {
    /// The notification currently shown, if any
    pub async fn handle_notification(&self) -> McpResult<String> {
        let current = self.session.notifications().current();
        Ok(formatting::format_notification(current.as_ref()))
    }

    /// Dismiss the current notification
    pub async fn handle_dismiss_notification(&self) -> McpResult<String> {
        self.session.notifications().clear();
        Ok("Notification dismissed".to_string())
    }
}
