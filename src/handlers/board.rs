//! Board listing handler

use crate::KanbanServerHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::Result as McpResult;

impl KanbanServerHandler {
    /// Render the board, or a single column of it
    pub async fn handle_board(&self, column: Option<String>) -> McpResult<String> {
        let snapshot = self.session.snapshot();

        let Some(column) = column.filter(|c| !c.trim().is_empty()) else {
            return Ok(formatting::format_board(&snapshot));
        };

        let key = validation::parse_column(&column, self.session.columns())?;
        match snapshot.column(&key) {
            Some(column) => Ok(formatting::format_column(column).trim_end().to_string()),
            None => Err(mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS)
                .with_message(format!("Column '{}' does not exist", key), true)),
        }
    }
}
