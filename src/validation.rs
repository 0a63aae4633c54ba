//! Argument validation for the MCP tools

use crate::board::ColumnSet;
use crate::drag::Direction;
use mcp_attr::Result as McpResult;

fn invalid_params(message: String) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message, true)
}

/// Normalize an item ID by trimming surrounding whitespace
///
/// # Examples
/// ```
/// # use kanban_mcp::validation::normalize_item_id;
/// assert_eq!(normalize_item_id("  T1 "), "T1");
/// ```
pub fn normalize_item_id(item_id: &str) -> String {
    item_id.trim().to_string()
}

/// Check that a column key exists on the board
///
/// # Returns
/// The trimmed key, or an error listing the available columns
pub fn parse_column(column: &str, columns: &ColumnSet) -> McpResult<String> {
    let key = column.trim();
    if columns.contains(key) {
        Ok(key.to_string())
    } else {
        Err(invalid_params(format_invalid_column_error(key, columns)))
    }
}

/// Error message for an unknown column, including the valid keys
pub fn format_invalid_column_error(column: &str, columns: &ColumnSet) -> String {
    format!(
        "Column '{}' does not exist.\nAvailable columns: {}",
        column,
        columns.keys_list()
    )
}

/// Parse a cycle direction: "next" (default) or "prev"/"previous"
pub fn parse_direction(direction: Option<&str>) -> McpResult<Direction> {
    match direction.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("next") => Ok(Direction::Next),
        Some("prev") | Some("previous") => Ok(Direction::Previous),
        Some(other) => Err(invalid_params(format!(
            "Invalid direction '{}'. Use 'next' or 'prev'",
            other
        ))),
    }
}
