//! Text rendering for the MCP tool responses

use crate::board::Item;
use crate::coordinator::Skip;
use crate::drag::DragOutcome;
use crate::notification::Notification;
use crate::session::{BoardSnapshot, ColumnSnapshot, ItemSnapshot};

/// Render the whole board, columns in configured order
pub fn format_board(snapshot: &BoardSnapshot) -> String {
    let mut result = String::new();
    for column in &snapshot.columns {
        result.push_str(&format_column(column));
        result.push('\n');
    }
    result.push_str(&format_orphans(&snapshot.orphans));
    result.trim_end().to_string()
}

/// Render one column with its items
pub fn format_column(column: &ColumnSnapshot) -> String {
    let mut result = format!(
        "## {} [{}] ({})\n",
        column.column.label,
        column.column.key,
        column.items.len()
    );
    if column.items.is_empty() {
        result.push_str("(empty)\n");
    }
    for item in &column.items {
        result.push_str(&format_item(item));
        result.push('\n');
    }
    result
}

/// One card as a list entry
pub fn format_item(snapshot: &ItemSnapshot) -> String {
    let item = &snapshot.item;
    let mut line = format!("- [{}] {}", item.id, item.title);

    let details = item_details(item);
    if !details.is_empty() {
        line.push_str(&format!(" ({})", details.join(", ")));
    }
    if snapshot.saving {
        line.push_str(" [saving...]");
    }
    line
}

fn item_details(item: &Item) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(assignee) = &item.assignee {
        details.push(format!("assignee: {}", assignee));
    }
    if let Some(estimate) = item.estimate {
        details.push(format!("estimate: {}", estimate));
    }
    if !item.tags.is_empty() {
        details.push(format!("tags: {}", item.tags.join(", ")));
    }
    details
}

fn format_orphans(orphans: &[Item]) -> String {
    if orphans.is_empty() {
        return "Orphaned items: 0".to_string();
    }
    let ids: Vec<String> = orphans
        .iter()
        .map(|i| format!("{} (status: {})", i.id, i.status))
        .collect();
    format!("Orphaned items: {}\n- {}", orphans.len(), ids.join("\n- "))
}

pub fn format_notification(notification: Option<&Notification>) -> String {
    match notification {
        None => "No notification".to_string(),
        Some(n) => {
            let mut result = format!("[{}] {}", n.kind, n.title);
            if let Some(message) = &n.message {
                result.push('\n');
                result.push_str(message);
            }
            result
        }
    }
}

/// Explain why a proposal did not reach the remote store
pub fn format_skip(skip: Skip, item_id: &str, column: &str) -> String {
    match skip {
        Skip::NotFound => format!("Item '{}' not found", item_id),
        Skip::NoOp => format!("Item '{}' is already in column '{}'", item_id, column),
        Skip::Pending => format!(
            "Item '{}' is still being saved; try again once the previous move finishes",
            item_id
        ),
        Skip::UnknownColumn => format!("Column '{}' does not exist", column),
    }
}

/// Describe a gesture that did not produce a proposal
pub fn format_outcome(outcome: &DragOutcome) -> String {
    match outcome {
        DragOutcome::Click { item_id } => format!("Item '{}' opened", item_id),
        DragOutcome::Proposed(p) => format!(
            "Moving '{}' from '{}' to '{}'",
            p.item_id, p.from_column, p.to_column
        ),
        DragOutcome::Cancelled { item_id } => format!("Move of '{}' cancelled", item_id),
        DragOutcome::Ignored => "No item selected".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ColumnDescriptor;

    fn snapshot() -> BoardSnapshot {
        let mut fix = Item::new("T1", "todo", "Fix bug");
        fix.assignee = Some("sam".to_string());
        fix.tags = vec!["bug".to_string()];
        BoardSnapshot {
            columns: vec![
                ColumnSnapshot {
                    column: ColumnDescriptor::new("todo", "To Do"),
                    items: vec![ItemSnapshot {
                        item: fix,
                        saving: true,
                    }],
                },
                ColumnSnapshot {
                    column: ColumnDescriptor::new("done", "Done"),
                    items: vec![],
                },
            ],
            orphans: vec![Item::new("T3", "archived", "Old")],
        }
    }

    #[test]
    fn test_format_board() {
        let text = format_board(&snapshot());
        assert!(text.contains("## To Do [todo] (1)"));
        assert!(text.contains("- [T1] Fix bug (assignee: sam, tags: bug) [saving...]"));
        assert!(text.contains("## Done [done] (0)\n(empty)"));
        assert!(text.ends_with("Orphaned items: 1\n- T3 (status: archived)"));
    }

    #[test]
    fn test_format_notification() {
        assert_eq!(format_notification(None), "No notification");
        let n = Notification::error("Could not move \"Fix bug\"").with_message("Reverted.");
        assert_eq!(
            format_notification(Some(&n)),
            "[error] Could not move \"Fix bug\"\nReverted."
        );
    }

    #[test]
    fn test_format_skip() {
        assert_eq!(
            format_skip(Skip::NoOp, "T1", "todo"),
            "Item 'T1' is already in column 'todo'"
        );
        assert_eq!(format_skip(Skip::NotFound, "T9", "todo"), "Item 'T9' not found");
    }
}
