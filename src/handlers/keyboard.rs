//! Keyboard handlers: select an item, cycle its target column, confirm or cancel

use crate::KanbanServerHandler;
use crate::drag::DragOutcome;
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl KanbanServerHandler {
    /// Pick up an item; the target starts at the item's own column
    pub async fn handle_select_item(&self, id: String) -> McpResult<String> {
        let item_id = validation::normalize_item_id(&id);
        let Some(item) = self.session.item(&item_id) else {
            bail_public!(_, "Item '{}' not found", item_id);
        };

        let mut drag = self.session.drag();
        if !drag.select(&item) {
            let current = drag.dragged_item().unwrap_or_default().to_string();
            drop(drag);
            bail_public!(
                _,
                "Item '{}' is already selected. Confirm or cancel that move first.",
                current
            );
        }
        let target = drag.hovered_column().unwrap_or_default().to_string();
        drop(drag);

        Ok(format!(
            "Selected '{}'. Target: {} [{}]",
            item_id,
            self.session.columns().label(&target),
            target
        ))
    }

    /// Move the target to the next or previous column
    pub async fn handle_cycle_target(&self, direction: Option<String>) -> McpResult<String> {
        let direction = validation::parse_direction(direction.as_deref())?;

        let mut drag = self.session.drag();
        let Some(target) = drag.cycle_target(direction).map(str::to_string) else {
            drop(drag);
            bail_public!(_, "No item selected. Use select_item first.");
        };
        drop(drag);

        Ok(format!(
            "Target: {} [{}]",
            self.session.columns().label(&target),
            target
        ))
    }

    /// Drop the selected item on the current target
    pub async fn handle_confirm_move(&self) -> McpResult<String> {
        let outcome = self.session.drag().confirm();
        match outcome {
            DragOutcome::Proposed(proposal) => {
                let submission = self.session.propose(&proposal.item_id, &proposal.to_column);
                self.describe_submission(submission, &proposal.item_id, &proposal.to_column)
            }
            DragOutcome::Ignored => {
                bail_public!(_, "No item selected. Use select_item first.");
            }
            other => Ok(formatting::format_outcome(&other)),
        }
    }

    /// Put the selected item down without moving it
    pub async fn handle_cancel_move(&self) -> McpResult<String> {
        let outcome = self.session.drag().cancel();
        Ok(formatting::format_outcome(&outcome))
    }
}
