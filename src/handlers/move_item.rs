//! Direct move handler (what a completed drop amounts to)

use crate::KanbanServerHandler;
use crate::coordinator::{Skip, Submission};
use crate::formatting;
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl KanbanServerHandler {
    /// **Move**: Put an item into another column.
    /// The board shows the new column immediately; the change is then saved
    /// in the background and reverted if saving fails.
    pub async fn handle_move_item(&self, id: String, column: String) -> McpResult<String> {
        let item_id = validation::normalize_item_id(&id);
        if item_id.is_empty() {
            bail_public!(_, "No item ID provided. Please specify the item to move.");
        }
        let key = validation::parse_column(&column, self.session.columns())?;

        let submission = self.session.propose(&item_id, &key);
        self.describe_submission(submission, &item_id, &key)
    }

    /// Turn a coordinator submission into a tool response
    pub(crate) fn describe_submission(
        &self,
        submission: Submission,
        item_id: &str,
        column: &str,
    ) -> McpResult<String> {
        match submission {
            Submission::Submitted(_) => Ok(format!(
                "Moving '{}' to {}. Call notification to see whether the change was saved.",
                item_id,
                self.session.columns().label(column)
            )),
            Submission::Skipped(Skip::NoOp) => Ok(formatting::format_skip(Skip::NoOp, item_id, column)),
            Submission::Skipped(skip) => {
                bail_public!(_, "{}", formatting::format_skip(skip, item_id, column));
            }
        }
    }
}
