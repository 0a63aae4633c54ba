//! Column projection
//!
//! Column contents are never stored. They are derived from the item
//! collection on every pass by matching `Item::status` against the
//! canonical column key.

use super::columns::ColumnSet;
use super::item::{ColumnDescriptor, Item};

/// Items of one column, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProjection<'a> {
    pub column: &'a ColumnDescriptor,
    pub items: Vec<&'a Item>,
}

/// Result of projecting an item collection onto a column set
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    /// One entry per configured column, in configured order
    pub columns: Vec<ColumnProjection<'a>>,
    /// Items whose status matches no column
    pub orphans: Vec<&'a Item>,
}

impl<'a> Projection<'a> {
    /// Items of a column, or `None` for an unknown key
    pub fn get(&self, key: &str) -> Option<&[&'a Item]> {
        self.columns
            .iter()
            .find(|c| c.column.key == key)
            .map(|c| c.items.as_slice())
    }

    pub fn orphan_count(&self) -> usize {
        self.orphans.len()
    }

    pub fn orphan_ids(&self) -> Vec<&'a str> {
        self.orphans.iter().map(|i| i.id.as_str()).collect()
    }
}

/// Group items into the columns whose key equals their status
///
/// Pure and deterministic: the inputs are only read, and the same inputs
/// always produce the same grouping. Every configured column is present in
/// the result, possibly empty.
pub fn project<'a, I>(items: I, columns: &'a ColumnSet) -> Projection<'a>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut projected: Vec<ColumnProjection<'a>> = columns
        .iter()
        .map(|column| ColumnProjection {
            column,
            items: Vec::new(),
        })
        .collect();
    let mut orphans = Vec::new();

    for item in items {
        match columns.position(&item.status) {
            Some(i) => projected[i].items.push(item),
            None => orphans.push(item),
        }
    }

    Projection {
        columns: projected,
        orphans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> ColumnSet {
        ColumnSet::new(vec![
            ColumnDescriptor::new("todo", "To Do"),
            ColumnDescriptor::new("in_progress", "In Progress"),
            ColumnDescriptor::new("done", "Done"),
        ])
        .unwrap()
    }

    fn items() -> Vec<Item> {
        vec![
            Item::new("T1", "todo", "Fix bug"),
            Item::new("T2", "done", "Release"),
            Item::new("T3", "archived", "Old work"),
            Item::new("T4", "todo", "Triage"),
        ]
    }

    #[test]
    fn test_items_grouped_by_status_in_input_order() {
        let columns = columns();
        let items = items();
        let projection = project(&items, &columns);

        let todo: Vec<&str> = projection
            .get("todo")
            .unwrap()
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(todo, vec!["T1", "T4"]);
        assert!(projection.get("in_progress").unwrap().is_empty());
        assert_eq!(projection.get("done").unwrap().len(), 1);
        assert!(projection.get("archived").is_none());
    }

    #[test]
    fn test_every_column_present_in_configured_order() {
        let columns = columns();
        let projection = project(std::iter::empty(), &columns);
        let keys: Vec<&str> = projection
            .columns
            .iter()
            .map(|c| c.column.key.as_str())
            .collect();
        assert_eq!(keys, vec!["todo", "in_progress", "done"]);
        assert_eq!(projection.orphan_count(), 0);
    }

    #[test]
    fn test_orphans_are_counted_not_projected() {
        let columns = columns();
        let items = items();
        let projection = project(&items, &columns);

        assert_eq!(projection.orphan_count(), 1);
        assert_eq!(projection.orphan_ids(), vec!["T3"]);
        let projected: usize = projection.columns.iter().map(|c| c.items.len()).sum();
        assert_eq!(projected + projection.orphan_count(), items.len());
    }

    #[test]
    fn test_each_matching_item_in_exactly_one_column() {
        let columns = columns();
        let items = items();
        let projection = project(&items, &columns);

        for item in items.iter().filter(|i| columns.contains(&i.status)) {
            let hits = projection
                .columns
                .iter()
                .filter(|c| c.items.iter().any(|i| i.id == item.id))
                .count();
            assert_eq!(hits, 1, "{} should be in exactly one column", item.id);
        }
    }

    #[test]
    fn test_projection_is_idempotent_and_leaves_input_untouched() {
        let columns = columns();
        let items = items();
        let before = items.clone();

        let first = project(&items, &columns);
        let second = project(&items, &columns);

        assert_eq!(first, second);
        assert_eq!(items, before);
    }

    #[test]
    fn test_status_match_is_exact() {
        let columns = columns();
        // Labels and case variants are not accepted as status values
        let items = vec![
            Item::new("A", "To Do", "label instead of key"),
            Item::new("B", "TODO", "wrong case"),
        ];
        let projection = project(&items, &columns);
        assert!(projection.get("todo").unwrap().is_empty());
        assert_eq!(projection.orphan_count(), 2);
    }
}
