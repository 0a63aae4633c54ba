use super::item::ColumnDescriptor;
use crate::error::BoardError;
use std::collections::HashMap;

/// The validated, ordered set of columns of one board
///
/// Built once when the board is constructed and never changed afterwards.
/// Every key is non-empty and unique, and no two keys differ only by
/// surrounding whitespace or letter case, so matching an item's status
/// against a column is a single exact comparison.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
    /// key -> position in `columns`
    index: HashMap<String, usize>,
}

impl ColumnSet {
    /// Validate a configuration and build the column set
    ///
    /// # Errors
    /// Returns a [`BoardError`] if the list is empty, a key is blank, or two
    /// keys are duplicates of each other (exactly or after folding).
    pub fn new(columns: Vec<ColumnDescriptor>) -> Result<Self, BoardError> {
        if columns.is_empty() {
            return Err(BoardError::NoColumns);
        }

        let mut index = HashMap::with_capacity(columns.len());
        let mut folded: HashMap<String, &str> = HashMap::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if column.key.trim().is_empty() {
                return Err(BoardError::EmptyColumnKey { position });
            }
            if index.insert(column.key.clone(), position).is_some() {
                return Err(BoardError::DuplicateColumnKey {
                    key: column.key.clone(),
                });
            }
            let fold = column.key.trim().to_ascii_lowercase();
            if let Some(first) = folded.insert(fold, &column.key) {
                return Err(BoardError::CollidingColumnKeys {
                    first: first.to_string(),
                    second: column.key.clone(),
                });
            }
        }

        Ok(Self { columns, index })
    }

    /// Columns in configured order
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Position of a column in configured order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.position(key).map(|i| &self.columns[i])
    }

    pub fn at(&self, position: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(position)
    }

    /// Label for a key, falling back to the key itself for unknown columns
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|c| c.label.as_str()).unwrap_or(key)
    }

    /// Comma-separated list of keys, used in error messages
    pub fn keys_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| c.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors(pairs: &[(&str, &str)]) -> Vec<ColumnDescriptor> {
        pairs
            .iter()
            .map(|(k, l)| ColumnDescriptor::new(*k, *l))
            .collect()
    }

    #[test]
    fn test_valid_configuration_keeps_order() {
        let set = ColumnSet::new(descriptors(&[
            ("todo", "To Do"),
            ("in_progress", "In Progress"),
            ("done", "Done"),
        ]))
        .unwrap();

        let keys: Vec<&str> = set.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["todo", "in_progress", "done"]);
        assert_eq!(set.position("done"), Some(2));
        assert_eq!(set.label("in_progress"), "In Progress");
        assert_eq!(set.label("archived"), "archived");
        assert!(!set.contains("archived"));
    }

    #[test]
    fn test_empty_configuration_is_rejected() {
        assert_eq!(ColumnSet::new(Vec::new()).unwrap_err(), BoardError::NoColumns);
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let err = ColumnSet::new(descriptors(&[("todo", "To Do"), ("  ", "Blank")])).unwrap_err();
        assert_eq!(err, BoardError::EmptyColumnKey { position: 1 });
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let err =
            ColumnSet::new(descriptors(&[("todo", "To Do"), ("todo", "Also To Do")])).unwrap_err();
        assert_eq!(
            err,
            BoardError::DuplicateColumnKey {
                key: "todo".to_string()
            }
        );
    }

    #[test]
    fn test_colliding_keys_are_rejected() {
        let err = ColumnSet::new(descriptors(&[("Done", "Done"), ("done ", "Finished")])).unwrap_err();
        assert_eq!(
            err,
            BoardError::CollidingColumnKeys {
                first: "Done".to_string(),
                second: "done ".to_string()
            }
        );
    }
}
