use super::item::Item;
use crate::error::BoardError;
use std::collections::HashMap;

/// The authoritative item collection of a board
pub struct ItemStore {
    /// All items in insertion order
    ///
    /// A Vec keeps the projection order stable: items show up in a column in
    /// the order they were loaded, no matter how often their status changes.
    items: Vec<Item>,

    /// id -> position in `items`
    ///
    /// Kept in sync with `items` by every mutating method. Lookups by id
    /// (which is what every drop does) never scan the Vec.
    index: HashMap<String, usize>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build a store from an initial collection
    ///
    /// # Errors
    /// Returns [`BoardError::DuplicateItem`] if two items share an id
    pub fn from_items(items: Vec<Item>) -> Result<Self, BoardError> {
        let mut store = Self::new();
        for item in items {
            if store.index.contains_key(&item.id) {
                return Err(BoardError::DuplicateItem { id: item.id });
            }
            store.push(item);
        }
        Ok(store)
    }

    fn push(&mut self, item: Item) {
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by id
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Insert a new item or replace the display attributes of an existing one
    ///
    /// When the id already exists its status is kept: status changes go
    /// through the coordinator only.
    ///
    /// # Returns
    /// `true` if the item was new
    pub fn upsert(&mut self, item: Item) -> bool {
        match self.index.get(&item.id) {
            Some(&i) => {
                let status = std::mem::take(&mut self.items[i].status);
                self.items[i] = Item { status, ..item };
                false
            }
            None => {
                self.push(item);
                true
            }
        }
    }

    /// Remove an item and return it
    pub fn remove(&mut self, id: &str) -> Option<Item> {
        let position = self.index.remove(id)?;
        let item = self.items.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(item)
    }

    /// Overwrite the status of an item, returning the previous one
    ///
    /// Restricted to the crate: the coordinator is the only writer of
    /// `status` once a board is running.
    pub(crate) fn set_status(&mut self, id: &str, status: &str) -> Option<String> {
        let &i = self.index.get(id)?;
        Some(std::mem::replace(
            &mut self.items[i].status,
            status.to_string(),
        ))
    }
}
