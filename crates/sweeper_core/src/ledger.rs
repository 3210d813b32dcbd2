use std::collections::HashSet;

/// Append-only, deduplicated record of keywords with first-seen order kept
/// for display.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl PartialEq for Ledger {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Ledger {}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = String>) -> Self {
        let mut ledger = Self::new();
        ledger.merge(items);
        ledger
    }

    /// Appends unseen items and returns how many were new. Safe to call with
    /// an empty iterator.
    pub fn merge(&mut self, new_items: impl IntoIterator<Item = String>) -> usize {
        let mut added = 0;
        for item in new_items {
            if self.seen.insert(item.clone()) {
                self.items.push(item);
                added += 1;
            }
        }
        added
    }

    /// Consuming form of [`Ledger::merge`]: `(updated, new_count)`.
    pub fn merged(mut self, new_items: impl IntoIterator<Item = String>) -> (Self, usize) {
        let added = self.merge(new_items);
        (self, added)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
