//! In-memory named-table store.

use mlprep_core::traits::TableStore;
use mlprep_core::types::BarTable;
use std::collections::BTreeMap;

/// Simple in-memory table store.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: BTreeMap<String, BarTable>,
}

impl MemoryTableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate over tables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &BarTable)> {
        self.tables.iter()
    }
}

impl TableStore for MemoryTableStore {
    fn register(&mut self, name: &str, table: BarTable) {
        self.tables.insert(name.to_string(), table);
    }

    fn get(&self, name: &str) -> Option<&BarTable> {
        self.tables.get(name)
    }

    fn names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlprep_core::types::FeedKind;

    #[test]
    fn test_register_replaces() {
        let mut store = MemoryTableStore::new();
        store.register("aapl", BarTable::empty("AAPL", FeedKind::Daily));
        store.register("aapl", BarTable::empty("AAPL", FeedKind::Intraday));
        store.register("msft", BarTable::empty("MSFT", FeedKind::Daily));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("aapl").unwrap().kind, FeedKind::Intraday);
        assert_eq!(store.names(), vec!["aapl".to_string(), "msft".to_string()]);
        assert!(store.get("spy").is_none());
    }
}
