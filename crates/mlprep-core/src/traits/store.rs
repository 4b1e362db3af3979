//! Named-table store trait.

use crate::types::BarTable;

/// Destination for normalized tables, keyed by name.
pub trait TableStore {
    /// Register a table under `name`, replacing any earlier table.
    fn register(&mut self, name: &str, table: BarTable);

    /// Look up a registered table.
    fn get(&self, name: &str) -> Option<&BarTable>;

    /// Registered names in sorted order.
    fn names(&self) -> Vec<String>;
}
