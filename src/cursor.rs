//! Connection-scoped cursor directory.
//!
//! Owned by the statement-execution layer for the lifetime of a connection and shared
//! with FETCH rewriting, which reads how many rows the merger already buffered per
//! cursor. Cursor names are case-insensitive.

use dashmap::DashMap;

/// What a declared cursor reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorDefinition {
    /// Logic tables of the cursor's SELECT, in statement order.
    pub table_names: Vec<String>,
}

impl CursorDefinition {
    pub fn new<I, S>(table_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table_names: table_names.into_iter().map(Into::into).collect(),
        }
    }
}

/// Thread-safe cursor registry.
#[derive(Debug, Default)]
pub struct CursorDirectory {
    definitions: DashMap<String, CursorDefinition>,
    buffered_rows: DashMap<String, u64>,
}

impl CursorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&self, name: &str, definition: CursorDefinition) {
        let name = name.to_lowercase();
        tracing::debug!("Declared cursor '{}' over {:?}", name, definition.table_names);
        self.buffered_rows.remove(&name);
        self.definitions.insert(name, definition);
    }

    pub fn definition(&self, name: &str) -> Option<CursorDefinition> {
        self.definitions.get(&name.to_lowercase()).map(|d| d.value().clone())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.definitions.contains_key(&name.to_lowercase())
    }

    /// Record the smallest per-shard row count the merger holds for `name`.
    pub fn record_buffered_rows(&self, name: &str, count: u64) {
        self.buffered_rows.insert(name.to_lowercase(), count);
    }

    pub fn buffered_rows(&self, name: &str) -> u64 {
        self.buffered_rows.get(&name.to_lowercase()).map(|c| *c).unwrap_or(0)
    }

    pub fn close(&self, name: &str) {
        let name = name.to_lowercase();
        self.definitions.remove(&name);
        self.buffered_rows.remove(&name);
        tracing::debug!("Closed cursor '{}'", name);
    }

    pub fn close_all(&self) {
        let count = self.definitions.len();
        self.definitions.clear();
        self.buffered_rows.clear();
        tracing::debug!("Closed {} cursors", count);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_case_insensitive() {
        let cursors = CursorDirectory::new();
        cursors.declare("Order_Cursor", CursorDefinition::new(["t_order"]));
        assert!(cursors.is_declared("ORDER_CURSOR"));
        assert_eq!(
            cursors.definition("order_cursor").map(|d| d.table_names),
            Some(vec!["t_order".to_string()])
        );
    }

    #[test]
    fn test_buffered_rows() {
        let cursors = CursorDirectory::new();
        cursors.declare("c", CursorDefinition::new(["t_order"]));
        assert_eq!(cursors.buffered_rows("c"), 0);
        cursors.record_buffered_rows("C", 3);
        assert_eq!(cursors.buffered_rows("c"), 3);

        cursors.close("c");
        assert_eq!(cursors.buffered_rows("c"), 0);
        assert!(cursors.is_empty());
    }

    #[test]
    fn test_close_all() {
        let cursors = CursorDirectory::new();
        cursors.declare("a", CursorDefinition::new(["t_order"]));
        cursors.declare("b", CursorDefinition::new(["t_user"]));
        assert_eq!(cursors.len(), 2);
        cursors.close_all();
        assert!(cursors.is_empty());
    }
}
