//! Tables bound to a statement.

use crate::ast::SimpleTableSegment;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TablesContext {
    tables: Vec<SimpleTableSegment>,
    /// Lower-case name to the name as first written.
    table_names: IndexMap<String, String>,
    /// Lower-case alias to table name.
    aliases: IndexMap<String, String>,
    schema_name: Option<String>,
}

impl TablesContext {
    pub fn new(tables: Vec<SimpleTableSegment>) -> Self {
        let mut table_names = IndexMap::new();
        let mut aliases = IndexMap::new();
        let mut schema_name = None;
        for table in &tables {
            table_names
                .entry(table.name().to_lowercase())
                .or_insert_with(|| table.name().to_string());
            if let Some(alias) = table.alias() {
                aliases.insert(alias.to_lowercase(), table.name().to_string());
            }
            if schema_name.is_none() {
                schema_name = table.owner.as_ref().map(|o| o.value().to_string());
            }
        }
        Self {
            tables,
            table_names,
            aliases,
            schema_name,
        }
    }

    /// Context for statements that reference tables only by name, such as FETCH.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table_names = IndexMap::new();
        for name in names {
            let name = name.as_ref();
            table_names.entry(name.to_lowercase()).or_insert_with(|| name.to_string());
        }
        Self {
            table_names,
            ..Default::default()
        }
    }

    /// Simple tables in discovery order, including tables recovered from qualifiers.
    pub fn tables(&self) -> &[SimpleTableSegment] {
        &self.tables
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.table_names.values().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.table_names.is_empty()
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.table_names.contains_key(&name.to_lowercase())
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    /// Table a qualifier refers to: an alias, or a table name in scope.
    pub fn find_table_name(&self, owner: &str) -> Option<&str> {
        let key = owner.to_lowercase();
        self.aliases
            .get(&key)
            .or_else(|| self.table_names.get(&key))
            .map(String::as_str)
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.contains_key(&name.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AliasSegment, Identifier, OwnerSegment, Span};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_names_aliases_and_schema() {
        let order = SimpleTableSegment::new(Span::new(21, 27), Identifier::new("t_order"))
            .with_owner(OwnerSegment::new(Span::new(14, 19), Identifier::new("public")))
            .with_alias(AliasSegment::new(Span::new(29, 29), Identifier::new("o")));
        let again = SimpleTableSegment::new(Span::new(40, 46), Identifier::new("T_ORDER"));
        let tables = TablesContext::new(vec![order, again]);

        assert_eq!(tables.table_names().collect::<Vec<_>>(), vec!["t_order"]);
        assert_eq!(tables.find_table_name("O"), Some("t_order"));
        assert_eq!(tables.find_table_name("t_order"), Some("t_order"));
        assert_eq!(tables.find_table_name("x"), None);
        assert_eq!(tables.schema_name(), Some("public"));
        assert!(tables.is_alias("o"));
        assert!(!tables.is_alias("t_order"));
    }

    #[test]
    fn test_from_names() {
        let tables = TablesContext::from_names(["t_order", "t_order_item", "T_ORDER"]);
        assert_eq!(tables.table_names().collect::<Vec<_>>(), vec!["t_order", "t_order_item"]);
        assert!(tables.tables().is_empty());
    }
}
