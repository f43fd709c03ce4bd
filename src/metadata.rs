//! Schema catalog of the logical database.

use crate::dialect::DatabaseType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMetaData {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub indexes: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl TableMetaData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.indexes.push(name.into());
        self
    }

    pub fn constraint(mut self, name: impl Into<String>) -> Self {
        self.constraints.push(name.into());
        self
    }

    pub fn contains_index(&self, index: &str) -> bool {
        self.indexes.iter().any(|i| i.eq_ignore_ascii_case(index))
    }
}

/// Tables of one schema, keyed by lower-case name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaMetaData {
    pub tables: IndexMap<String, TableMetaData>,
}

impl SchemaMetaData {
    pub fn add_table(&mut self, table: TableMetaData) {
        self.tables.insert(table.name.to_lowercase(), table);
    }

    pub fn table(&self, name: &str) -> Option<&TableMetaData> {
        self.tables.get(&name.to_lowercase())
    }
}

/// The logical database a statement runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
    pub database_type: DatabaseType,
    pub schemas: IndexMap<String, SchemaMetaData>,
}

impl Database {
    pub fn new(name: impl Into<String>, database_type: DatabaseType) -> Self {
        Self {
            name: name.into(),
            database_type,
            schemas: IndexMap::new(),
        }
    }

    /// Default schema: the dialect's (`public`), else the database name.
    pub fn default_schema(&self) -> String {
        self.database_type
            .default_schema()
            .map(str::to_string)
            .unwrap_or_else(|| self.name.to_lowercase())
    }

    pub fn add_table(&mut self, schema: &str, table: TableMetaData) {
        self.schemas.entry(schema.to_lowercase()).or_default().add_table(table);
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaMetaData> {
        self.schemas.get(&name.to_lowercase())
    }

    /// Table in `schema` that owns `index`.
    pub fn find_table_by_index(&self, schema: &str, index: &str) -> Option<&TableMetaData> {
        self.schema(schema)?.tables.values().find(|t| t.contains_index(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_table_by_index() {
        let mut db = Database::new("sharding_db", DatabaseType::PostgreSQL);
        db.add_table("public", TableMetaData::new("t_order").index("idx_user"));
        db.add_table("public", TableMetaData::new("t_user"));

        assert_eq!(db.default_schema(), "public");
        let table = db.find_table_by_index("public", "IDX_USER").map(|t| t.name.as_str());
        assert_eq!(table, Some("t_order"));
        assert!(db.find_table_by_index("other", "idx_user").is_none());
    }

    #[test]
    fn test_default_schema_falls_back_to_database_name() {
        let db = Database::new("Sharding_DB", DatabaseType::MySQL);
        assert_eq!(db.default_schema(), "sharding_db");
    }
}
