//! Sharding rule configuration, loaded from TOML or JSON.
//!
//! ```toml
//! binding_tables = [["t_order", "t_order_item"]]
//!
//! [tables.t_order]
//! actual_data_nodes = ["ds_0.t_order_0", "ds_0.t_order_1"]
//! table_strategy = { type = "standard", column = "order_id", algorithm = "order_mod" }
//! ```

use super::ShardingStrategy;
use crate::error::RewriteResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardingTableConfiguration {
    /// `data_source.actual_table` entries.
    pub actual_data_nodes: Vec<String>,
    #[serde(default)]
    pub table_strategy: Option<ShardingStrategy>,
    #[serde(default)]
    pub database_strategy: Option<ShardingStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardingRuleConfiguration {
    /// Logic table name to its configuration.
    #[serde(default)]
    pub tables: IndexMap<String, ShardingTableConfiguration>,
    /// Groups of logic tables that shard in lockstep.
    #[serde(default)]
    pub binding_tables: Vec<Vec<String>>,
    /// Strategy for tables that configure none.
    #[serde(default)]
    pub default_table_strategy: Option<ShardingStrategy>,
    #[serde(default)]
    pub default_database_strategy: Option<ShardingStrategy>,
}

impl ShardingRuleConfiguration {
    pub fn from_toml_str(content: &str) -> RewriteResult<Self> {
        let config: Self = toml::from_str(content)?;
        tracing::info!(
            "Loaded sharding rule configuration: {} tables, {} binding groups",
            config.tables.len(),
            config.binding_tables.len()
        );
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> RewriteResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        tracing::info!(
            "Loaded sharding rule configuration: {} tables, {} binding groups",
            config.tables.len(),
            config.binding_tables.len()
        );
        Ok(config)
    }

    /// Load from a file; `.json` files are read as JSON, everything else as TOML.
    pub fn from_path(path: impl AsRef<Path>) -> RewriteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("Reading sharding rule configuration from {}", path.display());
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn table(mut self, logic_table: impl Into<String>, table: ShardingTableConfiguration) -> Self {
        self.tables.insert(logic_table.into(), table);
        self
    }

    pub fn binding_group<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.binding_tables.push(tables.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"
binding_tables = [["t_order", "t_order_item"]]

[tables.t_order]
actual_data_nodes = ["ds_0.t_order_0", "ds_0.t_order_1"]
table_strategy = { type = "standard", column = "order_id", algorithm = "order_mod" }

[tables.t_order_item]
actual_data_nodes = ["ds_0.t_order_item_0", "ds_0.t_order_item_1"]
table_strategy = { type = "standard", column = "order_id", algorithm = "order_mod" }
"#;

    #[test]
    fn test_from_toml() {
        let config = ShardingRuleConfiguration::from_toml_str(CONFIG).unwrap();
        assert_eq!(config.tables.len(), 2);
        assert_eq!(config.binding_tables, vec![vec!["t_order".to_string(), "t_order_item".to_string()]]);
        assert_eq!(
            config.tables["t_order"].table_strategy,
            Some(ShardingStrategy::Standard {
                column: "order_id".to_string(),
                algorithm: "order_mod".to_string(),
            })
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"tables": {"t_user": {"actual_data_nodes": ["ds_0.t_user_0"]}}}"#;
        let config = ShardingRuleConfiguration::from_json_str(json).unwrap();
        assert_eq!(config.tables["t_user"].actual_data_nodes, vec!["ds_0.t_user_0".to_string()]);
        assert!(config.binding_tables.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ShardingRuleConfiguration::from_toml_str("tables = 3").is_err());
    }
}
