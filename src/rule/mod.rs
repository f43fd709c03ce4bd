//! Sharding topology: logic tables, their actual data nodes, strategies and binding groups.
//!
//! A `ShardingRule` is immutable once built. Share it behind an `Arc` and replace the
//! whole value on reconfiguration.

pub mod algorithm;
pub mod config;

pub use algorithm::{AlgorithmRegistry, PreciseShardingValue, ShardingStrategy, StandardShardingAlgorithm};
pub use config::{ShardingRuleConfiguration, ShardingTableConfiguration};

use crate::error::{RewriteError, RewriteResult};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One physical table in one data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataNode {
    pub data_source: String,
    pub table: String,
}

impl DataNode {
    pub fn new(data_source: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            table: table.into(),
        }
    }

    /// Parse `data_source.table`.
    pub fn parse(text: &str) -> RewriteResult<Self> {
        match text.trim().split_once('.') {
            Some((ds, table)) if !ds.is_empty() && !table.is_empty() => Ok(Self::new(ds, table)),
            _ => Err(RewriteError::config(format!("Invalid data node '{}', expected 'data_source.table'", text))),
        }
    }
}

impl std::fmt::Display for DataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.data_source, self.table)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShardingTable {
    pub logic_table: String,
    pub actual_data_nodes: Vec<DataNode>,
    pub table_strategy: ShardingStrategy,
    pub database_strategy: ShardingStrategy,
}

impl ShardingTable {
    /// Actual tables of this logic table inside `data_source`, in configuration order.
    pub fn actual_table_names(&self, data_source: &str) -> Vec<&str> {
        self.actual_data_nodes
            .iter()
            .filter(|n| n.data_source.eq_ignore_ascii_case(data_source))
            .map(|n| n.table.as_str())
            .collect()
    }

    /// Every distinct actual table name across data sources.
    pub fn all_actual_table_names(&self) -> Vec<String> {
        let names: IndexSet<&str> = self.actual_data_nodes.iter().map(|n| n.table.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn find_actual_table_index(&self, data_source: &str, actual_table: &str) -> Option<usize> {
        self.actual_table_names(data_source)
            .iter()
            .position(|t| t.eq_ignore_ascii_case(actual_table))
    }

    pub fn actual_table_by_index(&self, data_source: &str, index: usize) -> Option<&str> {
        self.actual_table_names(data_source).get(index).copied()
    }
}

/// Logic tables that always shard together.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingTableGroup {
    tables: IndexSet<String>,
}

impl BindingTableGroup {
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tables: tables.into_iter().map(|t| t.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn contains(&self, logic_table: &str) -> bool {
        self.tables.contains(&logic_table.to_lowercase())
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct ShardingRule {
    tables: IndexMap<String, ShardingTable>,
    binding_groups: Vec<BindingTableGroup>,
    algorithms: AlgorithmRegistry,
}

impl ShardingRule {
    /// Build and validate a rule. Unknown algorithms and binding members that are not
    /// configured tables are rejected.
    pub fn new(config: ShardingRuleConfiguration, algorithms: AlgorithmRegistry) -> RewriteResult<Self> {
        let mut tables = IndexMap::with_capacity(config.tables.len());
        for (logic_table, table_config) in config.tables {
            let actual_data_nodes = table_config
                .actual_data_nodes
                .iter()
                .map(|n| DataNode::parse(n))
                .collect::<RewriteResult<Vec<_>>>()?;
            if actual_data_nodes.is_empty() {
                return Err(RewriteError::config(format!("Table '{}' has no actual data nodes", logic_table)));
            }
            let table_strategy = table_config
                .table_strategy
                .or_else(|| config.default_table_strategy.clone())
                .unwrap_or_default();
            let database_strategy = table_config
                .database_strategy
                .or_else(|| config.default_database_strategy.clone())
                .unwrap_or_default();
            for strategy in [&table_strategy, &database_strategy] {
                if let ShardingStrategy::Standard { algorithm, .. } = strategy {
                    algorithms.require(algorithm)?;
                }
            }
            tables.insert(
                logic_table.to_lowercase(),
                ShardingTable {
                    logic_table,
                    actual_data_nodes,
                    table_strategy,
                    database_strategy,
                },
            );
        }

        let mut binding_groups = Vec::with_capacity(config.binding_tables.len());
        for group in config.binding_tables {
            if let Some(missing) = group.iter().find(|t| !tables.contains_key(&t.to_lowercase())) {
                return Err(RewriteError::config(format!(
                    "Binding table '{}' is not a configured sharding table",
                    missing
                )));
            }
            binding_groups.push(BindingTableGroup::new(&group));
        }

        tracing::info!(
            "Built sharding rule with {} tables and {} binding groups",
            tables.len(),
            binding_groups.len()
        );
        Ok(Self {
            tables,
            binding_groups,
            algorithms,
        })
    }

    pub fn is_sharding_table(&self, logic_table: &str) -> bool {
        self.tables.contains_key(&logic_table.to_lowercase())
    }

    pub fn find_sharding_table(&self, logic_table: &str) -> Option<&ShardingTable> {
        self.tables.get(&logic_table.to_lowercase())
    }

    /// The subset of `names` that are sharding tables, in input order.
    pub fn sharding_logic_table_names<'a, I>(&self, names: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().filter(|n| self.is_sharding_table(n)).collect()
    }

    pub fn find_binding_group(&self, logic_table: &str) -> Option<&BindingTableGroup> {
        self.binding_groups.iter().find(|g| g.contains(logic_table))
    }

    /// True when `names` is non-empty and every name belongs to one binding group.
    pub fn is_all_binding_tables<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = names.into_iter().collect();
        let Some(first) = names.first() else {
            return false;
        };
        match self.find_binding_group(first) {
            Some(group) => names.iter().all(|n| group.contains(n)),
            None => false,
        }
    }

    /// Resolve actual tables for logic tables that a route unit does not map directly,
    /// through a binding partner that it does map.
    ///
    /// The partner's actual table index within `data_source` selects the same index of
    /// the unmapped table's actual tables. `mapped` holds lower-case logic names.
    pub fn logic_and_actual_tables_from_binding(
        &self,
        data_source: &str,
        logic_tables: &[&str],
        mapped: &IndexMap<String, String>,
    ) -> IndexMap<String, String> {
        let mut result = IndexMap::new();
        for logic_table in logic_tables {
            let key = logic_table.to_lowercase();
            if mapped.contains_key(&key) {
                continue;
            }
            let (Some(group), Some(table)) = (self.find_binding_group(logic_table), self.find_sharding_table(logic_table))
            else {
                continue;
            };
            let actual = group.tables().find_map(|partner| {
                let partner_actual = mapped.get(partner)?;
                let index = self.find_sharding_table(partner)?.find_actual_table_index(data_source, partner_actual)?;
                table.actual_table_by_index(data_source, index)
            });
            if let Some(actual) = actual {
                result.insert(key, actual.to_string());
            }
        }
        result
    }

    /// Table and database sharding columns of a logic table.
    pub fn sharding_columns(&self, logic_table: &str) -> Vec<&str> {
        let Some(table) = self.find_sharding_table(logic_table) else {
            return Vec::new();
        };
        let mut columns = table.table_strategy.sharding_columns();
        for column in table.database_strategy.sharding_columns() {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                columns.push(column);
            }
        }
        columns
    }

    pub fn is_sharding_column(&self, logic_table: &str, column: &str) -> bool {
        self.sharding_columns(logic_table).iter().any(|c| c.eq_ignore_ascii_case(column))
    }

    pub fn algorithm(&self, name: &str) -> Option<&Arc<dyn StandardShardingAlgorithm>> {
        self.algorithms.get(name)
    }
}
