//! Route context produced by the external router.

use crate::rule::DataNode;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Logic name to actual name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteMapper {
    pub logic_name: String,
    pub actual_name: String,
}

impl RouteMapper {
    pub fn new(logic_name: impl Into<String>, actual_name: impl Into<String>) -> Self {
        Self {
            logic_name: logic_name.into(),
            actual_name: actual_name.into(),
        }
    }
}

/// One physical destination of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteUnit {
    pub data_source: String,
    pub table_mappers: Vec<RouteMapper>,
}

impl RouteUnit {
    pub fn new(data_source: impl Into<String>, table_mappers: Vec<RouteMapper>) -> Self {
        Self {
            data_source: data_source.into(),
            table_mappers,
        }
    }

    /// Actual table mapped for `logic_table` in this unit.
    pub fn find_actual_table(&self, logic_table: &str) -> Option<&str> {
        self.table_mappers
            .iter()
            .find(|m| m.logic_name.eq_ignore_ascii_case(logic_table))
            .map(|m| m.actual_name.as_str())
    }

    pub fn actual_table_names(&self, logic_table: &str) -> Vec<&str> {
        self.table_mappers
            .iter()
            .filter(|m| m.logic_name.eq_ignore_ascii_case(logic_table))
            .map(|m| m.actual_name.as_str())
            .collect()
    }

    pub fn contains_data_node(&self, node: &DataNode) -> bool {
        self.data_source.eq_ignore_ascii_case(&node.data_source)
            && self.table_mappers.iter().any(|m| m.actual_name.eq_ignore_ascii_case(&node.table))
    }
}

impl std::fmt::Display for RouteUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.data_source)?;
        for mapper in &self.table_mappers {
            write!(f, " {}->{}", mapper.logic_name, mapper.actual_name)?;
        }
        Ok(())
    }
}

/// Route units of one statement plus per-row routing artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteContext {
    pub route_units: Vec<RouteUnit>,
    /// Data nodes of each VALUES row of an INSERT, in row order.
    #[serde(default)]
    pub original_data_nodes: Vec<Vec<DataNode>>,
}

impl RouteContext {
    pub fn new(route_units: Vec<RouteUnit>) -> Self {
        Self {
            route_units,
            original_data_nodes: Vec::new(),
        }
    }

    pub fn with_data_nodes(mut self, original_data_nodes: Vec<Vec<DataNode>>) -> Self {
        self.original_data_nodes = original_data_nodes;
        self
    }

    pub fn is_single_routing(&self) -> bool {
        self.route_units.len() == 1
    }

    /// Distinct actual tables routed for `logic_table` across all units.
    pub fn actual_table_names(&self, logic_table: &str) -> IndexSet<&str> {
        self.route_units
            .iter()
            .flat_map(|u| u.actual_table_names(logic_table))
            .collect()
    }

    /// True when some logic table is routed to more than one distinct actual table.
    pub fn spans_multiple_actual_tables(&self) -> bool {
        let logic_tables: IndexSet<String> = self
            .route_units
            .iter()
            .flat_map(|u| u.table_mappers.iter().map(|m| m.logic_name.to_lowercase()))
            .collect();
        logic_tables.iter().any(|t| self.actual_table_names(t).len() > 1)
    }

    pub fn find_actual_table<'a>(&self, unit: &'a RouteUnit, logic_table: &str) -> Option<&'a str> {
        unit.find_actual_table(logic_table)
    }
}
