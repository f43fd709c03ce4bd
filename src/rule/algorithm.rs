//! Sharding strategies and the algorithm registry.
//!
//! Concrete algorithms (hash, range, modulo) live outside this crate; they are
//! registered by name and invoked only for rewrite-time decisions such as the IN
//! predicate route mapping.

use crate::ast::LiteralValue;
use crate::error::{RewriteError, RewriteResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// A single sharding value offered to a standard algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct PreciseShardingValue {
    pub logic_table: String,
    pub column: String,
    pub value: LiteralValue,
}

/// Single-column, single-value sharding algorithm.
pub trait StandardShardingAlgorithm: Send + Sync + Debug {
    /// Pick the target among `available_targets` for `value`, or `None` when no target matches.
    fn do_sharding(&self, available_targets: &[String], value: &PreciseShardingValue) -> Option<String>;
}

/// How a table (or database) is split.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShardingStrategy {
    Standard {
        column: String,
        algorithm: String,
    },
    Complex {
        columns: Vec<String>,
        algorithm: String,
    },
    Hint {
        algorithm: String,
    },
    #[default]
    None,
}

impl ShardingStrategy {
    pub fn sharding_columns(&self) -> Vec<&str> {
        match self {
            ShardingStrategy::Standard { column, .. } => vec![column.as_str()],
            ShardingStrategy::Complex { columns, .. } => columns.iter().map(String::as_str).collect(),
            ShardingStrategy::Hint { .. } | ShardingStrategy::None => Vec::new(),
        }
    }

    pub fn algorithm_name(&self) -> Option<&str> {
        match self {
            ShardingStrategy::Standard { algorithm, .. }
            | ShardingStrategy::Complex { algorithm, .. }
            | ShardingStrategy::Hint { algorithm } => Some(algorithm),
            ShardingStrategy::None => None,
        }
    }
}

/// Standard algorithms keyed by configured name.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: IndexMap<String, Arc<dyn StandardShardingAlgorithm>>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, algorithm: Arc<dyn StandardShardingAlgorithm>) {
        self.algorithms.insert(name.into(), algorithm);
    }

    pub fn with(mut self, name: impl Into<String>, algorithm: Arc<dyn StandardShardingAlgorithm>) -> Self {
        self.register(name, algorithm);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn StandardShardingAlgorithm>> {
        self.algorithms.get(name)
    }

    pub fn require(&self, name: &str) -> RewriteResult<&Arc<dyn StandardShardingAlgorithm>> {
        self.get(name).ok_or_else(|| RewriteError::UnknownAlgorithm(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct First;

    impl StandardShardingAlgorithm for First {
        fn do_sharding(&self, available_targets: &[String], _value: &PreciseShardingValue) -> Option<String> {
            available_targets.first().cloned()
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = AlgorithmRegistry::new().with("first", Arc::new(First));
        assert!(registry.contains("first"));
        assert!(matches!(registry.require("mod"), Err(RewriteError::UnknownAlgorithm(name)) if name == "mod"));
    }

    #[test]
    fn test_strategy_deserialize() {
        let strategy: ShardingStrategy =
            serde_json::from_str(r#"{"type": "standard", "column": "order_id", "algorithm": "mod"}"#).unwrap();
        assert_eq!(strategy.sharding_columns(), vec!["order_id"]);
        assert_eq!(strategy.algorithm_name(), Some("mod"));
    }
}
