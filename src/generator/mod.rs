//! Token generators.
//!
//! Each generator owns one rewrite concern. It first answers `is_applicable` for the
//! statement, and only then produces tokens. Generators are stateless; everything a
//! generator reads arrives through the per-statement [`RewriteContext`].

pub mod aggregation_distinct;
pub mod constraint;
pub mod cursor;
pub mod distinct_projection_prefix;
pub mod fetch_direction;
pub mod in_predicate;
pub mod index;
pub mod insert_values;
pub mod order_by;
pub mod pagination;
pub mod projections;
pub mod registry;
pub mod remove;
pub mod table;
mod utils;

#[cfg(test)]
mod tests;

pub use aggregation_distinct::AggregationDistinctTokenGenerator;
pub use constraint::ConstraintTokenGenerator;
pub use cursor::CursorTokenGenerator;
pub use distinct_projection_prefix::DistinctProjectionPrefixTokenGenerator;
pub use fetch_direction::FetchDirectionTokenGenerator;
pub use in_predicate::InPredicateTokenGenerator;
pub use index::IndexTokenGenerator;
pub use insert_values::InsertValuesTokenGenerator;
pub use order_by::OrderByTokenGenerator;
pub use pagination::{OffsetTokenGenerator, RowCountTokenGenerator};
pub use projections::ProjectionsTokenGenerator;
pub use registry::SqlTokenGenerators;
pub use remove::RemoveTokenGenerator;
pub use table::TableTokenGenerator;

use crate::context::StatementContext;
use crate::cursor::CursorDirectory;
use crate::error::RewriteResult;
use crate::metadata::Database;
use crate::route::RouteContext;
use crate::rule::ShardingRule;
use crate::token::SqlToken;
use std::sync::Arc;

/// Everything a generator may read while rewriting one statement.
#[derive(Debug, Clone)]
pub struct RewriteContext<'a> {
    pub sql: &'a str,
    pub statement: &'a StatementContext,
    pub rule: &'a ShardingRule,
    pub route: &'a RouteContext,
    pub database: &'a Database,
    /// Connection-scoped cursors, present when the connection has any.
    pub cursors: Option<Arc<CursorDirectory>>,
}

impl<'a> RewriteContext<'a> {
    pub fn new(
        sql: &'a str,
        statement: &'a StatementContext,
        rule: &'a ShardingRule,
        route: &'a RouteContext,
        database: &'a Database,
    ) -> Self {
        Self {
            sql,
            statement,
            rule,
            route,
            database,
            cursors: None,
        }
    }

    pub fn with_cursors(mut self, cursors: Arc<CursorDirectory>) -> Self {
        self.cursors = Some(cursors);
        self
    }

    /// Sharding logic tables referenced by the statement, in statement order.
    pub fn sharding_tables(&self) -> Vec<&'a str> {
        self.rule.sharding_logic_table_names(self.statement.tables().table_names())
    }
}

/// Common part of every generator.
pub trait TokenGenerator: Send + Sync {
    fn id(&self) -> &'static str;

    /// Higher runs first.
    fn priority(&self) -> u32 {
        100
    }

    /// Skip when the statement routes to exactly one unit.
    fn ignore_for_single_route(&self) -> bool {
        false
    }

    /// Cheap, side-effect free check.
    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool;
}

/// Produces exactly one token when applicable.
pub trait OptionalTokenGenerator: TokenGenerator {
    /// Returning `None` after `is_applicable` said yes is a contract violation.
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>>;
}

/// Produces zero or more tokens when applicable.
pub trait CollectionTokenGenerator: TokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>>;
}

pub enum RegisteredGenerator {
    Optional(Box<dyn OptionalTokenGenerator>),
    Collection(Box<dyn CollectionTokenGenerator>),
}

impl RegisteredGenerator {
    pub fn id(&self) -> &'static str {
        match self {
            RegisteredGenerator::Optional(g) => g.id(),
            RegisteredGenerator::Collection(g) => g.id(),
        }
    }

    pub fn priority(&self) -> u32 {
        match self {
            RegisteredGenerator::Optional(g) => g.priority(),
            RegisteredGenerator::Collection(g) => g.priority(),
        }
    }

    pub fn ignore_for_single_route(&self) -> bool {
        match self {
            RegisteredGenerator::Optional(g) => g.ignore_for_single_route(),
            RegisteredGenerator::Collection(g) => g.ignore_for_single_route(),
        }
    }

    pub fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        match self {
            RegisteredGenerator::Optional(g) => g.is_applicable(ctx),
            RegisteredGenerator::Collection(g) => g.is_applicable(ctx),
        }
    }
}

impl std::fmt::Debug for RegisteredGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisteredGenerator::Optional(g) => write!(f, "Optional({})", g.id()),
            RegisteredGenerator::Collection(g) => write!(f, "Collection({})", g.id()),
        }
    }
}
