//! # shard-rewrite
//!
//! Per-shard SQL rewriting for a database sharding middleware.
//!
//! A bound statement plus its route context go in; an ordered list of positional
//! [`token::SqlToken`]s comes out. Applying the tokens to the original SQL once per route
//! unit yields the SQL each physical shard executes.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use shard_rewrite::prelude::*;
//!
//! let statement = StatementContext::bind(parsed, Some(&cursors))?;
//! let ctx = RewriteContext::new(sql, &statement, &rule, &route, &database);
//! let tokens = SqlTokenGenerators::new().generate(&ctx)?;
//!
//! // One SQL string per route unit
//! let sqls = RouteSqlBuilder::new(sql, &tokens).build_all(&route)?;
//! ```
//!
//! ## Pipeline
//!
//! | Stage     | Module                   | Output                         |
//! |-----------|--------------------------|--------------------------------|
//! | Bind      | [`context`], [`extractor`] | `StatementContext`           |
//! | Generate  | [`generator`]            | `Vec<SqlToken>`                |
//! | Render    | [`builder`]              | `RouteUnit -> SQL`             |

pub mod ast;
pub mod builder;
pub mod context;
pub mod cursor;
pub mod dialect;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod metadata;
pub mod route;
pub mod rule;
pub mod token;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::builder::RouteSqlBuilder;
    pub use crate::context::StatementContext;
    pub use crate::cursor::{CursorDefinition, CursorDirectory};
    pub use crate::dialect::DatabaseType;
    pub use crate::error::*;
    pub use crate::generator::{RewriteContext, SqlTokenGenerators};
    pub use crate::metadata::{Database, TableMetaData};
    pub use crate::route::{RouteContext, RouteMapper, RouteUnit};
    pub use crate::rule::{
        AlgorithmRegistry, DataNode, PreciseShardingValue, ShardingRule, ShardingRuleConfiguration, ShardingStrategy,
        ShardingTableConfiguration, StandardShardingAlgorithm,
    };
    pub use crate::token::{SqlToken, TokenSpan};
}

use error::RewriteResult;
use generator::{RewriteContext, SqlTokenGenerators};
use indexmap::IndexMap;
use route::RouteUnit;

/// Generate tokens for a bound statement with every sharding generator and render
/// the SQL of each route unit.
///
/// Callers that keep a registry or need the tokens themselves use
/// [`SqlTokenGenerators`] and [`builder::RouteSqlBuilder`] directly.
pub fn rewrite(ctx: &RewriteContext<'_>) -> RewriteResult<IndexMap<RouteUnit, String>> {
    let tokens = SqlTokenGenerators::new().generate(ctx)?;
    tracing::debug!(
        "Rewriting {} statement with {} tokens for {} route units",
        ctx.statement.kind(),
        tokens.len(),
        ctx.route.route_units.len()
    );
    builder::RouteSqlBuilder::new(ctx.sql, &tokens).build_all(ctx.route)
}
