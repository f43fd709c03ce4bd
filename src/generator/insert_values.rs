//! VALUES rows split by the shard each row routes to.

use super::utils::original_text;
use super::*;
use crate::ast::Span;
use crate::route::RouteUnit;
use crate::token::{InsertValuesToken, RouteUnitTexts};

pub struct InsertValuesTokenGenerator;

impl InsertValuesTokenGenerator {
    /// Rows whose data nodes fall in `unit`. Without per-row routing every row goes everywhere.
    fn rows_for<'r>(ctx: &RewriteContext<'_>, rows: &'r [String], unit: &RouteUnit) -> Vec<&'r str> {
        let data_nodes = &ctx.route.original_data_nodes;
        rows.iter()
            .enumerate()
            .filter(|(i, _)| match data_nodes.get(*i) {
                Some(nodes) if !nodes.is_empty() => nodes.iter().any(|n| unit.contains_data_node(n)),
                _ => true,
            })
            .map(|(_, row)| row.as_str())
            .collect()
    }
}

impl TokenGenerator for InsertValuesTokenGenerator {
    fn id(&self) -> &'static str {
        "insert_values"
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement.as_insert().is_some_and(|insert| !insert.values().is_empty())
    }
}

impl OptionalTokenGenerator for InsertValuesTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let Some(insert) = ctx.statement.as_insert() else {
            return Ok(None);
        };
        let (Some(first), Some(last)) = (insert.values().first(), insert.values().last()) else {
            return Ok(None);
        };
        let rows = insert
            .values()
            .iter()
            .map(|row| original_text(ctx.sql, row.span))
            .collect::<RewriteResult<Vec<_>>>()?;
        let texts: RouteUnitTexts = ctx
            .route
            .route_units
            .iter()
            .map(|unit| (unit.clone(), Self::rows_for(ctx, &rows, unit).join(", ")))
            .collect();
        Ok(Some(SqlToken::InsertValues(InsertValuesToken {
            span: Span::new(first.span.start, last.span.stop),
            texts,
        })))
    }
}
