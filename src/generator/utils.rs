use super::RewriteContext;
use crate::ast::Span;
use crate::error::{RewriteError, RewriteResult};
use crate::route::RouteUnit;
use crate::rule::ShardingRule;
use indexmap::IndexMap;

/// Lower-case logic table to actual table for one route unit.
///
/// Tables the unit maps directly come first; the rest are resolved through a binding
/// partner that the unit does map.
pub(crate) fn logic_and_actual_tables(
    rule: &ShardingRule,
    unit: &RouteUnit,
    logic_tables: &[&str],
) -> IndexMap<String, String> {
    let mut result: IndexMap<String, String> = IndexMap::new();
    for logic_table in logic_tables {
        if let Some(actual) = unit.find_actual_table(logic_table) {
            result.insert(logic_table.to_lowercase(), actual.to_string());
        }
    }
    let derived = rule.logic_and_actual_tables_from_binding(&unit.data_source, logic_tables, &result);
    result.extend(derived);
    result
}

/// Mapping of every table the statement names, for each route unit in route order.
///
/// Table names and the owners of derived projections resolve through the same mapping.
pub(crate) fn statement_actual_tables<'r>(ctx: &RewriteContext<'r>) -> Vec<(&'r RouteUnit, IndexMap<String, String>)> {
    let logic_tables: Vec<&str> = ctx.statement.tables().table_names().collect();
    ctx.route
        .route_units
        .iter()
        .map(|unit| (unit, logic_and_actual_tables(ctx.rule, unit, &logic_tables)))
        .collect()
}

pub(crate) fn require_actual_table<'m>(
    mapping: &'m IndexMap<String, String>,
    logic_table: &str,
    unit: &RouteUnit,
) -> RewriteResult<&'m str> {
    mapping
        .get(&logic_table.to_lowercase())
        .map(String::as_str)
        .ok_or_else(|| RewriteError::actual_table_not_found(logic_table, &unit.data_source))
}

/// Text of the inclusive character range `span`.
pub(crate) fn original_text(sql: &str, span: Span) -> RewriteResult<String> {
    let len = sql.chars().count();
    if span.start > span.stop || span.stop >= len {
        return Err(RewriteError::SpanOutOfRange {
            start: span.start,
            stop: span.stop,
            len,
        });
    }
    Ok(sql.chars().skip(span.start).take(span.stop - span.start + 1).collect())
}
