//! Per-value route mapping for `sharding_column IN (literal, ...)`.
//!
//! The token annotates which route units each literal shards to; the rendered SQL keeps
//! the full list. Parameter markers or other non-literal items, non-standard strategies
//! and unresolvable algorithms all decline without a token.

use super::*;
use crate::ast::{ColumnSegment, Expr, InExpr, SelectStatement, TableSegment};
use crate::context::SelectStatementContext;
use crate::extractor::flatten_logical;
use crate::extractor::subquery::extract_subqueries;
use crate::route::RouteUnit;
use crate::rule::{PreciseShardingValue, ShardingStrategy};
use crate::token::InPredicateToken;
use indexmap::IndexMap;

pub struct InPredicateTokenGenerator;

struct Candidate<'s> {
    in_expr: &'s InExpr,
    column: &'s ColumnSegment,
    items: &'s [Expr],
    /// The SELECT whose WHERE or JOIN holds the predicate.
    scope: &'s SelectStatement,
}

/// WHERE expression and JOIN ... ON conditions of one SELECT, without nested SELECTs.
fn scope_conditions(scope: &SelectStatement) -> Vec<&Expr> {
    fn joins<'s>(table: &'s TableSegment, result: &mut Vec<&'s Expr>) {
        match table {
            TableSegment::Join(join) => {
                joins(&join.left, result);
                joins(&join.right, result);
                result.extend(join.condition.as_ref());
            }
            TableSegment::DeleteMultiTable(multi) => joins(&multi.relation_table, result),
            TableSegment::Simple(_) | TableSegment::Subquery(_) | TableSegment::Function(_) => {}
        }
    }
    let mut result: Vec<&Expr> = scope.where_clause.iter().map(|w| &w.expr).collect();
    if let Some(from) = &scope.from {
        joins(from, &mut result);
    }
    result
}

/// Simple tables named directly in a FROM clause, left to right.
fn scope_tables<'s>(table: &'s TableSegment, result: &mut Vec<&'s str>) {
    match table {
        TableSegment::Simple(simple) => result.push(simple.name()),
        TableSegment::Join(join) => {
            scope_tables(&join.left, result);
            scope_tables(&join.right, result);
        }
        TableSegment::DeleteMultiTable(multi) => scope_tables(&multi.relation_table, result),
        TableSegment::Subquery(_) | TableSegment::Function(_) => {}
    }
}

impl InPredicateTokenGenerator {
    /// Non-negated IN expressions over a column with a list of more than one item, from
    /// the statement and every nested SELECT.
    fn candidates(select: &SelectStatementContext) -> Vec<Candidate<'_>> {
        let statement = select.statement();
        let scopes = std::iter::once(statement)
            .chain(extract_subqueries(statement, true).into_iter().map(|s| s.segment.select.as_ref()));
        let mut result = Vec::new();
        for scope in scopes {
            for expr in scope_conditions(scope).into_iter().flat_map(flatten_logical) {
                let Expr::In(in_expr) = expr else { continue };
                if in_expr.not {
                    continue;
                }
                if let (Expr::Column(column), Expr::List(list)) = (in_expr.left.as_ref(), in_expr.right.as_ref())
                    && list.items.len() > 1
                {
                    result.push(Candidate {
                        in_expr,
                        column,
                        items: list.items.as_slice(),
                        scope,
                    });
                }
            }
        }
        result
    }

    /// Logic table of the column: its owner (alias or table), else the first sharding
    /// table in the FROM of the predicate's own SELECT.
    fn resolve_table<'s>(ctx: &RewriteContext<'_>, select: &'s SelectStatementContext, candidate: &Candidate<'s>) -> Option<&'s str> {
        if let Some(owner) = &candidate.column.owner {
            return select.tables().find_table_name(owner.value());
        }
        let mut tables = Vec::new();
        if let Some(from) = &candidate.scope.from {
            scope_tables(from, &mut tables);
        }
        tables.into_iter().find(|t| ctx.rule.is_sharding_table(t))
    }

    fn token(ctx: &RewriteContext<'_>, select: &SelectStatementContext, candidate: &Candidate<'_>) -> Option<SqlToken> {
        let (in_expr, column) = (candidate.in_expr, candidate.column);
        let logic_table = Self::resolve_table(ctx, select, candidate)?;
        let table = ctx.rule.find_sharding_table(logic_table)?;
        let ShardingStrategy::Standard {
            column: sharding_column,
            algorithm,
        } = &table.table_strategy
        else {
            tracing::trace!("IN predicate on '{}' is not under a standard strategy", logic_table);
            return None;
        };
        if !sharding_column.eq_ignore_ascii_case(column.name()) {
            return None;
        }
        let Some(algorithm) = ctx.rule.algorithm(algorithm) else {
            tracing::trace!("Sharding algorithm '{}' is not registered", algorithm);
            return None;
        };
        let mut literals = Vec::with_capacity(candidate.items.len());
        for item in candidate.items {
            match item {
                Expr::Literal(literal) => literals.push(&literal.value),
                _ => {
                    tracing::trace!("IN predicate on '{}' has a non-literal item", column.name());
                    return None;
                }
            }
        }

        let available_targets = table.all_actual_table_names();
        let mut value_routes: IndexMap<String, Vec<RouteUnit>> = IndexMap::new();
        for value in literals {
            let sharding_value = PreciseShardingValue {
                logic_table: table.logic_table.clone(),
                column: column.name().to_string(),
                value: value.clone(),
            };
            let units = match algorithm.do_sharding(&available_targets, &sharding_value) {
                Some(target) => ctx
                    .route
                    .route_units
                    .iter()
                    .filter(|u| u.find_actual_table(logic_table).is_some_and(|a| a.eq_ignore_ascii_case(&target)))
                    .cloned()
                    .collect(),
                None => Vec::new(),
            };
            value_routes.insert(value.to_string(), units);
        }
        Some(SqlToken::InPredicate(InPredicateToken {
            span: in_expr.span,
            column: column.name().to_string(),
            value_routes,
        }))
    }
}

impl TokenGenerator for InPredicateTokenGenerator {
    fn id(&self) -> &'static str {
        "in_predicate"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement
            .as_select()
            .is_some_and(|select| !Self::candidates(select).is_empty())
    }
}

impl CollectionTokenGenerator for InPredicateTokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let Some(select) = ctx.statement.as_select() else {
            return Ok(Vec::new());
        };
        Ok(Self::candidates(select)
            .into_iter()
            .filter_map(|candidate| Self::token(ctx, select, &candidate))
            .collect())
    }
}
