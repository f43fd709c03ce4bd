//! Derived projections appended to the select list.
//!
//! AVG needs COUNT and SUM companions to merge, and ORDER BY / GROUP BY items missing
//! from the select list must be returned so the merger can sort and group.

use super::utils::{require_actual_table, statement_actual_tables};
use super::*;
use crate::context::{DerivedProjection, SelectStatementContext};
use crate::route::RouteUnit;
use crate::token::{ProjectionsToken, RouteUnitTexts};
use indexmap::IndexMap;

pub struct ProjectionsTokenGenerator;

enum DerivedText<'a> {
    Fixed { expression: String, alias: String },
    Column(&'a DerivedProjection),
}

impl ProjectionsTokenGenerator {
    fn derived_texts(select: &SelectStatementContext) -> Vec<DerivedText<'_>> {
        let projections = select.projections();
        let mut result = Vec::new();
        let mut aliases: Vec<String> = Vec::new();
        for aggregation in projections.aggregation_projections().filter(|a| !a.distinct) {
            for derived in &aggregation.derived_aggregations {
                let Some(alias) = &derived.alias else { continue };
                if projections.contains_alias(alias) || aliases.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
                    continue;
                }
                aliases.push(alias.clone());
                result.push(DerivedText::Fixed {
                    expression: derived.expression(),
                    alias: alias.clone(),
                });
            }
        }
        for derived in projections.derived_projections() {
            if projections.contains_alias(&derived.alias) || aliases.iter().any(|a| a.eq_ignore_ascii_case(&derived.alias)) {
                continue;
            }
            aliases.push(derived.alias.clone());
            result.push(DerivedText::Column(derived));
        }
        result
    }

    fn render(
        ctx: &RewriteContext<'_>,
        select: &SelectStatementContext,
        derived: &[DerivedText<'_>],
        unit: &RouteUnit,
        mapping: Option<&IndexMap<String, String>>,
    ) -> RewriteResult<String> {
        let mut texts = Vec::with_capacity(derived.len());
        for each in derived {
            match each {
                DerivedText::Fixed { expression, alias } => texts.push(format!("{} AS {}", expression, alias)),
                DerivedText::Column(projection) => {
                    let mut expression = projection.expression.clone();
                    if let Some(mapping) = mapping
                        && let Some(column) = &projection.column
                        && let Some(owner) = &column.owner
                        && !select.tables().is_alias(owner.value())
                        && ctx.rule.is_sharding_table(owner.value())
                    {
                        let actual = require_actual_table(mapping, owner.value(), unit)?;
                        expression = format!("{}.{}", owner.identifier.quote.wrap(actual), column.identifier);
                    }
                    texts.push(format!("{} AS {}", expression, projection.alias));
                }
            }
        }
        Ok(format!(", {}", texts.join(", ")))
    }
}

impl TokenGenerator for ProjectionsTokenGenerator {
    fn id(&self) -> &'static str {
        "projections"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement
            .as_select()
            .is_some_and(|select| !Self::derived_texts(select).is_empty())
    }
}

impl OptionalTokenGenerator for ProjectionsTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let Some(select) = ctx.statement.as_select() else {
            return Ok(None);
        };
        let derived = Self::derived_texts(select);
        if derived.is_empty() {
            return Ok(None);
        }
        // Owners are requalified only where the table token rewrites the table itself
        let mut texts = RouteUnitTexts::new();
        if TableTokenGenerator.is_applicable(ctx) {
            for (unit, mapping) in statement_actual_tables(ctx) {
                texts.insert(unit.clone(), Self::render(ctx, select, &derived, unit, Some(&mapping))?);
            }
        } else {
            for unit in &ctx.route.route_units {
                texts.insert(unit.clone(), Self::render(ctx, select, &derived, unit, None)?);
            }
        }
        Ok(Some(SqlToken::Projections(ProjectionsToken {
            at: select.projections().span.stop + 1,
            texts,
        })))
    }
}
