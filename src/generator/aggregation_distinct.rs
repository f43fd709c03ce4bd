use super::*;
use crate::error::RewriteError;
use crate::token::AggregationDistinctToken;

/// `COUNT(DISTINCT x)` becomes `x [AS alias]`; the merger aggregates the distinct rows.
pub struct AggregationDistinctTokenGenerator;

impl TokenGenerator for AggregationDistinctTokenGenerator {
    fn id(&self) -> &'static str {
        "aggregation_distinct"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement
            .as_select()
            .is_some_and(|select| select.projections().aggregation_distinct_projections().next().is_some())
    }
}

impl CollectionTokenGenerator for AggregationDistinctTokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let Some(select) = ctx.statement.as_select() else {
            return Ok(Vec::new());
        };
        select
            .projections()
            .aggregation_distinct_projections()
            .map(|aggregation| {
                let alias = aggregation
                    .alias
                    .as_ref()
                    .ok_or_else(|| RewriteError::missing("alias", "aggregation distinct projection"))?;
                Ok(SqlToken::AggregationDistinct(AggregationDistinctToken {
                    span: aggregation.span,
                    column_name: aggregation.inner_expression.clone(),
                    derived_alias: aggregation.alias_derived.then(|| alias.clone()),
                }))
            })
            .collect()
    }
}
