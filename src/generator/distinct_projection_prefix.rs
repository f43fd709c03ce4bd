use super::*;
use crate::token::DistinctProjectionPrefixToken;

/// `DISTINCT ` before the select list when a DISTINCT aggregation is merged from
/// per-shard distinct values.
pub struct DistinctProjectionPrefixTokenGenerator;

impl TokenGenerator for DistinctProjectionPrefixTokenGenerator {
    fn id(&self) -> &'static str {
        "distinct_projection_prefix"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement.as_select().is_some_and(|select| {
            let projections = select.projections();
            !projections.distinct_row && projections.aggregation_distinct_projections().next().is_some()
        })
    }
}

impl OptionalTokenGenerator for DistinctProjectionPrefixTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        Ok(ctx.statement.as_select().map(|select| {
            SqlToken::DistinctProjectionPrefix(DistinctProjectionPrefixToken {
                at: select.projections().span.start,
            })
        }))
    }
}
