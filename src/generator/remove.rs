//! Text deleted from every shard's SQL.

use super::*;
use crate::ast::{SimpleTableSegment, Span};
use crate::token::RemoveToken;

/// Removes a GROUP BY that only emulates DISTINCT aggregation, and owners that name the
/// logical database (`sharding_db.t_order` becomes `t_order`).
pub struct RemoveTokenGenerator;

impl RemoveTokenGenerator {
    fn removable_group_by(ctx: &RewriteContext<'_>) -> Option<Span> {
        if ctx.route.is_single_routing() {
            return None;
        }
        let select = ctx.statement.as_select()?;
        if !select.is_distinct_emulating_group_by() {
            return None;
        }
        select.statement().group_by.as_ref().map(|g| g.span)
    }

    fn database_owned_tables<'a>(ctx: &RewriteContext<'a>) -> impl Iterator<Item = &'a SimpleTableSegment> {
        let database = ctx.database.name.as_str();
        ctx.statement
            .tables()
            .tables()
            .iter()
            .filter(move |t| t.owner.as_ref().is_some_and(|o| o.value().eq_ignore_ascii_case(database)))
    }
}

impl TokenGenerator for RemoveTokenGenerator {
    fn id(&self) -> &'static str {
        "remove"
    }

    fn priority(&self) -> u32 {
        200
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        Self::removable_group_by(ctx).is_some() || Self::database_owned_tables(ctx).next().is_some()
    }
}

impl CollectionTokenGenerator for RemoveTokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let mut result = Vec::new();
        if let Some(span) = Self::removable_group_by(ctx) {
            result.push(SqlToken::Remove(RemoveToken { span }));
        }
        let mut seen = Vec::new();
        for table in Self::database_owned_tables(ctx) {
            let Some(owner) = &table.owner else { continue };
            // Owner through the dot before the table name
            let span = Span::new(owner.span.start, table.table_name.span.start.saturating_sub(1));
            if !seen.contains(&span) {
                seen.push(span);
                result.push(SqlToken::Remove(RemoveToken { span }));
            }
        }
        Ok(result)
    }
}
