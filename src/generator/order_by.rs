//! Synthesized ORDER BY for merges that need sorted shard results.

use super::*;
use crate::ast::Segment;
use crate::context::SelectStatementContext;
use crate::error::RewriteError;
use crate::token::{OrderByItem, OrderByToken};

pub struct OrderByTokenGenerator;

impl OrderByTokenGenerator {
    /// Character after the last present clause among WINDOW, HAVING, GROUP BY, WHERE
    /// and FROM. A GROUP BY that is removed does not count.
    fn insertion_point(select: &SelectStatementContext) -> Option<usize> {
        let statement = select.statement();
        let group_by = statement
            .group_by
            .as_ref()
            .filter(|_| !select.is_distinct_emulating_group_by());
        let stop = statement
            .window
            .as_ref()
            .map(|w| w.stop_index())
            .or_else(|| statement.having.as_ref().map(|h| h.stop_index()))
            .or_else(|| group_by.map(|g| g.stop_index()))
            .or_else(|| statement.where_clause.as_ref().map(|w| w.stop_index()))
            .or_else(|| statement.from.as_ref().map(|f| f.stop_index()))?;
        Some(stop + 1)
    }
}

impl TokenGenerator for OrderByTokenGenerator {
    fn id(&self) -> &'static str {
        "order_by"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement.as_select().is_some_and(|select| {
            let order_by = select.order_by();
            order_by.generated && !order_by.is_empty() && !select.contains_combine()
        })
    }
}

impl OptionalTokenGenerator for OrderByTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let Some(select) = ctx.statement.as_select() else {
            return Ok(None);
        };
        let at = Self::insertion_point(select).ok_or_else(|| RewriteError::missing("FROM", "order by insertion"))?;
        let items = select
            .order_by()
            .items
            .iter()
            .map(|item| OrderByItem {
                label: item.output_label(),
                direction: item.direction(),
            })
            .collect();
        Ok(Some(SqlToken::OrderBy(OrderByToken { at, items })))
    }
}
