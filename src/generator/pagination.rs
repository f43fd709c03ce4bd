//! OFFSET and row count literals replaced with merge-adjusted values.
//!
//! Parameter markers are left alone; they are revised with the parameters.

use super::*;
use crate::ast::PaginationValueSegment;
use crate::token::{OffsetToken, RowCountToken};

pub struct OffsetTokenGenerator;

impl TokenGenerator for OffsetTokenGenerator {
    fn id(&self) -> &'static str {
        "offset"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement.as_select().is_some_and(|select| {
            matches!(
                select.pagination().offset_segment,
                Some(PaginationValueSegment::NumberLiteral { .. })
            )
        })
    }
}

impl OptionalTokenGenerator for OffsetTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let Some(pagination) = ctx.statement.as_select().map(|s| s.pagination()) else {
            return Ok(None);
        };
        Ok(match &pagination.offset_segment {
            Some(PaginationValueSegment::NumberLiteral { span, .. }) => Some(SqlToken::Offset(OffsetToken {
                span: *span,
                revised_offset: pagination.revised_offset,
            })),
            _ => None,
        })
    }
}

pub struct RowCountTokenGenerator;

impl TokenGenerator for RowCountTokenGenerator {
    fn id(&self) -> &'static str {
        "row_count"
    }

    fn ignore_for_single_route(&self) -> bool {
        true
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement.as_select().is_some_and(|select| {
            let pagination = select.pagination();
            matches!(
                pagination.row_count_segment,
                Some(PaginationValueSegment::NumberLiteral { .. })
            ) && pagination.revised_row_count.is_some()
        })
    }
}

impl OptionalTokenGenerator for RowCountTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let Some(pagination) = ctx.statement.as_select().map(|s| s.pagination()) else {
            return Ok(None);
        };
        Ok(match (&pagination.row_count_segment, pagination.revised_row_count) {
            (Some(PaginationValueSegment::NumberLiteral { span, .. }), Some(revised_row_count)) => {
                Some(SqlToken::RowCount(RowCountToken {
                    span: *span,
                    revised_row_count,
                }))
            }
            _ => None,
        })
    }
}
