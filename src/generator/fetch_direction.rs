//! FETCH direction resolved against rows the merger already buffered.

use super::*;
use crate::ast::DirectionType;
use crate::context::CursorHeldKind;
use crate::token::{FetchDirectionToken, TokenSpan};

pub struct FetchDirectionTokenGenerator;

impl TokenGenerator for FetchDirectionTokenGenerator {
    fn id(&self) -> &'static str {
        "fetch_direction"
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.cursors.is_some()
            && ctx
                .statement
                .as_cursor_held()
                .is_some_and(|c| c.kind() == CursorHeldKind::Fetch && c.cursor_name().is_some())
    }
}

impl OptionalTokenGenerator for FetchDirectionTokenGenerator {
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let (Some(fetch), Some(cursors)) = (ctx.statement.as_cursor_held(), &ctx.cursors) else {
            return Ok(None);
        };
        let Some(cursor_name) = fetch.cursor_name() else {
            return Ok(None);
        };
        let (span, direction_type, count) = match fetch.direction() {
            Some(direction) => (
                TokenSpan::Replace {
                    start: direction.span.start,
                    stop: cursor_name.span.start.saturating_sub(1),
                },
                direction.direction_type,
                direction.count.unwrap_or(1),
            ),
            None => (
                TokenSpan::Insert {
                    at: cursor_name.span.start,
                },
                DirectionType::Next,
                1,
            ),
        };
        Ok(Some(SqlToken::FetchDirection(FetchDirectionToken {
            span,
            cursor_name: cursor_name.identifier.value.to_lowercase(),
            direction_type,
            count,
            cursors: Arc::clone(cursors),
        })))
    }
}
