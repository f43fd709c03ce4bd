//! Cursor names, made unique per shard.

use super::utils::{logic_and_actual_tables, require_actual_table};
use super::*;
use crate::token::{CursorToken, RouteUnitTexts};

pub struct CursorTokenGenerator;

impl TokenGenerator for CursorTokenGenerator {
    fn id(&self) -> &'static str {
        "cursor"
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.statement.cursor_name().is_some() && !ctx.sharding_tables().is_empty()
    }
}

impl OptionalTokenGenerator for CursorTokenGenerator {
    /// `name` becomes `lower(name)_actual1_actual2`, actual tables in statement order.
    fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        let Some(cursor_name) = ctx.statement.cursor_name() else {
            return Ok(None);
        };
        let sharding_tables = ctx.sharding_tables();
        let identifier = &cursor_name.identifier;
        let name = identifier.value.to_lowercase();
        let mut texts = RouteUnitTexts::new();
        for unit in &ctx.route.route_units {
            let mapping = logic_and_actual_tables(ctx.rule, unit, &sharding_tables);
            let actual_tables = sharding_tables
                .iter()
                .map(|logic_table| require_actual_table(&mapping, logic_table, unit))
                .collect::<RewriteResult<Vec<_>>>()?;
            texts.insert(
                unit.clone(),
                identifier.quote.wrap(&format!("{}_{}", name, actual_tables.join("_"))),
            );
        }
        Ok(Some(SqlToken::Cursor(CursorToken {
            span: cursor_name.span,
            cursor_name: name,
            texts,
        })))
    }
}
