//! Logic table names to actual table names.

use super::utils::{require_actual_table, statement_actual_tables};
use super::*;
use crate::ast::Span;
use crate::token::{RouteUnitTexts, TableToken};
use indexmap::IndexSet;

pub struct TableTokenGenerator;

impl TokenGenerator for TableTokenGenerator {
    fn id(&self) -> &'static str {
        "table"
    }

    /// Rewrite when binding tables must resolve in lockstep, or when routing actually
    /// lands on more than one physical table. Cursor statements always rewrite.
    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        if ctx.sharding_tables().is_empty() {
            return false;
        }
        if ctx.statement.is_cursor_statement() {
            return true;
        }
        let names: Vec<&str> = ctx.statement.tables().table_names().collect();
        (names.len() > 1 && ctx.rule.is_all_binding_tables(names.iter().copied()))
            || ctx.route.spans_multiple_actual_tables()
    }
}

impl CollectionTokenGenerator for TableTokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let tables = ctx.statement.tables();
        let mappings = statement_actual_tables(ctx);

        let mut seen: IndexSet<Span> = IndexSet::new();
        let mut result = Vec::new();
        for table in tables.tables() {
            if !ctx.rule.is_sharding_table(table.name()) || !seen.insert(table.table_name.span) {
                continue;
            }
            let identifier = &table.table_name.identifier;
            let mut texts = RouteUnitTexts::new();
            for (unit, mapping) in &mappings {
                let actual = require_actual_table(mapping, table.name(), unit)?;
                texts.insert((*unit).clone(), identifier.quote.wrap(actual));
            }
            result.push(SqlToken::Table(TableToken {
                span: table.table_name.span,
                logic_table: table.name().to_string(),
                texts,
            }));
        }
        Ok(result)
    }
}
