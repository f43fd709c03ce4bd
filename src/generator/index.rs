//! Index names, suffixed with the actual table where index names are schema-unique.

use super::utils::{logic_and_actual_tables, require_actual_table};
use super::*;
use crate::ast::IndexSegment;
use crate::token::{IndexToken, RouteUnitTexts};

pub struct IndexTokenGenerator;

impl IndexTokenGenerator {
    fn schema(ctx: &RewriteContext<'_>, index: &IndexSegment) -> String {
        index
            .owner
            .as_ref()
            .map(|o| o.value().to_string())
            .unwrap_or_else(|| ctx.database.default_schema())
    }

    /// Sharding logic table the index belongs to: the table the statement names, else
    /// the catalog's owner of the index.
    fn owner_table(ctx: &RewriteContext<'_>, index: &IndexSegment, schema: &str) -> Option<String> {
        let named = ctx
            .statement
            .as_ddl()
            .and_then(|ddl| ddl.index_owner_table())
            .map(|t| t.name().to_string());
        let table = named.or_else(|| {
            ctx.database
                .find_table_by_index(schema, index.name())
                .map(|t| t.name.clone())
        })?;
        ctx.rule.is_sharding_table(&table).then_some(table)
    }
}

impl TokenGenerator for IndexTokenGenerator {
    fn id(&self) -> &'static str {
        "index"
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        ctx.database.database_type.is_schema_unique_index() && !ctx.statement.indexes().is_empty()
    }
}

impl CollectionTokenGenerator for IndexTokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let mut result = Vec::new();
        for index in ctx.statement.indexes() {
            let schema = Self::schema(ctx, index);
            let Some(logic_table) = Self::owner_table(ctx, index, &schema) else {
                tracing::trace!("Index '{}' does not belong to a sharding table", index.name());
                continue;
            };
            let mut texts = RouteUnitTexts::new();
            for unit in &ctx.route.route_units {
                let mapping = logic_and_actual_tables(ctx.rule, unit, &[logic_table.as_str()]);
                let actual = require_actual_table(&mapping, &logic_table, unit)?;
                let identifier = &index.index_name.identifier;
                texts.insert(unit.clone(), identifier.quote.wrap(&format!("{}_{}", identifier.value, actual)));
            }
            result.push(SqlToken::Index(IndexToken {
                span: index.index_name.span,
                index_name: index.name().to_string(),
                schema,
                texts,
            }));
        }
        Ok(result)
    }
}
