//! Constraint names, suffixed with the actual table.

use super::utils::{logic_and_actual_tables, require_actual_table};
use super::*;
use crate::token::{ConstraintToken, RouteUnitTexts};

pub struct ConstraintTokenGenerator;

impl ConstraintTokenGenerator {
    fn owner_table<'a>(ctx: &RewriteContext<'a>) -> Option<&'a str> {
        let table = ctx.statement.as_ddl()?.index_owner_table()?;
        ctx.rule.is_sharding_table(table.name()).then(|| table.name())
    }
}

impl TokenGenerator for ConstraintTokenGenerator {
    fn id(&self) -> &'static str {
        "constraint"
    }

    fn is_applicable(&self, ctx: &RewriteContext<'_>) -> bool {
        !ctx.statement.constraints().is_empty() && Self::owner_table(ctx).is_some()
    }
}

impl CollectionTokenGenerator for ConstraintTokenGenerator {
    fn generate_all(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let Some(logic_table) = Self::owner_table(ctx) else {
            return Ok(Vec::new());
        };
        let mappings: Vec<_> = ctx
            .route
            .route_units
            .iter()
            .map(|unit| (unit, logic_and_actual_tables(ctx.rule, unit, &[logic_table])))
            .collect();
        let mut result = Vec::new();
        for constraint in ctx.statement.constraints() {
            let mut texts = RouteUnitTexts::new();
            for (unit, mapping) in &mappings {
                let actual = require_actual_table(mapping, logic_table, unit)?;
                let identifier = &constraint.identifier;
                texts.insert((*unit).clone(), identifier.quote.wrap(&format!("{}_{}", identifier.value, actual)));
            }
            result.push(SqlToken::Constraint(ConstraintToken {
                span: constraint.span,
                constraint_name: constraint.identifier.value.clone(),
                texts,
            }));
        }
        Ok(result)
    }
}
