//! Generator registry and orchestration.

use super::*;
use crate::error::RewriteError;

/// Registered generators, kept in descending priority order.
#[derive(Debug)]
pub struct SqlTokenGenerators {
    generators: Vec<RegisteredGenerator>,
}

impl Default for SqlTokenGenerators {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlTokenGenerators {
    /// Registry holding every sharding generator.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        registry.register_collection(Box::new(TableTokenGenerator));
        registry.register_collection(Box::new(IndexTokenGenerator));
        registry.register_collection(Box::new(ConstraintTokenGenerator));
        registry.register_optional(Box::new(CursorTokenGenerator));
        registry.register_optional(Box::new(FetchDirectionTokenGenerator));
        registry.register_optional(Box::new(OffsetTokenGenerator));
        registry.register_optional(Box::new(RowCountTokenGenerator));
        registry.register_optional(Box::new(OrderByTokenGenerator));
        registry.register_optional(Box::new(ProjectionsTokenGenerator));
        registry.register_optional(Box::new(DistinctProjectionPrefixTokenGenerator));
        registry.register_collection(Box::new(AggregationDistinctTokenGenerator));
        registry.register_collection(Box::new(RemoveTokenGenerator));
        registry.register_collection(Box::new(InPredicateTokenGenerator));
        registry.register_optional(Box::new(InsertValuesTokenGenerator));

        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    pub fn register_optional(&mut self, generator: Box<dyn OptionalTokenGenerator>) {
        self.register(RegisteredGenerator::Optional(generator));
    }

    pub fn register_collection(&mut self, generator: Box<dyn CollectionTokenGenerator>) {
        self.register(RegisteredGenerator::Collection(generator));
    }

    fn register(&mut self, generator: RegisteredGenerator) {
        self.generators.push(generator);
        // Stable sort keeps registration order among equal priorities
        self.generators.sort_by_key(|g| std::cmp::Reverse(g.priority()));
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.generators.iter().map(RegisteredGenerator::id).collect()
    }

    /// Run every applicable generator and return the tokens sorted by start index.
    ///
    /// Generators run in priority order, so removal decisions are made before the
    /// ORDER BY insertion point is computed.
    pub fn generate(&self, ctx: &RewriteContext<'_>) -> RewriteResult<Vec<SqlToken>> {
        let single_route = ctx.route.is_single_routing();
        let mut tokens = Vec::new();
        for generator in &self.generators {
            if single_route && generator.ignore_for_single_route() {
                tracing::debug!("Skipping generator '{}' for single route", generator.id());
                continue;
            }
            if !generator.is_applicable(ctx) {
                continue;
            }
            tracing::debug!("Generator '{}' is applicable", generator.id());
            match generator {
                RegisteredGenerator::Optional(g) => {
                    let token = g.generate(ctx)?.ok_or(RewriteError::GeneratorContract(g.id()))?;
                    tokens.push(token);
                }
                RegisteredGenerator::Collection(g) => {
                    let generated = g.generate_all(ctx)?;
                    tracing::debug!("Generator '{}' produced {} tokens", g.id(), generated.len());
                    tokens.extend(generated);
                }
            }
        }
        tokens.sort_by_key(|t| (t.start_index(), !t.span().is_insert()));
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_runs_before_order_by() {
        let ids = SqlTokenGenerators::new().ids();
        let remove = ids.iter().position(|id| *id == "remove").unwrap();
        let order_by = ids.iter().position(|id| *id == "order_by").unwrap();
        assert!(remove < order_by);
        assert_eq!(ids.len(), 14);
    }

    #[test]
    fn test_empty_registry() {
        assert!(SqlTokenGenerators::empty().ids().is_empty());
    }
}
