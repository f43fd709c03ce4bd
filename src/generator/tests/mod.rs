//! Generator tests over hand-bound statements.
//!
//! Spans are computed from the SQL text so each case reads as the statement it binds.

mod cursor;
mod ddl;
mod dml;

use super::*;
use crate::ast::*;
use crate::builder::RouteSqlBuilder;
use crate::dialect::DatabaseType;
use crate::error::RewriteError;
use crate::metadata::Database;
use crate::route::{RouteMapper, RouteUnit};
use crate::rule::{
    AlgorithmRegistry, PreciseShardingValue, ShardingRuleConfiguration, ShardingStrategy, ShardingTableConfiguration,
    StandardShardingAlgorithm,
};
use pretty_assertions::assert_eq;

/// `value % target count`, picking the target with that suffix.
#[derive(Debug)]
struct ModAlgorithm;

impl StandardShardingAlgorithm for ModAlgorithm {
    fn do_sharding(&self, available_targets: &[String], value: &PreciseShardingValue) -> Option<String> {
        let LiteralValue::Int(n) = value.value else {
            return None;
        };
        if available_targets.is_empty() {
            return None;
        }
        let suffix = format!("_{}", n.rem_euclid(available_targets.len() as i64));
        available_targets.iter().find(|t| t.ends_with(&suffix)).cloned()
    }
}

fn standard(column: &str) -> Option<ShardingStrategy> {
    Some(ShardingStrategy::Standard {
        column: column.to_string(),
        algorithm: "mod".to_string(),
    })
}

/// Four actual tables, two per data source.
fn four_nodes(table: &str) -> Vec<String> {
    (0..4).map(|i| format!("ds_{}.{}_{}", i / 2, table, i)).collect()
}

/// `t_order` and `t_order_item` bound by `order_id`; `t_user` split in two by `user_id`.
fn rule() -> ShardingRule {
    let config = ShardingRuleConfiguration::default()
        .table(
            "t_order",
            ShardingTableConfiguration {
                actual_data_nodes: four_nodes("t_order"),
                table_strategy: standard("order_id"),
                database_strategy: None,
            },
        )
        .table(
            "t_order_item",
            ShardingTableConfiguration {
                actual_data_nodes: four_nodes("t_order_item"),
                table_strategy: standard("order_id"),
                database_strategy: None,
            },
        )
        .table(
            "t_user",
            ShardingTableConfiguration {
                actual_data_nodes: vec!["ds_0.t_user_0".to_string(), "ds_0.t_user_1".to_string()],
                table_strategy: standard("user_id"),
                database_strategy: None,
            },
        )
        .binding_group(["t_order", "t_order_item"]);
    ShardingRule::new(config, AlgorithmRegistry::new().with("mod", Arc::new(ModAlgorithm))).unwrap()
}

fn unit(data_source: &str, mappers: &[(&str, &str)]) -> RouteUnit {
    RouteUnit::new(
        data_source,
        mappers.iter().map(|(logic, actual)| RouteMapper::new(*logic, *actual)).collect(),
    )
}

/// Two units over `t_order_0` and `t_order_1`.
fn two_order_units() -> Vec<RouteUnit> {
    vec![
        unit("ds_0", &[("t_order", "t_order_0")]),
        unit("ds_0", &[("t_order", "t_order_1")]),
    ]
}

fn database(database_type: DatabaseType) -> Database {
    Database::new("sharding_db", database_type)
}

/// Inclusive character span of the `nth` occurrence of `needle`.
fn span_nth(sql: &str, needle: &str, nth: usize) -> Span {
    let Some((byte, _)) = sql.match_indices(needle).nth(nth) else {
        panic!("'{}' occurs fewer than {} times in '{}'", needle, nth + 1, sql);
    };
    let start = sql[..byte].chars().count();
    Span::new(start, start + needle.chars().count() - 1)
}

fn span_of(sql: &str, needle: &str) -> Span {
    span_nth(sql, needle, 0)
}

/// Column from `name` or `owner.name` as written at its `nth` occurrence.
fn column_nth(sql: &str, text: &str, nth: usize) -> ColumnSegment {
    let span = span_nth(sql, text, nth);
    match text.split_once('.') {
        Some((owner, name)) => ColumnSegment::new(span, Identifier::new(name)).with_owner(OwnerSegment::new(
            Span::new(span.start, span.start + owner.len() - 1),
            Identifier::new(owner),
        )),
        None => ColumnSegment::new(span, Identifier::new(text)),
    }
}

fn column(sql: &str, text: &str) -> ColumnSegment {
    column_nth(sql, text, 0)
}

fn table_nth(sql: &str, name: &str, nth: usize) -> SimpleTableSegment {
    SimpleTableSegment::new(span_nth(sql, name, nth), Identifier::new(name))
}

fn table(sql: &str, name: &str) -> SimpleTableSegment {
    table_nth(sql, name, 0)
}

/// `name alias` as written.
fn table_as(sql: &str, name: &str, alias: &str) -> SimpleTableSegment {
    let span = span_of(sql, &format!("{} {}", name, alias));
    let name_stop = span.start + name.len() - 1;
    SimpleTableSegment::new(Span::new(span.start, name_stop), Identifier::new(name))
        .with_alias(AliasSegment::new(Span::new(name_stop + 2, span.stop), Identifier::new(alias)))
}

fn from(sql: &str, name: &str) -> TableSegment {
    TableSegment::Simple(table(sql, name))
}

/// `*` as the whole select list.
fn select_all(sql: &str) -> ProjectionsSegment {
    let span = span_of(sql, "*");
    ProjectionsSegment::new(span, vec![ProjectionSegment::shorthand(span)])
}

fn bind(statement: Statement) -> StatementContext {
    StatementContext::bind(statement, None).unwrap()
}

fn generate(sql: &str, statement: &StatementContext, route: &RouteContext, database: &Database) -> RewriteResult<Vec<SqlToken>> {
    let rule = rule();
    let ctx = RewriteContext::new(sql, statement, &rule, route, database);
    SqlTokenGenerators::new().generate(&ctx)
}

fn kinds(tokens: &[SqlToken]) -> Vec<&'static str> {
    tokens.iter().map(SqlToken::kind).collect()
}

fn render(sql: &str, tokens: &[SqlToken], unit: &RouteUnit) -> String {
    RouteSqlBuilder::new(sql, tokens).build(unit).unwrap()
}

struct SilentGenerator;

impl TokenGenerator for SilentGenerator {
    fn id(&self) -> &'static str {
        "silent"
    }

    fn is_applicable(&self, _ctx: &RewriteContext<'_>) -> bool {
        true
    }
}

impl OptionalTokenGenerator for SilentGenerator {
    fn generate(&self, _ctx: &RewriteContext<'_>) -> RewriteResult<Option<SqlToken>> {
        Ok(None)
    }
}

#[test]
fn test_applicable_optional_generator_must_produce() {
    let sql = "SELECT * FROM t_order";
    let statement = bind(Statement::Select(SelectStatement::new(select_all(sql)).from(from(sql, "t_order"))));
    let route = RouteContext::new(two_order_units());
    let database = database(DatabaseType::MySQL);
    let rule = rule();
    let ctx = RewriteContext::new(sql, &statement, &rule, &route, &database);

    let mut generators = SqlTokenGenerators::empty();
    generators.register_optional(Box::new(SilentGenerator));
    assert!(matches!(
        generators.generate(&ctx),
        Err(RewriteError::GeneratorContract("silent"))
    ));
}

#[test]
fn test_span_helpers() {
    let sql = "SELECT o.order_id FROM t_order o";
    assert_eq!(span_of(sql, "order_id"), Span::new(9, 16));
    let order = table_as(sql, "t_order", "o");
    assert_eq!(order.table_name.span, Span::new(23, 29));
    assert_eq!(order.alias.map(|a| a.span), Some(Span::new(31, 31)));
    let qualified = column(sql, "o.order_id");
    assert_eq!(qualified.span, Span::new(7, 16));
    assert_eq!(qualified.owner.map(|o| o.span), Some(Span::new(7, 7)));
}
