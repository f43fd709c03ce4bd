use super::*;
use crate::metadata::TableMetaData;
use crate::token::IndexToken;
use pretty_assertions::assert_eq;

fn create_index(sql: &str, index: &str, table_name: &str, column_name: &str) -> StatementContext {
    bind(Statement::CreateIndex(CreateIndexStatement {
        index: IndexSegment::new(span_of(sql, index), Identifier::new(index)),
        table: table(sql, table_name),
        columns: vec![column_nth(sql, column_name, 1)],
    }))
}

#[test]
fn test_index_suffixed_with_actual_table() {
    let sql = "CREATE INDEX idx_status ON t_order (status)";
    let statement = create_index(sql, "idx_status", "t_order", "status");
    let units = two_order_units();
    let tokens = generate(sql, &statement, &RouteContext::new(units.clone()), &database(DatabaseType::PostgreSQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["index", "table"]);
    let Some(SqlToken::Index(IndexToken { schema, .. })) = tokens.first() else {
        panic!("expected an index token first, got {:?}", tokens);
    };
    assert_eq!(schema, "public");
    assert_eq!(render(sql, &tokens, &units[1]), "CREATE INDEX idx_status_t_order_1 ON t_order_1 (status)");
}

#[test]
fn test_table_scoped_index_kept() {
    let sql = "CREATE INDEX idx_status ON t_order (status)";
    let statement = create_index(sql, "idx_status", "t_order", "status");
    let units = two_order_units();
    let tokens = generate(sql, &statement, &RouteContext::new(units.clone()), &database(DatabaseType::MySQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["table"]);
    assert_eq!(render(sql, &tokens, &units[0]), "CREATE INDEX idx_status ON t_order_0 (status)");
}

#[test]
fn test_drop_index_owner_from_catalog() {
    let sql = "DROP INDEX idx_status";
    let statement = bind(Statement::DropIndex(DropIndexStatement {
        indexes: vec![IndexSegment::new(span_of(sql, "idx_status"), Identifier::new("idx_status"))],
        table: None,
    }));
    let mut catalog = database(DatabaseType::PostgreSQL);
    catalog.add_table("public", TableMetaData::new("t_order").index("idx_status"));
    let units = two_order_units();
    let tokens = generate(sql, &statement, &RouteContext::new(units.clone()), &catalog).unwrap();

    assert_eq!(kinds(&tokens), vec!["index"]);
    assert_eq!(render(sql, &tokens, &units[0]), "DROP INDEX idx_status_t_order_0");

    // Without a catalog entry the index cannot be attributed
    let tokens = generate(sql, &statement, &RouteContext::new(units), &database(DatabaseType::PostgreSQL)).unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn test_index_on_unsharded_table() {
    let sql = "CREATE INDEX idx_name ON t_config (name)";
    let statement = create_index(sql, "idx_name", "t_config", "name");
    let route = RouteContext::new(vec![
        unit("ds_0", &[("t_config", "t_config")]),
        unit("ds_1", &[("t_config", "t_config")]),
    ]);
    let tokens = generate(sql, &statement, &route, &database(DatabaseType::PostgreSQL)).unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn test_constraint_suffixed_with_actual_table() {
    let sql = "ALTER TABLE t_order ADD CONSTRAINT pk_order PRIMARY KEY (order_id)";
    let statement = bind(Statement::AlterTable(AlterTableStatement {
        table: table(sql, "t_order"),
        rename_table: None,
        add_column_definitions: vec![],
        add_constraint_definitions: vec![ConstraintDefinitionSegment {
            span: span_of(sql, "CONSTRAINT pk_order PRIMARY KEY (order_id)"),
            constraint_name: Some(ConstraintSegment {
                span: span_of(sql, "pk_order"),
                identifier: Identifier::new("pk_order"),
            }),
            index_name: None,
            reference_table: None,
        }],
        drop_constraints: vec![],
        drop_indexes: vec![],
    }));
    let units = two_order_units();
    let tokens = generate(sql, &statement, &RouteContext::new(units.clone()), &database(DatabaseType::MySQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["table", "constraint"]);
    assert_eq!(
        render(sql, &tokens, &units[0]),
        "ALTER TABLE t_order_0 ADD CONSTRAINT pk_order_t_order_0 PRIMARY KEY (order_id)"
    );
}
