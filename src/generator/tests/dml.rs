use super::*;
use crate::rule::DataNode;
use pretty_assertions::assert_eq;

fn insert_two_rows(sql: &str) -> StatementContext {
    bind(Statement::Insert(InsertStatement {
        table: table(sql, "t_order"),
        columns: vec![column(sql, "order_id"), column(sql, "status")],
        values: vec![
            InsertValuesSegment {
                span: span_of(sql, "(1, 'a')"),
                values: vec![Expr::int(span_of(sql, "1"), 1), Expr::string(span_of(sql, "'a'"), "a")],
            },
            InsertValuesSegment {
                span: span_of(sql, "(2, 'b')"),
                values: vec![Expr::int(span_of(sql, "2"), 2), Expr::string(span_of(sql, "'b'"), "b")],
            },
        ],
        on_duplicate_key_update: vec![],
        insert_select: None,
    }))
}

#[test]
fn test_insert_rows_split_by_data_node() {
    let sql = "INSERT INTO t_order (order_id, status) VALUES (1, 'a'), (2, 'b')";
    let statement = insert_two_rows(sql);
    let first = unit("ds_0", &[("t_order", "t_order_1")]);
    let second = unit("ds_1", &[("t_order", "t_order_2")]);
    let route = RouteContext::new(vec![first.clone(), second.clone()]).with_data_nodes(vec![
        vec![DataNode::new("ds_0", "t_order_1")],
        vec![DataNode::new("ds_1", "t_order_2")],
    ]);
    let tokens = generate(sql, &statement, &route, &database(DatabaseType::MySQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["table", "insert_values"]);
    assert_eq!(
        render(sql, &tokens, &first),
        "INSERT INTO t_order_1 (order_id, status) VALUES (1, 'a')"
    );
    assert_eq!(
        render(sql, &tokens, &second),
        "INSERT INTO t_order_2 (order_id, status) VALUES (2, 'b')"
    );
}

#[test]
fn test_insert_without_row_routing_keeps_every_row() {
    let sql = "INSERT INTO t_order (order_id, status) VALUES (1, 'a'), (2, 'b')";
    let statement = insert_two_rows(sql);
    let only = unit("ds_0", &[("t_order", "t_order_0")]);
    let tokens = generate(sql, &statement, &RouteContext::new(vec![only.clone()]), &database(DatabaseType::MySQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["insert_values"]);
    assert_eq!(render(sql, &tokens, &only), sql);
}

#[test]
fn test_update_table_rewritten() {
    let sql = "UPDATE t_order SET status = 'x' WHERE order_id > 10";
    let statement = bind(Statement::Update(UpdateStatement {
        table: from(sql, "t_order"),
        assignments: vec![],
        where_clause: Some(WhereSegment::new(
            span_of(sql, "WHERE order_id > 10"),
            Expr::binary(
                Expr::column(span_of(sql, "order_id"), "order_id"),
                BinaryOperator::Gt,
                Expr::int(span_of(sql, "10"), 10),
            ),
        )),
        order_by: None,
        limit: None,
    }));
    let units = two_order_units();
    let tokens = generate(sql, &statement, &RouteContext::new(units.clone()), &database(DatabaseType::MySQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["table"]);
    assert_eq!(render(sql, &tokens, &units[1]), "UPDATE t_order_1 SET status = 'x' WHERE order_id > 10");
}

#[test]
fn test_delete_drops_database_qualifier() {
    let sql = "DELETE FROM sharding_db.t_order WHERE order_id = 1";
    let qualified = table(sql, "t_order").with_owner(OwnerSegment::new(span_of(sql, "sharding_db"), Identifier::new("sharding_db")));
    let statement = bind(Statement::Delete(DeleteStatement {
        table: TableSegment::Simple(qualified),
        where_clause: Some(WhereSegment::new(
            span_of(sql, "WHERE order_id = 1"),
            Expr::eq(Expr::column(span_of(sql, "order_id"), "order_id"), Expr::int(span_of(sql, "1"), 1)),
        )),
        order_by: None,
        limit: None,
    }));
    let only = unit("ds_0", &[("t_order", "t_order_1")]);
    let tokens = generate(sql, &statement, &RouteContext::new(vec![only.clone()]), &database(DatabaseType::MySQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["remove"]);
    assert_eq!(render(sql, &tokens, &only), "DELETE FROM t_order WHERE order_id = 1");
}
