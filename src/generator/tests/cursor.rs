use super::*;
use crate::cursor::{CursorDefinition, CursorDirectory};
use pretty_assertions::assert_eq;

fn declare_order_cursor(sql: &str) -> StatementContext {
    bind(Statement::DeclareCursor(DeclareCursorStatement {
        cursor_name: CursorNameSegment::new(span_of(sql, "order_cursor"), Identifier::new("order_cursor")),
        select: SelectStatement::new(select_all(sql)).from(from(sql, "t_order")),
    }))
}

/// Directory holding `order_cursor` over `t_order`.
fn directory(buffered_rows: u64) -> Arc<CursorDirectory> {
    let cursors = Arc::new(CursorDirectory::new());
    cursors.declare("order_cursor", CursorDefinition::new(["t_order"]));
    if buffered_rows > 0 {
        cursors.record_buffered_rows("order_cursor", buffered_rows);
    }
    cursors
}

fn fetch(sql: &str, direction: Option<DirectionSegment>) -> Statement {
    Statement::Fetch(FetchStatement {
        cursor_name: CursorNameSegment::new(span_of(sql, "order_cursor"), Identifier::new("order_cursor")),
        direction,
    })
}

fn generate_with_cursors(
    sql: &str,
    statement: &StatementContext,
    route: &RouteContext,
    cursors: &Arc<CursorDirectory>,
) -> RewriteResult<Vec<SqlToken>> {
    let rule = rule();
    let database = database(DatabaseType::PostgreSQL);
    let ctx = RewriteContext::new(sql, statement, &rule, route, &database).with_cursors(Arc::clone(cursors));
    SqlTokenGenerators::new().generate(&ctx)
}

#[test]
fn test_declare_cursor_name_per_unit() {
    let sql = "DECLARE order_cursor CURSOR FOR SELECT * FROM t_order";
    let statement = declare_order_cursor(sql);
    let units = two_order_units();
    let tokens = generate(sql, &statement, &RouteContext::new(units.clone()), &database(DatabaseType::PostgreSQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["cursor", "table"]);
    assert_eq!(
        render(sql, &tokens, &units[0]),
        "DECLARE order_cursor_t_order_0 CURSOR FOR SELECT * FROM t_order_0"
    );
    assert_eq!(
        render(sql, &tokens, &units[1]),
        "DECLARE order_cursor_t_order_1 CURSOR FOR SELECT * FROM t_order_1"
    );
}

#[test]
fn test_declare_cursor_rewrites_on_single_unit() {
    let sql = "DECLARE Order_Cursor CURSOR FOR SELECT * FROM t_order";
    let statement = bind(Statement::DeclareCursor(DeclareCursorStatement {
        cursor_name: CursorNameSegment::new(span_of(sql, "Order_Cursor"), Identifier::new("Order_Cursor")),
        select: SelectStatement::new(select_all(sql)).from(from(sql, "t_order")),
    }));
    let only = unit("ds_1", &[("t_order", "t_order_3")]);
    let tokens = generate(sql, &statement, &RouteContext::new(vec![only.clone()]), &database(DatabaseType::PostgreSQL)).unwrap();

    assert_eq!(kinds(&tokens), vec!["cursor", "table"]);
    assert_eq!(
        render(sql, &tokens, &only),
        "DECLARE order_cursor_t_order_3 CURSOR FOR SELECT * FROM t_order_3"
    );
}

#[test]
fn test_fetch_count_reduced_by_buffered_rows() {
    let sql = "FETCH 10 FROM order_cursor";
    let cursors = directory(3);
    let direction = DirectionSegment {
        span: span_of(sql, "10 FROM"),
        direction_type: DirectionType::Count,
        count: Some(10),
    };
    let statement = StatementContext::bind(fetch(sql, Some(direction)), Some(cursors.as_ref())).unwrap();
    let units = two_order_units();
    let tokens = generate_with_cursors(sql, &statement, &RouteContext::new(units.clone()), &cursors).unwrap();

    assert_eq!(kinds(&tokens), vec!["fetch_direction", "cursor"]);
    assert_eq!(render(sql, &tokens, &units[0]), "FETCH FORWARD 7 order_cursor_t_order_0");
}

#[test]
fn test_fetch_without_direction_reads_buffered_rows_at_render() {
    let sql = "FETCH order_cursor";
    let cursors = directory(0);
    let statement = StatementContext::bind(fetch(sql, None), Some(cursors.as_ref())).unwrap();
    let units = two_order_units();
    let tokens = generate_with_cursors(sql, &statement, &RouteContext::new(units.clone()), &cursors).unwrap();

    assert_eq!(render(sql, &tokens, &units[1]), "FETCH FORWARD 1 order_cursor_t_order_1");
    cursors.record_buffered_rows("ORDER_CURSOR", 1);
    assert_eq!(render(sql, &tokens, &units[1]), "FETCH FORWARD 0 order_cursor_t_order_1");
}

#[test]
fn test_move_keeps_direction() {
    let sql = "MOVE 5 IN order_cursor";
    let cursors = directory(2);
    let statement = StatementContext::bind(
        Statement::Move(MoveStatement {
            cursor_name: CursorNameSegment::new(span_of(sql, "order_cursor"), Identifier::new("order_cursor")),
            direction: Some(DirectionSegment {
                span: span_of(sql, "5 IN"),
                direction_type: DirectionType::Count,
                count: Some(5),
            }),
        }),
        Some(cursors.as_ref()),
    )
    .unwrap();
    let units = two_order_units();
    let tokens = generate_with_cursors(sql, &statement, &RouteContext::new(units.clone()), &cursors).unwrap();

    assert_eq!(kinds(&tokens), vec!["cursor"]);
    assert_eq!(render(sql, &tokens, &units[0]), "MOVE 5 IN order_cursor_t_order_0");
}

#[test]
fn test_fetch_undeclared_cursor() {
    let sql = "FETCH order_cursor";
    let err = StatementContext::bind(fetch(sql, None), Some(&CursorDirectory::new())).unwrap_err();
    assert!(matches!(err, RewriteError::CursorNotDeclared(ref name) if name == "order_cursor"));
}

#[test]
fn test_close_all_has_no_tokens() {
    let sql = "CLOSE ALL";
    let cursors = directory(0);
    let statement =
        StatementContext::bind(Statement::Close(CloseStatement { cursor_name: None }), Some(cursors.as_ref())).unwrap();
    let tokens = generate_with_cursors(sql, &statement, &RouteContext::new(two_order_units()), &cursors).unwrap();
    assert!(tokens.is_empty());
}
