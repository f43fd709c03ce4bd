//! Nested SELECT discovery.

use crate::ast::*;

/// Syntactic role of a nested SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubqueryType {
    Projection,
    Table,
    Join,
    Predicate,
    With,
    Combine,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractedSubquery<'a> {
    pub segment: &'a SubquerySegment,
    pub subquery_type: SubqueryType,
}

/// Nested SELECTs of `select` in discovery order. With `need_recursive` unset only
/// direct children are returned.
pub fn extract_subqueries(select: &SelectStatement, need_recursive: bool) -> Vec<ExtractedSubquery<'_>> {
    let mut result = Vec::new();
    from_select(select, need_recursive, &mut result);
    result
}

fn push<'a>(
    segment: &'a SubquerySegment,
    subquery_type: SubqueryType,
    need_recursive: bool,
    result: &mut Vec<ExtractedSubquery<'a>>,
) {
    result.push(ExtractedSubquery { segment, subquery_type });
    if need_recursive {
        from_select(&segment.select, true, result);
    }
}

fn from_select<'a>(select: &'a SelectStatement, need_recursive: bool, result: &mut Vec<ExtractedSubquery<'a>>) {
    for projection in &select.projections.projections {
        match projection {
            ProjectionSegment::Subquery(p) => push(&p.subquery, SubqueryType::Projection, need_recursive, result),
            ProjectionSegment::Expression(p) => from_expression(&p.expr, need_recursive, result),
            ProjectionSegment::Aggregation(p) => p
                .aggregation
                .parameters
                .iter()
                .for_each(|e| from_expression(e, need_recursive, result)),
            ProjectionSegment::Column(_) | ProjectionSegment::Shorthand(_) => {}
        }
    }
    if let Some(from) = &select.from {
        from_table(from, SubqueryType::Table, need_recursive, result);
    }
    if let Some(where_clause) = &select.where_clause {
        from_expression(&where_clause.expr, need_recursive, result);
    }
    if let Some(having) = &select.having {
        from_expression(&having.expr, need_recursive, result);
    }
    if let Some(combine) = &select.combine {
        push(&combine.left, SubqueryType::Combine, need_recursive, result);
        push(&combine.right, SubqueryType::Combine, need_recursive, result);
    }
    if let Some(with) = &select.with {
        for cte in &with.common_table_expressions {
            push(&cte.subquery, SubqueryType::With, need_recursive, result);
        }
    }
}

fn from_table<'a>(
    table: &'a TableSegment,
    subquery_type: SubqueryType,
    need_recursive: bool,
    result: &mut Vec<ExtractedSubquery<'a>>,
) {
    match table {
        TableSegment::Subquery(t) => push(&t.subquery, subquery_type, need_recursive, result),
        TableSegment::Join(join) => {
            from_table(&join.left, SubqueryType::Join, need_recursive, result);
            from_table(&join.right, SubqueryType::Join, need_recursive, result);
            if let Some(condition) = &join.condition {
                from_expression(condition, need_recursive, result);
            }
        }
        TableSegment::DeleteMultiTable(t) => from_table(&t.relation_table, subquery_type, need_recursive, result),
        TableSegment::Simple(_) | TableSegment::Function(_) => {}
    }
}

fn from_expression<'a>(expr: &'a Expr, need_recursive: bool, result: &mut Vec<ExtractedSubquery<'a>>) {
    match expr {
        Expr::Subquery(subquery) => push(subquery, SubqueryType::Predicate, need_recursive, result),
        Expr::Exists(exists) => push(&exists.subquery, SubqueryType::Predicate, need_recursive, result),
        Expr::Binary(e) => {
            from_expression(&e.left, need_recursive, result);
            from_expression(&e.right, need_recursive, result);
        }
        Expr::In(e) => {
            from_expression(&e.left, need_recursive, result);
            from_expression(&e.right, need_recursive, result);
        }
        Expr::Between(e) => {
            from_expression(&e.left, need_recursive, result);
            from_expression(&e.between, need_recursive, result);
            from_expression(&e.and, need_recursive, result);
        }
        Expr::Not(e) => from_expression(&e.expr, need_recursive, result),
        Expr::TypeCast(e) => from_expression(&e.expr, need_recursive, result),
        Expr::List(e) => e.items.iter().for_each(|i| from_expression(i, need_recursive, result)),
        Expr::Function(e) => e.parameters.iter().for_each(|p| from_expression(p, need_recursive, result)),
        Expr::CaseWhen(e) => {
            e.case_expr.iter().for_each(|c| from_expression(c, need_recursive, result));
            e.when_exprs
                .iter()
                .chain(&e.then_exprs)
                .for_each(|x| from_expression(x, need_recursive, result));
            e.else_expr.iter().for_each(|x| from_expression(x, need_recursive, result));
        }
        Expr::Column(_)
        | Expr::Literal(_)
        | Expr::Parameter(_)
        | Expr::Aggregation(_)
        | Expr::Multiset(_)
        | Expr::Values(_)
        | Expr::MatchAgainst(_)
        | Expr::OuterJoin(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn select_from(start: usize, name: &str) -> SelectStatement {
        SelectStatement::new(ProjectionsSegment::new(
            Span::new(start, start),
            vec![ProjectionSegment::shorthand(Span::new(start, start))],
        ))
        .from(TableSegment::Simple(SimpleTableSegment::new(
            Span::new(start + 7, start + 6 + name.len()),
            Identifier::new(name),
        )))
    }

    #[test]
    fn test_roles_and_recursion() {
        // SELECT * FROM (SELECT * FROM t WHERE id IN (SELECT id FROM u)) x WHERE EXISTS (SELECT * FROM v)
        let mut innermost_parent = select_from(22, "t");
        innermost_parent.where_clause = Some(WhereSegment::new(
            Span::new(32, 60),
            Expr::In(InExpr {
                span: Span::new(38, 60),
                left: Box::new(Expr::column(Span::new(38, 39), "id")),
                right: Box::new(Expr::Subquery(SubquerySegment::new(Span::new(44, 60), select_from(45, "u")))),
                not: false,
            }),
        ));
        let table = TableSegment::Subquery(SubqueryTableSegment {
            span: Span::new(14, 63),
            subquery: SubquerySegment::new(Span::new(14, 61), innermost_parent),
            alias: Some(AliasSegment::new(Span::new(63, 63), Identifier::new("x"))),
        });
        let select = select_from(7, "unused").from(table).filter(WhereSegment::new(
            Span::new(65, 95),
            Expr::Exists(ExistsExpr {
                span: Span::new(71, 95),
                subquery: SubquerySegment::new(Span::new(78, 95), select_from(79, "v")),
                not: false,
            }),
        ));

        let shallow: Vec<SubqueryType> = extract_subqueries(&select, false).iter().map(|s| s.subquery_type).collect();
        assert_eq!(shallow, vec![SubqueryType::Table, SubqueryType::Predicate]);

        let deep: Vec<SubqueryType> = extract_subqueries(&select, true).iter().map(|s| s.subquery_type).collect();
        assert_eq!(
            deep,
            vec![SubqueryType::Table, SubqueryType::Predicate, SubqueryType::Predicate]
        );
    }

    #[test]
    fn test_combine_operands() {
        let mut select = select_from(0, "t");
        select.combine = Some(CombineSegment {
            span: Span::new(0, 40),
            combine_type: CombineType::UnionAll,
            left: SubquerySegment::new(Span::new(0, 15), select_from(0, "a")),
            right: SubquerySegment::new(Span::new(27, 40), select_from(27, "b")),
        });
        let kinds: Vec<SubqueryType> = extract_subqueries(&select, false).iter().map(|s| s.subquery_type).collect();
        assert_eq!(kinds, vec![SubqueryType::Combine, SubqueryType::Combine]);
    }
}
