//! Column extraction.

use crate::ast::*;

/// Columns referenced by `expr`, not crossing into nested SELECTs.
pub fn extract(expr: &Expr) -> Vec<&ColumnSegment> {
    extract_with_subquery(expr, false)
}

/// Columns referenced by `expr`; nested SELECTs contribute only when `contains_subquery` is set.
pub fn extract_with_subquery(expr: &Expr, contains_subquery: bool) -> Vec<&ColumnSegment> {
    let mut result = Vec::new();
    extract_into(expr, contains_subquery, &mut result);
    result
}

fn extract_into<'a>(expr: &'a Expr, contains_subquery: bool, result: &mut Vec<&'a ColumnSegment>) {
    match expr {
        Expr::Column(column) => result.push(column),
        Expr::Literal(_) | Expr::Parameter(_) => {}
        Expr::Binary(binary) => {
            extract_into(&binary.left, contains_subquery, result);
            extract_into(&binary.right, contains_subquery, result);
        }
        Expr::In(in_expr) => {
            extract_into(&in_expr.left, contains_subquery, result);
            extract_into(&in_expr.right, contains_subquery, result);
        }
        Expr::Between(between) => {
            extract_into(&between.left, contains_subquery, result);
            extract_into(&between.between, contains_subquery, result);
            extract_into(&between.and, contains_subquery, result);
        }
        Expr::CaseWhen(case) => {
            if let Some(case_expr) = &case.case_expr {
                extract_into(case_expr, contains_subquery, result);
            }
            for each in case.when_exprs.iter().chain(&case.then_exprs) {
                extract_into(each, contains_subquery, result);
            }
            if let Some(else_expr) = &case.else_expr {
                extract_into(else_expr, contains_subquery, result);
            }
        }
        Expr::Function(function) => {
            for each in &function.parameters {
                extract_into(each, contains_subquery, result);
            }
        }
        Expr::Aggregation(aggregation) => {
            for each in &aggregation.parameters {
                extract_into(each, contains_subquery, result);
            }
        }
        Expr::List(list) => {
            for each in &list.items {
                extract_into(each, contains_subquery, result);
            }
        }
        Expr::Multiset(multiset) => {
            extract_into(&multiset.left, contains_subquery, result);
            extract_into(&multiset.right, contains_subquery, result);
        }
        Expr::Not(not) => extract_into(&not.expr, contains_subquery, result),
        Expr::Values(values) => {
            for each in values.rows.iter().flat_map(|r| &r.values) {
                extract_into(each, contains_subquery, result);
            }
        }
        Expr::MatchAgainst(match_against) => {
            result.extend(&match_against.columns);
            extract_into(&match_against.against, contains_subquery, result);
        }
        Expr::OuterJoin(outer_join) => result.push(&outer_join.column),
        Expr::TypeCast(cast) => extract_into(&cast.expr, contains_subquery, result),
        Expr::Subquery(subquery) => {
            if contains_subquery {
                select_into(&subquery.select, true, result);
            }
        }
        Expr::Exists(exists) => {
            if contains_subquery {
                select_into(&exists.subquery.select, true, result);
            }
        }
    }
}

/// Columns referenced anywhere in a SELECT.
pub fn extract_from_select(select: &SelectStatement, contains_subquery: bool) -> Vec<&ColumnSegment> {
    let mut result = Vec::new();
    select_into(select, contains_subquery, &mut result);
    result
}

fn select_into<'a>(select: &'a SelectStatement, contains_subquery: bool, result: &mut Vec<&'a ColumnSegment>) {
    for projection in &select.projections.projections {
        match projection {
            ProjectionSegment::Column(p) => result.push(&p.column),
            ProjectionSegment::Aggregation(p) => {
                for each in &p.aggregation.parameters {
                    extract_into(each, contains_subquery, result);
                }
            }
            ProjectionSegment::Expression(p) => extract_into(&p.expr, contains_subquery, result),
            ProjectionSegment::Subquery(p) => {
                if contains_subquery {
                    select_into(&p.subquery.select, true, result);
                }
            }
            ProjectionSegment::Shorthand(_) => {}
        }
    }
    if let Some(from) = &select.from {
        table_into(from, contains_subquery, result);
    }
    if let Some(where_clause) = &select.where_clause {
        extract_into(&where_clause.expr, contains_subquery, result);
    }
    let items = select
        .group_by
        .iter()
        .flat_map(|g| &g.items)
        .chain(select.order_by.iter().flat_map(|o| &o.items));
    for item in items {
        match item {
            OrderByItemSegment::Column { column, .. } => result.push(column),
            OrderByItemSegment::Expression { expr, .. } => extract_into(expr, contains_subquery, result),
            OrderByItemSegment::Index { .. } => {}
        }
    }
    if let Some(having) = &select.having {
        extract_into(&having.expr, contains_subquery, result);
    }
    if contains_subquery && let Some(combine) = &select.combine {
        select_into(&combine.left.select, true, result);
        select_into(&combine.right.select, true, result);
    }
}

fn table_into<'a>(table: &'a TableSegment, contains_subquery: bool, result: &mut Vec<&'a ColumnSegment>) {
    match table {
        TableSegment::Join(join) => {
            table_into(&join.left, contains_subquery, result);
            table_into(&join.right, contains_subquery, result);
            if let Some(condition) = &join.condition {
                extract_into(condition, contains_subquery, result);
            }
            result.extend(&join.using);
        }
        TableSegment::Subquery(subquery) => {
            if contains_subquery {
                select_into(&subquery.subquery.select, true, result);
            }
        }
        TableSegment::DeleteMultiTable(multi) => table_into(&multi.relation_table, contains_subquery, result),
        TableSegment::Simple(_) | TableSegment::Function(_) => {}
    }
}

/// Columns of every filtering condition, in segment order.
pub fn extract_from_where_segments(segments: &[WhereSegment]) -> Vec<&ColumnSegment> {
    segments.iter().flat_map(|s| extract(&s.expr)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn col(start: usize, name: &str) -> Expr {
        Expr::column(Span::new(start, start + name.len() - 1), name)
    }

    fn names(columns: Vec<&ColumnSegment>) -> Vec<&str> {
        columns.into_iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_extract_nested_arithmetic() {
        // SUM(a) + f(b, c)
        let sum = Expr::Aggregation(AggregationExpr {
            span: Span::new(0, 5),
            kind: AggregationKind::Sum,
            distinct: false,
            parameters: vec![col(4, "a")],
            inner_expression: "a".to_string(),
        });
        let function = Expr::Function(FunctionExpr {
            span: Span::new(9, 15),
            name: "f".to_string(),
            parameters: vec![col(11, "b"), col(14, "c")],
        });
        let expr = Expr::binary(sum, BinaryOperator::Plus, function);
        assert_eq!(names(extract(&expr)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_case_between_not() {
        let between = Expr::Between(BetweenExpr {
            span: Span::new(0, 20),
            left: Box::new(col(0, "x")),
            between: Box::new(col(10, "lo")),
            and: Box::new(col(17, "hi")),
            not: false,
        });
        let case = Expr::CaseWhen(CaseWhenExpr {
            span: Span::new(0, 40),
            case_expr: None,
            when_exprs: vec![between],
            then_exprs: vec![col(30, "y")],
            else_expr: Some(Box::new(Expr::Not(NotExpr {
                span: Span::new(35, 40),
                expr: Box::new(col(39, "z")),
            }))),
        });
        assert_eq!(names(extract(&case)), vec!["x", "lo", "hi", "y", "z"]);
    }

    #[test]
    fn test_subquery_boundary() {
        let inner = SelectStatement::new(ProjectionsSegment::new(
            Span::new(20, 27),
            vec![ProjectionSegment::column(ColumnSegment::new(Span::new(20, 27), Identifier::new("order_id")))],
        ));
        let expr = Expr::In(InExpr {
            span: Span::new(0, 40),
            left: Box::new(col(0, "user_id")),
            right: Box::new(Expr::Subquery(SubquerySegment::new(Span::new(11, 40), inner))),
            not: false,
        });
        assert_eq!(names(extract(&expr)), vec!["user_id"]);
        assert_eq!(names(extract_with_subquery(&expr, true)), vec!["user_id", "order_id"]);
    }

    #[test]
    fn test_extract_from_where_segments() {
        // WHERE status = 'paid' ... ON o.order_id = i.order_id
        let segments = vec![
            WhereSegment::new(Span::new(0, 15), Expr::eq(col(6, "status"), Expr::string(Span::new(15, 20), "paid"))),
            WhereSegment::new(Span::new(30, 50), Expr::eq(col(30, "order_id"), col(43, "order_id"))),
        ];
        assert_eq!(names(extract_from_where_segments(&segments)), vec!["status", "order_id", "order_id"]);
        assert!(extract_from_where_segments(&[]).is_empty());
    }
}
