//! Pseudo WHERE segments built from JOIN conditions and nested SELECTs.

use super::subquery::extract_subqueries;
use crate::ast::*;

/// One WHERE segment per JOIN ... ON condition, spanning the condition.
pub fn join_where_segments(select: &SelectStatement) -> Vec<WhereSegment> {
    let mut result = Vec::new();
    if let Some(from) = &select.from {
        join_conditions_into(from, &mut result);
    }
    result
}

fn join_conditions_into(table: &TableSegment, result: &mut Vec<WhereSegment>) {
    match table {
        TableSegment::Join(join) => {
            join_conditions_into(&join.left, result);
            join_conditions_into(&join.right, result);
            if let Some(condition) = &join.condition {
                result.push(WhereSegment::new(condition.span(), condition.clone()));
            }
        }
        TableSegment::DeleteMultiTable(multi) => join_conditions_into(&multi.relation_table, result),
        TableSegment::Simple(_) | TableSegment::Subquery(_) | TableSegment::Function(_) => {}
    }
}

/// WHERE clauses of every nested SELECT, plus the JOIN conditions inside them.
pub fn subquery_where_segments(select: &SelectStatement) -> Vec<WhereSegment> {
    let mut result = Vec::new();
    for subquery in extract_subqueries(select, true) {
        let nested = &subquery.segment.select;
        if let Some(where_clause) = &nested.where_clause {
            result.push(where_clause.clone());
        }
        result.extend(join_where_segments(nested));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn simple(start: usize, name: &str) -> TableSegment {
        TableSegment::Simple(SimpleTableSegment::new(
            Span::new(start, start + name.len() - 1),
            Identifier::new(name),
        ))
    }

    #[test]
    fn test_join_condition_becomes_where() {
        // SELECT * FROM a JOIN b ON a.id = b.id
        let condition = Expr::eq(Expr::column(Span::new(25, 28), "id"), Expr::column(Span::new(32, 35), "id"));
        let select = SelectStatement::new(ProjectionsSegment::new(
            Span::new(7, 7),
            vec![ProjectionSegment::shorthand(Span::new(7, 7))],
        ))
        .from(TableSegment::join(simple(14, "a"), simple(21, "b"), JoinType::Inner, Some(condition)));

        let segments = join_where_segments(&select);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].span, Span::new(25, 35));
    }

    #[test]
    fn test_subquery_where() {
        let inner_where = WhereSegment::new(
            Span::new(30, 39),
            Expr::eq(Expr::column(Span::new(36, 37), "id"), Expr::int(Span::new(39, 39), 1)),
        );
        let inner = SelectStatement::new(ProjectionsSegment::new(
            Span::new(22, 22),
            vec![ProjectionSegment::shorthand(Span::new(22, 22))],
        ))
        .from(simple(29, "t"))
        .filter(inner_where.clone());
        let select = SelectStatement::new(ProjectionsSegment::new(
            Span::new(7, 7),
            vec![ProjectionSegment::shorthand(Span::new(7, 7))],
        ))
        .from(TableSegment::Subquery(SubqueryTableSegment {
            span: Span::new(14, 42),
            subquery: SubquerySegment::new(Span::new(14, 40), inner),
            alias: Some(AliasSegment::new(Span::new(42, 42), Identifier::new("x"))),
        }));

        assert_eq!(subquery_where_segments(&select), vec![inner_where]);
    }
}
