//! Boolean expression normalization.

use crate::ast::*;

/// One conjunctive group of predicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AndPredicate<'a> {
    pub predicates: Vec<&'a Expr>,
}

impl<'a> AndPredicate<'a> {
    fn single(expr: &'a Expr) -> Self {
        Self { predicates: vec![expr] }
    }

    fn merge(left: &Self, right: &Self) -> Self {
        let mut predicates = Vec::with_capacity(left.predicates.len() + right.predicates.len());
        predicates.extend_from_slice(&left.predicates);
        predicates.extend_from_slice(&right.predicates);
        Self { predicates }
    }
}

/// Normalize a boolean tree into OR-separated AND groups.
///
/// `A AND (B OR C)` becomes `[{A, B}, {A, C}]`; `(A AND B) OR (C AND D)` becomes
/// `[{A, B}, {C, D}]`.
pub fn and_predicates(expr: &Expr) -> Vec<AndPredicate<'_>> {
    match expr {
        Expr::Binary(binary) if binary.op == BinaryOperator::Or => {
            let mut result = and_predicates(&binary.left);
            result.extend(and_predicates(&binary.right));
            result
        }
        Expr::Binary(binary) if binary.op == BinaryOperator::And => {
            let left = and_predicates(&binary.left);
            let right = and_predicates(&binary.right);
            let mut result = Vec::with_capacity(left.len() * right.len());
            for l in &left {
                for r in &right {
                    result.push(AndPredicate::merge(l, r));
                }
            }
            result
        }
        _ => vec![AndPredicate::single(expr)],
    }
}

/// Leaves of the AND/OR skeleton of `expr`, left to right, without recursive calls.
pub fn flatten_logical(expr: &Expr) -> Vec<&Expr> {
    let mut result = Vec::new();
    let mut stack = vec![expr];
    while let Some(current) = stack.pop() {
        match current {
            Expr::Binary(binary) if binary.op.is_logical() => {
                stack.push(&binary.right);
                stack.push(&binary.left);
            }
            _ => result.push(current),
        }
    }
    result
}

/// Parameter markers in `exprs`, in encounter order.
pub fn parameter_markers<'a, I>(exprs: I) -> Vec<&'a ParameterMarker>
where
    I: IntoIterator<Item = &'a Expr>,
{
    let mut result = Vec::new();
    for expr in exprs {
        markers_into(expr, &mut result);
    }
    result
}

fn markers_into<'a>(expr: &'a Expr, result: &mut Vec<&'a ParameterMarker>) {
    match expr {
        Expr::Parameter(marker) => result.push(marker),
        Expr::Binary(e) => {
            markers_into(&e.left, result);
            markers_into(&e.right, result);
        }
        Expr::In(e) => {
            markers_into(&e.left, result);
            markers_into(&e.right, result);
        }
        Expr::Between(e) => {
            markers_into(&e.left, result);
            markers_into(&e.between, result);
            markers_into(&e.and, result);
        }
        Expr::List(e) => e.items.iter().for_each(|i| markers_into(i, result)),
        Expr::Function(e) => e.parameters.iter().for_each(|p| markers_into(p, result)),
        Expr::Aggregation(e) => e.parameters.iter().for_each(|p| markers_into(p, result)),
        Expr::Not(e) => markers_into(&e.expr, result),
        Expr::TypeCast(e) => markers_into(&e.expr, result),
        Expr::CaseWhen(e) => {
            e.case_expr.iter().for_each(|c| markers_into(c, result));
            e.when_exprs.iter().chain(&e.then_exprs).for_each(|x| markers_into(x, result));
            e.else_expr.iter().for_each(|x| markers_into(x, result));
        }
        Expr::Multiset(e) => {
            markers_into(&e.left, result);
            markers_into(&e.right, result);
        }
        Expr::Values(e) => e.rows.iter().flat_map(|r| &r.values).for_each(|v| markers_into(v, result)),
        Expr::MatchAgainst(e) => markers_into(&e.against, result),
        Expr::Column(_)
        | Expr::Literal(_)
        | Expr::OuterJoin(_)
        | Expr::Subquery(_)
        | Expr::Exists(_) => {}
    }
}

/// `column = column` equalities found in any AND group of the segments.
pub fn join_conditions(where_segments: &[WhereSegment]) -> Vec<&BinaryExpr> {
    let mut result = Vec::new();
    for segment in where_segments {
        for group in and_predicates(&segment.expr) {
            for predicate in group.predicates {
                if let Expr::Binary(binary) = predicate
                    && binary.op == BinaryOperator::Eq
                    && matches!(*binary.left, Expr::Column(_))
                    && matches!(*binary.right, Expr::Column(_))
                    && !result.iter().any(|r: &&BinaryExpr| r.span == binary.span)
                {
                    result.push(binary);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(start: usize, name: &str) -> Expr {
        Expr::column(Span::new(start, start), name)
    }

    fn names(groups: &[AndPredicate<'_>]) -> Vec<Vec<String>> {
        groups
            .iter()
            .map(|g| {
                g.predicates
                    .iter()
                    .map(|p| match p {
                        Expr::Column(c) => c.name().to_string(),
                        _ => "?".to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_or_of_ands() {
        // (A AND B) OR (C AND D)
        let expr = Expr::or(
            Expr::and(leaf(0, "A"), leaf(6, "B")),
            Expr::and(leaf(12, "C"), leaf(18, "D")),
        );
        assert_eq!(names(&and_predicates(&expr)), vec![vec!["A", "B"], vec!["C", "D"]]);
    }

    #[test]
    fn test_and_distributes_over_or() {
        // A AND (B OR C)
        let expr = Expr::and(leaf(0, "A"), Expr::or(leaf(7, "B"), leaf(12, "C")));
        assert_eq!(names(&and_predicates(&expr)), vec![vec!["A", "B"], vec!["A", "C"]]);
    }

    #[test]
    fn test_cartesian_product() {
        // (A OR B) AND (C OR D)
        let expr = Expr::and(
            Expr::or(leaf(0, "A"), leaf(5, "B")),
            Expr::or(leaf(12, "C"), leaf(17, "D")),
        );
        assert_eq!(
            names(&and_predicates(&expr)),
            vec![vec!["A", "C"], vec!["A", "D"], vec!["B", "C"], vec!["B", "D"]]
        );
    }

    #[test]
    fn test_leaf_is_single_group() {
        let expr = leaf(0, "A");
        assert_eq!(names(&and_predicates(&expr)), vec![vec!["A"]]);
    }

    #[test]
    fn test_flatten_deep_chain() {
        let mut expr = leaf(0, "c0");
        for i in 1..10_000 {
            expr = Expr::and(expr, leaf(i * 6, "c"));
        }
        let leaves = flatten_logical(&expr);
        assert_eq!(leaves.len(), 10_000);
        assert!(matches!(leaves[0], Expr::Column(c) if c.name() == "c0"));
        // Iterative drop of the deep tree.
        let mut pending = vec![expr];
        while let Some(e) = pending.pop() {
            if let Expr::Binary(b) = e {
                pending.push(*b.left);
                pending.push(*b.right);
            }
        }
    }

    #[test]
    fn test_parameter_markers() {
        let expr = Expr::and(
            Expr::eq(leaf(0, "a"), Expr::parameter(Span::new(4, 4), 0)),
            Expr::in_list(
                Span::new(10, 25),
                leaf(10, "b"),
                Span::new(15, 25),
                vec![Expr::int(Span::new(16, 16), 1), Expr::parameter(Span::new(19, 19), 1)],
            ),
        );
        let indexes: Vec<usize> = parameter_markers([&expr]).iter().map(|m| m.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn test_join_conditions() {
        let on = Expr::eq(leaf(0, "a"), leaf(4, "b"));
        let literal = Expr::eq(leaf(10, "c"), Expr::int(Span::new(14, 14), 1));
        let segments = vec![WhereSegment::new(Span::new(0, 14), Expr::and(on, literal))];
        assert_eq!(join_conditions(&segments).len(), 1);
    }
}
