//! Bound projections, including the derived columns a cross-shard merge needs.

use super::select::{GroupByContext, OrderByContext};
use crate::ast::{
    AggregationKind, ColumnSegment, OrderByItemSegment, ProjectionSegment, ProjectionsSegment, Span,
};

/// Alias families of columns added during rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedColumn {
    AvgCount,
    AvgSum,
    OrderBy,
    GroupBy,
    AggregationDistinct,
}

impl DerivedColumn {
    const ALL: [DerivedColumn; 5] = [
        DerivedColumn::AvgCount,
        DerivedColumn::AvgSum,
        DerivedColumn::OrderBy,
        DerivedColumn::GroupBy,
        DerivedColumn::AggregationDistinct,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            DerivedColumn::AvgCount => "AVG_DERIVED_COUNT_",
            DerivedColumn::AvgSum => "AVG_DERIVED_SUM_",
            DerivedColumn::OrderBy => "ORDER_BY_DERIVED_",
            DerivedColumn::GroupBy => "GROUP_BY_DERIVED_",
            DerivedColumn::AggregationDistinct => "AGGREGATION_DISTINCT_DERIVED_",
        }
    }

    pub fn alias(&self, index: usize) -> String {
        format!("{}{}", self.prefix(), index)
    }

    pub fn is_derived_column_name(name: &str) -> bool {
        Self::ALL.iter().any(|d| name.starts_with(d.prefix()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProjection {
    pub owner: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationProjection {
    pub kind: AggregationKind,
    pub distinct: bool,
    pub inner_expression: String,
    pub alias: Option<String>,
    /// The alias was generated, not written by the user.
    pub alias_derived: bool,
    pub span: Span,
    /// COUNT and SUM companions of an AVG.
    pub derived_aggregations: Vec<AggregationProjection>,
}

impl AggregationProjection {
    pub fn expression(&self) -> String {
        if self.distinct {
            format!("{}(DISTINCT {})", self.kind, self.inner_expression)
        } else {
            format!("{}({})", self.kind, self.inner_expression)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionProjection {
    pub text: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShorthandProjection {
    pub owner: Option<String>,
}

/// A column appended for ORDER BY / GROUP BY items missing from the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedProjection {
    pub expression: String,
    pub alias: String,
    /// Source column when the item is a column reference.
    pub column: Option<ColumnSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Column(ColumnProjection),
    Aggregation(AggregationProjection),
    Expression(ExpressionProjection),
    Shorthand(ShorthandProjection),
    Derived(DerivedProjection),
}

impl Projection {
    pub fn alias(&self) -> Option<&str> {
        match self {
            Projection::Column(p) => p.alias.as_deref(),
            Projection::Aggregation(p) => p.alias.as_deref(),
            Projection::Expression(p) => p.alias.as_deref(),
            Projection::Derived(p) => Some(&p.alias),
            Projection::Shorthand(_) => None,
        }
    }

    pub fn expression(&self) -> String {
        match self {
            Projection::Column(p) => match &p.owner {
                Some(owner) => format!("{}.{}", owner, p.name),
                None => p.name.clone(),
            },
            Projection::Aggregation(p) => p.expression(),
            Projection::Expression(p) => p.text.clone(),
            Projection::Derived(p) => p.expression.clone(),
            Projection::Shorthand(p) => match &p.owner {
                Some(owner) => format!("{}.*", owner),
                None => "*".to_string(),
            },
        }
    }

    /// Alias when present, expression otherwise.
    pub fn column_label(&self) -> String {
        match self {
            Projection::Column(p) => p.alias.clone().unwrap_or_else(|| p.name.clone()),
            _ => self.alias().map(str::to_string).unwrap_or_else(|| self.expression()),
        }
    }

    /// Whether this projection already yields the ORDER BY / GROUP BY `item`.
    fn covers(&self, item: &OrderByItemSegment) -> bool {
        match item {
            OrderByItemSegment::Index { .. } => true,
            OrderByItemSegment::Column { column, .. } => {
                let owner = column.owner.as_ref().map(|o| o.value());
                match self {
                    Projection::Shorthand(p) => match (&p.owner, owner) {
                        (None, _) => true,
                        (Some(p_owner), Some(owner)) => p_owner.eq_ignore_ascii_case(owner),
                        (Some(_), None) => false,
                    },
                    Projection::Column(p) => {
                        let same_column = p.name.eq_ignore_ascii_case(column.name())
                            && match (&p.owner, owner) {
                                (Some(p_owner), Some(owner)) => p_owner.eq_ignore_ascii_case(owner),
                                _ => true,
                            };
                        same_column || (owner.is_none() && self.alias_matches(column.name()))
                    }
                    Projection::Derived(p) => p.expression.eq_ignore_ascii_case(&column.qualified_name()),
                    _ => owner.is_none() && self.alias_matches(column.name()),
                }
            }
            OrderByItemSegment::Expression { text, .. } => {
                self.expression().eq_ignore_ascii_case(text) || self.alias_matches(text)
            }
        }
    }

    fn alias_matches(&self, name: &str) -> bool {
        self.alias().is_some_and(|a| a.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionsContext {
    pub span: Span,
    pub distinct_row: bool,
    pub projections: Vec<Projection>,
}

impl ProjectionsContext {
    pub fn new(segment: &ProjectionsSegment, group_by: &GroupByContext, order_by: &OrderByContext) -> Self {
        let mut projections = Vec::with_capacity(segment.projections.len());
        let mut avg_index = 0;
        let mut distinct_index = 0;
        for each in &segment.projections {
            projections.push(match each {
                ProjectionSegment::Column(p) => Projection::Column(ColumnProjection {
                    owner: p.column.owner.as_ref().map(|o| o.value().to_string()),
                    name: p.column.name().to_string(),
                    alias: p.alias.as_ref().map(|a| a.value().to_string()),
                }),
                ProjectionSegment::Aggregation(p) => {
                    let aggregation = &p.aggregation;
                    let (alias, alias_derived) = match (&p.alias, aggregation.distinct) {
                        (Some(alias), _) => (Some(alias.value().to_string()), false),
                        (None, true) => {
                            let alias = DerivedColumn::AggregationDistinct.alias(distinct_index);
                            distinct_index += 1;
                            (Some(alias), true)
                        }
                        (None, false) => (None, false),
                    };
                    let mut derived_aggregations = Vec::new();
                    if aggregation.kind == AggregationKind::Avg {
                        for (kind, column) in [
                            (AggregationKind::Count, DerivedColumn::AvgCount),
                            (AggregationKind::Sum, DerivedColumn::AvgSum),
                        ] {
                            derived_aggregations.push(AggregationProjection {
                                kind,
                                distinct: aggregation.distinct,
                                inner_expression: aggregation.inner_expression.clone(),
                                alias: Some(column.alias(avg_index)),
                                alias_derived: true,
                                span: aggregation.span,
                                derived_aggregations: Vec::new(),
                            });
                        }
                        avg_index += 1;
                    }
                    Projection::Aggregation(AggregationProjection {
                        kind: aggregation.kind,
                        distinct: aggregation.distinct,
                        inner_expression: aggregation.inner_expression.clone(),
                        alias,
                        alias_derived,
                        span: aggregation.span,
                        derived_aggregations,
                    })
                }
                ProjectionSegment::Expression(p) => Projection::Expression(ExpressionProjection {
                    text: p.text.clone(),
                    alias: p.alias.as_ref().map(|a| a.value().to_string()),
                }),
                ProjectionSegment::Subquery(p) => Projection::Expression(ExpressionProjection {
                    text: p.text.clone(),
                    alias: p.alias.as_ref().map(|a| a.value().to_string()),
                }),
                ProjectionSegment::Shorthand(p) => Projection::Shorthand(ShorthandProjection {
                    owner: p.owner.as_ref().map(|o| o.value().to_string()),
                }),
            });
        }

        let group_by_derived = derived_items(&projections, &group_by.items, DerivedColumn::GroupBy);
        projections.extend(group_by_derived);
        if !order_by.generated {
            let order_by_derived = derived_items(&projections, &order_by.items, DerivedColumn::OrderBy);
            projections.extend(order_by_derived);
        }

        Self {
            span: segment.span,
            distinct_row: segment.distinct_row,
            projections,
        }
    }

    pub fn aggregation_projections(&self) -> impl Iterator<Item = &AggregationProjection> {
        self.projections.iter().filter_map(|p| match p {
            Projection::Aggregation(a) => Some(a),
            _ => None,
        })
    }

    pub fn aggregation_distinct_projections(&self) -> impl Iterator<Item = &AggregationProjection> {
        self.aggregation_projections().filter(|a| a.distinct)
    }

    pub fn derived_projections(&self) -> impl Iterator<Item = &DerivedProjection> {
        self.projections.iter().filter_map(|p| match p {
            Projection::Derived(d) => Some(d),
            _ => None,
        })
    }

    /// Any non-derived projection already uses `alias`.
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.projections
            .iter()
            .filter(|p| !matches!(p, Projection::Derived(_)))
            .any(|p| p.alias().is_some_and(|a| a.eq_ignore_ascii_case(alias)))
    }
}

fn derived_items(
    projections: &[Projection],
    items: &[OrderByItemSegment],
    derived_column: DerivedColumn,
) -> Vec<Projection> {
    let mut result: Vec<Projection> = Vec::new();
    for item in items {
        if projections.iter().chain(&result).any(|p| p.covers(item)) {
            continue;
        }
        let (expression, column) = match item {
            OrderByItemSegment::Column { column, .. } => (column.qualified_name(), Some(column.clone())),
            OrderByItemSegment::Expression { text, .. } => (text.clone(), None),
            OrderByItemSegment::Index { .. } => continue,
        };
        result.push(Projection::Derived(DerivedProjection {
            expression,
            alias: derived_column.alias(result.len()),
            column,
        }));
    }
    result
}
