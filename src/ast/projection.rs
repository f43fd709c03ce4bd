//! Select-list items.

use super::{impl_segment, AggregationExpr, AliasSegment, ColumnSegment, Expr, OwnerSegment, Segment, Span, SubquerySegment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProjectionSegment {
    pub column: ColumnSegment,
    pub alias: Option<AliasSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationProjectionSegment {
    pub aggregation: AggregationExpr,
    pub alias: Option<AliasSegment>,
}

/// Any other expression in the select list; `text` is the expression as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionProjectionSegment {
    pub span: Span,
    pub expr: Expr,
    pub text: String,
    pub alias: Option<AliasSegment>,
}

/// `*` or `owner.*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShorthandProjectionSegment {
    pub span: Span,
    pub owner: Option<OwnerSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryProjectionSegment {
    pub subquery: SubquerySegment,
    pub text: String,
    pub alias: Option<AliasSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectionSegment {
    Column(ColumnProjectionSegment),
    Aggregation(AggregationProjectionSegment),
    Expression(ExpressionProjectionSegment),
    Shorthand(ShorthandProjectionSegment),
    Subquery(SubqueryProjectionSegment),
}

impl ProjectionSegment {
    pub fn alias(&self) -> Option<&AliasSegment> {
        match self {
            ProjectionSegment::Column(p) => p.alias.as_ref(),
            ProjectionSegment::Aggregation(p) => p.alias.as_ref(),
            ProjectionSegment::Expression(p) => p.alias.as_ref(),
            ProjectionSegment::Subquery(p) => p.alias.as_ref(),
            ProjectionSegment::Shorthand(_) => None,
        }
    }

    pub fn column(column: ColumnSegment) -> Self {
        ProjectionSegment::Column(ColumnProjectionSegment { column, alias: None })
    }

    pub fn aggregation(aggregation: AggregationExpr, alias: Option<AliasSegment>) -> Self {
        ProjectionSegment::Aggregation(AggregationProjectionSegment { aggregation, alias })
    }

    pub fn shorthand(span: Span) -> Self {
        ProjectionSegment::Shorthand(ShorthandProjectionSegment { span, owner: None })
    }
}

impl Segment for ProjectionSegment {
    fn span(&self) -> Span {
        let (start, stop) = match self {
            ProjectionSegment::Column(p) => (p.column.span.start, p.column.span.stop),
            ProjectionSegment::Aggregation(p) => (p.aggregation.span.start, p.aggregation.span.stop),
            ProjectionSegment::Expression(p) => (p.span.start, p.span.stop),
            ProjectionSegment::Shorthand(p) => (p.span.start, p.span.stop),
            ProjectionSegment::Subquery(p) => (p.subquery.span.start, p.subquery.span.stop),
        };
        let stop = self.alias().map(|a| a.span.stop).unwrap_or(stop);
        Span::new(start, stop)
    }
}

/// The whole select list. `span` starts at the first projection, after any `DISTINCT`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionsSegment {
    pub span: Span,
    pub distinct_row: bool,
    pub projections: Vec<ProjectionSegment>,
}

impl ProjectionsSegment {
    pub fn new(span: Span, projections: Vec<ProjectionSegment>) -> Self {
        Self {
            span,
            distinct_row: false,
            projections,
        }
    }
}

impl_segment!(ExpressionProjectionSegment, ShorthandProjectionSegment, ProjectionsSegment);
