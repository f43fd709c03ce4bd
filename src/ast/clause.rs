//! Clause nodes: WHERE, GROUP BY, ORDER BY, LIMIT and friends.

use super::{impl_segment, ColumnSegment, Expr, Identifier, SimpleTableSegment, Span, SubquerySegment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereSegment {
    pub span: Span,
    pub expr: Expr,
}

impl WhereSegment {
    pub fn new(span: Span, expr: Expr) -> Self {
        Self { span, expr }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingSegment {
    pub span: Span,
    pub expr: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One item of an ORDER BY or GROUP BY list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderByItemSegment {
    Column {
        column: ColumnSegment,
        direction: OrderDirection,
    },
    /// Ordinal reference (`ORDER BY 2`).
    Index {
        span: Span,
        index: usize,
        direction: OrderDirection,
    },
    Expression {
        span: Span,
        expr: Expr,
        text: String,
        direction: OrderDirection,
    },
}

impl OrderByItemSegment {
    pub fn column(column: ColumnSegment, direction: OrderDirection) -> Self {
        OrderByItemSegment::Column { column, direction }
    }

    pub fn direction(&self) -> OrderDirection {
        match self {
            OrderByItemSegment::Column { direction, .. }
            | OrderByItemSegment::Index { direction, .. }
            | OrderByItemSegment::Expression { direction, .. } => *direction,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            OrderByItemSegment::Column { column, .. } => column.span,
            OrderByItemSegment::Index { span, .. } | OrderByItemSegment::Expression { span, .. } => *span,
        }
    }

    /// Label used when the item is re-rendered: column text, expression text or ordinal.
    pub fn label(&self) -> String {
        match self {
            OrderByItemSegment::Column { column, .. } => column.qualified_name(),
            OrderByItemSegment::Index { index, .. } => index.to_string(),
            OrderByItemSegment::Expression { text, .. } => text.clone(),
        }
    }

    /// Text for an ORDER BY inserted into shard SQL. Columns drop their owner, which
    /// names the logic table rather than the actual one.
    pub fn output_label(&self) -> String {
        match self {
            OrderByItemSegment::Column { column, .. } => column.identifier.to_string(),
            _ => self.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBySegment {
    pub span: Span,
    pub items: Vec<OrderByItemSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBySegment {
    pub span: Span,
    pub items: Vec<OrderByItemSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSegment {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaginationValueSegment {
    NumberLiteral { span: Span, value: u64 },
    ParameterMarker { span: Span, index: usize },
}

impl PaginationValueSegment {
    pub fn span(&self) -> Span {
        match self {
            PaginationValueSegment::NumberLiteral { span, .. } | PaginationValueSegment::ParameterMarker { span, .. } => {
                *span
            }
        }
    }

    pub fn literal(&self) -> Option<u64> {
        match self {
            PaginationValueSegment::NumberLiteral { value, .. } => Some(*value),
            PaginationValueSegment::ParameterMarker { .. } => None,
        }
    }
}

/// `LIMIT [offset,] row_count`, `LIMIT n OFFSET m` or `OFFSET m ROWS FETCH NEXT n ROWS ONLY`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitSegment {
    pub span: Span,
    pub offset: Option<PaginationValueSegment>,
    pub row_count: Option<PaginationValueSegment>,
}

/// `FOR UPDATE [OF t1, t2]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockSegment {
    pub span: Span,
    pub tables: Vec<SimpleTableSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTableExpressionSegment {
    pub span: Span,
    pub name: Identifier,
    pub subquery: SubquerySegment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithSegment {
    pub span: Span,
    pub common_table_expressions: Vec<CommonTableExpressionSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombineType {
    Union,
    UnionAll,
    Intersect,
    Except,
}

/// `left UNION right` and other set operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombineSegment {
    pub span: Span,
    pub combine_type: CombineType,
    pub left: SubquerySegment,
    pub right: SubquerySegment,
}

/// `col = expr` in UPDATE SET or ON DUPLICATE KEY UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentSegment {
    pub span: Span,
    pub columns: Vec<ColumnSegment>,
    pub value: Expr,
}

impl_segment!(
    WhereSegment,
    HavingSegment,
    GroupBySegment,
    OrderBySegment,
    WindowSegment,
    LimitSegment,
    LockSegment,
    CommonTableExpressionSegment,
    WithSegment,
    CombineSegment,
    AssignmentSegment,
);
