//! Expression nodes.

use super::{impl_segment, Identifier, OwnerSegment, SelectStatement, Span};
use serde::{Deserialize, Serialize};

/// Binary operators, logical and otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    Is,
    IsNot,
    Plus,
    Minus,
    Multiply,
    Divide,
    /// Modulo (%)
    Modulo,
    Concat,
}

impl BinaryOperator {
    /// AND / OR.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Like => "LIKE",
            BinaryOperator::NotLike => "NOT LIKE",
            BinaryOperator::Is => "IS",
            BinaryOperator::IsNot => "IS NOT",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Concat => "||",
        };
        write!(f, "{}", text)
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationKind {
    Count,
    Sum,
    Avg,
    Max,
    Min,
    BitXor,
}

impl std::fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationKind::Count => write!(f, "COUNT"),
            AggregationKind::Sum => write!(f, "SUM"),
            AggregationKind::Avg => write!(f, "AVG"),
            AggregationKind::Max => write!(f, "MAX"),
            AggregationKind::Min => write!(f, "MIN"),
            AggregationKind::BitXor => write!(f, "BIT_XOR"),
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Int(n) => write!(f, "{}", n),
            LiteralValue::Float(n) => write!(f, "{}", n),
            LiteralValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            LiteralValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            LiteralValue::Null => write!(f, "NULL"),
        }
    }
}

/// A column reference, optionally qualified (`o.order_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSegment {
    pub span: Span,
    pub identifier: Identifier,
    pub owner: Option<OwnerSegment>,
}

impl ColumnSegment {
    pub fn new(span: Span, identifier: Identifier) -> Self {
        Self {
            span,
            identifier,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: OwnerSegment) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn name(&self) -> &str {
        &self.identifier.value
    }

    /// `owner.name` or `name`, as written.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner.identifier, self.identifier),
            None => self.identifier.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpr {
    pub span: Span,
    pub value: LiteralValue,
}

/// A `?` or `$n` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMarker {
    pub span: Span,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub span: Span,
    pub left: Box<Expr>,
    pub op: BinaryOperator,
    pub right: Box<Expr>,
}

/// `left [NOT] IN right`; `right` is a list or a subquery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InExpr {
    pub span: Span,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetweenExpr {
    pub span: Span,
    pub left: Box<Expr>,
    pub between: Box<Expr>,
    pub and: Box<Expr>,
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhenExpr {
    pub span: Span,
    pub case_expr: Option<Box<Expr>>,
    pub when_exprs: Vec<Expr>,
    pub then_exprs: Vec<Expr>,
    pub else_expr: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpr {
    pub span: Span,
    pub name: String,
    pub parameters: Vec<Expr>,
}

/// An aggregate call such as `COUNT(DISTINCT order_id)`.
///
/// `inner_expression` is the argument text without parentheses and without the
/// `DISTINCT` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationExpr {
    pub span: Span,
    pub kind: AggregationKind,
    pub distinct: bool,
    pub parameters: Vec<Expr>,
    pub inner_expression: String,
}

impl AggregationExpr {
    /// Canonical text: `COUNT(DISTINCT order_id)`.
    pub fn text(&self) -> String {
        if self.distinct {
            format!("{}(DISTINCT {})", self.kind, self.inner_expression)
        } else {
            format!("{}({})", self.kind, self.inner_expression)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListExpr {
    pub span: Span,
    pub items: Vec<Expr>,
}

/// `left MULTISET UNION right` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultisetExpr {
    pub span: Span,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub operator: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotExpr {
    pub span: Span,
    pub expr: Box<Expr>,
}

/// One parenthesised row of a VALUES list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertValuesSegment {
    pub span: Span,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesExpr {
    pub span: Span,
    pub rows: Vec<InsertValuesSegment>,
}

/// MySQL `MATCH (cols) AGAINST (expr)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAgainstExpr {
    pub span: Span,
    pub columns: Vec<ColumnSegment>,
    pub against: Box<Expr>,
}

/// Oracle `column(+)` outer join marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OuterJoinExpr {
    pub span: Span,
    pub column: ColumnSegment,
}

/// A parenthesised SELECT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubquerySegment {
    pub span: Span,
    pub select: Box<SelectStatement>,
}

impl SubquerySegment {
    pub fn new(span: Span, select: SelectStatement) -> Self {
        Self {
            span,
            select: Box::new(select),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistsExpr {
    pub span: Span,
    pub subquery: SubquerySegment,
    pub not: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCastExpr {
    pub span: Span,
    pub expr: Box<Expr>,
    pub data_type: String,
}

/// Closed set of expression kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Column(ColumnSegment),
    Literal(LiteralExpr),
    Parameter(ParameterMarker),
    Binary(BinaryExpr),
    In(InExpr),
    Between(BetweenExpr),
    CaseWhen(CaseWhenExpr),
    Function(FunctionExpr),
    Aggregation(AggregationExpr),
    List(ListExpr),
    Multiset(MultisetExpr),
    Not(NotExpr),
    Values(ValuesExpr),
    MatchAgainst(MatchAgainstExpr),
    OuterJoin(OuterJoinExpr),
    Subquery(SubquerySegment),
    Exists(ExistsExpr),
    TypeCast(TypeCastExpr),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Column(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::Parameter(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::In(e) => e.span,
            Expr::Between(e) => e.span,
            Expr::CaseWhen(e) => e.span,
            Expr::Function(e) => e.span,
            Expr::Aggregation(e) => e.span,
            Expr::List(e) => e.span,
            Expr::Multiset(e) => e.span,
            Expr::Not(e) => e.span,
            Expr::Values(e) => e.span,
            Expr::MatchAgainst(e) => e.span,
            Expr::OuterJoin(e) => e.span,
            Expr::Subquery(e) => e.span,
            Expr::Exists(e) => e.span,
            Expr::TypeCast(e) => e.span,
        }
    }

    pub fn column(span: Span, name: impl Into<String>) -> Self {
        Expr::Column(ColumnSegment::new(span, Identifier::new(name)))
    }

    pub fn int(span: Span, value: i64) -> Self {
        Expr::Literal(LiteralExpr {
            span,
            value: LiteralValue::Int(value),
        })
    }

    pub fn string(span: Span, value: impl Into<String>) -> Self {
        Expr::Literal(LiteralExpr {
            span,
            value: LiteralValue::String(value.into()),
        })
    }

    pub fn parameter(span: Span, index: usize) -> Self {
        Expr::Parameter(ParameterMarker { span, index })
    }

    /// Binary expression spanning both operands.
    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        let span = Span::new(left.span().start, right.span().stop);
        Expr::Binary(BinaryExpr {
            span,
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOperator::And, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOperator::Or, right)
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOperator::Eq, right)
    }

    /// `left IN (items)`; `span` covers the whole predicate, `list_span` the parentheses.
    pub fn in_list(span: Span, left: Expr, list_span: Span, items: Vec<Expr>) -> Self {
        Expr::In(InExpr {
            span,
            left: Box::new(left),
            right: Box::new(Expr::List(ListExpr {
                span: list_span,
                items,
            })),
            not: false,
        })
    }

    /// Binary AND / OR node.
    pub fn is_logical(&self) -> bool {
        matches!(self, Expr::Binary(b) if b.op.is_logical())
    }
}

impl_segment!(
    ColumnSegment,
    LiteralExpr,
    ParameterMarker,
    BinaryExpr,
    InExpr,
    BetweenExpr,
    CaseWhenExpr,
    FunctionExpr,
    AggregationExpr,
    ListExpr,
    MultisetExpr,
    NotExpr,
    InsertValuesSegment,
    ValuesExpr,
    MatchAgainstExpr,
    OuterJoinExpr,
    SubquerySegment,
    ExistsExpr,
    TypeCastExpr,
);

impl super::Segment for Expr {
    fn span(&self) -> Span {
        Expr::span(self)
    }
}
