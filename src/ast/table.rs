//! Table references.

use super::{impl_segment, AliasSegment, ColumnSegment, Expr, Identifier, OwnerSegment, Segment, Span, SubquerySegment};
use serde::{Deserialize, Serialize};

/// The bare table name inside a simple table reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNameSegment {
    pub span: Span,
    pub identifier: Identifier,
}

/// `[owner.]name [AS alias]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleTableSegment {
    pub table_name: TableNameSegment,
    pub owner: Option<OwnerSegment>,
    pub alias: Option<AliasSegment>,
}

impl SimpleTableSegment {
    pub fn new(span: Span, identifier: Identifier) -> Self {
        Self {
            table_name: TableNameSegment { span, identifier },
            owner: None,
            alias: None,
        }
    }

    /// Table reference recovered from a column or shorthand qualifier.
    pub fn from_owner(owner: &OwnerSegment) -> Self {
        Self {
            table_name: TableNameSegment {
                span: owner.span,
                identifier: owner.identifier.clone(),
            },
            owner: owner.owner.as_deref().cloned(),
            alias: None,
        }
    }

    pub fn with_owner(mut self, owner: OwnerSegment) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_alias(mut self, alias: AliasSegment) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn name(&self) -> &str {
        &self.table_name.identifier.value
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_ref().map(|a| a.value())
    }
}

impl Segment for SimpleTableSegment {
    fn span(&self) -> Span {
        let start = self.owner.as_ref().map(|o| o.span.start).unwrap_or(self.table_name.span.start);
        let stop = self.alias.as_ref().map(|a| a.span.stop).unwrap_or(self.table_name.span.stop);
        Span::new(start, stop)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryTableSegment {
    pub span: Span,
    pub subquery: SubquerySegment,
    pub alias: Option<AliasSegment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    Comma,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinTableSegment {
    pub span: Span,
    pub left: Box<TableSegment>,
    pub right: Box<TableSegment>,
    pub join_type: JoinType,
    pub condition: Option<Expr>,
    pub using: Vec<ColumnSegment>,
}

/// Table-valued function such as `generate_series(1, 10) AS g`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTableSegment {
    pub span: Span,
    pub function: Expr,
    pub alias: Option<AliasSegment>,
}

/// MySQL `DELETE t1, t2 FROM t1 JOIN t2 ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteMultiTableSegment {
    pub span: Span,
    pub actual_delete_tables: Vec<SimpleTableSegment>,
    pub relation_table: Box<TableSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSegment {
    Simple(SimpleTableSegment),
    Subquery(SubqueryTableSegment),
    Join(JoinTableSegment),
    Function(FunctionTableSegment),
    DeleteMultiTable(DeleteMultiTableSegment),
}

impl TableSegment {
    pub fn alias(&self) -> Option<&str> {
        match self {
            TableSegment::Simple(t) => t.alias(),
            TableSegment::Subquery(t) => t.alias.as_ref().map(|a| a.value()),
            TableSegment::Function(t) => t.alias.as_ref().map(|a| a.value()),
            TableSegment::Join(_) | TableSegment::DeleteMultiTable(_) => None,
        }
    }

    /// Right-most simple table, used to find the end of a FROM clause.
    pub fn last_simple_table(&self) -> Option<&SimpleTableSegment> {
        match self {
            TableSegment::Simple(t) => Some(t),
            TableSegment::Join(join) => join.right.last_simple_table().or_else(|| join.left.last_simple_table()),
            TableSegment::DeleteMultiTable(t) => t.relation_table.last_simple_table(),
            TableSegment::Subquery(_) | TableSegment::Function(_) => None,
        }
    }

    pub fn join(left: TableSegment, right: TableSegment, join_type: JoinType, condition: Option<Expr>) -> Self {
        let start = left.span().start;
        let stop = condition
            .as_ref()
            .map(|c| c.span().stop)
            .unwrap_or_else(|| right.span().stop);
        TableSegment::Join(JoinTableSegment {
            span: Span::new(start, stop),
            left: Box::new(left),
            right: Box::new(right),
            join_type,
            condition,
            using: Vec::new(),
        })
    }
}

impl Segment for TableSegment {
    fn span(&self) -> Span {
        match self {
            TableSegment::Simple(t) => t.span(),
            TableSegment::Subquery(t) => t.span,
            TableSegment::Join(t) => t.span,
            TableSegment::Function(t) => t.span,
            TableSegment::DeleteMultiTable(t) => t.span,
        }
    }
}

impl_segment!(TableNameSegment, SubqueryTableSegment, JoinTableSegment, FunctionTableSegment, DeleteMultiTableSegment);
