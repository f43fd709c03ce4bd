//! Statement nodes.

use super::{
    impl_segment, AssignmentSegment, ColumnSegment, CombineSegment, GroupBySegment, HavingSegment, Identifier,
    InsertValuesSegment, LimitSegment, LockSegment, OrderBySegment, OwnerSegment, ProjectionsSegment,
    SimpleTableSegment, Span, SubquerySegment, TableSegment, WhereSegment, WindowSegment, WithSegment,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub projections: ProjectionsSegment,
    pub from: Option<TableSegment>,
    pub where_clause: Option<WhereSegment>,
    pub group_by: Option<GroupBySegment>,
    pub having: Option<HavingSegment>,
    pub window: Option<WindowSegment>,
    pub order_by: Option<OrderBySegment>,
    pub limit: Option<LimitSegment>,
    pub lock: Option<LockSegment>,
    pub with: Option<WithSegment>,
    pub combine: Option<CombineSegment>,
}

impl SelectStatement {
    pub fn new(projections: ProjectionsSegment) -> Self {
        Self {
            projections,
            from: None,
            where_clause: None,
            group_by: None,
            having: None,
            window: None,
            order_by: None,
            limit: None,
            lock: None,
            with: None,
            combine: None,
        }
    }

    pub fn from(mut self, table: TableSegment) -> Self {
        self.from = Some(table);
        self
    }

    pub fn filter(mut self, where_clause: WhereSegment) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn group_by(mut self, group_by: GroupBySegment) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn order_by(mut self, order_by: OrderBySegment) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn limit(mut self, limit: LimitSegment) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: SimpleTableSegment,
    pub columns: Vec<ColumnSegment>,
    pub values: Vec<InsertValuesSegment>,
    pub on_duplicate_key_update: Vec<AssignmentSegment>,
    pub insert_select: Option<SubquerySegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    pub table: TableSegment,
    pub assignments: Vec<AssignmentSegment>,
    pub where_clause: Option<WhereSegment>,
    pub order_by: Option<OrderBySegment>,
    pub limit: Option<LimitSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteStatement {
    pub table: TableSegment,
    pub where_clause: Option<WhereSegment>,
    pub order_by: Option<OrderBySegment>,
    pub limit: Option<LimitSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexNameSegment {
    pub span: Span,
    pub identifier: Identifier,
}

/// `[schema.]index_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSegment {
    pub span: Span,
    pub index_name: IndexNameSegment,
    pub owner: Option<OwnerSegment>,
}

impl IndexSegment {
    pub fn new(span: Span, identifier: Identifier) -> Self {
        Self {
            span,
            index_name: IndexNameSegment { span, identifier },
            owner: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.index_name.identifier.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSegment {
    pub span: Span,
    pub identifier: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinitionSegment {
    pub span: Span,
    pub column_name: ColumnSegment,
    pub data_type: String,
    pub referenced_tables: Vec<SimpleTableSegment>,
}

/// `[CONSTRAINT name] PRIMARY KEY / UNIQUE [index] / FOREIGN KEY ... REFERENCES t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDefinitionSegment {
    pub span: Span,
    pub constraint_name: Option<ConstraintSegment>,
    pub index_name: Option<IndexSegment>,
    pub reference_table: Option<SimpleTableSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableStatement {
    pub table: SimpleTableSegment,
    pub column_definitions: Vec<ColumnDefinitionSegment>,
    pub constraint_definitions: Vec<ConstraintDefinitionSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterTableStatement {
    pub table: SimpleTableSegment,
    pub rename_table: Option<SimpleTableSegment>,
    pub add_column_definitions: Vec<ColumnDefinitionSegment>,
    pub add_constraint_definitions: Vec<ConstraintDefinitionSegment>,
    pub drop_constraints: Vec<ConstraintSegment>,
    pub drop_indexes: Vec<IndexSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTableStatement {
    pub tables: Vec<SimpleTableSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncateStatement {
    pub tables: Vec<SimpleTableSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIndexStatement {
    pub index: IndexSegment,
    pub table: SimpleTableSegment,
    pub columns: Vec<ColumnSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlterIndexStatement {
    pub index: IndexSegment,
    pub rename_index: Option<IndexSegment>,
    pub table: Option<SimpleTableSegment>,
}

/// `DROP INDEX idx [ON t]`; PostgreSQL omits the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropIndexStatement {
    pub indexes: Vec<IndexSegment>,
    pub table: Option<SimpleTableSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorNameSegment {
    pub span: Span,
    pub identifier: Identifier,
}

impl CursorNameSegment {
    pub fn new(span: Span, identifier: Identifier) -> Self {
        Self { span, identifier }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclareCursorStatement {
    pub cursor_name: CursorNameSegment,
    pub select: SelectStatement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionType {
    Next,
    Prior,
    First,
    Last,
    Absolute,
    Relative,
    /// A bare count (`FETCH 5 FROM c`).
    Count,
    All,
    Forward,
    ForwardAll,
    Backward,
    BackwardAll,
}

impl DirectionType {
    /// Directions that read forward from the current position.
    pub fn is_forward(&self) -> bool {
        matches!(
            self,
            DirectionType::Next | DirectionType::Count | DirectionType::All | DirectionType::Forward | DirectionType::ForwardAll
        )
    }

    /// Directions that read every remaining row.
    pub fn is_all(&self) -> bool {
        matches!(self, DirectionType::All | DirectionType::ForwardAll | DirectionType::BackwardAll)
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DirectionType::Next => "NEXT",
            DirectionType::Prior => "PRIOR",
            DirectionType::First => "FIRST",
            DirectionType::Last => "LAST",
            DirectionType::Absolute => "ABSOLUTE",
            DirectionType::Relative => "RELATIVE",
            DirectionType::Count | DirectionType::Forward => "FORWARD",
            DirectionType::All | DirectionType::ForwardAll => "FORWARD ALL",
            DirectionType::Backward => "BACKWARD",
            DirectionType::BackwardAll => "BACKWARD ALL",
        }
    }
}

/// Direction clause of FETCH / MOVE. The span runs up to the cursor name, so it
/// includes any trailing `FROM` / `IN` keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionSegment {
    pub span: Span,
    pub direction_type: DirectionType,
    pub count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchStatement {
    pub cursor_name: CursorNameSegment,
    pub direction: Option<DirectionSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveStatement {
    pub cursor_name: CursorNameSegment,
    pub direction: Option<DirectionSegment>,
}

/// `CLOSE name` or `CLOSE ALL` (no name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseStatement {
    pub cursor_name: Option<CursorNameSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    AlterTable(AlterTableStatement),
    DropTable(DropTableStatement),
    Truncate(TruncateStatement),
    CreateIndex(CreateIndexStatement),
    AlterIndex(AlterIndexStatement),
    DropIndex(DropIndexStatement),
    DeclareCursor(DeclareCursorStatement),
    Fetch(FetchStatement),
    Move(MoveStatement),
    Close(CloseStatement),
}

impl_segment!(
    IndexNameSegment,
    IndexSegment,
    ConstraintSegment,
    ColumnDefinitionSegment,
    ConstraintDefinitionSegment,
    CursorNameSegment,
    DirectionSegment,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_classification() {
        assert!(DirectionType::Next.is_forward());
        assert!(DirectionType::ForwardAll.is_all());
        assert!(!DirectionType::Prior.is_forward());
        assert!(!DirectionType::Backward.is_all());
        assert_eq!(DirectionType::BackwardAll.keyword(), "BACKWARD ALL");
    }
}
