//! Statement contexts.
//!
//! A statement context is the immutable, bound view of one parsed statement that the
//! token generators read. Binding runs the extractors once; nothing here is mutated
//! afterwards.

pub mod cursor;
pub mod ddl;
pub mod dml;
pub mod pagination;
pub mod projection;
pub mod select;
pub mod tables;

pub use cursor::{CursorHeldKind, CursorHeldStatementContext, CursorStatementContext};
pub use ddl::DdlStatementContext;
pub use dml::{DeleteStatementContext, InsertStatementContext, InsertValueContext, UpdateStatementContext};
pub use pagination::{PaginationContext, MAX_ROW_COUNT};
pub use projection::{
    AggregationProjection, ColumnProjection, DerivedColumn, DerivedProjection, ExpressionProjection, Projection,
    ProjectionsContext, ShorthandProjection,
};
pub use select::{GroupByContext, OrderByContext, SelectStatementContext};
pub use tables::TablesContext;

use crate::ast::{ConstraintSegment, CursorNameSegment, IndexSegment, Statement, WhereSegment};
use crate::cursor::CursorDirectory;
use crate::error::{RewriteError, RewriteResult};

#[derive(Debug, Clone, PartialEq)]
pub enum StatementContext {
    Select(SelectStatementContext),
    Insert(InsertStatementContext),
    Update(UpdateStatementContext),
    Delete(DeleteStatementContext),
    Ddl(DdlStatementContext),
    Cursor(CursorStatementContext),
    CursorHeld(CursorHeldStatementContext),
}

impl StatementContext {
    /// Bind a parsed statement.
    ///
    /// FETCH, MOVE and CLOSE resolve their tables through `cursors`, so they fail when
    /// no directory is given or the cursor is not declared.
    pub fn bind(statement: Statement, cursors: Option<&CursorDirectory>) -> RewriteResult<Self> {
        let context = match statement {
            Statement::Select(select) => StatementContext::Select(SelectStatementContext::new(select)),
            Statement::Insert(insert) => StatementContext::Insert(InsertStatementContext::new(insert)),
            Statement::Update(update) => StatementContext::Update(UpdateStatementContext::new(update)),
            Statement::Delete(delete) => StatementContext::Delete(DeleteStatementContext::new(delete)),
            Statement::DeclareCursor(declare) => StatementContext::Cursor(CursorStatementContext::new(declare)),
            statement @ (Statement::Fetch(_) | Statement::Move(_) | Statement::Close(_)) => {
                let cursors = cursors.ok_or_else(|| RewriteError::missing("cursor directory", "cursor held statement"))?;
                StatementContext::CursorHeld(CursorHeldStatementContext::new(statement, cursors)?)
            }
            statement => match DdlStatementContext::new(statement) {
                Some(ddl) => StatementContext::Ddl(ddl),
                None => return Err(RewriteError::missing("statement", "ddl binding")),
            },
        };
        tracing::debug!("Bound {} statement over {:?}", context.kind(), context.tables().table_names().collect::<Vec<_>>());
        Ok(context)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StatementContext::Select(_) => "SELECT",
            StatementContext::Insert(_) => "INSERT",
            StatementContext::Update(_) => "UPDATE",
            StatementContext::Delete(_) => "DELETE",
            StatementContext::Ddl(_) => "DDL",
            StatementContext::Cursor(_) => "DECLARE CURSOR",
            StatementContext::CursorHeld(c) => match c.kind() {
                CursorHeldKind::Fetch => "FETCH",
                CursorHeldKind::Move => "MOVE",
                CursorHeldKind::Close => "CLOSE",
            },
        }
    }

    pub fn tables(&self) -> &TablesContext {
        match self {
            StatementContext::Select(c) => c.tables(),
            StatementContext::Insert(c) => c.tables(),
            StatementContext::Update(c) => c.tables(),
            StatementContext::Delete(c) => c.tables(),
            StatementContext::Ddl(c) => c.tables(),
            StatementContext::Cursor(c) => c.tables(),
            StatementContext::CursorHeld(c) => c.tables(),
        }
    }

    pub fn where_segments(&self) -> &[WhereSegment] {
        match self {
            StatementContext::Select(c) => c.where_segments(),
            StatementContext::Insert(c) => c.where_segments(),
            StatementContext::Update(c) => c.where_segments(),
            StatementContext::Delete(c) => c.where_segments(),
            StatementContext::Cursor(c) => c.select().where_segments(),
            StatementContext::Ddl(_) | StatementContext::CursorHeld(_) => &[],
        }
    }

    pub fn indexes(&self) -> &[IndexSegment] {
        match self {
            StatementContext::Ddl(c) => c.indexes(),
            _ => &[],
        }
    }

    pub fn constraints(&self) -> &[ConstraintSegment] {
        match self {
            StatementContext::Ddl(c) => c.constraints(),
            _ => &[],
        }
    }

    pub fn cursor_name(&self) -> Option<&CursorNameSegment> {
        match self {
            StatementContext::Cursor(c) => Some(c.cursor_name()),
            StatementContext::CursorHeld(c) => c.cursor_name(),
            _ => None,
        }
    }

    /// DECLARE, FETCH, MOVE or CLOSE.
    pub fn is_cursor_statement(&self) -> bool {
        matches!(self, StatementContext::Cursor(_) | StatementContext::CursorHeld(_))
    }

    /// The SELECT whose projections, ordering and pagination may be rewritten.
    pub fn as_select(&self) -> Option<&SelectStatementContext> {
        match self {
            StatementContext::Select(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_insert(&self) -> Option<&InsertStatementContext> {
        match self {
            StatementContext::Insert(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_ddl(&self) -> Option<&DdlStatementContext> {
        match self {
            StatementContext::Ddl(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cursor_held(&self) -> Option<&CursorHeldStatementContext> {
        match self {
            StatementContext::CursorHeld(c) => Some(c),
            _ => None,
        }
    }
}
