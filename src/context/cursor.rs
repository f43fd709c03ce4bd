//! DECLARE CURSOR and the statements that operate on a declared cursor.

use super::select::SelectStatementContext;
use super::tables::TablesContext;
use crate::ast::*;
use crate::cursor::{CursorDefinition, CursorDirectory};
use crate::error::{RewriteError, RewriteResult};

#[derive(Debug, Clone, PartialEq)]
pub struct CursorStatementContext {
    cursor_name: CursorNameSegment,
    select: SelectStatementContext,
}

impl CursorStatementContext {
    pub fn new(statement: DeclareCursorStatement) -> Self {
        Self {
            cursor_name: statement.cursor_name,
            select: SelectStatementContext::new(statement.select),
        }
    }

    pub fn cursor_name(&self) -> &CursorNameSegment {
        &self.cursor_name
    }

    pub fn select(&self) -> &SelectStatementContext {
        &self.select
    }

    pub fn tables(&self) -> &TablesContext {
        self.select.tables()
    }

    /// Definition to register in the connection's cursor directory once the
    /// statement has executed.
    pub fn definition(&self) -> CursorDefinition {
        CursorDefinition::new(self.select.tables().table_names())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHeldKind {
    Fetch,
    Move,
    Close,
}

/// FETCH, MOVE or CLOSE bound to the tables of the declared cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorHeldStatementContext {
    kind: CursorHeldKind,
    cursor_name: Option<CursorNameSegment>,
    direction: Option<DirectionSegment>,
    tables: TablesContext,
}

impl CursorHeldStatementContext {
    pub fn new(statement: Statement, cursors: &CursorDirectory) -> RewriteResult<Self> {
        let (kind, cursor_name, direction) = match statement {
            Statement::Fetch(fetch) => (CursorHeldKind::Fetch, Some(fetch.cursor_name), fetch.direction),
            Statement::Move(move_statement) => {
                (CursorHeldKind::Move, Some(move_statement.cursor_name), move_statement.direction)
            }
            Statement::Close(close) => (CursorHeldKind::Close, close.cursor_name, None),
            _ => return Err(RewriteError::missing("cursor name", "cursor held statement")),
        };
        let tables = match &cursor_name {
            Some(name) => {
                let value = &name.identifier.value;
                let definition = cursors
                    .definition(value)
                    .ok_or_else(|| RewriteError::CursorNotDeclared(value.clone()))?;
                TablesContext::from_names(definition.table_names)
            }
            None => TablesContext::default(),
        };
        Ok(Self {
            kind,
            cursor_name,
            direction,
            tables,
        })
    }

    pub fn kind(&self) -> CursorHeldKind {
        self.kind
    }

    /// `None` for `CLOSE ALL`.
    pub fn cursor_name(&self) -> Option<&CursorNameSegment> {
        self.cursor_name.as_ref()
    }

    pub fn direction(&self) -> Option<&DirectionSegment> {
        self.direction.as_ref()
    }

    pub fn tables(&self) -> &TablesContext {
        &self.tables
    }
}
