//! DDL context: tables, indexes and constraints named by a DDL statement.

use super::tables::TablesContext;
use crate::ast::*;

#[derive(Debug, Clone, PartialEq)]
pub struct DdlStatementContext {
    statement: Statement,
    tables: TablesContext,
    indexes: Vec<IndexSegment>,
    constraints: Vec<ConstraintSegment>,
}

impl DdlStatementContext {
    /// Returns `None` for non-DDL statements.
    pub fn new(statement: Statement) -> Option<Self> {
        let mut tables: Vec<SimpleTableSegment> = Vec::new();
        let mut indexes: Vec<IndexSegment> = Vec::new();
        let mut constraints: Vec<ConstraintSegment> = Vec::new();
        match &statement {
            Statement::CreateTable(create) => {
                tables.push(create.table.clone());
                collect_column_definitions(&create.column_definitions, &mut tables);
                collect_constraint_definitions(&create.constraint_definitions, &mut tables, &mut indexes, &mut constraints);
            }
            Statement::AlterTable(alter) => {
                tables.push(alter.table.clone());
                tables.extend(alter.rename_table.iter().cloned());
                collect_column_definitions(&alter.add_column_definitions, &mut tables);
                collect_constraint_definitions(
                    &alter.add_constraint_definitions,
                    &mut tables,
                    &mut indexes,
                    &mut constraints,
                );
                constraints.extend(alter.drop_constraints.iter().cloned());
                indexes.extend(alter.drop_indexes.iter().cloned());
            }
            Statement::DropTable(drop) => tables.extend(drop.tables.iter().cloned()),
            Statement::Truncate(truncate) => tables.extend(truncate.tables.iter().cloned()),
            Statement::CreateIndex(create) => {
                tables.push(create.table.clone());
                indexes.push(create.index.clone());
            }
            Statement::AlterIndex(alter) => {
                tables.extend(alter.table.iter().cloned());
                indexes.push(alter.index.clone());
                indexes.extend(alter.rename_index.iter().cloned());
            }
            Statement::DropIndex(drop) => {
                tables.extend(drop.table.iter().cloned());
                indexes.extend(drop.indexes.iter().cloned());
            }
            Statement::Select(_)
            | Statement::Insert(_)
            | Statement::Update(_)
            | Statement::Delete(_)
            | Statement::DeclareCursor(_)
            | Statement::Fetch(_)
            | Statement::Move(_)
            | Statement::Close(_) => return None,
        }
        Some(Self {
            statement,
            tables: TablesContext::new(tables),
            indexes,
            constraints,
        })
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn tables(&self) -> &TablesContext {
        &self.tables
    }

    pub fn indexes(&self) -> &[IndexSegment] {
        &self.indexes
    }

    pub fn constraints(&self) -> &[ConstraintSegment] {
        &self.constraints
    }

    /// The table an index belongs to when the statement names exactly one.
    pub fn index_owner_table(&self) -> Option<&SimpleTableSegment> {
        match &self.statement {
            Statement::CreateIndex(create) => Some(&create.table),
            Statement::AlterIndex(alter) => alter.table.as_ref(),
            Statement::DropIndex(drop) => drop.table.as_ref(),
            Statement::AlterTable(alter) => Some(&alter.table),
            Statement::CreateTable(create) => Some(&create.table),
            _ => None,
        }
    }
}

fn collect_column_definitions(definitions: &[ColumnDefinitionSegment], tables: &mut Vec<SimpleTableSegment>) {
    for definition in definitions {
        tables.extend(definition.referenced_tables.iter().cloned());
    }
}

fn collect_constraint_definitions(
    definitions: &[ConstraintDefinitionSegment],
    tables: &mut Vec<SimpleTableSegment>,
    indexes: &mut Vec<IndexSegment>,
    constraints: &mut Vec<ConstraintSegment>,
) {
    for definition in definitions {
        tables.extend(definition.reference_table.iter().cloned());
        indexes.extend(definition.index_name.iter().cloned());
        constraints.extend(definition.constraint_name.iter().cloned());
    }
}
