//! INSERT, UPDATE and DELETE contexts.

use super::select::SelectStatementContext;
use super::tables::TablesContext;
use crate::ast::*;
use crate::extractor::TableExtractor;

/// One VALUES row: its span and how many values it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertValueContext {
    pub span: Span,
    pub value_count: usize,
    pub parameter_count: usize,
}

impl InsertValueContext {
    fn new(segment: &InsertValuesSegment) -> Self {
        Self {
            span: segment.span,
            value_count: segment.values.len(),
            parameter_count: segment.values.iter().filter(|v| matches!(v, Expr::Parameter(_))).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatementContext {
    statement: InsertStatement,
    tables: TablesContext,
    values: Vec<InsertValueContext>,
    insert_select: Option<SelectStatementContext>,
}

impl InsertStatementContext {
    pub fn new(statement: InsertStatement) -> Self {
        let tables = {
            let mut extractor = TableExtractor::new();
            extractor.extract_from_insert(&statement);
            TablesContext::new(extractor.into_rewrite_tables())
        };
        let values = statement.values.iter().map(InsertValueContext::new).collect();
        let insert_select = statement
            .insert_select
            .as_ref()
            .map(|subquery| SelectStatementContext::new((*subquery.select).clone()));
        Self {
            statement,
            tables,
            values,
            insert_select,
        }
    }

    pub fn statement(&self) -> &InsertStatement {
        &self.statement
    }

    pub fn tables(&self) -> &TablesContext {
        &self.tables
    }

    /// VALUES rows in statement order.
    pub fn values(&self) -> &[InsertValueContext] {
        &self.values
    }

    pub fn insert_select(&self) -> Option<&SelectStatementContext> {
        self.insert_select.as_ref()
    }

    /// Column names, explicit or empty when the statement relies on table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.statement.columns.iter().map(ColumnSegment::name).collect()
    }

    pub fn where_segments(&self) -> &[WhereSegment] {
        self.insert_select.as_ref().map(|s| s.where_segments()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatementContext {
    statement: UpdateStatement,
    tables: TablesContext,
    where_segments: Vec<WhereSegment>,
}

impl UpdateStatementContext {
    pub fn new(statement: UpdateStatement) -> Self {
        let tables = {
            let mut extractor = TableExtractor::new();
            extractor.extract_from_update(&statement);
            TablesContext::new(extractor.into_rewrite_tables())
        };
        let where_segments = statement.where_clause.iter().cloned().collect();
        Self {
            statement,
            tables,
            where_segments,
        }
    }

    pub fn statement(&self) -> &UpdateStatement {
        &self.statement
    }

    pub fn tables(&self) -> &TablesContext {
        &self.tables
    }

    pub fn where_segments(&self) -> &[WhereSegment] {
        &self.where_segments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatementContext {
    statement: DeleteStatement,
    tables: TablesContext,
    where_segments: Vec<WhereSegment>,
}

impl DeleteStatementContext {
    pub fn new(statement: DeleteStatement) -> Self {
        let tables = {
            let mut extractor = TableExtractor::new();
            extractor.extract_from_delete(&statement);
            TablesContext::new(extractor.into_rewrite_tables())
        };
        let where_segments = statement.where_clause.iter().cloned().collect();
        Self {
            statement,
            tables,
            where_segments,
        }
    }

    pub fn statement(&self) -> &DeleteStatement {
        &self.statement
    }

    pub fn tables(&self) -> &TablesContext {
        &self.tables
    }

    pub fn where_segments(&self) -> &[WhereSegment] {
        &self.where_segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_values() {
        // INSERT INTO t_order (order_id, user_id) VALUES (1, ?), (2, 3)
        let statement = InsertStatement {
            table: SimpleTableSegment::new(Span::new(12, 18), Identifier::new("t_order")),
            columns: vec![
                ColumnSegment::new(Span::new(21, 28), Identifier::new("order_id")),
                ColumnSegment::new(Span::new(31, 37), Identifier::new("user_id")),
            ],
            values: vec![
                InsertValuesSegment {
                    span: Span::new(47, 52),
                    values: vec![Expr::int(Span::new(48, 48), 1), Expr::parameter(Span::new(51, 51), 0)],
                },
                InsertValuesSegment {
                    span: Span::new(55, 60),
                    values: vec![Expr::int(Span::new(56, 56), 2), Expr::int(Span::new(59, 59), 3)],
                },
            ],
            on_duplicate_key_update: vec![],
            insert_select: None,
        };
        let context = InsertStatementContext::new(statement);
        assert_eq!(context.column_names(), vec!["order_id", "user_id"]);
        assert_eq!(context.values().len(), 2);
        assert_eq!(context.values()[0].parameter_count, 1);
        assert_eq!(context.values()[1].span, Span::new(55, 60));
        assert!(context.tables().contains_table("T_ORDER"));
        assert!(context.where_segments().is_empty());
    }

    #[test]
    fn test_update_binds_where() {
        let where_clause = WhereSegment::new(
            Span::new(31, 46),
            Expr::eq(Expr::column(Span::new(37, 42), "status"), Expr::int(Span::new(46, 46), 1)),
        );
        let statement = UpdateStatement {
            table: TableSegment::Simple(SimpleTableSegment::new(Span::new(7, 13), Identifier::new("t_order"))),
            assignments: vec![],
            where_clause: Some(where_clause.clone()),
            order_by: None,
            limit: None,
        };
        let context = UpdateStatementContext::new(statement);
        assert_eq!(context.where_segments(), &[where_clause]);
        assert_eq!(context.tables().table_names().collect::<Vec<_>>(), vec!["t_order"]);
    }
}
