//! Table extraction.
//!
//! Collects every table reference in scope (the table context) and the subset of
//! simple tables that must be rewritten lexically. Column and shorthand qualifiers
//! count as table references unless they name an alias already in scope.

use crate::ast::*;
use std::borrow::Cow;

#[derive(Debug, Default)]
pub struct TableExtractor<'a> {
    rewrite_tables: Vec<Cow<'a, SimpleTableSegment>>,
    table_context: Vec<&'a TableSegment>,
    join_tables: Vec<&'a JoinTableSegment>,
}

impl<'a> TableExtractor<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables whose names must be rewritten, in discovery order.
    pub fn rewrite_tables(&self) -> &[Cow<'a, SimpleTableSegment>] {
        &self.rewrite_tables
    }

    pub fn table_context(&self) -> &[&'a TableSegment] {
        &self.table_context
    }

    pub fn join_tables(&self) -> &[&'a JoinTableSegment] {
        &self.join_tables
    }

    pub fn into_rewrite_tables(self) -> Vec<SimpleTableSegment> {
        self.rewrite_tables.into_iter().map(Cow::into_owned).collect()
    }

    /// False when `owner` names an alias in the table context.
    pub fn need_rewrite(&self, owner: &OwnerSegment) -> bool {
        !self
            .table_context
            .iter()
            .any(|t| t.alias().is_some_and(|alias| alias.eq_ignore_ascii_case(owner.value())))
    }

    pub fn extract_from_statement(&mut self, statement: &'a Statement) {
        match statement {
            Statement::Select(select) => self.extract_from_select(select),
            Statement::Insert(insert) => self.extract_from_insert(insert),
            Statement::Update(update) => self.extract_from_update(update),
            Statement::Delete(delete) => self.extract_from_delete(delete),
            Statement::CreateTable(create) => self.add_simple(&create.table),
            Statement::AlterTable(alter) => self.add_simple(&alter.table),
            Statement::CreateIndex(create) => self.add_simple(&create.table),
            Statement::AlterIndex(alter) => {
                if let Some(table) = &alter.table {
                    self.add_simple(table);
                }
            }
            Statement::DropIndex(drop) => {
                if let Some(table) = &drop.table {
                    self.add_simple(table);
                }
            }
            Statement::DropTable(drop) => drop.tables.iter().for_each(|t| self.add_simple(t)),
            Statement::Truncate(truncate) => truncate.tables.iter().for_each(|t| self.add_simple(t)),
            Statement::DeclareCursor(declare) => self.extract_from_select(&declare.select),
            Statement::Fetch(_) | Statement::Move(_) | Statement::Close(_) => {}
        }
    }

    pub fn extract_from_select(&mut self, select: &'a SelectStatement) {
        if let Some(combine) = &select.combine {
            self.extract_from_select(&combine.left.select);
            self.extract_from_select(&combine.right.select);
        }
        if let Some(from) = &select.from
            && select.combine.is_none()
        {
            self.extract_from_table(from);
        }
        if let Some(where_clause) = &select.where_clause {
            self.extract_from_expression(&where_clause.expr);
        }
        if select.combine.is_none() {
            self.extract_from_projections(&select.projections);
        }
        if let Some(group_by) = &select.group_by {
            self.extract_from_order_by_items(&group_by.items);
        }
        if let Some(order_by) = &select.order_by {
            self.extract_from_order_by_items(&order_by.items);
        }
        if let Some(having) = &select.having {
            self.extract_from_expression(&having.expr);
        }
        if let Some(with) = &select.with {
            for cte in &with.common_table_expressions {
                self.extract_from_select(&cte.subquery.select);
            }
        }
        if let Some(lock) = &select.lock {
            self.rewrite_tables.extend(lock.tables.iter().map(Cow::Borrowed));
        }
    }

    pub fn extract_from_insert(&mut self, insert: &'a InsertStatement) {
        self.add_simple(&insert.table);
        for column in &insert.columns {
            self.extract_from_column(column);
        }
        for assignment in &insert.on_duplicate_key_update {
            for column in &assignment.columns {
                self.extract_from_column(column);
            }
        }
        if let Some(insert_select) = &insert.insert_select {
            self.extract_from_select(&insert_select.select);
        }
    }

    pub fn extract_from_update(&mut self, update: &'a UpdateStatement) {
        self.extract_from_table(&update.table);
        for assignment in &update.assignments {
            if let Some(column) = assignment.columns.first() {
                self.extract_from_column(column);
            }
        }
        if let Some(where_clause) = &update.where_clause {
            self.extract_from_expression(&where_clause.expr);
        }
    }

    pub fn extract_from_delete(&mut self, delete: &'a DeleteStatement) {
        self.extract_from_table(&delete.table);
        if let Some(where_clause) = &delete.where_clause {
            self.extract_from_expression(&where_clause.expr);
        }
    }

    fn add_simple(&mut self, table: &'a SimpleTableSegment) {
        self.rewrite_tables.push(Cow::Borrowed(table));
    }

    fn add_owner(&mut self, owner: &'a OwnerSegment) {
        if self.need_rewrite(owner) {
            self.rewrite_tables.push(Cow::Owned(SimpleTableSegment::from_owner(owner)));
        }
    }

    fn extract_from_table(&mut self, table: &'a TableSegment) {
        match table {
            TableSegment::Simple(simple) => {
                self.table_context.push(table);
                self.rewrite_tables.push(Cow::Borrowed(simple));
            }
            TableSegment::Subquery(subquery) => {
                self.table_context.push(table);
                let mut nested = TableExtractor::new();
                nested.extract_from_select(&subquery.subquery.select);
                self.rewrite_tables.extend(nested.rewrite_tables);
                self.join_tables.extend(nested.join_tables);
            }
            TableSegment::Join(join) => {
                self.join_tables.push(join);
                self.extract_from_table(&join.left);
                self.extract_from_table(&join.right);
                if let Some(condition) = &join.condition {
                    self.extract_from_expression(condition);
                }
            }
            TableSegment::DeleteMultiTable(multi) => {
                self.rewrite_tables.extend(multi.actual_delete_tables.iter().map(Cow::Borrowed));
                self.extract_from_table(&multi.relation_table);
            }
            TableSegment::Function(function) => {
                self.table_context.push(table);
                self.extract_from_expression(&function.function);
            }
        }
    }

    fn extract_from_column(&mut self, column: &'a ColumnSegment) {
        if let Some(owner) = &column.owner {
            self.add_owner(owner);
        }
    }

    fn extract_from_expression(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Column(column) => self.extract_from_column(column),
            Expr::OuterJoin(outer) => self.extract_from_column(&outer.column),
            Expr::Literal(_) | Expr::Parameter(_) => {}
            Expr::Binary(binary) => {
                self.extract_from_expression(&binary.left);
                self.extract_from_expression(&binary.right);
            }
            Expr::In(in_expr) => {
                self.extract_from_expression(&in_expr.left);
                self.extract_from_expression(&in_expr.right);
            }
            Expr::Between(between) => {
                self.extract_from_expression(&between.left);
                self.extract_from_expression(&between.between);
                self.extract_from_expression(&between.and);
            }
            Expr::CaseWhen(case) => {
                if let Some(case_expr) = &case.case_expr {
                    self.extract_from_expression(case_expr);
                }
                for each in case.when_exprs.iter().chain(&case.then_exprs) {
                    self.extract_from_expression(each);
                }
                if let Some(else_expr) = &case.else_expr {
                    self.extract_from_expression(else_expr);
                }
            }
            Expr::Function(function) => function.parameters.iter().for_each(|p| self.extract_from_expression(p)),
            Expr::Aggregation(aggregation) => {
                aggregation.parameters.iter().for_each(|p| self.extract_from_expression(p))
            }
            Expr::List(list) => list.items.iter().for_each(|i| self.extract_from_expression(i)),
            Expr::Multiset(multiset) => {
                self.extract_from_expression(&multiset.left);
                self.extract_from_expression(&multiset.right);
            }
            Expr::Not(not) => self.extract_from_expression(&not.expr),
            Expr::TypeCast(cast) => self.extract_from_expression(&cast.expr),
            Expr::Values(values) => values
                .rows
                .iter()
                .flat_map(|r| &r.values)
                .for_each(|v| self.extract_from_expression(v)),
            Expr::MatchAgainst(match_against) => {
                match_against.columns.iter().for_each(|c| self.extract_from_column(c));
                self.extract_from_expression(&match_against.against);
            }
            Expr::Subquery(subquery) => self.extract_from_select(&subquery.select),
            Expr::Exists(exists) => self.extract_from_select(&exists.subquery.select),
        }
    }

    fn extract_from_projections(&mut self, projections: &'a ProjectionsSegment) {
        for projection in &projections.projections {
            match projection {
                ProjectionSegment::Subquery(p) => self.extract_from_select(&p.subquery.select),
                ProjectionSegment::Shorthand(p) => {
                    if let Some(owner) = &p.owner {
                        self.add_owner(owner);
                    }
                }
                ProjectionSegment::Column(p) => self.extract_from_column(&p.column),
                ProjectionSegment::Aggregation(p) => {
                    p.aggregation.parameters.iter().for_each(|e| self.extract_from_expression(e))
                }
                ProjectionSegment::Expression(p) => self.extract_from_expression(&p.expr),
            }
        }
    }

    fn extract_from_order_by_items(&mut self, items: &'a [OrderByItemSegment]) {
        for item in items {
            match item {
                OrderByItemSegment::Column { column, .. } => self.extract_from_column(column),
                OrderByItemSegment::Expression { expr, .. } => self.extract_from_expression(expr),
                OrderByItemSegment::Index { .. } => {}
            }
        }
    }
}
