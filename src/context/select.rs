//! SELECT statement context.

use super::pagination::PaginationContext;
use super::projection::ProjectionsContext;
use super::tables::TablesContext;
use crate::ast::*;
use crate::extractor::where_clause::{join_where_segments, subquery_where_segments};
use crate::extractor::TableExtractor;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupByContext {
    pub items: Vec<OrderByItemSegment>,
    /// Stop index of the GROUP BY clause, 0 when absent.
    pub last_index: usize,
}

impl GroupByContext {
    pub fn new(group_by: Option<&GroupBySegment>) -> Self {
        match group_by {
            Some(g) => Self {
                items: g.items.clone(),
                last_index: g.span.stop,
            },
            None => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderByContext {
    pub items: Vec<OrderByItemSegment>,
    /// The items do not appear in the statement and must be added by rewriting.
    pub generated: bool,
}

impl OrderByContext {
    /// Explicit ORDER BY, else the GROUP BY items, else the columns of a DISTINCT row.
    pub fn new(select: &SelectStatement, group_by: &GroupByContext) -> Self {
        if let Some(order_by) = &select.order_by
            && !order_by.items.is_empty()
        {
            return Self {
                items: order_by.items.clone(),
                generated: false,
            };
        }
        if !group_by.is_empty() {
            return Self {
                items: group_by.items.clone(),
                generated: true,
            };
        }
        if select.projections.distinct_row {
            let items: Vec<OrderByItemSegment> = select
                .projections
                .projections
                .iter()
                .filter_map(|p| match p {
                    ProjectionSegment::Column(c) => Some(OrderByItemSegment::column(c.column.clone(), OrderDirection::Asc)),
                    _ => None,
                })
                .collect();
            let generated = !items.is_empty();
            return Self { items, generated };
        }
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn same_items(left: &[OrderByItemSegment], right: &[OrderByItemSegment]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| l.direction() == r.direction() && l.label().eq_ignore_ascii_case(&r.label()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatementContext {
    statement: SelectStatement,
    tables: TablesContext,
    projections: ProjectionsContext,
    group_by: GroupByContext,
    order_by: OrderByContext,
    pagination: PaginationContext,
    where_segments: Vec<WhereSegment>,
}

impl SelectStatementContext {
    pub fn new(statement: SelectStatement) -> Self {
        let tables = {
            let mut extractor = TableExtractor::new();
            extractor.extract_from_select(&statement);
            TablesContext::new(extractor.into_rewrite_tables())
        };
        let group_by = GroupByContext::new(statement.group_by.as_ref());
        let order_by = OrderByContext::new(&statement, &group_by);
        let projections = ProjectionsContext::new(&statement.projections, &group_by, &order_by);

        let mut where_segments: Vec<WhereSegment> = statement.where_clause.iter().cloned().collect();
        where_segments.extend(subquery_where_segments(&statement));
        where_segments.extend(join_where_segments(&statement));

        let same = !group_by.is_empty() && same_items(&group_by.items, &order_by.items);
        let max_row_count =
            (!group_by.is_empty() || projections.aggregation_projections().next().is_some()) && !same;
        let pagination = PaginationContext::new(statement.limit.as_ref(), max_row_count);

        Self {
            statement,
            tables,
            projections,
            group_by,
            order_by,
            pagination,
            where_segments,
        }
    }

    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    pub fn tables(&self) -> &TablesContext {
        &self.tables
    }

    pub fn projections(&self) -> &ProjectionsContext {
        &self.projections
    }

    pub fn group_by(&self) -> &GroupByContext {
        &self.group_by
    }

    pub fn order_by(&self) -> &OrderByContext {
        &self.order_by
    }

    pub fn pagination(&self) -> &PaginationContext {
        &self.pagination
    }

    /// Override the merge-adjusted pagination.
    pub fn pagination_mut(&mut self) -> &mut PaginationContext {
        &mut self.pagination
    }

    /// WHERE, nested SELECT WHERE and JOIN ON conditions.
    pub fn where_segments(&self) -> &[WhereSegment] {
        &self.where_segments
    }

    pub fn contains_combine(&self) -> bool {
        self.statement.combine.is_some()
    }

    pub fn is_same_group_by_and_order_by_items(&self) -> bool {
        !self.group_by.is_empty() && same_items(&self.group_by.items, &self.order_by.items)
    }

    /// GROUP BY that only restates the arguments of DISTINCT aggregations.
    ///
    /// Every item must be a column matching the inner expression of some distinct
    /// aggregation projection.
    pub fn is_distinct_emulating_group_by(&self) -> bool {
        let Some(group_by) = &self.statement.group_by else {
            return false;
        };
        let distinct: Vec<&str> = self
            .projections
            .aggregation_distinct_projections()
            .map(|a| a.inner_expression.as_str())
            .collect();
        if distinct.is_empty() || group_by.items.is_empty() {
            return false;
        }
        group_by.items.iter().all(|item| match item {
            OrderByItemSegment::Column { column, .. } => distinct
                .iter()
                .any(|inner| inner.eq_ignore_ascii_case(&column.qualified_name()) || inner.eq_ignore_ascii_case(column.name())),
            _ => false,
        })
    }
}
