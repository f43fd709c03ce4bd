//! SQL tokens: positional edits anchored in the original SQL text.
//!
//! A token either replaces the inclusive character range `[start, stop]` or inserts
//! text before character `at`. Tokens whose text depends on the shard carry one entry
//! per route unit of the statement's route context.

use crate::ast::{DirectionType, OrderDirection, Span};
use crate::cursor::CursorDirectory;
use crate::error::{RewriteError, RewriteResult};
use crate::route::RouteUnit;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::sync::Arc;

/// Where a token applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSpan {
    Replace { start: usize, stop: usize },
    Insert { at: usize },
}

impl TokenSpan {
    pub fn start(&self) -> usize {
        match self {
            TokenSpan::Replace { start, .. } => *start,
            TokenSpan::Insert { at } => *at,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, TokenSpan::Insert { .. })
    }
}

impl From<Span> for TokenSpan {
    fn from(span: Span) -> Self {
        TokenSpan::Replace {
            start: span.start,
            stop: span.stop,
        }
    }
}

/// Text that varies by route unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteUnitTexts(IndexMap<RouteUnit, String>);

impl RouteUnitTexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: RouteUnit, text: String) {
        self.0.insert(unit, text);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, unit: &RouteUnit) -> Option<&str> {
        self.0.get(unit).map(String::as_str)
    }

    fn require(&self, unit: &RouteUnit, start: usize) -> RewriteResult<&str> {
        self.get(unit).ok_or_else(|| RewriteError::MissingRouteUnitText {
            start,
            data_source: unit.data_source.clone(),
        })
    }
}

impl FromIterator<(RouteUnit, String)> for RouteUnitTexts {
    fn from_iter<T: IntoIterator<Item = (RouteUnit, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableToken {
    pub span: Span,
    pub logic_table: String,
    pub texts: RouteUnitTexts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexToken {
    pub span: Span,
    pub index_name: String,
    /// Schema the index is unique in.
    pub schema: String,
    pub texts: RouteUnitTexts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintToken {
    pub span: Span,
    pub constraint_name: String,
    pub texts: RouteUnitTexts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CursorToken {
    pub span: Span,
    pub cursor_name: String,
    pub texts: RouteUnitTexts,
}

/// FETCH direction, resolved against the rows the merger already holds.
#[derive(Debug, Clone)]
pub struct FetchDirectionToken {
    pub span: TokenSpan,
    pub cursor_name: String,
    pub direction_type: DirectionType,
    pub count: u64,
    pub cursors: Arc<CursorDirectory>,
}

impl FetchDirectionToken {
    pub fn text(&self) -> String {
        if self.direction_type.is_forward() {
            if self.direction_type.is_all() {
                return "FORWARD ALL ".to_string();
            }
            let buffered = self.cursors.buffered_rows(&self.cursor_name);
            return format!("FORWARD {} ", self.count.saturating_sub(buffered));
        }
        match self.direction_type {
            DirectionType::BackwardAll => "BACKWARD ALL ".to_string(),
            DirectionType::Prior | DirectionType::First | DirectionType::Last => {
                format!("{} ", self.direction_type.keyword())
            }
            _ => format!("{} {} ", self.direction_type.keyword(), self.count),
        }
    }
}

impl PartialEq for FetchDirectionToken {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
            && self.cursor_name == other.cursor_name
            && self.direction_type == other.direction_type
            && self.count == other.count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OffsetToken {
    pub span: Span,
    pub revised_offset: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowCountToken {
    pub span: Span,
    pub revised_row_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByItem {
    pub label: String,
    pub direction: OrderDirection,
}

/// A synthesized ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByToken {
    pub at: usize,
    pub items: Vec<OrderByItem>,
}

impl OrderByToken {
    pub fn text(&self) -> String {
        let items: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} {}", item.label, item.direction))
            .collect();
        format!(" ORDER BY {}", items.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionsToken {
    pub at: usize,
    pub texts: RouteUnitTexts,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistinctProjectionPrefixToken {
    pub at: usize,
}

/// `AGG(DISTINCT x)` rewritten to `x`, so each shard returns the distinct values.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationDistinctToken {
    pub span: Span,
    pub column_name: String,
    pub derived_alias: Option<String>,
}

impl AggregationDistinctToken {
    pub fn text(&self) -> String {
        match &self.derived_alias {
            Some(alias) => format!("{} AS {}", self.column_name, alias),
            None => self.column_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveToken {
    pub span: Span,
}

/// Route units each literal of an IN list shards to. Rendering keeps the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct InPredicateToken {
    pub span: Span,
    pub column: String,
    pub value_routes: IndexMap<String, Vec<RouteUnit>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertValuesToken {
    pub span: Span,
    pub texts: RouteUnitTexts,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlToken {
    Table(TableToken),
    Index(IndexToken),
    Constraint(ConstraintToken),
    Cursor(CursorToken),
    FetchDirection(FetchDirectionToken),
    Offset(OffsetToken),
    RowCount(RowCountToken),
    OrderBy(OrderByToken),
    Projections(ProjectionsToken),
    DistinctProjectionPrefix(DistinctProjectionPrefixToken),
    AggregationDistinct(AggregationDistinctToken),
    Remove(RemoveToken),
    InPredicate(InPredicateToken),
    InsertValues(InsertValuesToken),
}

impl SqlToken {
    pub fn span(&self) -> TokenSpan {
        match self {
            SqlToken::Table(t) => t.span.into(),
            SqlToken::Index(t) => t.span.into(),
            SqlToken::Constraint(t) => t.span.into(),
            SqlToken::Cursor(t) => t.span.into(),
            SqlToken::FetchDirection(t) => t.span,
            SqlToken::Offset(t) => t.span.into(),
            SqlToken::RowCount(t) => t.span.into(),
            SqlToken::OrderBy(t) => TokenSpan::Insert { at: t.at },
            SqlToken::Projections(t) => TokenSpan::Insert { at: t.at },
            SqlToken::DistinctProjectionPrefix(t) => TokenSpan::Insert { at: t.at },
            SqlToken::AggregationDistinct(t) => t.span.into(),
            SqlToken::Remove(t) => t.span.into(),
            SqlToken::InPredicate(t) => t.span.into(),
            SqlToken::InsertValues(t) => t.span.into(),
        }
    }

    pub fn start_index(&self) -> usize {
        self.span().start()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SqlToken::Table(_) => "table",
            SqlToken::Index(_) => "index",
            SqlToken::Constraint(_) => "constraint",
            SqlToken::Cursor(_) => "cursor",
            SqlToken::FetchDirection(_) => "fetch_direction",
            SqlToken::Offset(_) => "offset",
            SqlToken::RowCount(_) => "row_count",
            SqlToken::OrderBy(_) => "order_by",
            SqlToken::Projections(_) => "projections",
            SqlToken::DistinctProjectionPrefix(_) => "distinct_projection_prefix",
            SqlToken::AggregationDistinct(_) => "aggregation_distinct",
            SqlToken::Remove(_) => "remove",
            SqlToken::InPredicate(_) => "in_predicate",
            SqlToken::InsertValues(_) => "insert_values",
        }
    }

    /// Replacement text for `unit`. `None` keeps the original text.
    pub fn text(&self, unit: &RouteUnit) -> RewriteResult<Option<Cow<'_, str>>> {
        let start = self.start_index();
        let text = match self {
            SqlToken::Table(t) => Cow::Borrowed(t.texts.require(unit, start)?),
            SqlToken::Index(t) => Cow::Borrowed(t.texts.require(unit, start)?),
            SqlToken::Constraint(t) => Cow::Borrowed(t.texts.require(unit, start)?),
            SqlToken::Cursor(t) => Cow::Borrowed(t.texts.require(unit, start)?),
            SqlToken::Projections(t) => Cow::Borrowed(t.texts.require(unit, start)?),
            SqlToken::InsertValues(t) => Cow::Borrowed(t.texts.require(unit, start)?),
            SqlToken::FetchDirection(t) => Cow::Owned(t.text()),
            SqlToken::Offset(t) => Cow::Owned(t.revised_offset.to_string()),
            SqlToken::RowCount(t) => Cow::Owned(t.revised_row_count.to_string()),
            SqlToken::OrderBy(t) => Cow::Owned(t.text()),
            SqlToken::DistinctProjectionPrefix(_) => Cow::Borrowed("DISTINCT "),
            SqlToken::AggregationDistinct(t) => Cow::Owned(t.text()),
            SqlToken::Remove(_) => Cow::Borrowed(""),
            SqlToken::InPredicate(_) => return Ok(None),
        };
        Ok(Some(text))
    }
}
