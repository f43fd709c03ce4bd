//! LIMIT / OFFSET values before and after merge adjustment.

use crate::ast::{LimitSegment, PaginationValueSegment};

/// Row count used when every shard must return all matching rows.
pub const MAX_ROW_COUNT: u64 = i32::MAX as u64;

/// Pagination of one SELECT.
///
/// Each shard must return rows `[0, offset + row_count)` so the merger can apply the
/// original window, hence the revised offset defaults to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationContext {
    pub offset_segment: Option<PaginationValueSegment>,
    pub row_count_segment: Option<PaginationValueSegment>,
    pub actual_offset: u64,
    pub actual_row_count: Option<u64>,
    pub revised_offset: u64,
    pub revised_row_count: Option<u64>,
}

impl PaginationContext {
    /// `max_row_count` is set when grouping or aggregation differs from the ordering,
    /// in which case a shard's first rows are not the merged first rows.
    pub fn new(limit: Option<&LimitSegment>, max_row_count: bool) -> Self {
        let Some(limit) = limit else {
            return Self::default();
        };
        let actual_offset = limit.offset.as_ref().and_then(PaginationValueSegment::literal).unwrap_or(0);
        let actual_row_count = limit.row_count.as_ref().and_then(PaginationValueSegment::literal);
        let revised_row_count = if limit.row_count.is_none() {
            None
        } else if max_row_count {
            Some(MAX_ROW_COUNT)
        } else {
            actual_row_count.map(|rows| actual_offset.saturating_add(rows))
        };
        Self {
            offset_segment: limit.offset.clone(),
            row_count_segment: limit.row_count.clone(),
            actual_offset,
            actual_row_count,
            revised_offset: 0,
            revised_row_count,
        }
    }

    pub fn has_pagination(&self) -> bool {
        self.offset_segment.is_some() || self.row_count_segment.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;
    use pretty_assertions::assert_eq;

    fn limit(offset: Option<u64>, row_count: Option<u64>) -> LimitSegment {
        LimitSegment {
            span: Span::new(30, 50),
            offset: offset.map(|value| PaginationValueSegment::NumberLiteral {
                span: Span::new(45, 46),
                value,
            }),
            row_count: row_count.map(|value| PaginationValueSegment::NumberLiteral {
                span: Span::new(36, 37),
                value,
            }),
        }
    }

    #[test]
    fn test_revised_values() {
        let pagination = PaginationContext::new(Some(&limit(Some(10), Some(20))), false);
        assert_eq!(pagination.actual_offset, 10);
        assert_eq!(pagination.revised_offset, 0);
        assert_eq!(pagination.revised_row_count, Some(30));
    }

    #[test]
    fn test_max_row_count() {
        let pagination = PaginationContext::new(Some(&limit(Some(10), Some(20))), true);
        assert_eq!(pagination.revised_row_count, Some(2147483647));
    }

    #[test]
    fn test_parameterized_row_count() {
        let mut segment = limit(Some(5), None);
        segment.row_count = Some(PaginationValueSegment::ParameterMarker {
            span: Span::new(36, 36),
            index: 0,
        });
        let pagination = PaginationContext::new(Some(&segment), false);
        assert_eq!(pagination.actual_row_count, None);
        assert_eq!(pagination.revised_row_count, None);
        assert!(pagination.has_pagination());
    }

    #[test]
    fn test_no_limit() {
        assert!(!PaginationContext::new(None, false).has_pagination());
    }
}
