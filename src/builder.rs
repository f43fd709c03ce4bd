//! Route SQL builder: applies tokens to the original SQL once per route unit.
//!
//! Spans are character indices; they are mapped to byte offsets before slicing so
//! multi-byte text outside the edited ranges passes through untouched.

use crate::error::{RewriteError, RewriteResult};
use crate::route::{RouteContext, RouteUnit};
use crate::token::{SqlToken, TokenSpan};
use indexmap::IndexMap;

pub struct RouteSqlBuilder<'a> {
    sql: &'a str,
    tokens: Vec<&'a SqlToken>,
    /// Byte offset of every character, plus the end of the text.
    offsets: Vec<usize>,
}

impl<'a> RouteSqlBuilder<'a> {
    pub fn new(sql: &'a str, tokens: &'a [SqlToken]) -> Self {
        let mut tokens: Vec<&SqlToken> = tokens.iter().collect();
        // Inserts go before a replacement starting at the same character
        tokens.sort_by_key(|t| (t.start_index(), !t.span().is_insert()));
        let offsets = sql
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(sql.len()))
            .collect();
        Self { sql, tokens, offsets }
    }

    fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.sql[self.offsets[start]..self.offsets[end]]
    }

    /// SQL for one route unit.
    pub fn build(&self, unit: &RouteUnit) -> RewriteResult<String> {
        let len = self.char_len();
        let mut result = String::with_capacity(self.sql.len());
        // Next character to copy, and the last applied range for overlap reports
        let mut cursor = 0;
        let mut last: Option<(usize, usize)> = None;
        for token in &self.tokens {
            let Some(text) = token.text(unit)? else {
                continue;
            };
            let (start, stop, next) = match token.span() {
                TokenSpan::Insert { at } => {
                    if at > len {
                        return Err(RewriteError::SpanOutOfRange { start: at, stop: at, len });
                    }
                    (at, at, at)
                }
                TokenSpan::Replace { start, stop } => {
                    if start > stop || stop >= len {
                        return Err(RewriteError::SpanOutOfRange { start, stop, len });
                    }
                    (start, stop, stop + 1)
                }
            };
            if start < cursor {
                let (first_start, first_stop) = last.unwrap_or((start, stop));
                return Err(RewriteError::OverlappingTokens {
                    first_start,
                    first_stop,
                    second_start: start,
                    second_stop: stop,
                });
            }
            result.push_str(self.slice(cursor, start));
            result.push_str(&text);
            cursor = next;
            last = Some((start, stop));
        }
        result.push_str(self.slice(cursor, len));
        tracing::debug!("Rendered SQL for route unit {}: {}", unit, result);
        Ok(result)
    }

    /// SQL for every unit of `route`, in route order.
    pub fn build_all(&self, route: &RouteContext) -> RewriteResult<IndexMap<RouteUnit, String>> {
        let mut result = IndexMap::with_capacity(route.route_units.len());
        for unit in &route.route_units {
            result.insert(unit.clone(), self.build(unit)?);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{OrderDirection, Span};
    use crate::route::RouteMapper;
    use crate::token::{DistinctProjectionPrefixToken, OffsetToken, OrderByItem, OrderByToken, RemoveToken, TableToken};
    use pretty_assertions::assert_eq;

    fn unit(actual: &str) -> RouteUnit {
        RouteUnit::new("ds_0", vec![RouteMapper::new("t_order", actual)])
    }

    fn table_token(start: usize) -> SqlToken {
        SqlToken::Table(TableToken {
            span: Span::new(start, start + 6),
            logic_table: "t_order".to_string(),
            texts: [
                (unit("t_order_0"), "t_order_0".to_string()),
                (unit("t_order_1"), "t_order_1".to_string()),
            ]
            .into_iter()
            .collect(),
        })
    }

    #[test]
    fn test_build_per_unit() {
        let sql = "SELECT * FROM t_order LIMIT 10";
        let tokens = vec![
            SqlToken::Offset(OffsetToken {
                span: Span::new(28, 29),
                revised_offset: 0,
            }),
            table_token(14),
        ];
        let builder = RouteSqlBuilder::new(sql, &tokens);
        assert_eq!(builder.build(&unit("t_order_0")).unwrap(), "SELECT * FROM t_order_0 LIMIT 0");
        assert_eq!(builder.build(&unit("t_order_1")).unwrap(), "SELECT * FROM t_order_1 LIMIT 0");
    }

    #[test]
    fn test_insert_at_end_and_before_replacement() {
        let sql = "SELECT é FROM t_order";
        let tokens = vec![
            SqlToken::OrderBy(OrderByToken {
                at: 21,
                items: vec![OrderByItem {
                    label: "é".to_string(),
                    direction: OrderDirection::Asc,
                }],
            }),
            SqlToken::Remove(RemoveToken { span: Span::new(7, 8) }),
            SqlToken::DistinctProjectionPrefix(DistinctProjectionPrefixToken { at: 7 }),
        ];
        let builder = RouteSqlBuilder::new(sql, &tokens);
        assert_eq!(builder.build(&unit("t_order_0")).unwrap(), "SELECT DISTINCT FROM t_order ORDER BY é ASC");
    }

    #[test]
    fn test_overlapping_tokens_rejected() {
        let sql = "SELECT * FROM t_order";
        let tokens = vec![table_token(14), SqlToken::Remove(RemoveToken { span: Span::new(10, 16) })];
        let err = RouteSqlBuilder::new(sql, &tokens).build(&unit("t_order_0")).unwrap_err();
        assert!(matches!(
            err,
            RewriteError::OverlappingTokens {
                first_start: 10,
                first_stop: 16,
                second_start: 14,
                second_stop: 20,
            }
        ));
    }

    #[test]
    fn test_span_out_of_range() {
        let tokens = vec![table_token(14)];
        let err = RouteSqlBuilder::new("SELECT * FROM t", &tokens)
            .build(&unit("t_order_0"))
            .unwrap_err();
        assert!(matches!(err, RewriteError::SpanOutOfRange { start: 14, stop: 20, len: 15 }));
    }

    #[test]
    fn test_build_all_keeps_route_order() {
        let sql = "SELECT * FROM t_order";
        let tokens = vec![table_token(14)];
        let route = RouteContext::new(vec![unit("t_order_1"), unit("t_order_0")]);
        let result = RouteSqlBuilder::new(sql, &tokens).build_all(&route).unwrap();
        let sqls: Vec<&str> = result.values().map(String::as_str).collect();
        assert_eq!(sqls, vec!["SELECT * FROM t_order_1", "SELECT * FROM t_order_0"]);
    }
}
