//! Parsed statement model consumed by the rewrite layer.
//!
//! Every node carries an inclusive `[start_index, stop_index]` character span into the
//! original SQL text. A child's span is always contained in its parent's span.

pub mod clause;
pub mod expr;
pub mod projection;
pub mod statement;
pub mod table;

pub use clause::*;
pub use expr::*;
pub use projection::*;
pub use statement::*;
pub use table::*;

use serde::{Deserialize, Serialize};

/// Inclusive character interval into the original SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub stop: usize,
}

impl Span {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }
}

/// A node positioned in the original SQL text.
pub trait Segment {
    fn span(&self) -> Span;

    fn start_index(&self) -> usize {
        self.span().start
    }

    fn stop_index(&self) -> usize {
        self.span().stop
    }
}

macro_rules! impl_segment {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::ast::Segment for $ty {
                fn span(&self) -> $crate::ast::Span {
                    self.span
                }
            }
        )*
    };
}

pub(crate) use impl_segment;

/// Quote style of an identifier as written by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuoteCharacter {
    #[default]
    None,
    /// `` `name` ``
    BackQuote,
    /// `"name"`
    Quote,
    /// `[name]`
    Bracket,
}

impl QuoteCharacter {
    pub fn wrap(&self, value: &str) -> String {
        match self {
            QuoteCharacter::None => value.to_string(),
            QuoteCharacter::BackQuote => format!("`{}`", value),
            QuoteCharacter::Quote => format!("\"{}\"", value),
            QuoteCharacter::Bracket => format!("[{}]", value),
        }
    }
}

/// An identifier value plus the quote it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub value: String,
    pub quote: QuoteCharacter,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quote: QuoteCharacter::None,
        }
    }

    pub fn quoted(value: impl Into<String>, quote: QuoteCharacter) -> Self {
        Self {
            value: value.into(),
            quote,
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.quote.wrap(&self.value))
    }
}

/// Qualifier in front of a table, column or index (`owner.name`).
///
/// The owner may itself be qualified, as in `db.schema.table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerSegment {
    pub span: Span,
    pub identifier: Identifier,
    pub owner: Option<Box<OwnerSegment>>,
}

impl OwnerSegment {
    pub fn new(span: Span, identifier: Identifier) -> Self {
        Self {
            span,
            identifier,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: OwnerSegment) -> Self {
        self.owner = Some(Box::new(owner));
        self
    }

    pub fn value(&self) -> &str {
        &self.identifier.value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasSegment {
    pub span: Span,
    pub identifier: Identifier,
}

impl AliasSegment {
    pub fn new(span: Span, identifier: Identifier) -> Self {
        Self { span, identifier }
    }

    pub fn value(&self) -> &str {
        &self.identifier.value
    }
}

impl_segment!(OwnerSegment, AliasSegment);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_wrap() {
        assert_eq!(QuoteCharacter::None.wrap("t_order_0"), "t_order_0");
        assert_eq!(QuoteCharacter::BackQuote.wrap("t_order_0"), "`t_order_0`");
        assert_eq!(QuoteCharacter::Quote.wrap("t_order_0"), "\"t_order_0\"");
        assert_eq!(QuoteCharacter::Bracket.wrap("t_order_0"), "[t_order_0]");
    }

    #[test]
    fn test_span_contains() {
        let parent = Span::new(0, 20);
        assert!(parent.contains(&Span::new(3, 20)));
        assert!(!parent.contains(&Span::new(3, 21)));
    }
}
