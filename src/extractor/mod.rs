//! Stateless tree walkers over parsed statements.
//!
//! Extractors never fail: absent optional clauses contribute nothing, and the input is
//! assumed to be well formed.

pub mod column;
pub mod expression;
pub mod subquery;
pub mod table;
pub mod where_clause;

pub use expression::{and_predicates, flatten_logical, AndPredicate};
pub use subquery::{extract_subqueries, ExtractedSubquery, SubqueryType};
pub use table::TableExtractor;
