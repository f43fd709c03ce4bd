//! Error types for the rewrite layer.

use thiserror::Error;

/// The main error type for rewrite operations.
///
/// Every variant is fatal for the statement being rewritten. Constructs that the
/// generators decline to rewrite are not errors; they simply produce no token.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// A generator required an optional segment (alias, cursor name, ...) that is absent.
    #[error("Missing required segment: {segment} ({context})")]
    MissingSegment {
        segment: &'static str,
        context: &'static str,
    },

    /// No actual table could be resolved for a logic table inside a route unit.
    #[error("No actual table for logic table '{logic_table}' in route unit '{data_source}'")]
    ActualTableNotFound {
        logic_table: String,
        data_source: String,
    },

    /// An optional generator was applicable but did not produce its token.
    #[error("Generator '{0}' was applicable but produced no token")]
    GeneratorContract(&'static str),

    /// A per-route-unit token has no text for the unit being rendered.
    #[error("Token at {start} has no text for route unit '{data_source}'")]
    MissingRouteUnitText { start: usize, data_source: String },

    #[error("Cursor '{0}' is not declared")]
    CursorNotDeclared(String),

    #[error("Overlapping tokens: [{first_start}, {first_stop}] and [{second_start}, {second_stop}]")]
    OverlappingTokens {
        first_start: usize,
        first_stop: usize,
        second_start: usize,
        second_stop: usize,
    },

    #[error("Token span [{start}, {stop}] is out of range for SQL of {len} characters")]
    SpanOutOfRange { start: usize, stop: usize, len: usize },

    #[error("Unknown sharding algorithm: '{0}'")]
    UnknownAlgorithm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RewriteError {
    /// Create a missing segment error.
    pub fn missing(segment: &'static str, context: &'static str) -> Self {
        Self::MissingSegment { segment, context }
    }

    /// Create an actual table lookup miss.
    pub fn actual_table_not_found(logic_table: impl Into<String>, data_source: impl Into<String>) -> Self {
        Self::ActualTableNotFound {
            logic_table: logic_table.into(),
            data_source: data_source.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for rewrite operations.
pub type RewriteResult<T> = Result<T, RewriteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RewriteError::missing("alias", "aggregation distinct projection");
        assert_eq!(
            err.to_string(),
            "Missing required segment: alias (aggregation distinct projection)"
        );
    }

    #[test]
    fn test_actual_table_display() {
        let err = RewriteError::actual_table_not_found("t_order", "ds_1");
        assert_eq!(
            err.to_string(),
            "No actual table for logic table 't_order' in route unit 'ds_1'"
        );
    }
}
