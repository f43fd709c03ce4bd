//! Database-type capabilities consulted by the generators.

use crate::ast::QuoteCharacter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    MySQL,
    MariaDB,
    PostgreSQL,
    OpenGauss,
    Oracle,
    SQLServer,
    SQL92,
}

/// Where index names must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexScope {
    /// Index names are scoped to their table (MySQL).
    Table,
    /// Index names share the schema namespace with every other table's indexes.
    Schema,
}

/// Static capabilities of one database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectCapabilities {
    pub index_scope: IndexScope,
    pub default_schema: Option<&'static str>,
    pub quote: QuoteCharacter,
}

const MYSQL: DialectCapabilities = DialectCapabilities {
    index_scope: IndexScope::Table,
    default_schema: None,
    quote: QuoteCharacter::BackQuote,
};

const POSTGRESQL: DialectCapabilities = DialectCapabilities {
    index_scope: IndexScope::Schema,
    default_schema: Some("public"),
    quote: QuoteCharacter::Quote,
};

const ORACLE: DialectCapabilities = DialectCapabilities {
    index_scope: IndexScope::Schema,
    default_schema: None,
    quote: QuoteCharacter::Quote,
};

const SQLSERVER: DialectCapabilities = DialectCapabilities {
    index_scope: IndexScope::Table,
    default_schema: None,
    quote: QuoteCharacter::Bracket,
};

const SQL92: DialectCapabilities = DialectCapabilities {
    index_scope: IndexScope::Table,
    default_schema: None,
    quote: QuoteCharacter::Quote,
};

impl DatabaseType {
    pub fn capabilities(&self) -> &'static DialectCapabilities {
        match self {
            DatabaseType::MySQL | DatabaseType::MariaDB => &MYSQL,
            DatabaseType::PostgreSQL | DatabaseType::OpenGauss => &POSTGRESQL,
            DatabaseType::Oracle => &ORACLE,
            DatabaseType::SQLServer => &SQLSERVER,
            DatabaseType::SQL92 => &SQL92,
        }
    }

    pub fn index_scope(&self) -> IndexScope {
        self.capabilities().index_scope
    }

    /// True when two tables in one schema cannot both own an index of the same name.
    pub fn is_schema_unique_index(&self) -> bool {
        self.index_scope() == IndexScope::Schema
    }

    pub fn default_schema(&self) -> Option<&'static str> {
        self.capabilities().default_schema
    }

    pub fn quote_character(&self) -> QuoteCharacter {
        self.capabilities().quote
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DatabaseType::MySQL => "MySQL",
            DatabaseType::MariaDB => "MariaDB",
            DatabaseType::PostgreSQL => "PostgreSQL",
            DatabaseType::OpenGauss => "openGauss",
            DatabaseType::Oracle => "Oracle",
            DatabaseType::SQLServer => "SQLServer",
            DatabaseType::SQL92 => "SQL92",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_scope() {
        assert!(DatabaseType::PostgreSQL.is_schema_unique_index());
        assert!(DatabaseType::OpenGauss.is_schema_unique_index());
        assert!(DatabaseType::Oracle.is_schema_unique_index());
        assert!(!DatabaseType::MySQL.is_schema_unique_index());
        assert!(!DatabaseType::SQLServer.is_schema_unique_index());
    }

    #[test]
    fn test_default_schema() {
        assert_eq!(DatabaseType::PostgreSQL.default_schema(), Some("public"));
        assert_eq!(DatabaseType::MySQL.default_schema(), None);
    }
}
