//! SQL dialects.
//!
//! Every dialect parses through the shared [`grammar`] (with its own lexical
//! rules) and renders through its own [`DdlWriter`].

pub mod grammar;
pub mod lexer;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
pub mod sqlserver;
pub mod types;
pub mod writer;

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{PorterError, PorterResult};
use crate::schema::Schema;

pub use mysql::MySql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use sqlite::Sqlite;
pub use sqlserver::SqlServer;
pub use types::TypeMap;
pub use writer::DdlWriter;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Oracle,
    #[serde(alias = "mariadb")]
    MySql,
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
    #[serde(alias = "mssql")]
    SqlServer,
    Sqlite,
}

impl DialectKind {
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Oracle,
        DialectKind::MySql,
        DialectKind::Postgres,
        DialectKind::SqlServer,
        DialectKind::Sqlite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::Oracle => "Oracle",
            DialectKind::MySql => "MySQL",
            DialectKind::Postgres => "PostgreSQL",
            DialectKind::SqlServer => "SQL Server",
            DialectKind::Sqlite => "SQLite",
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = PorterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oracle" => Ok(DialectKind::Oracle),
            "mysql" | "mariadb" => Ok(DialectKind::MySql),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            "sqlserver" | "mssql" | "tsql" => Ok(DialectKind::SqlServer),
            "sqlite" | "sqlite3" => Ok(DialectKind::Sqlite),
            _ => Err(PorterError::UnknownDialect(s.to_string())),
        }
    }
}

/// A dialect collaborator: turns DDL text into a [`Schema`] and back.
///
/// `parse` receives one batch of whole statements at a time and may be called
/// concurrently from several workers.
pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Parse DDL text into a schema fragment.
    fn parse(&self, sql: &str) -> PorterResult<Schema>;

    /// Render a full schema as DDL text.
    fn generate(&self, schema: &Schema) -> PorterResult<String>;
}

/// Dialect implementations and the type tables between them.
///
/// Built once, immutable afterwards.
pub struct DialectRegistry {
    dialects: [Arc<dyn Dialect>; 5],
}

impl DialectRegistry {
    fn new() -> Self {
        Self {
            dialects: [
                Arc::new(Oracle),
                Arc::new(MySql),
                Arc::new(Postgres),
                Arc::new(SqlServer),
                Arc::new(Sqlite),
            ],
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static DialectRegistry {
        static REGISTRY: OnceLock<DialectRegistry> = OnceLock::new();
        REGISTRY.get_or_init(DialectRegistry::new)
    }

    pub fn dialect(&self, kind: DialectKind) -> Arc<dyn Dialect> {
        let idx = match kind {
            DialectKind::Oracle => 0,
            DialectKind::MySql => 1,
            DialectKind::Postgres => 2,
            DialectKind::SqlServer => 3,
            DialectKind::Sqlite => 4,
        };
        Arc::clone(&self.dialects[idx])
    }

    /// Type table from `from` to `to`; `None` for the identity conversion.
    pub fn type_map(&self, from: DialectKind, to: DialectKind) -> Option<&'static TypeMap> {
        types::lookup(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("Oracle".parse::<DialectKind>().unwrap(), DialectKind::Oracle);
        assert_eq!("postgresql".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!("mssql".parse::<DialectKind>().unwrap(), DialectKind::SqlServer);
        assert!(matches!(
            "db2".parse::<DialectKind>(),
            Err(PorterError::UnknownDialect(_))
        ));
    }

    #[test]
    fn test_registry_hands_out_matching_dialects() {
        let registry = DialectRegistry::global();
        for kind in DialectKind::ALL {
            assert_eq!(registry.dialect(kind).kind(), kind);
        }
        assert!(registry.type_map(DialectKind::Oracle, DialectKind::Oracle).is_none());
        assert!(registry.type_map(DialectKind::Oracle, DialectKind::Postgres).is_some());
    }
}
