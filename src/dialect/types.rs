//! Cross-dialect type translation tables.
//!
//! Every ordered pair of distinct dialects has one immutable table. Keys are
//! upper-case source types, optionally with a parameter list (`NUMBER(1)`);
//! values are target types as they should be written.

use crate::dialect::DialectKind;
use crate::dialect::DialectKind::{MySql, Oracle, Postgres, SqlServer, Sqlite};
use crate::schema::Column;

/// A static `source type -> target type` table.
#[derive(Debug)]
pub struct TypeMap {
    pub from: DialectKind,
    pub to: DialectKind,
    pub entries: &'static [(&'static str, &'static str)],
}

impl TypeMap {
    /// Case-insensitive key lookup.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    /// Resolve the target type of `column`.
    ///
    /// Tried in order: the parameterized type (`NUMBER(1)`), the full type
    /// name, its first two words, its first word. Returns the mapped type and
    /// whether the column's own length/precision/scale must be dropped.
    pub fn resolve(&self, column: &Column) -> Option<(&'static str, bool)> {
        let full = column.full_type();
        if full != column.data_type {
            if let Some(mapped) = self.get(&full) {
                return Some((mapped, true));
            }
        }

        let words: Vec<&str> = column.data_type.split_whitespace().collect();
        let two = words.iter().take(2).copied().collect::<Vec<_>>().join(" ");
        let candidates = [column.data_type.as_str(), two.as_str(), words.first().copied().unwrap_or_default()];
        candidates
            .into_iter()
            .filter(|key| !key.is_empty())
            .find_map(|key| self.get(key))
            .map(|mapped| (mapped, mapped.contains('(') || !takes_params(mapped)))
    }

    /// Rewrite the type of `column` in place. Unmapped types are left alone.
    pub fn translate(&self, column: &mut Column) -> bool {
        let Some((mapped, drop_params)) = self.resolve(column) else {
            return false;
        };
        column.data_type = mapped.to_string();
        if drop_params {
            column.length = None;
            column.precision = None;
            column.scale = None;
        }
        true
    }
}

/// Target types that accept a `(n)` or `(p,s)` suffix.
fn takes_params(mapped: &str) -> bool {
    const PARAMETERIZED: &[&str] = &[
        "BINARY", "BIT", "CHAR", "CHARACTER", "DATETIME", "DATETIME2", "DATETIMEOFFSET", "DECIMAL",
        "FLOAT", "NCHAR", "NUMBER", "NUMERIC", "NVARCHAR", "NVARCHAR2", "RAW", "TIME", "TIMESTAMP",
        "VARBINARY", "VARCHAR", "VARCHAR2",
    ];
    let head = mapped.split_whitespace().next().unwrap_or_default();
    PARAMETERIZED.iter().any(|p| p.eq_ignore_ascii_case(head))
}

/// The table for `from -> to`; `None` when both are the same dialect.
pub fn lookup(from: DialectKind, to: DialectKind) -> Option<&'static TypeMap> {
    TYPE_MAPS.iter().find(|m| m.from == from && m.to == to)
}

static TYPE_MAPS: [TypeMap; 20] = [
    TypeMap { from: Oracle, to: MySql, entries: ORACLE_TO_MYSQL },
    TypeMap { from: Oracle, to: Postgres, entries: ORACLE_TO_POSTGRES },
    TypeMap { from: Oracle, to: SqlServer, entries: ORACLE_TO_SQLSERVER },
    TypeMap { from: Oracle, to: Sqlite, entries: ORACLE_TO_SQLITE },
    TypeMap { from: MySql, to: Oracle, entries: MYSQL_TO_ORACLE },
    TypeMap { from: MySql, to: Postgres, entries: MYSQL_TO_POSTGRES },
    TypeMap { from: MySql, to: SqlServer, entries: MYSQL_TO_SQLSERVER },
    TypeMap { from: MySql, to: Sqlite, entries: MYSQL_TO_SQLITE },
    TypeMap { from: Postgres, to: Oracle, entries: POSTGRES_TO_ORACLE },
    TypeMap { from: Postgres, to: MySql, entries: POSTGRES_TO_MYSQL },
    TypeMap { from: Postgres, to: SqlServer, entries: POSTGRES_TO_SQLSERVER },
    TypeMap { from: Postgres, to: Sqlite, entries: POSTGRES_TO_SQLITE },
    TypeMap { from: SqlServer, to: Oracle, entries: SQLSERVER_TO_ORACLE },
    TypeMap { from: SqlServer, to: MySql, entries: SQLSERVER_TO_MYSQL },
    TypeMap { from: SqlServer, to: Postgres, entries: SQLSERVER_TO_POSTGRES },
    TypeMap { from: SqlServer, to: Sqlite, entries: SQLSERVER_TO_SQLITE },
    TypeMap { from: Sqlite, to: Oracle, entries: SQLITE_TO_ORACLE },
    TypeMap { from: Sqlite, to: MySql, entries: SQLITE_TO_MYSQL },
    TypeMap { from: Sqlite, to: Postgres, entries: SQLITE_TO_POSTGRES },
    TypeMap { from: Sqlite, to: SqlServer, entries: SQLITE_TO_SQLSERVER },
];

// ============================================================================
// Oracle
// ============================================================================

const ORACLE_TO_MYSQL: &[(&str, &str)] = &[
    ("NUMBER", "decimal"),
    ("NUMBER(1)", "boolean"),
    ("NUMBER(3)", "tinyint"),
    ("NUMBER(5)", "smallint"),
    ("NUMBER(10)", "int"),
    ("NUMBER(19)", "bigint"),
    ("INTEGER", "int"),
    ("BINARY_FLOAT", "float"),
    ("BINARY_DOUBLE", "double"),
    ("FLOAT", "double"),
    ("CHAR", "char"),
    ("NCHAR", "char"),
    ("VARCHAR2", "varchar"),
    ("NVARCHAR2", "varchar"),
    ("CLOB", "text"),
    ("NCLOB", "text"),
    ("LONG", "text"),
    ("BLOB", "longblob"),
    ("RAW", "binary"),
    ("LONG RAW", "longblob"),
    ("DATE", "datetime"),
    ("TIMESTAMP", "datetime"),
    ("INTERVAL YEAR", "varchar(100)"),
    ("INTERVAL DAY", "varchar(100)"),
    ("XMLTYPE", "text"),
    ("ROWID", "char(18)"),
    ("UROWID", "varchar(4000)"),
];

const ORACLE_TO_POSTGRES: &[(&str, &str)] = &[
    ("NUMBER", "numeric"),
    ("NUMBER(1)", "boolean"),
    ("NUMBER(3)", "smallint"),
    ("NUMBER(5)", "smallint"),
    ("NUMBER(10)", "integer"),
    ("NUMBER(19)", "bigint"),
    ("INTEGER", "integer"),
    ("BINARY_FLOAT", "real"),
    ("BINARY_DOUBLE", "double precision"),
    ("FLOAT", "double precision"),
    ("CHAR", "char"),
    ("NCHAR", "char"),
    ("VARCHAR2", "varchar"),
    ("NVARCHAR2", "varchar"),
    ("CLOB", "text"),
    ("NCLOB", "text"),
    ("LONG", "text"),
    ("BLOB", "bytea"),
    ("RAW", "bytea"),
    ("LONG RAW", "bytea"),
    ("DATE", "timestamp"),
    ("TIMESTAMP", "timestamp"),
    ("TIMESTAMP WITH TIME ZONE", "timestamptz"),
    ("TIMESTAMP WITH LOCAL TIME ZONE", "timestamptz"),
    ("INTERVAL YEAR", "interval"),
    ("INTERVAL DAY", "interval"),
    ("XMLTYPE", "xml"),
    ("ROWID", "char(18)"),
    ("UROWID", "varchar(4000)"),
];

const ORACLE_TO_SQLSERVER: &[(&str, &str)] = &[
    ("NUMBER", "decimal"),
    ("NUMBER(1)", "bit"),
    ("NUMBER(3)", "tinyint"),
    ("NUMBER(5)", "smallint"),
    ("NUMBER(10)", "int"),
    ("NUMBER(19)", "bigint"),
    ("INTEGER", "int"),
    ("BINARY_FLOAT", "real"),
    ("BINARY_DOUBLE", "float"),
    ("FLOAT", "float"),
    ("CHAR", "char"),
    ("NCHAR", "nchar"),
    ("VARCHAR2", "varchar"),
    ("NVARCHAR2", "nvarchar"),
    ("CLOB", "varchar(max)"),
    ("NCLOB", "nvarchar(max)"),
    ("LONG", "varchar(max)"),
    ("BLOB", "varbinary(max)"),
    ("RAW", "varbinary"),
    ("LONG RAW", "varbinary(max)"),
    ("DATE", "datetime2"),
    ("TIMESTAMP", "datetime2"),
    ("TIMESTAMP WITH TIME ZONE", "datetimeoffset"),
    ("INTERVAL YEAR", "varchar(100)"),
    ("INTERVAL DAY", "varchar(100)"),
    ("XMLTYPE", "xml"),
    ("ROWID", "char(18)"),
    ("UROWID", "varchar(4000)"),
];

const ORACLE_TO_SQLITE: &[(&str, &str)] = &[
    ("NUMBER", "REAL"),
    ("NUMBER(1)", "INTEGER"),
    ("NUMBER(3)", "INTEGER"),
    ("NUMBER(5)", "INTEGER"),
    ("NUMBER(10)", "INTEGER"),
    ("NUMBER(19)", "INTEGER"),
    ("INTEGER", "INTEGER"),
    ("BINARY_FLOAT", "REAL"),
    ("BINARY_DOUBLE", "REAL"),
    ("FLOAT", "REAL"),
    ("CHAR", "TEXT"),
    ("NCHAR", "TEXT"),
    ("VARCHAR2", "TEXT"),
    ("NVARCHAR2", "TEXT"),
    ("CLOB", "TEXT"),
    ("NCLOB", "TEXT"),
    ("LONG", "TEXT"),
    ("BLOB", "BLOB"),
    ("RAW", "BLOB"),
    ("LONG RAW", "BLOB"),
    ("DATE", "TEXT"),
    ("TIMESTAMP", "TEXT"),
    ("INTERVAL YEAR", "TEXT"),
    ("INTERVAL DAY", "TEXT"),
    ("XMLTYPE", "TEXT"),
    ("ROWID", "TEXT"),
    ("UROWID", "TEXT"),
];

// ============================================================================
// MySQL
// ============================================================================

const MYSQL_TO_ORACLE: &[(&str, &str)] = &[
    ("TINYINT(1)", "NUMBER(1)"),
    ("BOOLEAN", "NUMBER(1)"),
    ("BOOL", "NUMBER(1)"),
    ("BIT", "NUMBER(1)"),
    ("TINYINT", "NUMBER(3)"),
    ("SMALLINT", "NUMBER(5)"),
    ("MEDIUMINT", "NUMBER(7)"),
    ("INT", "NUMBER(10)"),
    ("INTEGER", "NUMBER(10)"),
    ("BIGINT", "NUMBER(19)"),
    ("DECIMAL", "NUMBER"),
    ("NUMERIC", "NUMBER"),
    ("FLOAT", "BINARY_FLOAT"),
    ("DOUBLE", "BINARY_DOUBLE"),
    ("REAL", "BINARY_DOUBLE"),
    ("CHAR", "CHAR"),
    ("VARCHAR", "VARCHAR2"),
    ("TINYTEXT", "VARCHAR2(255)"),
    ("TEXT", "CLOB"),
    ("MEDIUMTEXT", "CLOB"),
    ("LONGTEXT", "CLOB"),
    ("BINARY", "RAW"),
    ("VARBINARY", "RAW"),
    ("TINYBLOB", "BLOB"),
    ("BLOB", "BLOB"),
    ("MEDIUMBLOB", "BLOB"),
    ("LONGBLOB", "BLOB"),
    ("DATE", "DATE"),
    ("DATETIME", "TIMESTAMP"),
    ("TIMESTAMP", "TIMESTAMP"),
    ("TIME", "VARCHAR2(16)"),
    ("YEAR", "NUMBER(4)"),
    ("JSON", "CLOB"),
    ("ENUM", "VARCHAR2(255)"),
    ("SET", "VARCHAR2(4000)"),
];

const MYSQL_TO_POSTGRES: &[(&str, &str)] = &[
    ("TINYINT(1)", "boolean"),
    ("BOOLEAN", "boolean"),
    ("BOOL", "boolean"),
    ("BIT", "bit"),
    ("TINYINT", "smallint"),
    ("SMALLINT", "smallint"),
    ("MEDIUMINT", "integer"),
    ("INT", "integer"),
    ("INTEGER", "integer"),
    ("INT UNSIGNED", "bigint"),
    ("BIGINT", "bigint"),
    ("BIGINT UNSIGNED", "numeric(20)"),
    ("DECIMAL", "numeric"),
    ("NUMERIC", "numeric"),
    ("FLOAT", "real"),
    ("DOUBLE", "double precision"),
    ("REAL", "double precision"),
    ("CHAR", "char"),
    ("VARCHAR", "varchar"),
    ("TINYTEXT", "text"),
    ("TEXT", "text"),
    ("MEDIUMTEXT", "text"),
    ("LONGTEXT", "text"),
    ("BINARY", "bytea"),
    ("VARBINARY", "bytea"),
    ("TINYBLOB", "bytea"),
    ("BLOB", "bytea"),
    ("MEDIUMBLOB", "bytea"),
    ("LONGBLOB", "bytea"),
    ("DATE", "date"),
    ("DATETIME", "timestamp"),
    ("TIMESTAMP", "timestamp"),
    ("TIME", "time"),
    ("YEAR", "smallint"),
    ("JSON", "jsonb"),
    ("ENUM", "varchar(255)"),
    ("SET", "text"),
];

const MYSQL_TO_SQLSERVER: &[(&str, &str)] = &[
    ("TINYINT(1)", "bit"),
    ("BOOLEAN", "bit"),
    ("BOOL", "bit"),
    ("BIT", "bit"),
    ("TINYINT", "tinyint"),
    ("SMALLINT", "smallint"),
    ("MEDIUMINT", "int"),
    ("INT", "int"),
    ("INTEGER", "int"),
    ("BIGINT", "bigint"),
    ("DECIMAL", "decimal"),
    ("NUMERIC", "numeric"),
    ("FLOAT", "real"),
    ("DOUBLE", "float"),
    ("REAL", "float"),
    ("CHAR", "nchar"),
    ("VARCHAR", "nvarchar"),
    ("TINYTEXT", "nvarchar(255)"),
    ("TEXT", "nvarchar(max)"),
    ("MEDIUMTEXT", "nvarchar(max)"),
    ("LONGTEXT", "nvarchar(max)"),
    ("BINARY", "binary"),
    ("VARBINARY", "varbinary"),
    ("TINYBLOB", "varbinary(255)"),
    ("BLOB", "varbinary(max)"),
    ("MEDIUMBLOB", "varbinary(max)"),
    ("LONGBLOB", "varbinary(max)"),
    ("DATE", "date"),
    ("DATETIME", "datetime2"),
    ("TIMESTAMP", "datetime2"),
    ("TIME", "time"),
    ("YEAR", "smallint"),
    ("JSON", "nvarchar(max)"),
    ("ENUM", "nvarchar(255)"),
    ("SET", "nvarchar(4000)"),
];

const MYSQL_TO_SQLITE: &[(&str, &str)] = &[
    ("TINYINT", "INTEGER"),
    ("BOOLEAN", "INTEGER"),
    ("BOOL", "INTEGER"),
    ("BIT", "INTEGER"),
    ("SMALLINT", "INTEGER"),
    ("MEDIUMINT", "INTEGER"),
    ("INT", "INTEGER"),
    ("INTEGER", "INTEGER"),
    ("BIGINT", "INTEGER"),
    ("DECIMAL", "NUMERIC"),
    ("NUMERIC", "NUMERIC"),
    ("FLOAT", "REAL"),
    ("DOUBLE", "REAL"),
    ("REAL", "REAL"),
    ("CHAR", "TEXT"),
    ("VARCHAR", "TEXT"),
    ("TINYTEXT", "TEXT"),
    ("TEXT", "TEXT"),
    ("MEDIUMTEXT", "TEXT"),
    ("LONGTEXT", "TEXT"),
    ("BINARY", "BLOB"),
    ("VARBINARY", "BLOB"),
    ("TINYBLOB", "BLOB"),
    ("BLOB", "BLOB"),
    ("MEDIUMBLOB", "BLOB"),
    ("LONGBLOB", "BLOB"),
    ("DATE", "TEXT"),
    ("DATETIME", "TEXT"),
    ("TIMESTAMP", "TEXT"),
    ("TIME", "TEXT"),
    ("YEAR", "INTEGER"),
    ("JSON", "TEXT"),
    ("ENUM", "TEXT"),
    ("SET", "TEXT"),
];

// ============================================================================
// PostgreSQL
// ============================================================================

const POSTGRES_TO_ORACLE: &[(&str, &str)] = &[
    ("BOOLEAN", "NUMBER(1)"),
    ("BOOL", "NUMBER(1)"),
    ("SMALLINT", "NUMBER(5)"),
    ("INT2", "NUMBER(5)"),
    ("INTEGER", "NUMBER(10)"),
    ("INT", "NUMBER(10)"),
    ("INT4", "NUMBER(10)"),
    ("BIGINT", "NUMBER(19)"),
    ("INT8", "NUMBER(19)"),
    ("NUMERIC", "NUMBER"),
    ("DECIMAL", "NUMBER"),
    ("REAL", "BINARY_FLOAT"),
    ("FLOAT4", "BINARY_FLOAT"),
    ("DOUBLE PRECISION", "BINARY_DOUBLE"),
    ("FLOAT8", "BINARY_DOUBLE"),
    ("MONEY", "NUMBER(19,4)"),
    ("CHAR", "CHAR"),
    ("CHARACTER", "CHAR"),
    ("VARCHAR", "VARCHAR2"),
    ("CHARACTER VARYING", "VARCHAR2"),
    ("TEXT", "CLOB"),
    ("BYTEA", "BLOB"),
    ("DATE", "DATE"),
    ("TIME", "VARCHAR2(16)"),
    ("TIMESTAMP", "TIMESTAMP"),
    ("TIMESTAMP WITHOUT TIME ZONE", "TIMESTAMP"),
    ("TIMESTAMP WITH TIME ZONE", "TIMESTAMP WITH TIME ZONE"),
    ("TIMESTAMPTZ", "TIMESTAMP WITH TIME ZONE"),
    ("INTERVAL", "INTERVAL DAY TO SECOND"),
    ("UUID", "RAW(16)"),
    ("JSON", "CLOB"),
    ("JSONB", "CLOB"),
    ("XML", "XMLTYPE"),
    ("INET", "VARCHAR2(45)"),
];

const POSTGRES_TO_MYSQL: &[(&str, &str)] = &[
    ("BOOLEAN", "boolean"),
    ("BOOL", "boolean"),
    ("SMALLINT", "smallint"),
    ("INT2", "smallint"),
    ("INTEGER", "int"),
    ("INT", "int"),
    ("INT4", "int"),
    ("BIGINT", "bigint"),
    ("INT8", "bigint"),
    ("NUMERIC", "decimal"),
    ("DECIMAL", "decimal"),
    ("REAL", "float"),
    ("FLOAT4", "float"),
    ("DOUBLE PRECISION", "double"),
    ("FLOAT8", "double"),
    ("MONEY", "decimal(19,4)"),
    ("CHAR", "char"),
    ("CHARACTER", "char"),
    ("VARCHAR", "varchar"),
    ("CHARACTER VARYING", "varchar"),
    ("TEXT", "longtext"),
    ("BYTEA", "longblob"),
    ("DATE", "date"),
    ("TIME", "time"),
    ("TIMESTAMP", "datetime"),
    ("TIMESTAMP WITHOUT TIME ZONE", "datetime"),
    ("TIMESTAMP WITH TIME ZONE", "timestamp"),
    ("TIMESTAMPTZ", "timestamp"),
    ("INTERVAL", "varchar(100)"),
    ("UUID", "char(36)"),
    ("JSON", "json"),
    ("JSONB", "json"),
    ("XML", "text"),
    ("INET", "varchar(45)"),
];

const POSTGRES_TO_SQLSERVER: &[(&str, &str)] = &[
    ("BOOLEAN", "bit"),
    ("BOOL", "bit"),
    ("SMALLINT", "smallint"),
    ("INT2", "smallint"),
    ("INTEGER", "int"),
    ("INT", "int"),
    ("INT4", "int"),
    ("BIGINT", "bigint"),
    ("INT8", "bigint"),
    ("NUMERIC", "numeric"),
    ("DECIMAL", "decimal"),
    ("REAL", "real"),
    ("FLOAT4", "real"),
    ("DOUBLE PRECISION", "float"),
    ("FLOAT8", "float"),
    ("MONEY", "money"),
    ("CHAR", "nchar"),
    ("CHARACTER", "nchar"),
    ("VARCHAR", "nvarchar"),
    ("CHARACTER VARYING", "nvarchar"),
    ("TEXT", "nvarchar(max)"),
    ("BYTEA", "varbinary(max)"),
    ("DATE", "date"),
    ("TIME", "time"),
    ("TIMESTAMP", "datetime2"),
    ("TIMESTAMP WITHOUT TIME ZONE", "datetime2"),
    ("TIMESTAMP WITH TIME ZONE", "datetimeoffset"),
    ("TIMESTAMPTZ", "datetimeoffset"),
    ("INTERVAL", "varchar(100)"),
    ("UUID", "uniqueidentifier"),
    ("JSON", "nvarchar(max)"),
    ("JSONB", "nvarchar(max)"),
    ("XML", "xml"),
    ("INET", "varchar(45)"),
];

const POSTGRES_TO_SQLITE: &[(&str, &str)] = &[
    ("BOOLEAN", "INTEGER"),
    ("BOOL", "INTEGER"),
    ("SMALLINT", "INTEGER"),
    ("INT2", "INTEGER"),
    ("INTEGER", "INTEGER"),
    ("INT", "INTEGER"),
    ("INT4", "INTEGER"),
    ("BIGINT", "INTEGER"),
    ("INT8", "INTEGER"),
    ("NUMERIC", "NUMERIC"),
    ("DECIMAL", "NUMERIC"),
    ("REAL", "REAL"),
    ("FLOAT4", "REAL"),
    ("DOUBLE PRECISION", "REAL"),
    ("FLOAT8", "REAL"),
    ("MONEY", "NUMERIC"),
    ("CHAR", "TEXT"),
    ("CHARACTER", "TEXT"),
    ("VARCHAR", "TEXT"),
    ("CHARACTER VARYING", "TEXT"),
    ("TEXT", "TEXT"),
    ("BYTEA", "BLOB"),
    ("DATE", "TEXT"),
    ("TIME", "TEXT"),
    ("TIMESTAMP", "TEXT"),
    ("TIMESTAMPTZ", "TEXT"),
    ("INTERVAL", "TEXT"),
    ("UUID", "TEXT"),
    ("JSON", "TEXT"),
    ("JSONB", "TEXT"),
    ("XML", "TEXT"),
    ("INET", "TEXT"),
];

// ============================================================================
// SQL Server
// ============================================================================

const SQLSERVER_TO_ORACLE: &[(&str, &str)] = &[
    ("BIT", "NUMBER(1)"),
    ("TINYINT", "NUMBER(3)"),
    ("SMALLINT", "NUMBER(5)"),
    ("INT", "NUMBER(10)"),
    ("INTEGER", "NUMBER(10)"),
    ("BIGINT", "NUMBER(19)"),
    ("DECIMAL", "NUMBER"),
    ("NUMERIC", "NUMBER"),
    ("MONEY", "NUMBER(19,4)"),
    ("SMALLMONEY", "NUMBER(10,4)"),
    ("FLOAT", "BINARY_DOUBLE"),
    ("REAL", "BINARY_FLOAT"),
    ("CHAR", "CHAR"),
    ("NCHAR", "NCHAR"),
    ("VARCHAR", "VARCHAR2"),
    ("NVARCHAR", "NVARCHAR2"),
    ("VARCHAR(MAX)", "CLOB"),
    ("NVARCHAR(MAX)", "NCLOB"),
    ("TEXT", "CLOB"),
    ("NTEXT", "NCLOB"),
    ("BINARY", "RAW"),
    ("VARBINARY", "RAW"),
    ("VARBINARY(MAX)", "BLOB"),
    ("IMAGE", "BLOB"),
    ("DATE", "DATE"),
    ("TIME", "VARCHAR2(16)"),
    ("DATETIME", "TIMESTAMP"),
    ("DATETIME2", "TIMESTAMP"),
    ("SMALLDATETIME", "DATE"),
    ("DATETIMEOFFSET", "TIMESTAMP WITH TIME ZONE"),
    ("UNIQUEIDENTIFIER", "RAW(16)"),
    ("XML", "XMLTYPE"),
];

const SQLSERVER_TO_MYSQL: &[(&str, &str)] = &[
    ("BIT", "boolean"),
    ("TINYINT", "tinyint unsigned"),
    ("SMALLINT", "smallint"),
    ("INT", "int"),
    ("INTEGER", "int"),
    ("BIGINT", "bigint"),
    ("DECIMAL", "decimal"),
    ("NUMERIC", "decimal"),
    ("MONEY", "decimal(19,4)"),
    ("SMALLMONEY", "decimal(10,4)"),
    ("FLOAT", "double"),
    ("REAL", "float"),
    ("CHAR", "char"),
    ("NCHAR", "char"),
    ("VARCHAR", "varchar"),
    ("NVARCHAR", "varchar"),
    ("VARCHAR(MAX)", "longtext"),
    ("NVARCHAR(MAX)", "longtext"),
    ("TEXT", "longtext"),
    ("NTEXT", "longtext"),
    ("BINARY", "binary"),
    ("VARBINARY", "varbinary"),
    ("VARBINARY(MAX)", "longblob"),
    ("IMAGE", "longblob"),
    ("DATE", "date"),
    ("TIME", "time"),
    ("DATETIME", "datetime"),
    ("DATETIME2", "datetime"),
    ("SMALLDATETIME", "datetime"),
    ("DATETIMEOFFSET", "timestamp"),
    ("UNIQUEIDENTIFIER", "char(36)"),
    ("XML", "longtext"),
];

const SQLSERVER_TO_POSTGRES: &[(&str, &str)] = &[
    ("BIT", "boolean"),
    ("TINYINT", "smallint"),
    ("SMALLINT", "smallint"),
    ("INT", "integer"),
    ("INTEGER", "integer"),
    ("BIGINT", "bigint"),
    ("DECIMAL", "numeric"),
    ("NUMERIC", "numeric"),
    ("MONEY", "numeric(19,4)"),
    ("SMALLMONEY", "numeric(10,4)"),
    ("FLOAT", "double precision"),
    ("REAL", "real"),
    ("CHAR", "char"),
    ("NCHAR", "char"),
    ("VARCHAR", "varchar"),
    ("NVARCHAR", "varchar"),
    ("VARCHAR(MAX)", "text"),
    ("NVARCHAR(MAX)", "text"),
    ("TEXT", "text"),
    ("NTEXT", "text"),
    ("BINARY", "bytea"),
    ("VARBINARY", "bytea"),
    ("VARBINARY(MAX)", "bytea"),
    ("IMAGE", "bytea"),
    ("DATE", "date"),
    ("TIME", "time"),
    ("DATETIME", "timestamp"),
    ("DATETIME2", "timestamp"),
    ("SMALLDATETIME", "timestamp"),
    ("DATETIMEOFFSET", "timestamptz"),
    ("UNIQUEIDENTIFIER", "uuid"),
    ("XML", "xml"),
];

const SQLSERVER_TO_SQLITE: &[(&str, &str)] = &[
    ("BIT", "INTEGER"),
    ("TINYINT", "INTEGER"),
    ("SMALLINT", "INTEGER"),
    ("INT", "INTEGER"),
    ("INTEGER", "INTEGER"),
    ("BIGINT", "INTEGER"),
    ("DECIMAL", "NUMERIC"),
    ("NUMERIC", "NUMERIC"),
    ("MONEY", "NUMERIC"),
    ("SMALLMONEY", "NUMERIC"),
    ("FLOAT", "REAL"),
    ("REAL", "REAL"),
    ("CHAR", "TEXT"),
    ("NCHAR", "TEXT"),
    ("VARCHAR", "TEXT"),
    ("NVARCHAR", "TEXT"),
    ("VARCHAR(MAX)", "TEXT"),
    ("NVARCHAR(MAX)", "TEXT"),
    ("TEXT", "TEXT"),
    ("NTEXT", "TEXT"),
    ("BINARY", "BLOB"),
    ("VARBINARY", "BLOB"),
    ("VARBINARY(MAX)", "BLOB"),
    ("IMAGE", "BLOB"),
    ("DATE", "TEXT"),
    ("TIME", "TEXT"),
    ("DATETIME", "TEXT"),
    ("DATETIME2", "TEXT"),
    ("SMALLDATETIME", "TEXT"),
    ("DATETIMEOFFSET", "TEXT"),
    ("UNIQUEIDENTIFIER", "TEXT"),
    ("XML", "TEXT"),
];

// ============================================================================
// SQLite
// ============================================================================

const SQLITE_TO_ORACLE: &[(&str, &str)] = &[
    ("INTEGER", "NUMBER(19)"),
    ("INT", "NUMBER(10)"),
    ("BOOLEAN", "NUMBER(1)"),
    ("REAL", "BINARY_DOUBLE"),
    ("DOUBLE", "BINARY_DOUBLE"),
    ("FLOAT", "BINARY_DOUBLE"),
    ("NUMERIC", "NUMBER"),
    ("DECIMAL", "NUMBER"),
    ("TEXT", "CLOB"),
    ("CHAR", "CHAR"),
    ("VARCHAR", "VARCHAR2"),
    ("BLOB", "BLOB"),
    ("DATE", "DATE"),
    ("DATETIME", "TIMESTAMP"),
    ("TIMESTAMP", "TIMESTAMP"),
];

const SQLITE_TO_MYSQL: &[(&str, &str)] = &[
    ("INTEGER", "bigint"),
    ("INT", "int"),
    ("BOOLEAN", "boolean"),
    ("REAL", "double"),
    ("DOUBLE", "double"),
    ("FLOAT", "double"),
    ("NUMERIC", "decimal"),
    ("DECIMAL", "decimal"),
    ("TEXT", "longtext"),
    ("CHAR", "char"),
    ("VARCHAR", "varchar"),
    ("BLOB", "longblob"),
    ("DATE", "date"),
    ("DATETIME", "datetime"),
    ("TIMESTAMP", "datetime"),
];

const SQLITE_TO_POSTGRES: &[(&str, &str)] = &[
    ("INTEGER", "bigint"),
    ("INT", "integer"),
    ("BOOLEAN", "boolean"),
    ("REAL", "double precision"),
    ("DOUBLE", "double precision"),
    ("FLOAT", "double precision"),
    ("NUMERIC", "numeric"),
    ("DECIMAL", "numeric"),
    ("TEXT", "text"),
    ("CHAR", "char"),
    ("VARCHAR", "varchar"),
    ("BLOB", "bytea"),
    ("DATE", "date"),
    ("DATETIME", "timestamp"),
    ("TIMESTAMP", "timestamp"),
];

const SQLITE_TO_SQLSERVER: &[(&str, &str)] = &[
    ("INTEGER", "bigint"),
    ("INT", "int"),
    ("BOOLEAN", "bit"),
    ("REAL", "float"),
    ("DOUBLE", "float"),
    ("FLOAT", "float"),
    ("NUMERIC", "numeric"),
    ("DECIMAL", "decimal"),
    ("TEXT", "nvarchar(max)"),
    ("CHAR", "nchar"),
    ("VARCHAR", "nvarchar"),
    ("BLOB", "varbinary(max)"),
    ("DATE", "date"),
    ("DATETIME", "datetime2"),
    ("TIMESTAMP", "datetime2"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column(data_type: &str, length: Option<u32>, precision: Option<u32>) -> Column {
        let mut col = Column::new("c", data_type);
        col.length = length;
        col.precision = precision;
        col
    }

    fn translated(from: DialectKind, to: DialectKind, mut col: Column) -> String {
        lookup(from, to).unwrap().translate(&mut col);
        col.full_type()
    }

    #[test]
    fn test_every_pair_has_a_table() {
        for from in DialectKind::ALL {
            for to in DialectKind::ALL {
                assert_eq!(lookup(from, to).is_some(), from != to, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_oracle_to_postgres() {
        assert_eq!(translated(Oracle, Postgres, column("NUMBER", None, Some(1))), "boolean");
        assert_eq!(translated(Oracle, Postgres, column("VARCHAR2", Some(50), None)), "varchar(50)");
        assert_eq!(translated(Oracle, Postgres, column("BLOB", None, None)), "bytea");
        assert_eq!(translated(Oracle, Postgres, column("NUMBER", None, Some(12))), "numeric(12)");
        assert_eq!(
            translated(Oracle, Postgres, column("INTERVAL DAY TO SECOND", None, None)),
            "interval"
        );
    }

    #[test]
    fn test_parenthesized_target_replaces_params() {
        assert_eq!(translated(SqlServer, Postgres, column("NVARCHAR(MAX)", None, None)), "text");
        assert_eq!(translated(Oracle, SqlServer, column("CLOB", None, None)), "varchar(max)");
        assert_eq!(translated(Oracle, Sqlite, column("VARCHAR2", Some(10), None)), "TEXT");
    }

    #[test]
    fn test_unmapped_type_passes_through() {
        assert_eq!(translated(Postgres, MySql, column("GEOMETRY", Some(4), None)), "GEOMETRY(4)");
        assert_eq!(translated(MySql, Postgres, column("INT UNSIGNED", None, None)), "bigint");
        assert_eq!(translated(MySql, Postgres, column("TINYINT", Some(1), None)), "boolean");
    }
}
