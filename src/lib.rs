//! # sqlporter
//!
//! Convert SQL DDL between Oracle, MySQL, PostgreSQL, SQL Server and SQLite.
//!
//! Scripts are parsed into a dialect-neutral [`Schema`](schema::Schema) by a
//! concurrent streaming parser, column types are translated through static
//! type tables, and the schema is rendered in the target dialect.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use sqlporter::prelude::*;
//!
//! let converter = Converter::default();
//! let ddl = converter
//!     .convert_str(
//!         "CREATE TABLE users (id NUMBER(10) PRIMARY KEY, name VARCHAR2(50));",
//!         DialectKind::Oracle,
//!         DialectKind::Postgres,
//!     )
//!     .await?;
//! // => "CREATE TABLE users (\n    id integer PRIMARY KEY,\n    name varchar(50)\n);\n"
//! ```
//!
//! ## Pipeline
//!
//! | Stage      | Role                                             |
//! |------------|--------------------------------------------------|
//! | Batcher    | Cuts the byte stream at statement boundaries     |
//! | Workers    | Parse batches in parallel on the blocking pool   |
//! | Aggregator | Restores source order                            |
//! | Generator  | Renders the schema in the target dialect         |

pub mod config;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod schema;
pub mod stream;

pub mod prelude {
    pub use crate::config::{PorterConfig, StreamParserConfig};
    pub use crate::convert::Converter;
    pub use crate::dialect::{Dialect, DialectKind, DialectRegistry};
    pub use crate::error::*;
    pub use crate::schema::*;
    pub use crate::stream::{Backoff, ErrorObserver, StreamParser};
}

/// Parse an in-memory DDL script written in `kind`.
///
/// # Example
///
/// ```
/// use sqlporter::{dialect::DialectKind, parse};
///
/// let schema = parse("CREATE SEQUENCE users_seq START WITH 1 INCREMENT BY 1;", DialectKind::Oracle).unwrap();
/// assert_eq!(schema.sequences[0].name, "users_seq");
/// ```
pub fn parse(sql: &str, kind: dialect::DialectKind) -> error::PorterResult<schema::Schema> {
    dialect::DialectRegistry::global().dialect(kind).parse(sql)
}
