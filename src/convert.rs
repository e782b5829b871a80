//! Dialect-to-dialect conversion.
//!
//! `convert` = stream-parse in the source dialect, translate column types,
//! generate in the target dialect.

use tokio::io::AsyncRead;
use tracing::debug;

use crate::config::StreamParserConfig;
use crate::dialect::{DialectKind, DialectRegistry};
use crate::error::PorterResult;
use crate::schema::Schema;
use crate::stream::StreamParser;

/// Converts DDL between dialects.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: StreamParserConfig,
}

impl Converter {
    pub fn new(config: StreamParserConfig) -> Self {
        Self { config }
    }

    /// Parse `source` as `from` DDL and render it as `to` DDL.
    pub async fn convert<R>(
        &self,
        source: Option<R>,
        from: DialectKind,
        to: DialectKind,
    ) -> PorterResult<String>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let mut schema = self.parse(source, from).await?;
        let changed = translate(&mut schema, from, to);
        debug!(%from, %to, columns = changed, "column types translated");
        DialectRegistry::global().dialect(to).generate(&schema)
    }

    /// Parse `source` as `from` DDL.
    pub async fn parse<R>(&self, source: Option<R>, from: DialectKind) -> PorterResult<Schema>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let dialect = DialectRegistry::global().dialect(from);
        StreamParser::new(dialect, self.config.clone())
            .parse_stream(source)
            .await
    }

    /// [`convert`](Self::convert) for text already in memory.
    pub async fn convert_str(
        &self,
        sql: &str,
        from: DialectKind,
        to: DialectKind,
    ) -> PorterResult<String> {
        let source = std::io::Cursor::new(sql.as_bytes().to_vec());
        self.convert(Some(source), from, to).await
    }
}

/// Rewrite every column type of `schema` from `from` to `to` names.
///
/// Returns how many columns changed. Types missing from the table are kept.
pub fn translate(schema: &mut Schema, from: DialectKind, to: DialectKind) -> usize {
    let Some(map) = DialectRegistry::global().type_map(from, to) else {
        return 0;
    };
    let mut changed = 0;
    for table in &mut schema.tables {
        for column in &mut table.columns {
            if map.translate(column) {
                changed += 1;
            }
        }
    }
    changed
}
