//! SQL Server dialect.

use crate::dialect::writer::{terminated, DdlWriter};
use crate::dialect::{grammar, Dialect, DialectKind};
use crate::error::PorterResult;
use crate::schema::{Column, Schema, Trigger, TriggerTiming, View};

/// T-SQL DDL. Views and triggers must start a batch, so they are wrapped
/// in `GO` separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Dialect for SqlServer {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn parse(&self, sql: &str) -> PorterResult<Schema> {
        grammar::parse_script(sql, DialectKind::SqlServer)
    }

    fn generate(&self, schema: &Schema) -> PorterResult<String> {
        self.write_schema(schema)
    }
}

impl DdlWriter for SqlServer {
    fn quote_ident(&self, name: &str) -> String {
        format!("[{}]", name.replace(']', "]]"))
    }

    fn identity_clause(&self, _column: &Column) -> Option<String> {
        Some("IDENTITY(1,1)".into())
    }

    fn create_view(&self, view: &View) -> String {
        format!(
            "GO\nCREATE {}VIEW {} AS\n{};\nGO",
            if view.or_replace { "OR ALTER " } else { "" },
            self.quote(&view.name),
            view.definition
        )
    }

    fn create_trigger(&self, trigger: &Trigger) -> String {
        let (timing, note) = match trigger.timing {
            TriggerTiming::Before => (
                TriggerTiming::After,
                "-- BEFORE triggers are not supported by SQL Server; emitted as AFTER.\n",
            ),
            other => (other, ""),
        };
        let events: Vec<String> = trigger.events.iter().map(|e| e.to_string()).collect();
        format!(
            "GO\n{}CREATE TRIGGER {} ON {} {} {} AS\n{}\nGO",
            note,
            self.quote(&trigger.name),
            self.quote(&trigger.table),
            timing,
            events.join(", "),
            terminated(&trigger.body)
        )
    }
}
