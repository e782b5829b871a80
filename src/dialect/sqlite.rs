//! SQLite dialect.

use crate::dialect::writer::{terminated, DdlWriter};
use crate::dialect::{grammar, Dialect, DialectKind};
use crate::error::PorterResult;
use crate::schema::{Column, Schema, Sequence, Trigger, View};

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn parse(&self, sql: &str) -> PorterResult<Schema> {
        grammar::parse_script(sql, DialectKind::Sqlite)
    }

    fn generate(&self, schema: &Schema) -> PorterResult<String> {
        self.write_schema(schema)
    }
}

impl DdlWriter for Sqlite {
    /// Only `INTEGER PRIMARY KEY` columns auto-increment.
    fn identity_clause(&self, _column: &Column) -> Option<String> {
        None
    }

    fn column_def(&self, column: &Column, inline_pk: bool) -> String {
        if column.auto_increment && inline_pk {
            return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", self.quote(&column.name));
        }

        let mut parts = vec![self.quote(&column.name), self.column_type(column)];
        if let Some(default) = &column.default_value {
            parts.push(format!("DEFAULT {}", default));
        }
        if !column.nullable && !inline_pk {
            parts.push("NOT NULL".into());
        }
        if inline_pk {
            parts.push("PRIMARY KEY".into());
        } else if column.unique {
            parts.push("UNIQUE".into());
        }
        parts.join(" ")
    }

    fn create_sequence(&self, sequence: &Sequence) -> String {
        format!(
            "-- Sequence {} (START WITH {} INCREMENT BY {}) has no SQLite equivalent; use INTEGER PRIMARY KEY AUTOINCREMENT.",
            sequence.name, sequence.start_value, sequence.increment_by
        )
    }

    fn create_view(&self, view: &View) -> String {
        format!("CREATE VIEW IF NOT EXISTS {} AS\n{};", self.quote(&view.name), view.definition)
    }

    /// SQLite triggers are row-level, fire for one event and need a
    /// `BEGIN ... END` body.
    fn create_trigger(&self, trigger: &Trigger) -> String {
        let body = trigger.body.trim();
        let body = if body.to_ascii_uppercase().starts_with("BEGIN") {
            terminated(body)
        } else {
            format!("BEGIN\n    {}\nEND;", terminated(body))
        };
        let split = trigger.events.len() > 1;

        trigger
            .events
            .iter()
            .map(|event| {
                let name = if split {
                    format!("{}_{}", trigger.name, event.to_string().to_lowercase())
                } else {
                    trigger.name.clone()
                };
                format!(
                    "CREATE TRIGGER {} {} {} ON {} FOR EACH ROW\n{}",
                    self.quote(&name),
                    trigger.timing,
                    event,
                    self.quote(&trigger.table),
                    body
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Table, TriggerEvent, TriggerTiming};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_autoincrement() {
        let schema = Sqlite
            .parse(
                "CREATE TABLE IF NOT EXISTS notes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    body TEXT NOT NULL DEFAULT '',
                    \"order\" INTEGER
                );",
            )
            .unwrap();
        let notes = &schema.tables[0];
        assert!(notes.columns[0].auto_increment);
        assert!(notes.columns[0].primary_key);
        assert_eq!(notes.columns[1].default_value.as_deref(), Some("''"));
        assert_eq!(notes.columns[2].name, "order");
    }

    #[test]
    fn test_generate_integer_primary_key() {
        let mut table = Table::new("notes");
        let mut id = Column::new("id", "BIGINT");
        id.primary_key = true;
        id.auto_increment = true;
        id.nullable = false;
        table.columns = vec![id, Column::new("body", "TEXT")];
        assert_eq!(
            Sqlite.create_table(&table).unwrap(),
            "CREATE TABLE notes (\n    id INTEGER PRIMARY KEY AUTOINCREMENT,\n    body TEXT\n);"
        );
    }

    #[test]
    fn test_generate_trigger_wraps_body() {
        let trigger = Trigger {
            name: "audit".into(),
            table: "notes".into(),
            timing: TriggerTiming::After,
            events: vec![TriggerEvent::Insert, TriggerEvent::Update],
            for_each_row: false,
            body: "INSERT INTO log VALUES (1)".into(),
        };
        let sql = Sqlite.create_trigger(&trigger);
        assert!(sql.contains(
            "CREATE TRIGGER audit_insert AFTER INSERT ON notes FOR EACH ROW\nBEGIN\n    INSERT INTO log VALUES (1);\nEND;"
        ));
        assert!(sql.contains("CREATE TRIGGER audit_update AFTER UPDATE ON notes"));

        let parsed = Sqlite.parse(&sql).unwrap();
        assert_eq!(parsed.triggers.len(), 2);
        assert_eq!(parsed.triggers[1].event(), Some(TriggerEvent::Update));
    }
}
