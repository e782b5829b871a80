//! PostgreSQL dialect.

use crate::dialect::writer::{terminated, DdlWriter};
use crate::dialect::{grammar, Dialect, DialectKind};
use crate::error::PorterResult;
use crate::schema::{Column, Schema, Trigger};

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn parse(&self, sql: &str) -> PorterResult<Schema> {
        grammar::parse_script(sql, DialectKind::Postgres)
    }

    fn generate(&self, schema: &Schema) -> PorterResult<String> {
        self.write_schema(schema)
    }
}

impl DdlWriter for Postgres {
    fn identity_clause(&self, _column: &Column) -> Option<String> {
        Some("GENERATED BY DEFAULT AS IDENTITY".into())
    }

    /// Postgres triggers call a function. A body that already does
    /// (`EXECUTE FUNCTION f()`) is kept; any other body is wrapped in a
    /// PL/pgSQL trigger function named after the trigger.
    fn create_trigger(&self, trigger: &Trigger) -> String {
        let events: Vec<String> = trigger.events.iter().map(|e| e.to_string()).collect();
        let head = format!(
            "CREATE TRIGGER {} {} {} ON {} FOR EACH {}",
            self.quote(&trigger.name),
            trigger.timing,
            events.join(" OR "),
            self.quote(&trigger.table),
            if trigger.for_each_row { "ROW" } else { "STATEMENT" }
        );

        let body = trigger.body.trim();
        if body.to_ascii_uppercase().starts_with("EXECUTE ") {
            return format!("{}\n{}", head, terminated(body));
        }

        let function = self.quote(&format!("{}_fn", trigger.name));
        format!(
            "CREATE OR REPLACE FUNCTION {function}() RETURNS trigger AS $$\n{}\n$$ LANGUAGE plpgsql;\n\n{head}\nEXECUTE FUNCTION {function}();",
            terminated(body)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TriggerEvent, TriggerTiming};
    use pretty_assertions::assert_eq;

    fn trigger(body: &str) -> Trigger {
        Trigger {
            name: "touch".into(),
            table: "users".into(),
            timing: TriggerTiming::Before,
            events: vec![TriggerEvent::Update],
            for_each_row: true,
            body: body.into(),
        }
    }

    #[test]
    fn test_parse_serial_and_dollar_quotes() {
        let schema = Postgres
            .parse(
                "CREATE TABLE items (id BIGSERIAL PRIMARY KEY, tags TEXT[] NOT NULL);
                 CREATE FUNCTION touch() RETURNS trigger AS $$
                 BEGIN NEW.updated_at := now(); RETURN NEW; END;
                 $$ LANGUAGE plpgsql;
                 CREATE TRIGGER touch BEFORE UPDATE ON items
                 FOR EACH ROW EXECUTE FUNCTION touch();",
            )
            .unwrap();
        let items = &schema.tables[0];
        assert_eq!(items.columns[0].data_type, "BIGINT");
        assert!(items.columns[0].auto_increment);
        assert_eq!(items.columns[1].data_type, "TEXT[]");
        assert_eq!(schema.triggers[0].body, "EXECUTE FUNCTION touch()");
    }

    #[test]
    fn test_generate_keeps_execute_body() {
        assert_eq!(
            Postgres.create_trigger(&trigger("EXECUTE FUNCTION touch()")),
            "CREATE TRIGGER touch BEFORE UPDATE ON users FOR EACH ROW\nEXECUTE FUNCTION touch();"
        );
    }

    #[test]
    fn test_generate_wraps_foreign_body() {
        let sql = Postgres.create_trigger(&trigger("BEGIN NEW.x := 1; RETURN NEW; END"));
        assert!(sql.starts_with("CREATE OR REPLACE FUNCTION touch_fn() RETURNS trigger AS $$"));
        assert!(sql.ends_with("EXECUTE FUNCTION touch_fn();"));
    }

    #[test]
    fn test_generate_identity() {
        let mut id = Column::new("id", "BIGINT");
        id.auto_increment = true;
        id.nullable = false;
        assert_eq!(
            Postgres.column_def(&id, false),
            "id BIGINT GENERATED BY DEFAULT AS IDENTITY NOT NULL"
        );
    }
}
