//! DDL generation shared by all dialects.
//!
//! [`DdlWriter`] renders every entity with standard SQL by default; each
//! dialect overrides only the pieces its syntax disagrees on (quoting,
//! auto-increment, sequences, trigger shape).

use crate::error::{PorterError, PorterResult};
use crate::schema::{Column, Constraint, ConstraintKind, Schema, Sequence, Table, Trigger, View};

/// Words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "check", "column",
    "constraint", "create", "default", "delete", "desc", "distinct", "drop", "else", "end",
    "exists", "false", "for", "foreign", "from", "grant", "group", "having", "in", "index",
    "inner", "insert", "is", "join", "key", "left", "level", "like", "limit", "not", "null",
    "number", "offset", "on", "or", "order", "outer", "primary", "references", "right", "select",
    "session", "size", "table", "then", "to", "trigger", "true", "union", "unique", "update",
    "user", "values", "view", "when", "where",
];

/// `true` if `name` cannot be written bare.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
        || name.is_empty()
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_' && c != '$')
        || name.chars().next().is_some_and(|c| c.is_numeric())
}

/// Dialect-specific DDL rendering.
pub trait DdlWriter {
    /// Wrap an identifier in this dialect's quotes.
    fn quote_ident(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    /// Quote an identifier only when it needs it.
    fn quote(&self, name: &str) -> String {
        if needs_quoting(name) {
            self.quote_ident(name)
        } else {
            name.to_string()
        }
    }

    /// Auto-increment clause placed right after the type.
    fn identity_clause(&self, column: &Column) -> Option<String>;

    /// Whether foreign keys accept `ON UPDATE`.
    fn supports_on_update(&self) -> bool {
        true
    }

    fn column_type(&self, column: &Column) -> String {
        column.full_type()
    }

    fn column_def(&self, column: &Column, inline_pk: bool) -> String {
        let mut parts = vec![self.quote(&column.name), self.column_type(column)];
        match (column.auto_increment, &column.default_value) {
            (true, _) => parts.extend(self.identity_clause(column)),
            (false, Some(default)) => parts.push(format!("DEFAULT {}", default)),
            (false, None) => {}
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

    fn constraint_def(&self, constraint: &Constraint) -> String {
        let mut sql = match &constraint.name {
            Some(name) => format!("CONSTRAINT {} ", self.quote(name)),
            None => String::new(),
        };
        let columns = self.column_list(&constraint.columns);
        match constraint.kind {
            ConstraintKind::PrimaryKey | ConstraintKind::Unique => {
                sql.push_str(&format!("{} ({})", constraint.kind, columns));
            }
            ConstraintKind::Check => {
                sql.push_str(&format!(
                    "CHECK ({})",
                    constraint.expression.as_deref().unwrap_or_default()
                ));
            }
            ConstraintKind::ForeignKey => {
                sql.push_str(&format!(
                    "FOREIGN KEY ({}) REFERENCES {}",
                    columns,
                    self.quote(constraint.ref_table.as_deref().unwrap_or_default())
                ));
                if !constraint.ref_columns.is_empty() {
                    sql.push_str(&format!(" ({})", self.column_list(&constraint.ref_columns)));
                }
                if let Some(rule) = &constraint.on_delete {
                    sql.push_str(&format!(" ON DELETE {}", rule));
                }
                if let Some(rule) = constraint.on_update.as_ref().filter(|_| self.supports_on_update()) {
                    sql.push_str(&format!(" ON UPDATE {}", rule));
                }
            }
        }
        sql
    }

    fn column_list(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|c| self.quote(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn create_table(&self, table: &Table) -> PorterResult<String> {
        if table.columns.is_empty() {
            return Err(PorterError::Generate(format!(
                "table '{}' has no columns",
                table.name
            )));
        }

        let pk_columns: Vec<&Column> = table.columns.iter().filter(|c| c.primary_key).collect();
        let inline_pk = pk_columns.len() == 1 && table.primary_key().is_none();

        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_def(c, inline_pk && c.primary_key))
            .collect();
        if pk_columns.len() > 1 && table.primary_key().is_none() {
            let names: Vec<String> = pk_columns.iter().map(|c| c.name.clone()).collect();
            lines.push(format!("PRIMARY KEY ({})", self.column_list(&names)));
        }
        lines.extend(table.constraints.iter().map(|c| self.constraint_def(c)));

        Ok(format!(
            "CREATE TABLE {} (\n    {}\n);",
            self.quote(&table.name),
            lines.join(",\n    ")
        ))
    }

    fn create_sequence(&self, sequence: &Sequence) -> String {
        let mut sql = format!(
            "CREATE SEQUENCE {} START WITH {} INCREMENT BY {}",
            self.quote(&sequence.name),
            sequence.start_value,
            sequence.increment_by
        );
        if let Some(v) = sequence.min_value {
            sql.push_str(&format!(" MINVALUE {}", v));
        }
        if let Some(v) = sequence.max_value {
            sql.push_str(&format!(" MAXVALUE {}", v));
        }
        if let Some(v) = sequence.cache {
            sql.push_str(&format!(" CACHE {}", v));
        }
        if sequence.cycle {
            sql.push_str(" CYCLE");
        }
        sql.push(';');
        sql
    }

    fn create_view(&self, view: &View) -> String {
        format!(
            "CREATE {}VIEW {} AS\n{};",
            if view.or_replace { "OR REPLACE " } else { "" },
            self.quote(&view.name),
            view.definition
        )
    }

    fn create_trigger(&self, trigger: &Trigger) -> String {
        let events: Vec<String> = trigger.events.iter().map(|e| e.to_string()).collect();
        format!(
            "CREATE TRIGGER {} {} {} ON {}{}\n{}",
            self.quote(&trigger.name),
            trigger.timing,
            events.join(" OR "),
            self.quote(&trigger.table),
            if trigger.for_each_row { " FOR EACH ROW" } else { "" },
            terminated(&trigger.body)
        )
    }

    /// Render a whole schema: sequences, tables, views, triggers.
    fn write_schema(&self, schema: &Schema) -> PorterResult<String> {
        if schema.is_empty() {
            return Err(PorterError::Generate("schema has no definitions".into()));
        }

        let mut statements = Vec::new();
        statements.extend(schema.sequences.iter().map(|s| self.create_sequence(s)));
        for table in &schema.tables {
            statements.push(self.create_table(table)?);
        }
        statements.extend(schema.views.iter().map(|v| self.create_view(v)));
        statements.extend(schema.triggers.iter().map(|t| self.create_trigger(t)));

        let mut out = statements.join("\n\n");
        out.push('\n');
        Ok(out)
    }
}

/// `body` with exactly one trailing `;`.
pub fn terminated(body: &str) -> String {
    let body = body.trim_end();
    if body.ends_with(';') {
        body.to_string()
    } else {
        format!("{};", body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TriggerEvent, TriggerTiming};
    use pretty_assertions::assert_eq;

    struct Plain;

    impl DdlWriter for Plain {
        fn identity_clause(&self, _column: &Column) -> Option<String> {
            Some("GENERATED BY DEFAULT AS IDENTITY".into())
        }
    }

    #[test]
    fn test_quoting() {
        assert_eq!(Plain.quote("users"), "users");
        assert_eq!(Plain.quote("order"), "\"order\"");
        assert_eq!(Plain.quote("my col"), "\"my col\"");
        assert_eq!(Plain.quote("1st"), "\"1st\"");
    }

    #[test]
    fn test_composite_primary_key_moves_to_table_level() {
        let mut table = Table::new("pairs");
        for name in ["a", "b"] {
            let mut col = Column::new(name, "INT");
            col.primary_key = true;
            col.nullable = false;
            table.columns.push(col);
        }
        assert_eq!(
            Plain.create_table(&table).unwrap(),
            "CREATE TABLE pairs (\n    a INT NOT NULL,\n    b INT NOT NULL,\n    PRIMARY KEY (a, b)\n);"
        );
    }

    #[test]
    fn test_foreign_key_constraint() {
        let mut fk = Constraint::new(ConstraintKind::ForeignKey, vec!["user_id".into()])
            .named(Some("fk_posts_users".into()));
        fk.ref_table = Some("users".into());
        fk.ref_columns = vec!["id".into()];
        fk.on_delete = Some("CASCADE".into());
        assert_eq!(
            Plain.constraint_def(&fk),
            "CONSTRAINT fk_posts_users FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_trigger_and_empty_schema() {
        let trigger = Trigger {
            name: "trg".into(),
            table: "users".into(),
            timing: TriggerTiming::Before,
            events: vec![TriggerEvent::Insert, TriggerEvent::Update],
            for_each_row: true,
            body: "BEGIN NULL; END".into(),
        };
        assert_eq!(
            Plain.create_trigger(&trigger),
            "CREATE TRIGGER trg BEFORE INSERT OR UPDATE ON users FOR EACH ROW\nBEGIN NULL; END;"
        );
        assert!(matches!(
            Plain.write_schema(&Schema::default()),
            Err(PorterError::Generate(_))
        ));
    }
}
