//! Oracle dialect.

use crate::dialect::writer::{terminated, DdlWriter};
use crate::dialect::{grammar, Dialect, DialectKind};
use crate::error::PorterResult;
use crate::schema::{Column, Schema, Trigger};

/// Oracle DDL. PL/SQL units end with a `/` line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oracle;

impl Dialect for Oracle {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn parse(&self, sql: &str) -> PorterResult<Schema> {
        grammar::parse_script(sql, DialectKind::Oracle)
    }

    fn generate(&self, schema: &Schema) -> PorterResult<String> {
        self.write_schema(schema)
    }
}

impl DdlWriter for Oracle {
    fn identity_clause(&self, _column: &Column) -> Option<String> {
        Some("GENERATED BY DEFAULT AS IDENTITY".into())
    }

    fn supports_on_update(&self) -> bool {
        false
    }

    fn create_trigger(&self, trigger: &Trigger) -> String {
        let events: Vec<String> = trigger.events.iter().map(|e| e.to_string()).collect();
        format!(
            "CREATE OR REPLACE TRIGGER {}\n{} {} ON {}{}\n{}\n/",
            self.quote(&trigger.name),
            trigger.timing,
            events.join(" OR "),
            self.quote(&trigger.table),
            if trigger.for_each_row { "\nFOR EACH ROW" } else { "" },
            terminated(&trigger.body)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConstraintKind, Sequence, Table, TriggerEvent, TriggerTiming, View};
    use pretty_assertions::assert_eq;

    const TABLES: &str = r#"
        CREATE TABLE users (
            id NUMBER DEFAULT users_seq.NEXTVAL PRIMARY KEY,
            username VARCHAR2(50) NOT NULL UNIQUE,
            email VARCHAR2(100) NOT NULL,
            password VARCHAR2(255) NOT NULL,
            status VARCHAR2(20) DEFAULT 'active' CHECK (status IN ('active', 'inactive')),
            created_at TIMESTAMP DEFAULT SYSTIMESTAMP,
            updated_at TIMESTAMP DEFAULT SYSTIMESTAMP
        );

        CREATE TABLE posts (
            id NUMBER DEFAULT posts_seq.NEXTVAL PRIMARY KEY,
            user_id NUMBER NOT NULL,
            title VARCHAR2(255) NOT NULL,
            content CLOB,
            status VARCHAR2(20) DEFAULT 'draft' CHECK (status IN ('draft', 'published', 'archived')),
            created_at TIMESTAMP DEFAULT SYSTIMESTAMP,
            updated_at TIMESTAMP DEFAULT SYSTIMESTAMP,
            CONSTRAINT fk_posts_users FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );"#;

    const TRIGGERS: &str = r#"
        CREATE OR REPLACE TRIGGER users_update_timestamp
        BEFORE UPDATE ON users
        FOR EACH ROW
        BEGIN
            :NEW.updated_at := SYSTIMESTAMP;
        END;
        /

        CREATE OR REPLACE TRIGGER posts_update_timestamp
        BEFORE UPDATE ON posts
        FOR EACH ROW
        BEGIN
            :NEW.updated_at := SYSTIMESTAMP;
        END;
        /"#;

    #[test]
    fn test_parse_empty_content() {
        assert!(Oracle.parse("").is_err());
    }

    #[test]
    fn test_parse_tables() {
        let schema = Oracle.parse(TABLES).unwrap();
        assert_eq!(schema.tables.len(), 2);

        let users = &schema.tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.columns.len(), 7);
        assert_eq!(
            users.columns[0].default_value.as_deref(),
            Some("users_seq.NEXTVAL")
        );
        assert!(users.columns[0].primary_key);
        assert_eq!(users.columns[4].default_value.as_deref(), Some("'active'"));

        let posts = &schema.tables[1];
        assert_eq!(posts.name, "posts");
        assert_eq!(posts.columns.len(), 7);

        let fk = posts.foreign_keys().next().expect("foreign key");
        assert_eq!(fk.name.as_deref(), Some("fk_posts_users"));
        assert_eq!(fk.columns, ["user_id"]);
        assert_eq!(fk.ref_table.as_deref(), Some("users"));
        assert_eq!(fk.ref_columns, ["id"]);
        assert_eq!(fk.on_delete.as_deref(), Some("CASCADE"));
        assert_eq!(fk.kind, ConstraintKind::ForeignKey);
    }

    #[test]
    fn test_parse_sequences_and_view() {
        let schema = Oracle
            .parse(
                "CREATE SEQUENCE users_seq START WITH 1 INCREMENT BY 1;
                 CREATE SEQUENCE posts_seq START WITH 1 INCREMENT BY 1;
                 CREATE OR REPLACE VIEW active_users_view AS
                 SELECT u.*, COUNT(p.id) as post_count
                 FROM users u LEFT JOIN posts p ON u.id = p.user_id
                 WHERE u.status = 'active'
                 GROUP BY u.id, u.username;",
            )
            .unwrap();
        let names: Vec<_> = schema.sequences.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["users_seq", "posts_seq"]);
        assert_eq!(schema.views.len(), 1);
        assert_eq!(schema.views[0].name, "active_users_view");
        assert!(schema.views[0].definition.ends_with("GROUP BY u.id, u.username"));
    }

    #[test]
    fn test_parse_triggers() {
        let schema = Oracle.parse(TRIGGERS).unwrap();
        assert_eq!(schema.triggers.len(), 2);
        for (trigger, table) in schema.triggers.iter().zip(["users", "posts"]) {
            assert_eq!(trigger.name, format!("{}_update_timestamp", table));
            assert_eq!(trigger.table, table);
            assert_eq!(trigger.timing, TriggerTiming::Before);
            assert_eq!(trigger.event(), Some(TriggerEvent::Update));
            assert!(trigger.for_each_row);
            assert!(trigger.body.starts_with("BEGIN"));
            assert!(trigger.body.ends_with("END"));
        }
    }

    #[test]
    fn test_generate_full_schema() {
        let mut users = Table::new("users");
        let mut id = Column::new("id", "NUMBER");
        id.default_value = Some("users_seq.NEXTVAL".into());
        id.primary_key = true;
        let mut username = Column::new("username", "VARCHAR2");
        username.length = Some(50);
        username.nullable = false;
        username.unique = true;
        users.columns = vec![id, username];

        let schema = Schema {
            name: "example_db".into(),
            tables: vec![users],
            sequences: vec![Sequence::new("users_seq")],
            views: vec![View {
                name: "active_users_view".into(),
                definition: "SELECT * FROM users WHERE status = 'active'".into(),
                or_replace: false,
            }],
            triggers: Vec::new(),
        };

        let output = Oracle.generate(&schema).unwrap();
        assert!(output.contains("CREATE TABLE users"));
        assert!(output.contains("CREATE SEQUENCE users_seq START WITH 1 INCREMENT BY 1;"));
        assert!(output.contains("CREATE VIEW active_users_view"));
        assert!(output.contains("id NUMBER DEFAULT users_seq.NEXTVAL PRIMARY KEY"));
        assert!(output.contains("username VARCHAR2(50) NOT NULL UNIQUE"));
    }

    #[test]
    fn test_generated_triggers_parse_back() {
        let schema = Oracle.parse(TRIGGERS).unwrap();
        let output = Oracle.generate(&schema).unwrap();
        assert_eq!(output.matches("\n/").count(), 2);
        assert_eq!(Oracle.parse(&output).unwrap().triggers, schema.triggers);
    }
}
