//! MySQL / MariaDB dialect.

use crate::dialect::writer::{terminated, DdlWriter};
use crate::dialect::{grammar, Dialect, DialectKind};
use crate::error::PorterResult;
use crate::schema::{Column, Schema, Sequence, Trigger, TriggerTiming};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn parse(&self, sql: &str) -> PorterResult<Schema> {
        grammar::parse_script(sql, DialectKind::MySql)
    }

    fn generate(&self, schema: &Schema) -> PorterResult<String> {
        self.write_schema(schema)
    }
}

impl DdlWriter for MySql {
    fn quote_ident(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn identity_clause(&self, _column: &Column) -> Option<String> {
        Some("AUTO_INCREMENT".into())
    }

    fn create_sequence(&self, sequence: &Sequence) -> String {
        format!(
            "-- Sequence {} (START WITH {} INCREMENT BY {}) has no MySQL equivalent; use AUTO_INCREMENT.",
            sequence.name, sequence.start_value, sequence.increment_by
        )
    }

    /// One trigger per event; MySQL triggers fire for a single event and
    /// always per row.
    fn create_trigger(&self, trigger: &Trigger) -> String {
        let (timing, note) = match trigger.timing {
            TriggerTiming::InsteadOf => (
                TriggerTiming::Before,
                "-- INSTEAD OF triggers are not supported by MySQL; emitted as BEFORE.\n",
            ),
            other => (other, ""),
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
                    "{}CREATE TRIGGER {} {} {} ON {} FOR EACH ROW\n{}",
                    note,
                    self.quote(&name),
                    timing,
                    event,
                    self.quote(&trigger.table),
                    terminated(&trigger.body)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TriggerEvent;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_mysql_table() {
        let schema = MySql
            .parse(
                "CREATE TABLE `users` (
                    `id` INT UNSIGNED NOT NULL AUTO_INCREMENT,
                    `email` VARCHAR(100) NOT NULL COMMENT 'login',
                    `active` TINYINT(1) DEFAULT 1,
                    `updated` TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
                    PRIMARY KEY (`id`),
                    UNIQUE KEY `uq_email` (`email`),
                    KEY `idx_active` (`active`)
                ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;",
            )
            .unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.columns[0].data_type, "INT UNSIGNED");
        assert!(table.columns[0].auto_increment);
        assert_eq!(table.columns[2].full_type(), "TINYINT(1)");
        assert_eq!(
            table.columns[3].default_value.as_deref(),
            Some("CURRENT_TIMESTAMP")
        );
        assert_eq!(table.constraints.len(), 2);
        assert_eq!(table.primary_key().unwrap().columns, ["id"]);
    }

    #[test]
    fn test_trigger_with_block_body() {
        let schema = MySql
            .parse(
                "CREATE TRIGGER trg BEFORE INSERT ON users FOR EACH ROW
                 BEGIN
                   IF NEW.email IS NULL THEN SET NEW.email = ''; END IF;
                 END;
                 CREATE TABLE t (a INT);",
            )
            .unwrap();
        assert_eq!(schema.triggers.len(), 1);
        assert_eq!(schema.tables.len(), 1);
        assert!(schema.triggers[0].body.contains("END IF;"));
    }

    #[test]
    fn test_generate_splits_multi_event_triggers() {
        let trigger = Trigger {
            name: "audit".into(),
            table: "users".into(),
            timing: TriggerTiming::After,
            events: vec![TriggerEvent::Insert, TriggerEvent::Delete],
            for_each_row: false,
            body: "INSERT INTO log VALUES (1)".into(),
        };
        let sql = MySql.create_trigger(&trigger);
        assert!(sql.contains("CREATE TRIGGER audit_insert AFTER INSERT ON users FOR EACH ROW"));
        assert!(sql.contains("CREATE TRIGGER audit_delete AFTER DELETE ON users FOR EACH ROW"));
    }

    #[test]
    fn test_generate_auto_increment_and_sequence_comment() {
        let mut id = Column::new("id", "INT");
        id.auto_increment = true;
        id.primary_key = true;
        id.nullable = false;
        assert_eq!(MySql.column_def(&id, true), "id INT AUTO_INCREMENT PRIMARY KEY");
        assert!(MySql.create_sequence(&Sequence::new("s")).starts_with("-- "));
        assert_eq!(MySql.quote("order"), "`order`");
    }
}
