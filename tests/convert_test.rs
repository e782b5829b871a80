use pretty_assertions::assert_eq;
use sqlporter::prelude::*;

const ORACLE_SCHEMA: &str = r#"
CREATE SEQUENCE users_seq START WITH 1 INCREMENT BY 1;
CREATE SEQUENCE posts_seq START WITH 1 INCREMENT BY 1;

CREATE TABLE users (
    id NUMBER(10) PRIMARY KEY,
    username VARCHAR2(50) NOT NULL UNIQUE,
    is_admin NUMBER(1) DEFAULT 0,
    avatar BLOB,
    created_at TIMESTAMP DEFAULT SYSTIMESTAMP
);

CREATE TABLE posts (
    id NUMBER(10) PRIMARY KEY,
    user_id NUMBER(10) NOT NULL,
    title VARCHAR2(255) NOT NULL,
    content CLOB,
    CONSTRAINT fk_posts_users FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE OR REPLACE VIEW active_users_view AS
SELECT u.id, u.username FROM users u WHERE u.is_admin = 0;

CREATE OR REPLACE TRIGGER users_touch
BEFORE UPDATE ON users
FOR EACH ROW
BEGIN
    :NEW.created_at := SYSTIMESTAMP;
END;
/
"#;

fn converter() -> Converter {
    Converter::new(
        StreamParserConfig::builder()
            .workers(2)
            .batch_size(64)
            .build(),
    )
}

#[tokio::test]
async fn test_oracle_to_postgres() {
    let ddl = converter()
        .convert_str(ORACLE_SCHEMA, DialectKind::Oracle, DialectKind::Postgres)
        .await
        .unwrap();

    assert!(ddl.contains("CREATE SEQUENCE users_seq START WITH 1 INCREMENT BY 1;"));
    assert!(ddl.contains("CREATE TABLE users (\n    id integer PRIMARY KEY,"));
    assert!(ddl.contains("username varchar(50) NOT NULL UNIQUE"));
    assert!(ddl.contains("is_admin boolean DEFAULT 0"));
    assert!(ddl.contains("avatar bytea"));
    assert!(ddl.contains("content text"));
    assert!(ddl.contains(
        "CONSTRAINT fk_posts_users FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE"
    ));
    assert!(ddl.contains("CREATE OR REPLACE VIEW active_users_view AS"));
    assert!(ddl.contains("CREATE OR REPLACE FUNCTION users_touch_fn() RETURNS trigger AS $$"));
    assert!(ddl.contains("EXECUTE FUNCTION users_touch_fn();"));

    // Order: sequences, tables, views, triggers.
    let seq = ddl.find("CREATE SEQUENCE").unwrap();
    let table = ddl.find("CREATE TABLE").unwrap();
    let view = ddl.find("VIEW active_users_view").unwrap();
    assert!(seq < table && table < view);
}

#[tokio::test]
async fn test_generated_postgres_parses_back() {
    let converter = converter();
    let ddl = converter
        .convert_str(ORACLE_SCHEMA, DialectKind::Oracle, DialectKind::Postgres)
        .await
        .unwrap();
    let schema = sqlporter::parse(&ddl, DialectKind::Postgres).unwrap();

    let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["users", "posts"]);
    assert_eq!(schema.sequences.len(), 2);
    assert_eq!(schema.views.len(), 1);
    assert_eq!(schema.triggers.len(), 1);
    assert_eq!(schema.triggers[0].body, "EXECUTE FUNCTION users_touch_fn()");
}

#[tokio::test]
async fn test_oracle_to_mysql() {
    let ddl = converter()
        .convert_str(ORACLE_SCHEMA, DialectKind::Oracle, DialectKind::MySql)
        .await
        .unwrap();

    assert!(ddl.contains("-- Sequence users_seq"));
    assert!(ddl.contains("username varchar(50) NOT NULL UNIQUE"));
    assert!(ddl.contains("avatar longblob"));
    assert!(ddl.contains("CREATE TRIGGER users_touch BEFORE UPDATE ON users FOR EACH ROW"));
}

#[tokio::test]
async fn test_mysql_to_sqlserver() {
    let mysql = "
        CREATE TABLE `orders` (
            `id` INT NOT NULL AUTO_INCREMENT,
            `total` DECIMAL(10,2) NOT NULL DEFAULT 0,
            `note` TEXT,
            PRIMARY KEY (`id`)
        ) ENGINE=InnoDB;
        # seed data is not schema
        INSERT INTO `orders` (`total`) VALUES (1.5);";
    let ddl = converter()
        .convert_str(mysql, DialectKind::MySql, DialectKind::SqlServer)
        .await
        .unwrap();

    assert!(ddl.contains("CREATE TABLE orders ("));
    assert!(ddl.contains("id int IDENTITY(1,1) NOT NULL"));
    assert!(ddl.contains("total decimal(10,2) DEFAULT 0 NOT NULL"));
    assert!(ddl.contains("PRIMARY KEY (id)"));
}

#[tokio::test]
async fn test_postgres_to_sqlite() {
    let pg = "
        CREATE TABLE notes (
            id BIGSERIAL PRIMARY KEY,
            body TEXT NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE DEFAULT now()
        );";
    let ddl = converter()
        .convert_str(pg, DialectKind::Postgres, DialectKind::Sqlite)
        .await
        .unwrap();
    assert!(ddl.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
    assert!(ddl.contains("body TEXT NOT NULL"));
}

#[tokio::test]
async fn test_same_dialect_round_trip() {
    let ddl = converter()
        .convert_str(ORACLE_SCHEMA, DialectKind::Oracle, DialectKind::Oracle)
        .await
        .unwrap();
    assert!(ddl.contains("id NUMBER(10) PRIMARY KEY"));
    assert!(ddl.contains("CREATE OR REPLACE TRIGGER users_touch"));
    assert!(ddl.trim_end().ends_with('/'));
}

#[tokio::test]
async fn test_empty_script_cannot_be_generated() {
    let err = converter()
        .convert_str("-- nothing here\n", DialectKind::Postgres, DialectKind::MySql)
        .await
        .unwrap_err();
    assert!(matches!(err, PorterError::Generate(_)));
}

#[test]
fn test_parse_empty_text_is_invalid() {
    for kind in DialectKind::ALL {
        let err = sqlporter::parse("   ", kind).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
