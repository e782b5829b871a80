//! Shared DDL grammar.
//!
//! A script is first cut into statements with the same boundary rules the
//! stream batcher uses, then each statement is tokenized and parsed by a
//! small recursive-descent [`Cursor`]. Only schema-defining statements are
//! modeled:
//!
//! ```text
//! CREATE [OR REPLACE] [GLOBAL TEMPORARY] TABLE [IF NOT EXISTS] name ( ... )
//! CREATE SEQUENCE name [START WITH n] [INCREMENT BY n] [MINVALUE n] ...
//! CREATE [OR REPLACE] VIEW name [(cols)] AS query
//! CREATE [OR REPLACE] TRIGGER name BEFORE|AFTER|INSTEAD OF ev [OR ev] ON t ...
//! ```
//!
//! Everything else that starts with a known SQL verb is skipped.

use tracing::debug;

use crate::dialect::lexer::{self, Token, TokenKind};
use crate::dialect::DialectKind;
use crate::error::{PorterError, PorterResult};
use crate::schema::{
    Column, Constraint, ConstraintKind, Schema, Sequence, Table, Trigger, TriggerEvent,
    TriggerTiming, View,
};
use crate::stream::boundary::{split_statements, BoundaryRules};

/// Statement verbs that are recognised and skipped.
const SKIPPED_VERBS: &[&str] = &[
    "ALTER", "ANALYZE", "ATTACH", "AUDIT", "BEGIN", "CALL", "CHECKPOINT", "CLUSTER", "COMMENT",
    "COMMIT", "COPY", "DEALLOCATE", "DECLARE", "DELETE", "DELIMITER", "DETACH", "DISCARD", "DO",
    "DROP", "END", "EXEC", "EXECUTE", "EXIT", "EXPLAIN", "FLUSH", "GRANT", "IF", "INSERT", "LISTEN",
    "LOAD", "LOCK", "MERGE", "NOAUDIT", "NOTIFY", "OPTIMIZE", "PRAGMA", "PREPARE", "PRINT", "PROMPT",
    "PURGE", "QUIT", "REFRESH", "REINDEX", "RELEASE", "RENAME", "REPLACE", "RESET", "REVOKE",
    "ROLLBACK", "SAVEPOINT", "SELECT", "SET", "SHOW", "SPOOL", "START", "TRUNCATE", "UPDATE", "USE",
    "VACUUM", "WHENEVER", "WITH",
];

/// Words allowed between `CREATE` and the object keyword.
const CREATE_MODIFIERS: &[&str] = &[
    "GLOBAL", "LOCAL", "TEMPORARY", "TEMP", "UNLOGGED", "EDITIONABLE", "NONEDITIONABLE", "FORCE",
    "NOFORCE", "RECURSIVE", "ALGORITHM", "UNDEFINED", "MERGE", "TEMPTABLE", "SQL", "SECURITY",
    "INVOKER", "DEFINER", "OR", "ALTER",
];

/// Types whose parameters are precision and scale rather than a length.
const NUMERIC_TYPES: &[&str] = &[
    "NUMBER", "NUMERIC", "DECIMAL", "DEC", "FLOAT", "DOUBLE", "DOUBLE PRECISION", "REAL",
];

/// Words that end a verbatim `DEFAULT` expression.
const COLUMN_KEYWORDS: &[&str] = &[
    "NOT", "NULL", "PRIMARY", "UNIQUE", "CHECK", "REFERENCES", "CONSTRAINT", "COLLATE", "COMMENT",
    "AUTO_INCREMENT", "AUTOINCREMENT", "IDENTITY", "GENERATED", "ON", "ENABLE", "DISABLE",
];

/// Clauses accepted after the column list of `CREATE TABLE`.
const TABLE_OPTIONS: &[&str] = &[
    // MySQL
    "ENGINE", "TYPE", "DEFAULT", "CHARSET", "CHARACTER", "COLLATE", "AUTO_INCREMENT", "COMMENT",
    "ROW_FORMAT", "KEY_BLOCK_SIZE", "AVG_ROW_LENGTH", "MAX_ROWS", "MIN_ROWS", "PACK_KEYS",
    "CHECKSUM", "DELAY_KEY_WRITE", "STATS_PERSISTENT", "STATS_AUTO_RECALC", "STATS_SAMPLE_PAGES",
    "INSERT_METHOD", "UNION", "DATA", "INDEX", "ENCRYPTION", "COMPRESSION", "PARTITION",
    "PARTITIONS", "SUBPARTITION",
    // Oracle
    "TABLESPACE", "STORAGE", "PCTFREE", "PCTUSED", "INITRANS", "MAXTRANS", "LOGGING", "NOLOGGING",
    "COMPRESS", "NOCOMPRESS", "CACHE", "NOCACHE", "PARALLEL", "NOPARALLEL", "MONITORING",
    "NOMONITORING", "ORGANIZATION", "LOB", "SEGMENT", "ENABLE", "DISABLE", "ROWDEPENDENCIES",
    "NOROWDEPENDENCIES", "RESULT_CACHE", "INMEMORY", "NO", "OVERFLOW", "PCTTHRESHOLD", "CLUSTER",
    // PostgreSQL
    "INHERITS", "WITH", "WITHOUT", "USING", "ON",
    // SQL Server
    "TEXTIMAGE_ON", "FILESTREAM_ON",
    // SQLite
    "STRICT",
];

/// Parse a DDL script written in `kind` into a schema fragment.
pub fn parse_script(sql: &str, kind: DialectKind) -> PorterResult<Schema> {
    if sql.trim().is_empty() {
        return Err(PorterError::invalid("empty DDL text"));
    }

    let mut schema = Schema::default();
    for statement in split_statements(sql, BoundaryRules::for_dialect(kind))? {
        let tokens = lexer::tokenize(statement.text, kind).map_err(|e| match e {
            PorterError::Syntax { offset, message } => {
                PorterError::syntax(statement.offset + offset, message)
            }
            other => other,
        })?;
        if tokens.is_empty() {
            continue;
        }
        let mut cursor = Cursor::new(statement.text, tokens, statement.offset, kind);
        parse_statement(&mut cursor, &mut schema)?;
    }
    Ok(schema)
}

fn parse_statement(cur: &mut Cursor<'_>, schema: &mut Schema) -> PorterResult<()> {
    let verb = cur.peek_keyword();
    match verb.as_str() {
        "CREATE" => parse_create(cur, schema),
        v if SKIPPED_VERBS.contains(&v) => {
            debug!(verb = v, offset = cur.base, "skipping statement");
            Ok(())
        }
        _ => Err(cur.error(format!(
            "unexpected statement starting with '{}'",
            cur.peek().map(|t| t.text).unwrap_or_default()
        ))),
    }
}

fn parse_create(cur: &mut Cursor<'_>, schema: &mut Schema) -> PorterResult<()> {
    cur.expect_word("CREATE")?;
    let mut or_replace = false;
    let mut in_definer = false;

    let object = loop {
        let Some(tok) = cur.peek() else {
            return Err(cur.error("incomplete CREATE statement"));
        };
        let keyword = tok.keyword();
        match keyword.as_str() {
            "TABLE" | "SEQUENCE" | "VIEW" | "TRIGGER" => break keyword.clone(),
            "REPLACE" => or_replace = true,
            "DEFINER" => in_definer = true,
            k if CREATE_MODIFIERS.contains(&k) => {}
            "" => {}
            _ if in_definer => {}
            other => {
                debug!(object = other, offset = cur.base, "skipping CREATE statement");
                return Ok(());
            }
        }
        cur.advance();
    };

    match object.as_str() {
        "TABLE" => {
            if let Some(table) = parse_table(cur)? {
                schema.tables.push(table);
            }
        }
        "SEQUENCE" => schema.sequences.push(parse_sequence(cur)?),
        "VIEW" => schema.views.push(parse_view(cur, or_replace)?),
        _ => schema.triggers.push(parse_trigger(cur)?),
    }
    Ok(())
}

// ============================================================================
// CREATE TABLE
// ============================================================================

fn parse_table(cur: &mut Cursor<'_>) -> PorterResult<Option<Table>> {
    cur.expect_word("TABLE")?;
    cur.eat_words(&["IF", "NOT", "EXISTS"]);
    let name = cur.object_name()?;

    if !cur.eat_punct('(') {
        // CREATE TABLE ... AS SELECT / LIKE / OF type
        debug!(table = %name, "skipping CREATE TABLE without a column list");
        return Ok(None);
    }

    let mut table = Table::new(name);
    loop {
        if is_table_constraint(cur) {
            if let Some(constraint) = parse_table_constraint(cur)? {
                table.constraints.push(constraint);
            }
        } else {
            let offset = cur.offset();
            let (column, lifted) = parse_column(cur)?;
            if table.find_column(&column.name).is_some() {
                return Err(PorterError::syntax(
                    offset,
                    format!("duplicate column '{}' in table '{}'", column.name, table.name),
                ));
            }
            table.columns.push(column);
            table.constraints.extend(lifted);
        }

        if cur.eat_punct(',') {
            continue;
        }
        cur.expect_punct(')')?;
        break;
    }

    if table.columns.is_empty() {
        return Err(cur.error(format!("table '{}' has no columns", table.name)));
    }
    parse_table_options(cur, &table.name)?;
    Ok(Some(table))
}

/// Storage and engine clauses after the column list. They are not modeled,
/// but anything that is not one of them (a missing `;` before the next
/// `CREATE`, stray words) is a syntax error.
fn parse_table_options(cur: &mut Cursor<'_>, table: &str) -> PorterResult<()> {
    while let Some(tok) = cur.peek() {
        // SQLite separates options with commas, MySQL allows `=`.
        if tok.is_punct(',') || tok.is_punct('=') {
            cur.advance();
            continue;
        }
        if !TABLE_OPTIONS.contains(&tok.keyword().as_str()) {
            return Err(cur.error(format!("unexpected text after table '{}'", table)));
        }
        cur.advance();

        // Option arguments run up to the next option keyword.
        while let Some(arg) = cur.peek() {
            if arg.is_word("CREATE") {
                return Err(cur.error(format!("missing ';' after table '{}'", table)));
            }
            if arg.is_punct('(') {
                cur.parenthesized()?;
                continue;
            }
            if arg.is_punct(',') || TABLE_OPTIONS.contains(&arg.keyword().as_str()) {
                break;
            }
            cur.advance();
        }
    }
    Ok(())
}

fn is_table_constraint(cur: &Cursor<'_>) -> bool {
    let Some(tok) = cur.peek() else {
        return false;
    };
    match tok.keyword().as_str() {
        "CONSTRAINT" | "FOREIGN" | "CHECK" => true,
        "FULLTEXT" | "SPATIAL" => cur.dialect == DialectKind::MySql,
        "PRIMARY" => cur.peek_at(1).is_some_and(|t| t.is_word("KEY")),
        "UNIQUE" => true,
        // MySQL inline indexes; elsewhere these are plain column names.
        "KEY" | "INDEX" => cur.dialect == DialectKind::MySql,
        _ => false,
    }
}

fn parse_table_constraint(cur: &mut Cursor<'_>) -> PorterResult<Option<Constraint>> {
    let name = if cur.eat_word("CONSTRAINT") {
        Some(cur.ident()?)
    } else {
        None
    };

    let keyword = cur.peek_keyword();
    let constraint = match keyword.as_str() {
        "PRIMARY" => {
            cur.expect_words(&["PRIMARY", "KEY"])?;
            cur.eat_any(&["CLUSTERED", "NONCLUSTERED"]);
            Constraint::new(ConstraintKind::PrimaryKey, cur.column_list()?)
        }
        "FOREIGN" => {
            cur.expect_words(&["FOREIGN", "KEY"])?;
            if !cur.peek_is_punct('(') {
                cur.ident()?;
            }
            let mut fk = Constraint::new(ConstraintKind::ForeignKey, cur.column_list()?);
            cur.expect_word("REFERENCES")?;
            parse_references(cur, &mut fk)?;
            fk
        }
        "UNIQUE" => {
            cur.advance();
            cur.eat_any(&["KEY", "INDEX"]);
            cur.eat_any(&["CLUSTERED", "NONCLUSTERED"]);
            if !cur.peek_is_punct('(') {
                cur.ident()?;
            }
            Constraint::new(ConstraintKind::Unique, cur.column_list()?)
        }
        "CHECK" => {
            cur.advance();
            let mut check = Constraint::new(ConstraintKind::Check, Vec::new());
            check.expression = Some(cur.parenthesized()?.to_string());
            check
        }
        "KEY" | "INDEX" | "FULLTEXT" | "SPATIAL" => {
            // MySQL inline index definitions are not part of the model.
            cur.skip_element();
            return Ok(None);
        }
        _ => return Err(cur.error("expected a table constraint")),
    };

    // ENABLE, DEFERRABLE, USING INDEX ... are not modeled.
    cur.skip_element();
    Ok(Some(constraint.named(name)))
}

/// `REFERENCES` already consumed.
fn parse_references(cur: &mut Cursor<'_>, fk: &mut Constraint) -> PorterResult<()> {
    fk.ref_table = Some(cur.object_name()?);
    if cur.peek_is_punct('(') {
        fk.ref_columns = cur.column_list()?;
    }
    loop {
        if cur.eat_words(&["ON", "DELETE"]) {
            fk.on_delete = Some(parse_ref_action(cur)?);
        } else if cur.eat_words(&["ON", "UPDATE"]) {
            fk.on_update = Some(parse_ref_action(cur)?);
        } else if cur.eat_word("MATCH") {
            cur.advance();
        } else if cur.eat_word("DEFERRABLE") || cur.eat_words(&["NOT", "DEFERRABLE"]) {
            continue;
        } else if cur.eat_word("INITIALLY") {
            cur.advance();
        } else {
            return Ok(());
        }
    }
}

fn parse_ref_action(cur: &mut Cursor<'_>) -> PorterResult<String> {
    let action = cur.peek_keyword();
    match action.as_str() {
        "CASCADE" | "RESTRICT" => {
            cur.advance();
            Ok(action.clone())
        }
        "NO" => {
            cur.expect_words(&["NO", "ACTION"])?;
            Ok("NO ACTION".into())
        }
        "SET" => {
            cur.advance();
            let target = cur.peek_keyword();
            if target != "NULL" && target != "DEFAULT" {
                return Err(cur.error("expected NULL or DEFAULT after SET"));
            }
            cur.advance();
            Ok(format!("SET {}", target))
        }
        _ => Err(cur.error("expected a referential action")),
    }
}

/// A column definition plus the constraints lifted out of it.
fn parse_column(cur: &mut Cursor<'_>) -> PorterResult<(Column, Vec<Constraint>)> {
    let name = cur.ident()?;
    let mut column = parse_type(cur, name)?;
    let mut lifted = Vec::new();
    let mut constraint_name = None;

    loop {
        let Some(tok) = cur.peek() else {
            break;
        };
        if tok.is_punct(',') || tok.is_punct(')') {
            break;
        }
        match tok.keyword().as_str() {
            "NOT" => {
                cur.expect_words(&["NOT", "NULL"])?;
                column.nullable = false;
            }
            "NULL" => {
                cur.advance();
                column.nullable = true;
            }
            "PRIMARY" => {
                cur.expect_words(&["PRIMARY", "KEY"])?;
                cur.eat_any(&["ASC", "DESC", "CLUSTERED", "NONCLUSTERED"]);
                column.primary_key = true;
                column.nullable = false;
            }
            "UNIQUE" => {
                cur.advance();
                cur.eat_word("KEY");
                column.unique = true;
            }
            "DEFAULT" => {
                cur.advance();
                column.default_value = Some(cur.default_expression()?.to_string());
            }
            "CHECK" => {
                cur.advance();
                let mut check = Constraint::new(ConstraintKind::Check, vec![column.name.clone()]);
                check.expression = Some(cur.parenthesized()?.to_string());
                lifted.push(check.named(constraint_name.take()));
            }
            "REFERENCES" => {
                cur.advance();
                let mut fk = Constraint::new(ConstraintKind::ForeignKey, vec![column.name.clone()]);
                parse_references(cur, &mut fk)?;
                lifted.push(fk.named(constraint_name.take()));
            }
            "CONSTRAINT" => {
                cur.advance();
                constraint_name = Some(cur.ident()?);
            }
            "AUTO_INCREMENT" | "AUTOINCREMENT" => {
                cur.advance();
                column.auto_increment = true;
            }
            "IDENTITY" => {
                cur.advance();
                if cur.peek_is_punct('(') {
                    cur.parenthesized()?;
                }
                column.auto_increment = true;
            }
            "GENERATED" => {
                cur.advance();
                parse_generated(cur, &mut column)?;
            }
            "ON" => {
                // MySQL `ON UPDATE CURRENT_TIMESTAMP`
                cur.expect_words(&["ON", "UPDATE"])?;
                cur.advance();
                if cur.peek_is_punct('(') {
                    cur.parenthesized()?;
                }
            }
            "COLLATE" | "COMMENT" | "CHARSET" => {
                cur.advance();
                cur.advance();
            }
            "CHARACTER" => {
                cur.expect_words(&["CHARACTER", "SET"])?;
                cur.advance();
            }
            _ => {
                // Storage and enforcement clauses (ENABLE, SORT, SPARSE, ...).
                cur.advance();
                if cur.peek_is_punct('(') {
                    cur.parenthesized()?;
                }
            }
        }
    }

    Ok((column, lifted))
}

/// `GENERATED [ALWAYS | BY DEFAULT [ON NULL]] AS IDENTITY [(...)]`, or a
/// computed column `GENERATED ALWAYS AS (expr) [STORED | VIRTUAL]`.
fn parse_generated(cur: &mut Cursor<'_>, column: &mut Column) -> PorterResult<()> {
    if !cur.eat_word("ALWAYS") && cur.eat_words(&["BY", "DEFAULT"]) {
        cur.eat_words(&["ON", "NULL"]);
    }
    cur.expect_word("AS")?;
    if cur.eat_word("IDENTITY") {
        column.auto_increment = true;
        if cur.peek_is_punct('(') {
            cur.parenthesized()?;
        }
    } else {
        cur.parenthesized()?;
        cur.eat_any(&["STORED", "VIRTUAL"]);
    }
    Ok(())
}

/// Data type with parameters. Returns a column carrying only type information.
fn parse_type(cur: &mut Cursor<'_>, name: String) -> PorterResult<Column> {
    let first = cur.peek().filter(|t| t.kind == TokenKind::Word);
    let Some(first) = first else {
        return Err(cur.error(format!("expected a data type for column '{}'", name)));
    };
    let mut words = vec![first.keyword()];
    cur.advance();

    loop {
        let last = words.last().map(String::as_str).unwrap_or_default();
        let next = cur.peek_keyword();
        let continues = matches!(
            (last, next.as_str()),
            ("DOUBLE", "PRECISION")
                | ("CHARACTER" | "CHAR" | "BIT" | "NCHAR", "VARYING")
                | ("NATIONAL", "CHARACTER" | "CHAR")
                | ("LONG", "RAW" | "VARCHAR")
        );
        if !continues {
            break;
        }
        words.push(next);
        cur.advance();
    }

    let mut column = Column::new(name, words.join(" "));

    if words[0] == "INTERVAL" {
        // INTERVAL DAY(2) TO SECOND(6)
        while let Some(tok) = cur.peek() {
            let keyword = tok.keyword();
            if matches!(
                keyword.as_str(),
                "YEAR" | "MONTH" | "DAY" | "HOUR" | "MINUTE" | "SECOND" | "TO"
            ) {
                words.push(keyword);
                cur.advance();
            } else if tok.is_punct('(') {
                cur.parenthesized()?;
            } else {
                break;
            }
        }
        column.data_type = words.join(" ");
        return Ok(column);
    }

    if cur.peek_is_punct('(') {
        let params = cur.parenthesized()?;
        apply_type_params(&mut column, params);
    }

    if cur.peek().is_some_and(|t| t.is_word("WITH") || t.is_word("WITHOUT"))
        && column.data_type.starts_with("TIME")
    {
        let mut zone = vec![cur.peek_keyword()];
        cur.advance();
        if cur.eat_word("LOCAL") {
            zone.push("LOCAL".into());
        }
        cur.expect_words(&["TIME", "ZONE"])?;
        zone.push("TIME ZONE".into());
        column.data_type = format!("{} {}", column.data_type, zone.join(" "));
        // `TIMESTAMP(6) WITH TIME ZONE` cannot be rendered from the split form.
        column.length = None;
    }

    while let Some(modifier) = cur.eat_any(&["UNSIGNED", "SIGNED", "ZEROFILL"]) {
        if modifier != "SIGNED" {
            column.data_type = format!("{} {}", column.data_type, modifier);
        }
    }

    // Postgres arrays
    while cur.peek_is_punct('[') {
        cur.advance();
        if cur.peek().is_some_and(|t| t.kind == TokenKind::Number) {
            cur.advance();
        }
        cur.expect_punct(']')?;
        column.data_type.push_str("[]");
    }

    match column.data_type.as_str() {
        "SERIAL" | "SERIAL4" => normalize_serial(&mut column, "INTEGER"),
        "BIGSERIAL" | "SERIAL8" => normalize_serial(&mut column, "BIGINT"),
        "SMALLSERIAL" | "SERIAL2" => normalize_serial(&mut column, "SMALLINT"),
        _ => {}
    }

    Ok(column)
}

fn normalize_serial(column: &mut Column, data_type: &str) {
    column.data_type = data_type.to_string();
    column.auto_increment = true;
    column.nullable = false;
}

/// `(10)`, `(10,2)`, `(50 CHAR)`; anything else (`MAX`, `'a','b'`) stays
/// part of the type text.
fn apply_type_params(column: &mut Column, params: &str) {
    let parsed: Option<Vec<u32>> = params
        .split(',')
        .map(|p| {
            let mut parts = p.split_whitespace();
            let number = parts.next()?.parse::<u32>().ok()?;
            match parts.next() {
                None => Some(number),
                Some(unit) if unit.eq_ignore_ascii_case("BYTE") || unit.eq_ignore_ascii_case("CHAR") => {
                    Some(number)
                }
                Some(_) => None,
            }
        })
        .collect();

    let numeric = NUMERIC_TYPES.contains(&column.data_type.as_str());
    match parsed.as_deref() {
        Some([n]) if numeric => column.precision = Some(*n),
        Some([n]) => column.length = Some(*n),
        Some([p, s]) if numeric => {
            column.precision = Some(*p);
            column.scale = Some(*s);
        }
        _ => column.data_type = format!("{}({})", column.data_type, params.trim()),
    }
}

// ============================================================================
// CREATE SEQUENCE
// ============================================================================

fn parse_sequence(cur: &mut Cursor<'_>) -> PorterResult<Sequence> {
    cur.expect_word("SEQUENCE")?;
    cur.eat_words(&["IF", "NOT", "EXISTS"]);
    let mut sequence = Sequence::new(cur.object_name()?);

    while let Some(tok) = cur.peek() {
        match tok.keyword().as_str() {
            "START" => {
                cur.advance();
                cur.eat_word("WITH");
                sequence.start_value = cur.signed_number()?;
            }
            "INCREMENT" => {
                cur.advance();
                cur.eat_word("BY");
                sequence.increment_by = cur.signed_number()?;
            }
            "MINVALUE" => {
                cur.advance();
                sequence.min_value = Some(cur.signed_number()?);
            }
            "MAXVALUE" => {
                cur.advance();
                sequence.max_value = Some(cur.signed_number()?);
            }
            "CACHE" => {
                cur.advance();
                sequence.cache = Some(cur.signed_number()?);
            }
            "CYCLE" => {
                cur.advance();
                sequence.cycle = true;
            }
            "NOCYCLE" => {
                cur.advance();
                sequence.cycle = false;
            }
            "NO" => {
                // NO MINVALUE / NO MAXVALUE / NO CYCLE / NO CACHE
                cur.advance();
                cur.advance();
            }
            "AS" => {
                cur.advance();
                cur.advance();
            }
            "OWNED" => {
                cur.expect_words(&["OWNED", "BY"])?;
                cur.object_name()?;
            }
            _ => {
                // NOCACHE, ORDER, NOORDER, KEEP, SCALE ...
                cur.advance();
            }
        }
    }
    Ok(sequence)
}

// ============================================================================
// CREATE VIEW
// ============================================================================

fn parse_view(cur: &mut Cursor<'_>, or_replace: bool) -> PorterResult<View> {
    cur.expect_word("VIEW")?;
    cur.eat_words(&["IF", "NOT", "EXISTS"]);
    let name = cur.object_name()?;
    if cur.peek_is_punct('(') {
        cur.parenthesized()?;
    }
    // WITH SCHEMABINDING and similar options sit before AS.
    while !cur.eat_word("AS") {
        if cur.at_end() {
            return Err(cur.error(format!("expected AS in view '{}'", name)));
        }
        cur.advance();
    }
    let definition = cur.rest();
    if definition.is_empty() {
        return Err(cur.error(format!("view '{}' has no query", name)));
    }
    Ok(View {
        name,
        definition: definition.to_string(),
        or_replace,
    })
}

// ============================================================================
// CREATE TRIGGER
// ============================================================================

fn parse_trigger(cur: &mut Cursor<'_>) -> PorterResult<Trigger> {
    cur.expect_word("TRIGGER")?;
    cur.eat_words(&["IF", "NOT", "EXISTS"]);
    let name = cur.object_name()?;

    if cur.eat_word("ON") {
        // SQL Server: ON table {FOR | AFTER | INSTEAD OF} events AS body
        let table = cur.object_name()?;
        while cur.eat_word("WITH") {
            cur.advance();
        }
        let timing = parse_timing(cur)?;
        let events = parse_events(cur)?;
        cur.eat_words(&["NOT", "FOR", "REPLICATION"]);
        cur.expect_word("AS")?;
        let body = trigger_body(cur, &name)?;
        return Ok(Trigger {
            name,
            table,
            timing,
            events,
            for_each_row: false,
            body,
        });
    }

    let timing = parse_timing(cur)?;
    let events = parse_events(cur)?;
    cur.expect_word("ON")?;
    let table = cur.object_name()?;

    let mut for_each_row = false;
    loop {
        if cur.eat_words(&["FOR", "EACH", "ROW"]) {
            for_each_row = true;
        } else if cur.eat_words(&["FOR", "EACH", "STATEMENT"]) {
            for_each_row = false;
        } else if cur.eat_word("REFERENCING") {
            // REFERENCING OLD AS o NEW AS n
            while cur.eat_any(&["OLD", "NEW", "PARENT"]).is_some() {
                cur.eat_any(&["ROW", "TABLE"]);
                cur.eat_word("AS");
                cur.ident()?;
            }
        } else if cur.eat_any(&["FOLLOWS", "PRECEDES"]).is_some() {
            cur.object_name()?;
        } else if cur.eat_any(&["ENABLE", "DISABLE"]).is_none() {
            break;
        }
    }

    let body = trigger_body(cur, &name)?;
    Ok(Trigger {
        name,
        table,
        timing,
        events,
        for_each_row,
        body,
    })
}

fn trigger_body(cur: &mut Cursor<'_>, name: &str) -> PorterResult<String> {
    let body = cur.rest();
    if body.is_empty() {
        return Err(cur.error(format!("trigger '{}' has no body", name)));
    }
    Ok(body.to_string())
}

fn parse_timing(cur: &mut Cursor<'_>) -> PorterResult<TriggerTiming> {
    let keyword = cur.peek_keyword();
    let timing = match keyword.as_str() {
        "BEFORE" => TriggerTiming::Before,
        "AFTER" | "FOR" => TriggerTiming::After,
        "INSTEAD" => {
            cur.expect_words(&["INSTEAD", "OF"])?;
            return Ok(TriggerTiming::InsteadOf);
        }
        _ => return Err(cur.error("expected BEFORE, AFTER or INSTEAD OF")),
    };
    cur.advance();
    Ok(timing)
}

fn parse_events(cur: &mut Cursor<'_>) -> PorterResult<Vec<TriggerEvent>> {
    let mut events = vec![parse_event(cur)?];
    while cur.eat_word("OR") || cur.eat_punct(',') {
        events.push(parse_event(cur)?);
    }
    Ok(events)
}

fn parse_event(cur: &mut Cursor<'_>) -> PorterResult<TriggerEvent> {
    let event = match cur.peek_keyword().as_str() {
        "INSERT" => TriggerEvent::Insert,
        "UPDATE" => TriggerEvent::Update,
        "DELETE" => TriggerEvent::Delete,
        _ => return Err(cur.error("expected INSERT, UPDATE or DELETE")),
    };
    cur.advance();
    if event == TriggerEvent::Update && cur.eat_word("OF") {
        // `UPDATE OF a, b`; a `,` before another event separates events.
        cur.ident()?;
        while cur.peek_is_punct(',')
            && !cur.peek_at(1).is_some_and(|t| {
                t.is_word("INSERT") || t.is_word("UPDATE") || t.is_word("DELETE")
            })
        {
            cur.advance();
            cur.ident()?;
        }
    }
    Ok(event)
}

// ============================================================================
// Cursor
// ============================================================================

/// Token cursor over one statement.
struct Cursor<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    /// Offset of `text` in the whole script, for error reporting.
    base: usize,
    dialect: DialectKind,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, tokens: Vec<Token<'a>>, base: usize, dialect: DialectKind) -> Self {
        Self {
            text,
            tokens,
            pos: 0,
            base,
            dialect,
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, n: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + n).copied()
    }

    fn peek_keyword(&self) -> String {
        self.peek().map(|t| t.keyword()).unwrap_or_default()
    }

    fn peek_is_punct(&self, c: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(c))
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Script offset of the current token (or the end of the statement).
    fn offset(&self) -> usize {
        self.base + self.peek().map(|t| t.offset).unwrap_or(self.text.len())
    }

    fn error(&self, message: impl Into<String>) -> PorterError {
        let message = message.into();
        match self.peek() {
            Some(tok) => PorterError::syntax(self.offset(), format!("{} near '{}'", message, tok.text)),
            None => PorterError::syntax(self.offset(), format!("{} at end of statement", message)),
        }
    }

    fn eat_word(&mut self, keyword: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_word(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the whole keyword sequence or nothing.
    fn eat_words(&mut self, keywords: &[&str]) -> bool {
        let matched = keywords
            .iter()
            .enumerate()
            .all(|(i, k)| self.peek_at(i).is_some_and(|t| t.is_word(k)));
        if matched {
            self.pos += keywords.len();
        }
        matched
    }

    /// Consume one of `keywords`, returning it upper-cased.
    fn eat_any(&mut self, keywords: &[&str]) -> Option<String> {
        let keyword = self.peek_keyword();
        if keywords.contains(&keyword.as_str()) {
            self.pos += 1;
            Some(keyword)
        } else {
            None
        }
    }

    fn expect_word(&mut self, keyword: &str) -> PorterResult<()> {
        if self.eat_word(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", keyword)))
        }
    }

    fn expect_words(&mut self, keywords: &[&str]) -> PorterResult<()> {
        if self.eat_words(keywords) {
            Ok(())
        } else {
            Err(self.error(format!("expected {}", keywords.join(" "))))
        }
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek_is_punct(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, c: char) -> PorterResult<()> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    fn ident(&mut self) -> PorterResult<String> {
        match self.peek().and_then(|t| t.ident()) {
            Some(ident) => {
                self.pos += 1;
                Ok(ident)
            }
            None => Err(self.error("expected an identifier")),
        }
    }

    /// Possibly schema-qualified name; only the last segment is kept.
    fn object_name(&mut self) -> PorterResult<String> {
        let mut name = self.ident()?;
        while self.peek_is_punct('.') {
            self.advance();
            name = self.ident()?;
        }
        Ok(name)
    }

    /// `(a, b DESC, c(10))` as plain column names.
    fn column_list(&mut self) -> PorterResult<Vec<String>> {
        self.expect_punct('(')?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.ident()?);
            if self.peek_is_punct('(') {
                self.parenthesized()?;
            }
            self.eat_any(&["ASC", "DESC"]);
            if self.eat_punct(',') {
                continue;
            }
            self.expect_punct(')')?;
            return Ok(columns);
        }
    }

    /// Consume a balanced `( ... )` group and return its inner text verbatim.
    fn parenthesized(&mut self) -> PorterResult<&'a str> {
        let open = match self.peek() {
            Some(tok) if tok.is_punct('(') => tok,
            _ => return Err(self.error("expected '('")),
        };
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            self.pos += 1;
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                depth -= 1;
                if depth == 0 {
                    return Ok(self.text[open.end()..tok.offset].trim());
                }
            }
        }
        Err(PorterError::syntax(
            self.base + open.offset,
            "unbalanced parenthesis",
        ))
    }

    /// Verbatim `DEFAULT` expression, up to the next column keyword or the
    /// end of the column definition.
    fn default_expression(&mut self) -> PorterResult<&'a str> {
        let Some(first) = self.peek() else {
            return Err(self.error("expected a default value"));
        };
        let start = first.offset;
        let mut end = first.end();
        let mut depth = 0usize;
        let mut consumed = 0usize;

        while let Some(tok) = self.peek() {
            if depth == 0 {
                if tok.is_punct(',') || tok.is_punct(')') {
                    break;
                }
                if consumed > 0 && COLUMN_KEYWORDS.contains(&tok.keyword().as_str()) {
                    break;
                }
            }
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                depth -= 1;
            }
            end = tok.end();
            consumed += 1;
            self.pos += 1;
        }

        if consumed == 0 {
            return Err(self.error("expected a default value"));
        }
        Ok(&self.text[start..end])
    }

    /// Skip to the `,` or `)` that ends the current table element.
    fn skip_element(&mut self) {
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if depth == 0 && (tok.is_punct(',') || tok.is_punct(')')) {
                return;
            }
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                depth -= 1;
            }
            self.pos += 1;
        }
    }

    /// Integer literal with optional sign, clamped to `i64`.
    fn signed_number(&mut self) -> PorterResult<i64> {
        let negative = if self.eat_punct('-') {
            true
        } else {
            self.eat_punct('+');
            false
        };
        let Some(tok) = self.peek().filter(|t| t.kind == TokenKind::Number) else {
            return Err(self.error("expected a number"));
        };
        // `1.5`, or `1e3` where the exponent lexes as an adjacent word.
        let exponent = self
            .peek_at(1)
            .is_some_and(|t| t.kind == TokenKind::Word && t.offset == tok.end());
        if tok.text.contains('.') || exponent {
            return Err(self.error("expected an integer"));
        }
        self.pos += 1;

        let value = match tok.text.parse::<i128>() {
            Ok(v) if negative => -v,
            Ok(v) => v,
            // Only a digit string longer than i128 gets here: saturate.
            Err(_) if negative => i128::MIN,
            Err(_) => i128::MAX,
        };
        Ok(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Remaining statement text, verbatim.
    fn rest(&mut self) -> &'a str {
        let Some(tok) = self.peek() else {
            return "";
        };
        self.pos = self.tokens.len();
        self.text[tok.offset..].trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(sql: &str) -> Schema {
        parse_script(sql, DialectKind::Postgres).unwrap()
    }

    #[test]
    fn test_table_options_are_accepted() {
        let mysql = parse_script(
            "CREATE TABLE a (x INT) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='t' PARTITION BY HASH(x) PARTITIONS 4;",
            DialectKind::MySql,
        )
        .unwrap();
        assert_eq!(mysql.tables.len(), 1);

        let sqlite = parse_script("CREATE TABLE a (x INT PRIMARY KEY) WITHOUT ROWID, STRICT;", DialectKind::Sqlite).unwrap();
        assert_eq!(sqlite.tables.len(), 1);

        let oracle = parse_script(
            "CREATE TABLE a (x NUMBER) TABLESPACE users PCTFREE 10 STORAGE (INITIAL 64K) NOLOGGING;",
            DialectKind::Oracle,
        )
        .unwrap();
        assert_eq!(oracle.tables.len(), 1);

        let mssql = parse_script("CREATE TABLE a (x INT) ON [PRIMARY] TEXTIMAGE_ON [PRIMARY]", DialectKind::SqlServer).unwrap();
        assert_eq!(mssql.tables.len(), 1);
    }

    #[test]
    fn test_missing_terminator_between_tables_is_rejected() {
        let err = parse_script("CREATE TABLE a (x INT) CREATE TABLE b (y INT);", DialectKind::Sqlite).unwrap_err();
        assert!(matches!(err, PorterError::Syntax { offset: 23, .. }), "{err:?}");

        let err = parse_script("CREATE TABLE a (x INT) ENGINE=InnoDB CREATE TABLE b (y INT);", DialectKind::MySql).unwrap_err();
        assert!(matches!(err, PorterError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn test_unknown_text_after_table_is_rejected() {
        let err = parse_script("CREATE TABLE a (x INT) bogus;", DialectKind::Postgres).unwrap_err();
        assert!(err.to_string().contains("unexpected text after table 'a'"), "{err}");
    }

    #[test]
    fn test_sequence_values_must_be_integers() {
        for sql in [
            "CREATE SEQUENCE s START WITH .5;",
            "CREATE SEQUENCE s START WITH 1.5;",
            "CREATE SEQUENCE s INCREMENT BY 1e3;",
        ] {
            let err = parse_script(sql, DialectKind::Postgres).unwrap_err();
            assert!(matches!(err, PorterError::Syntax { .. }), "{sql}: {err:?}");
        }

        let huge = parse("CREATE SEQUENCE s MAXVALUE 99999999999999999999999999999999999999999999;");
        assert_eq!(huge.sequences[0].max_value, Some(i64::MAX));
    }

    #[test]
    fn test_table_with_constraints() {
        let schema = parse(
            "CREATE TABLE IF NOT EXISTS public.posts (
                id SERIAL PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title VARCHAR(200) NOT NULL,
                price NUMERIC(10,2) DEFAULT 0.00 CHECK (price >= 0),
                created_at TIMESTAMP(6) WITH TIME ZONE DEFAULT now(),
                CONSTRAINT uq_title UNIQUE (title)
            );",
        );
        let table = &schema.tables[0];
        assert_eq!(table.name, "posts");
        assert_eq!(table.columns.len(), 5);

        let id = &table.columns[0];
        assert_eq!(id.data_type, "INTEGER");
        assert!(id.auto_increment && id.primary_key && !id.nullable);

        let title = table.find_column("title").unwrap();
        assert_eq!(title.full_type(), "VARCHAR(200)");

        let price = table.find_column("price").unwrap();
        assert_eq!((price.precision, price.scale), (Some(10), Some(2)));
        assert_eq!(price.default_value.as_deref(), Some("0.00"));

        let created = table.find_column("created_at").unwrap();
        assert_eq!(created.full_type(), "TIMESTAMP WITH TIME ZONE");
        assert_eq!(created.default_value.as_deref(), Some("now()"));

        let kinds: Vec<_> = table.constraints.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            [ConstraintKind::ForeignKey, ConstraintKind::Check, ConstraintKind::Unique]
        );
        let fk = table.foreign_keys().next().unwrap();
        assert_eq!(fk.ref_table.as_deref(), Some("users"));
        assert_eq!(fk.on_delete.as_deref(), Some("CASCADE"));
        assert_eq!(table.constraints[1].expression.as_deref(), Some("price >= 0"));
        assert_eq!(table.constraints[2].name.as_deref(), Some("uq_title"));
    }

    #[test]
    fn test_non_numeric_type_params_stay_in_type() {
        let schema = parse_script(
            "CREATE TABLE t (a NVARCHAR(MAX) NULL, b VARCHAR2(50 CHAR) DEFAULT NULL)",
            DialectKind::SqlServer,
        )
        .unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.columns[0].data_type, "NVARCHAR(MAX)");
        assert_eq!(table.columns[0].length, None);
        assert_eq!(table.columns[1].length, Some(50));
        assert_eq!(table.columns[1].default_value.as_deref(), Some("NULL"));
    }

    #[test]
    fn test_duplicate_column_is_rejected() {
        let err = parse_script("CREATE TABLE t (a INT, A INT)", DialectKind::MySql).unwrap_err();
        assert!(matches!(err, PorterError::Syntax { .. }));
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn test_sequence_options() {
        let schema = parse(
            "CREATE SEQUENCE s START WITH 100 INCREMENT BY -2 MINVALUE 1 \
             MAXVALUE 99999999999999999999999999 CACHE 20 CYCLE;",
        );
        let seq = &schema.sequences[0];
        assert_eq!(seq.start_value, 100);
        assert_eq!(seq.increment_by, -2);
        assert_eq!(seq.min_value, Some(1));
        assert_eq!(seq.max_value, Some(i64::MAX));
        assert_eq!(seq.cache, Some(20));
        assert!(seq.cycle);
    }

    #[test]
    fn test_view_keeps_query_verbatim() {
        let schema = parse("CREATE OR REPLACE VIEW v (a) AS SELECT a FROM t WHERE b = 'x;y';");
        assert_eq!(schema.views[0].definition, "SELECT a FROM t WHERE b = 'x;y'");
        assert!(schema.views[0].or_replace);
    }

    #[test]
    fn test_trigger_shapes() {
        let pg = parse(
            "CREATE TRIGGER trg BEFORE INSERT OR UPDATE ON users FOR EACH ROW EXECUTE FUNCTION touch();",
        );
        let trg = &pg.triggers[0];
        assert_eq!(trg.events, [TriggerEvent::Insert, TriggerEvent::Update]);
        assert!(trg.for_each_row);
        assert_eq!(trg.body, "EXECUTE FUNCTION touch()");

        let mssql = parse_script(
            "CREATE TRIGGER trg ON dbo.users AFTER INSERT, DELETE AS BEGIN SET NOCOUNT ON; END\nGO\n",
            DialectKind::SqlServer,
        )
        .unwrap();
        let trg = &mssql.triggers[0];
        assert_eq!(trg.table, "users");
        assert_eq!(trg.timing, TriggerTiming::After);
        assert_eq!(trg.events, [TriggerEvent::Insert, TriggerEvent::Delete]);
        assert_eq!(trg.body, "BEGIN SET NOCOUNT ON; END");
    }

    #[test]
    fn test_other_statements_are_skipped() {
        let schema = parse(
            "INSERT INTO t VALUES (1); CREATE INDEX i ON t (a); ALTER TABLE t ADD b INT; \
             CREATE TABLE t2 (a INT);",
        );
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].name, "t2");
    }

    #[test]
    fn test_unknown_statement_is_syntax_error() {
        let err = parse_script("CREATE TABLE a (x INT);\nFROBNICATE everything;", DialectKind::Postgres)
            .unwrap_err();
        match err {
            PorterError::Syntax { offset, .. } => assert_eq!(offset, 24),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_text_is_invalid() {
        assert!(matches!(
            parse_script("  \n ", DialectKind::Oracle),
            Err(PorterError::InvalidInput(_))
        ));
    }
}
