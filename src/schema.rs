//! Dialect-neutral schema model.
//!
//! A [`Schema`] is what every dialect parses into and generates from:
//!
//! ```text
//! Schema
//!  ├── tables     Table { columns, constraints }
//!  ├── sequences  Sequence
//!  ├── views      View
//!  └── triggers   Trigger
//! ```
//!
//! Entity order is source order. Expressions (defaults, checks, view queries,
//! trigger bodies) are kept verbatim and never evaluated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root of a parsed DDL script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub sequences: Vec<Sequence>,
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `true` when no entity of any kind is defined.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.sequences.is_empty()
            && self.views.is_empty()
            && self.triggers.is_empty()
    }

    /// Append every entity of `fragment` after the ones already present.
    pub fn append(&mut self, fragment: Schema) {
        self.tables.extend(fragment.tables);
        self.sequences.extend(fragment.sequences);
        self.views.extend(fragment.views);
        self.triggers.extend(fragment.triggers);
    }

    /// Find a table by name (case-insensitive).
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Export schema to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Import schema from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Table definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Find a column by name (case-insensitive).
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn find_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// The table-level primary key constraint, if one was declared.
    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::PrimaryKey)
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.kind == ConstraintKind::ForeignKey)
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Upper-cased type token as written in the source, e.g. `VARCHAR2`.
    pub data_type: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub auto_increment: bool,
    /// Default expression, verbatim.
    #[serde(default)]
    pub default_value: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: String::new(),
            length: None,
            precision: None,
            scale: None,
            nullable: true,
            primary_key: false,
            unique: false,
            auto_increment: false,
            default_value: None,
        }
    }
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    /// The type with its parameters, e.g. `VARCHAR2(50)` or `NUMBER(10,2)`.
    pub fn full_type(&self) -> String {
        match (self.length, self.precision, self.scale) {
            (Some(len), _, _) => format!("{}({})", self.data_type, len),
            (None, Some(p), Some(s)) => format!("{}({},{})", self.data_type, p, s),
            (None, Some(p), None) => format!("{}({})", self.data_type, p),
            _ => self.data_type.clone(),
        }
    }
}

/// Kind of a table constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintKind {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "CHECK")]
    Check,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::ForeignKey => "FOREIGN KEY",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::Check => "CHECK",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table constraint. Column-level `CHECK` and `REFERENCES` clauses are
/// lifted into constraints as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(default)]
    pub name: Option<String>,
    pub kind: ConstraintKind,
    #[serde(default)]
    pub columns: Vec<String>,
    /// Referenced table (`FOREIGN KEY` only).
    #[serde(default)]
    pub ref_table: Option<String>,
    #[serde(default)]
    pub ref_columns: Vec<String>,
    /// e.g. `CASCADE`, `SET NULL`.
    #[serde(default)]
    pub on_delete: Option<String>,
    #[serde(default)]
    pub on_update: Option<String>,
    /// Predicate (`CHECK` only), verbatim.
    #[serde(default)]
    pub expression: Option<String>,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, columns: Vec<String>) -> Self {
        Self {
            name: None,
            kind,
            columns,
            ref_table: None,
            ref_columns: Vec::new(),
            on_delete: None,
            on_update: None,
            expression: None,
        }
    }

    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// Sequence definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    pub start_value: i64,
    pub increment_by: i64,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub cache: Option<i64>,
    #[serde(default)]
    pub cycle: bool,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_value: 1,
            increment_by: 1,
            min_value: None,
            max_value: None,
            cache: None,
            cycle: false,
        }
    }
}

/// View definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    /// Query text after `AS`, verbatim.
    pub definition: String,
    #[serde(default)]
    pub or_replace: bool,
}

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    #[serde(rename = "BEFORE")]
    Before,
    #[serde(rename = "AFTER")]
    After,
    #[serde(rename = "INSTEAD OF")]
    InsteadOf,
}

impl fmt::Display for TriggerTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
        })
    }
}

/// Trigger definition. The body is opaque source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub name: String,
    pub table: String,
    pub timing: TriggerTiming,
    /// Firing events in declaration order; `INSERT OR UPDATE` yields two.
    pub events: Vec<TriggerEvent>,
    #[serde(default)]
    pub for_each_row: bool,
    pub body: String,
}

impl Trigger {
    /// The first declared firing event.
    pub fn event(&self) -> Option<TriggerEvent> {
        self.events.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_type() {
        let mut col = Column::new("username", "VARCHAR2");
        col.length = Some(50);
        assert_eq!(col.full_type(), "VARCHAR2(50)");

        let mut col = Column::new("price", "NUMBER");
        col.precision = Some(10);
        col.scale = Some(2);
        assert_eq!(col.full_type(), "NUMBER(10,2)");

        assert_eq!(Column::new("body", "CLOB").full_type(), "CLOB");
    }

    #[test]
    fn test_append_keeps_order() {
        let mut schema = Schema::new("db");
        schema.tables.push(Table::new("a"));
        let mut fragment = Schema::default();
        fragment.tables.push(Table::new("b"));
        fragment.sequences.push(Sequence::new("s"));
        schema.append(fragment);

        let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(schema.sequences[0].start_value, 1);
        assert!(!schema.is_empty());
    }

    #[test]
    fn test_json_round_trip_uses_sql_names() {
        let mut table = Table::new("posts");
        table.constraints.push(Constraint::new(
            ConstraintKind::ForeignKey,
            vec!["user_id".into()],
        ));
        let mut schema = Schema::new("db");
        schema.tables.push(table);

        let json = schema.to_json().unwrap();
        assert!(json.contains("\"FOREIGN KEY\""));
        assert_eq!(Schema::from_json(&json).unwrap(), schema);
    }
}
