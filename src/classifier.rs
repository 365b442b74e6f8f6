//! Routing of parsed SQL units to a handling class.

use serde::Serialize;
use std::fmt;

/// Shape of a parsed statement, as reported by the transpiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementShape {
    /// `CREATE <kind> ...`, e.g. `TABLE`, `VIEW`, `PROCEDURE`.
    Create { kind: String },
    /// `INSERT INTO ...`
    Insert,
    /// Any other data-definition statement (DROP, ALTER, TRUNCATE).
    Ddl,
    /// Queries, DML other than INSERT, and everything else.
    Other,
}

/// One submitted SQL text after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlUnit {
    pub shape: StatementShape,
    pub text: String,
    pub dialect: String,
}

impl SqlUnit {
    pub fn new(shape: StatementShape, text: impl Into<String>, dialect: impl Into<String>) -> Self {
        Self {
            shape,
            text: text.into(),
            dialect: dialect.into(),
        }
    }
}

/// How the pipeline handles a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingClass {
    StoredProcedure,
    Insert,
    Ddl,
    Generic,
}

impl HandlingClass {
    /// Label used when describing the unit to the assistant.
    pub fn label(&self) -> &'static str {
        match self {
            HandlingClass::StoredProcedure => "stored procedure",
            HandlingClass::Insert => "insert query",
            HandlingClass::Ddl => "DDL query",
            HandlingClass::Generic => "query",
        }
    }
}

impl fmt::Display for HandlingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandlingClass::StoredProcedure => "stored_procedure",
            HandlingClass::Insert => "insert",
            HandlingClass::Ddl => "ddl",
            HandlingClass::Generic => "generic",
        };
        write!(f, "{}", name)
    }
}

/// Assign a handling class. First matching rule wins:
/// procedure creation, then insert, then any other DDL, then generic.
pub fn classify(unit: &SqlUnit) -> HandlingClass {
    match &unit.shape {
        StatementShape::Create { kind } if kind.eq_ignore_ascii_case("PROCEDURE") => {
            HandlingClass::StoredProcedure
        }
        StatementShape::Insert => HandlingClass::Insert,
        StatementShape::Create { .. } | StatementShape::Ddl => HandlingClass::Ddl,
        StatementShape::Other => HandlingClass::Generic,
    }
}

/// Recognize procedure creation in raw statement text.
///
/// Used for statements the transpiler only keeps as an opaque command.
/// Accepts `CREATE [OR ALTER | OR REPLACE] PROC[EDURE]`.
pub fn is_procedure_header(text: &str) -> bool {
    let mut words = text
        .split_whitespace()
        .map(|w| w.to_ascii_uppercase());

    if words.next().as_deref() != Some("CREATE") {
        return false;
    }
    let mut next = words.next();
    if next.as_deref() == Some("OR") {
        match words.next().as_deref() {
            Some("ALTER") | Some("REPLACE") => next = words.next(),
            _ => return false,
        }
    }
    matches!(next.as_deref(), Some("PROC") | Some("PROCEDURE"))
}
