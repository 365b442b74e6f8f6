//! Deterministic dialect transpilation.
//!
//! The pipeline only sees the [`DialectTranspiler`] trait. [`PolyglotTranspiler`]
//! is the production implementation, backed by `polyglot-sql`.

use crate::classifier::{is_procedure_header, SqlUnit, StatementShape};
use crate::dialect;
use crate::error::TranspileError;

use polyglot_sql::{DialectType, Expression};

/// A pure SQL-to-SQL translator between named dialects.
pub trait DialectTranspiler: Send + Sync {
    /// Parse `text` in `dialect` and report the shape of its first statement.
    fn parse(&self, text: &str, dialect: &str) -> Result<SqlUnit, TranspileError>;

    /// Translate a single statement from `read` to `write`.
    fn transpile(&self, text: &str, read: &str, write: &str) -> Result<String, TranspileError>;

    /// Dialects that can be used as a source, sorted, target excluded.
    fn readable_dialects(&self) -> Vec<String> {
        dialect::source_dialects()
    }
}

/// Transpiler backed by the `polyglot-sql` dialect engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyglotTranspiler;

impl PolyglotTranspiler {
    pub fn new() -> Self {
        Self
    }

    fn dialect_type(name: &str) -> Result<DialectType, TranspileError> {
        let canonical = dialect::canonical_name(name)
            .ok_or_else(|| TranspileError::UnknownDialect(name.to_string()))?;
        canonical
            .parse::<DialectType>()
            .map_err(|_| TranspileError::UnknownDialect(name.to_string()))
    }
}

impl DialectTranspiler for PolyglotTranspiler {
    fn parse(&self, text: &str, dialect: &str) -> Result<SqlUnit, TranspileError> {
        let read = Self::dialect_type(dialect)?;

        let shape = match polyglot_sql::parse(text, read) {
            Ok(expressions) => {
                let first = expressions.first().ok_or(TranspileError::Empty)?;
                shape_of(first)
            }
            // Procedural bodies are often beyond the statement grammar; the
            // header alone is enough to route them.
            Err(_) if is_procedure_header(text) => StatementShape::Create {
                kind: "PROCEDURE".to_string(),
            },
            Err(e) => return Err(TranspileError::Parse(e.to_string())),
        };

        Ok(SqlUnit::new(shape, text, dialect))
    }

    fn transpile(&self, text: &str, read: &str, write: &str) -> Result<String, TranspileError> {
        let read = Self::dialect_type(read)?;
        let write = Self::dialect_type(write)?;

        let mut statements = polyglot_sql::transpile(text, read, write).map_err(|e| match e {
            polyglot_sql::Error::Unsupported { feature, dialect } => {
                TranspileError::Unsupported(format!("{} in {}", feature, dialect))
            }
            other => TranspileError::Parse(other.to_string()),
        })?;

        if statements.is_empty() {
            return Err(TranspileError::Empty);
        }
        Ok(statements.swap_remove(0))
    }
}

/// Map a parsed expression onto the shapes the classifier understands.
fn shape_of(expr: &Expression) -> StatementShape {
    let create = |kind: &str| StatementShape::Create {
        kind: kind.to_string(),
    };

    match expr {
        Expression::CreateProcedure(_) => create("PROCEDURE"),
        Expression::CreateTable(_) => create("TABLE"),
        Expression::CreateView(_) => create("VIEW"),
        Expression::CreateIndex(_) => create("INDEX"),
        Expression::CreateSchema(_) => create("SCHEMA"),
        Expression::CreateDatabase(_) => create("DATABASE"),
        Expression::CreateFunction(_) => create("FUNCTION"),
        Expression::CreateSequence(_) => create("SEQUENCE"),
        Expression::CreateTrigger(_) => create("TRIGGER"),
        Expression::CreateType(_) => create("TYPE"),
        Expression::Insert(_) => StatementShape::Insert,
        Expression::DropTable(_)
        | Expression::AlterTable(_)
        | Expression::DropIndex(_)
        | Expression::AlterIndex(_)
        | Expression::DropView(_)
        | Expression::AlterView(_)
        | Expression::Truncate(_)
        | Expression::TruncateTable(_)
        | Expression::DropSchema(_)
        | Expression::DropNamespace(_)
        | Expression::DropDatabase(_)
        | Expression::DropFunction(_)
        | Expression::DropProcedure(_)
        | Expression::DropSequence(_)
        | Expression::AlterSequence(_)
        | Expression::DropTrigger(_)
        | Expression::DropType(_) => StatementShape::Ddl,
        Expression::Command(cmd) if is_procedure_header(&cmd.this) => create("PROCEDURE"),
        _ => StatementShape::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_is_other() {
        let unit = PolyglotTranspiler::new()
            .parse("SELECT * FROM t", "tsql")
            .unwrap();
        assert_eq!(unit.shape, StatementShape::Other);
        assert_eq!(unit.dialect, "tsql");
        assert_eq!(unit.text, "SELECT * FROM t");
    }

    #[test]
    fn test_parse_insert() {
        let unit = PolyglotTranspiler::new()
            .parse("INSERT INTO t (a) VALUES (1)", "mysql")
            .unwrap();
        assert_eq!(unit.shape, StatementShape::Insert);
    }

    #[test]
    fn test_parse_create_table() {
        let unit = PolyglotTranspiler::new()
            .parse("CREATE TABLE t (id INT)", "postgres")
            .unwrap();
        assert_eq!(
            unit.shape,
            StatementShape::Create {
                kind: "TABLE".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_dialect() {
        let err = PolyglotTranspiler::new()
            .transpile("SELECT 1", "cobol", "singlestore")
            .unwrap_err();
        assert!(matches!(err, TranspileError::UnknownDialect(ref d) if d == "cobol"));
    }

    #[test]
    fn test_transpile_to_singlestore() {
        let sql = PolyglotTranspiler::new()
            .transpile("SELECT 1", "tsql", "singlestore")
            .unwrap();
        assert!(sql.to_uppercase().starts_with("SELECT"));
    }

    #[test]
    fn test_readable_dialects_exclude_target() {
        let names = PolyglotTranspiler::new().readable_dialects();
        assert!(names.contains(&"tsql".to_string()));
        assert!(!names.contains(&"singlestore".to_string()));
    }
}
