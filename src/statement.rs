//! Per-statement conversion with best-effort fallback.
//!
//! A statement that the transpiler rejects is passed through unchanged so
//! that one bad statement never blocks the rest of a procedure.

use crate::dialect::TARGET_DIALECT;
use crate::transpiler::DialectTranspiler;

use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of converting one statement. Both variants end with `;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "sql", rename_all = "snake_case")]
pub enum ConversionResult {
    Converted(String),
    Unconverted(String),
}

impl ConversionResult {
    pub fn text(&self) -> &str {
        match self {
            ConversionResult::Converted(s) | ConversionResult::Unconverted(s) => s,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionResult::Converted(_))
    }

    pub fn into_text(self) -> String {
        match self {
            ConversionResult::Converted(s) | ConversionResult::Unconverted(s) => s,
        }
    }
}

/// Convert one statement to SingleStore, falling back to the original text.
pub fn convert_statement(
    transpiler: &dyn DialectTranspiler,
    text: &str,
    source_dialect: &str,
) -> ConversionResult {
    let body = strip_terminator(text);
    if body.trim().is_empty() {
        return ConversionResult::Unconverted(";".to_string());
    }

    match transpiler.transpile(body, source_dialect, TARGET_DIALECT) {
        Ok(sql) if !sql.trim().is_empty() => {
            debug!(source = source_dialect, "statement converted");
            ConversionResult::Converted(terminate(strip_terminator(&sql)))
        }
        Ok(_) => {
            warn!(statement = body, "transpiler returned no output; keeping original");
            ConversionResult::Unconverted(terminate(body))
        }
        Err(e) => {
            warn!(statement = body, error = %e, "statement not converted; keeping original");
            ConversionResult::Unconverted(terminate(body))
        }
    }
}

/// Convert every statement of a batch, in order.
pub fn convert_batch(
    transpiler: &dyn DialectTranspiler,
    batch: &[String],
    source_dialect: &str,
) -> Vec<ConversionResult> {
    batch
        .iter()
        .map(|stmt| convert_statement(transpiler, stmt, source_dialect))
        .collect()
}

/// Join converted statements one per line, as embedded in the reassembly request.
pub fn join_converted(results: &[ConversionResult]) -> String {
    results
        .iter()
        .map(ConversionResult::text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_terminator(text: &str) -> &str {
    text.trim().trim_end_matches(';')
}

fn terminate(body: &str) -> String {
    format!("{};", body)
}
