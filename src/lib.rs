//! # s2convert — SQL to SingleStore
//!
//! Converts SQL statements and stored procedures written in any supported
//! dialect into SingleStore SQL.
//!
//! Plain statements go through a deterministic dialect transpiler and are then
//! double-checked by a text completion service. Stored procedures are split
//! into their data-manipulation statements, each statement is transpiled on
//! its own, and the procedure is rebuilt around the converted statements.
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use s2convert::prelude::*;
//!
//! let converter = Converter::from_config(ConverterConfig::default())?;
//! let sql = converter.convert("SELECT TOP 10 * FROM users", "tsql").await?;
//! ```
//!
//! ## Handling classes
//!
//! | Class              | Path                                   |
//! |--------------------|----------------------------------------|
//! | `StoredProcedure`  | decompose, convert each, reassemble    |
//! | `Insert`           | transpile, validate                    |
//! | `Ddl`              | transpile, validate                    |
//! | `Generic`          | transpile, validate                    |

pub mod assistant;
pub mod classifier;
pub mod config;
pub mod dialect;
pub mod error;
pub mod pipeline;
pub mod procedure;
pub mod prompts;
pub mod statement;
pub mod transpiler;

pub mod prelude {
    pub use crate::assistant::{ChatMessage, OllamaClient, Role, TextCompletionService};
    pub use crate::classifier::{classify, HandlingClass, SqlUnit, StatementShape};
    pub use crate::config::{ConverterConfig, ReassemblyStrategy};
    pub use crate::dialect::{DEFAULT_SOURCE_DIALECT, TARGET_DIALECT};
    pub use crate::error::*;
    pub use crate::pipeline::{ConversionReport, ConvertedStatement, Converter};
    pub use crate::statement::{convert_statement, ConversionResult};
    pub use crate::transpiler::{DialectTranspiler, PolyglotTranspiler};
}

/// Convert `sql` to SingleStore with default settings.
///
/// `source_dialect` defaults to `tsql` when `None`.
pub async fn convert_to_target(
    sql: &str,
    source_dialect: Option<&str>,
) -> Result<String, error::ConvertError> {
    let converter = pipeline::Converter::from_config(config::ConverterConfig::default())?;
    let dialect = source_dialect.unwrap_or(dialect::DEFAULT_SOURCE_DIALECT);
    converter.convert(sql, dialect).await
}
