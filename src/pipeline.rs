//! Conversion pipeline.
//!
//! ```text
//! parse -> classify -+-> stored procedure: decompose -> convert each -> reassemble
//!                    +-> anything else:    transpile -> validate
//! ```
//!
//! Inside a procedure the transpiler output is authoritative for each
//! statement. For standalone statements the assistant's validation reply is
//! returned as the final answer, even when the transpiler output was already
//! correct.

use crate::assistant::{ChatMessage, OllamaClient, TextCompletionService};
use crate::classifier::{classify, HandlingClass, SqlUnit};
use crate::config::{ConverterConfig, ReassemblyStrategy};
use crate::dialect::{self, TARGET_DIALECT};
use crate::error::{ConvertError, ConvertResult};
use crate::procedure;
use crate::prompts;
use crate::statement::{convert_batch, join_converted, ConversionResult};
use crate::transpiler::{DialectTranspiler, PolyglotTranspiler};

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// One extracted statement and what became of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertedStatement {
    pub original: String,
    pub result: ConversionResult,
}

/// Everything a conversion produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub source_dialect: String,
    pub class: HandlingClass,
    /// Per-statement results, procedure path only.
    pub statements: Vec<ConvertedStatement>,
    pub output: String,
}

impl ConversionReport {
    /// Statements that were passed through unchanged.
    pub fn unconverted(&self) -> impl Iterator<Item = &ConvertedStatement> {
        self.statements.iter().filter(|s| !s.result.is_converted())
    }
}

/// Routes SQL through the deterministic transpiler and the assistant.
///
/// Holds no per-request state; one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Converter {
    transpiler: Arc<dyn DialectTranspiler>,
    assistant: Arc<dyn TextCompletionService>,
    config: ConverterConfig,
}

impl Converter {
    pub fn new(
        transpiler: Arc<dyn DialectTranspiler>,
        assistant: Arc<dyn TextCompletionService>,
        config: ConverterConfig,
    ) -> Self {
        Self {
            transpiler,
            assistant,
            config,
        }
    }

    /// Build a converter backed by `polyglot-sql` and an Ollama endpoint.
    pub fn from_config(config: ConverterConfig) -> ConvertResult<Self> {
        let assistant = OllamaClient::from_config(&config)?;
        Ok(Self::new(
            Arc::new(PolyglotTranspiler::new()),
            Arc::new(assistant),
            config,
        ))
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Dialects accepted as a source.
    pub fn source_dialects(&self) -> Vec<String> {
        self.transpiler.readable_dialects()
    }

    /// Convert using the configured default source dialect.
    pub async fn convert_to_target(&self, sql: &str) -> ConvertResult<String> {
        let dialect = self.config.source_dialect.clone();
        self.convert(sql, &dialect).await
    }

    /// Convert `sql` written in `source_dialect` to SingleStore.
    pub async fn convert(&self, sql: &str, source_dialect: &str) -> ConvertResult<String> {
        self.convert_report(sql, source_dialect)
            .await
            .map(|report| report.output)
    }

    /// Convert and keep the intermediate results.
    pub async fn convert_report(
        &self,
        sql: &str,
        source_dialect: &str,
    ) -> ConvertResult<ConversionReport> {
        let unit = self.parse(sql, source_dialect)?;
        let class = classify(&unit);
        info!(class = %class, dialect = %unit.dialect, "input classified");

        match class {
            HandlingClass::StoredProcedure => self.convert_procedure(&unit).await,
            _ => self.convert_standalone(&unit, class).await,
        }
    }

    /// Parse and classify without converting.
    pub fn classify(&self, sql: &str, source_dialect: &str) -> ConvertResult<HandlingClass> {
        self.parse(sql, source_dialect).map(|unit| classify(&unit))
    }

    /// Deterministic transpile only; no assistant involvement.
    pub fn transpile(&self, sql: &str, source_dialect: &str) -> ConvertResult<String> {
        let unit = self.parse(sql, source_dialect)?;
        Ok(self
            .transpiler
            .transpile(&unit.text, &unit.dialect, TARGET_DIALECT)?)
    }

    fn parse(&self, sql: &str, source_dialect: &str) -> ConvertResult<SqlUnit> {
        if sql.trim().is_empty() {
            return Err(ConvertError::invalid("input is empty"));
        }
        let dialect = dialect::canonical_name(source_dialect).ok_or_else(|| {
            ConvertError::invalid(format!("unknown source dialect '{}'", source_dialect))
        })?;

        self.transpiler
            .parse(sql.trim(), dialect)
            .map_err(|e| ConvertError::invalid(format!("cannot parse as {}: {}", dialect, e)))
    }

    async fn convert_procedure(&self, unit: &SqlUnit) -> ConvertResult<ConversionReport> {
        let batch = procedure::decompose(self.assistant.as_ref(), &unit.text).await?;

        let results = convert_batch(self.transpiler.as_ref(), &batch, &unit.dialect);
        let joined = join_converted(&results);
        info!(
            statements = batch.len(),
            converted = results.iter().filter(|r| r.is_converted()).count(),
            "procedure statements converted"
        );

        let statements: Vec<ConvertedStatement> = batch
            .into_iter()
            .zip(results)
            .map(|(original, result)| ConvertedStatement { original, result })
            .collect();

        let output = match self.config.reassembly {
            ReassemblyStrategy::Assistant => {
                procedure::reassemble(self.assistant.as_ref(), &unit.text, &joined).await?
            }
            ReassemblyStrategy::Delimited => procedure::frame_delimited(&joined),
        };

        Ok(ConversionReport {
            source_dialect: unit.dialect.clone(),
            class: HandlingClass::StoredProcedure,
            statements,
            output,
        })
    }

    async fn convert_standalone(
        &self,
        unit: &SqlUnit,
        class: HandlingClass,
    ) -> ConvertResult<ConversionReport> {
        let transpiled = self
            .transpiler
            .transpile(&unit.text, &unit.dialect, TARGET_DIALECT)?;
        debug!(sql = %transpiled, "transpiled; requesting validation");

        let messages = [
            ChatMessage::system(prompts::TRANSLATION_SYSTEM),
            ChatMessage::user(prompts::validation_prompt(class, &transpiled)),
        ];
        let reply = self
            .assistant
            .complete(&messages)
            .await
            .map_err(ConvertError::ValidationService)?;

        Ok(ConversionReport {
            source_dialect: unit.dialect.clone(),
            class,
            statements: Vec::new(),
            output: reply.trim().to_string(),
        })
    }
}
