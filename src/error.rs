//! Error types for s2convert.

use thiserror::Error;

/// The main error type for conversion requests.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is empty, cannot be parsed, or names an unknown dialect.
    #[error("Invalid input: {0}. Please provide valid SQL.")]
    InvalidInput(String),

    /// The standalone statement could not be transpiled.
    #[error("Transpile error: {0}")]
    Transpile(#[from] TranspileError),

    /// The assistant failed while extracting statements from a procedure.
    #[error("Statement extraction failed: {0}")]
    ExtractionService(#[source] ServiceError),

    /// The assistant failed while rebuilding a procedure.
    #[error("Procedure reassembly failed: {0}")]
    ReassemblyService(#[source] ServiceError),

    /// The assistant failed while double-checking a standalone statement.
    #[error("Validation failed: {0}")]
    ValidationService(#[source] ServiceError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Create an invalid input error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True when the error came from the text completion service.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::ExtractionService(_) | Self::ReassemblyService(_) | Self::ValidationService(_)
        )
    }
}

/// Failure reported by the deterministic dialect transpiler.
#[derive(Debug, Clone, Error)]
pub enum TranspileError {
    /// The text could not be parsed in the source dialect.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The statement parsed but could not be generated for the target.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The dialect name is not known to the transpiler.
    #[error("Unknown dialect: '{0}'")]
    UnknownDialect(String),

    /// The transpiler produced no statement.
    #[error("No statement found")]
    Empty,
}

/// Failure reported by a text completion service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request could not be delivered or the connection dropped.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service did not answer within the configured timeout.
    #[error("Timed out after {0}s")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("Service returned {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
