//! Converter configuration

use crate::dialect::DEFAULT_SOURCE_DIALECT;
use crate::error::ConvertError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "s2convert.toml";

/// How a procedure is rebuilt from its converted statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReassemblyStrategy {
    /// Ask the assistant to rebuild the full procedure.
    #[default]
    Assistant,
    /// Frame the converted statements in DELIMITER markers, no assistant call.
    Delimited,
}

/// Main converter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Assistant model name
    pub model: String,

    /// Base URL of the chat service
    pub endpoint: String,

    /// Dialect assumed when the caller does not name one
    pub source_dialect: String,

    /// Per-call assistant timeout, in seconds
    pub timeout_secs: u64,

    /// Procedure reassembly strategy
    pub reassembly: ReassemblyStrategy,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            source_dialect: DEFAULT_SOURCE_DIALECT.to_string(),
            timeout_secs: 60,
            reassembly: ReassemblyStrategy::Assistant,
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration builder
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: ConverterConfig = toml::from_str(&content).map_err(|e| {
            ConvertError::Config(format!("{}: {}", path.display(), e.message()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `./s2convert.toml`, then the user config file, else defaults.
    pub fn discover() -> Result<Self, ConvertError> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load(local);
        }
        match user_config_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConvertError> {
        if self.timeout_secs == 0 {
            return Err(ConvertError::Config("timeout_secs must be positive".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ConvertError::Config("model must not be empty".into()));
        }
        Ok(())
    }
}

/// `<config dir>/s2convert/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("s2convert").join("config.toml"))
}

/// Builder for ConverterConfig
#[derive(Debug, Default)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    /// Set the assistant model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the chat service URL
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    /// Set the default source dialect
    pub fn source_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.config.source_dialect = dialect.into();
        self
    }

    /// Set the assistant timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Set the reassembly strategy
    pub fn reassembly(mut self, strategy: ReassemblyStrategy) -> Self {
        self.config.reassembly = strategy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ConverterConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.source_dialect, "tsql");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.reassembly, ReassemblyStrategy::Assistant);
    }

    #[test]
    fn test_builder() {
        let config = ConverterConfig::builder()
            .model("codellama")
            .endpoint("http://gpu-box:11434")
            .reassembly(ReassemblyStrategy::Delimited)
            .build();
        assert_eq!(config.model, "codellama");
        assert_eq!(config.endpoint, "http://gpu-box:11434");
        assert_eq!(config.reassembly, ReassemblyStrategy::Delimited);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"mistral\"\nreassembly = \"delimited\"").unwrap();

        let config = ConverterConfig::load(file.path()).unwrap();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.reassembly, ReassemblyStrategy::Delimited);
        assert_eq!(config.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 0").unwrap();

        let err = ConverterConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }
}
