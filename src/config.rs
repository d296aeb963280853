//! Tunables for the validation pipeline, loadable from TOML.
//!
//! ```toml
//! field_latency_ms = 800
//! submission_latency_ms = 1500
//! min_username_len = 5
//! taken_usernames = ["rahul123", "priya_patel"]
//! taken_emails = ["rahul@example.com"]
//! ```
//!
//! Every key is optional; missing keys fall back to [`ValidationConfig::default`].

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::form::DEFAULT_MIN_USERNAME_LEN;

pub const DEFAULT_FIELD_LATENCY_MS: u64 = 800;
pub const DEFAULT_SUBMISSION_LATENCY_MS: u64 = 1500;

const DEFAULT_TAKEN_USERNAMES: [&str; 5] = [
    "rahul123",
    "priya_patel",
    "amit.kumar",
    "divya99",
    "vikram_sharma",
];
const DEFAULT_TAKEN_EMAILS: [&str; 5] = [
    "rahul@example.com",
    "priya@gmail.com",
    "amit@yahoo.com",
    "divya@outlook.com",
    "vikram@company.in",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Simulated latency of a single field's remote lookup.
    pub field_latency_ms: u64,
    /// Simulated processing time of a whole-form submission.
    pub submission_latency_ms: u64,
    pub min_username_len: usize,
    pub taken_usernames: Vec<String>,
    pub taken_emails: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            field_latency_ms: DEFAULT_FIELD_LATENCY_MS,
            submission_latency_ms: DEFAULT_SUBMISSION_LATENCY_MS,
            min_username_len: DEFAULT_MIN_USERNAME_LEN,
            taken_usernames: DEFAULT_TAKEN_USERNAMES.map(String::from).to_vec(),
            taken_emails: DEFAULT_TAKEN_EMAILS.map(String::from).to_vec(),
        }
    }
}

impl ValidationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_username_len == 0 {
            return Err(ConfigError::Invalid("min_username_len must be at least 1"));
        }
        Ok(())
    }

    pub fn field_latency(&self) -> Duration {
        Duration::from_millis(self.field_latency_ms)
    }

    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.submission_latency_ms)
    }

    /// Same registry, no artificial latency. Handy for tests and batch runs.
    pub fn without_latency(mut self) -> Self {
        self.field_latency_ms = 0;
        self.submission_latency_ms = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ValidationConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, ValidationConfig::default());
        assert_eq!(config.field_latency(), Duration::from_millis(800));
        assert_eq!(config.submission_latency(), Duration::from_millis(1500));
    }

    #[test]
    fn partial_document_overrides_only_named_keys() {
        let config = ValidationConfig::from_toml_str(
            r#"
            field_latency_ms = 10
            taken_usernames = ["alice"]
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.field_latency_ms, 10);
        assert_eq!(config.submission_latency_ms, DEFAULT_SUBMISSION_LATENCY_MS);
        assert_eq!(config.taken_usernames, vec!["alice".to_string()]);
        assert_eq!(config.taken_emails.len(), 5);
    }

    #[test]
    fn rejects_unknown_keys_and_zero_username_length() {
        assert!(matches!(
            ValidationConfig::from_toml_str("latency = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ValidationConfig::from_toml_str("min_username_len = 0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let error = ValidationConfig::load("/definitely/not/here.toml").expect_err("missing");
        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}
