//! Pipeline configuration.

use crate::capability::VoiceParameters;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a dailybrief deployment.
///
/// All fields have defaults, so a config file only needs to name what it
/// overrides. Stage wiring itself is code, not configuration; this covers the
/// knobs an operator actually turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefConfig {
    /// Root directory for the artifact store.
    pub data_root: PathBuf,
    /// Path of the knowledge-index append log. `None` keeps the index
    /// in memory only.
    pub knowledge_log: Option<PathBuf>,
    /// Path of the stage-result ledger. `None` keeps the ledger in memory.
    pub ledger_path: Option<PathBuf>,
    /// Per-stage capability timeout in seconds.
    pub stage_timeout_secs: u64,
    /// Topic handed to the news fetchers.
    pub news_topic: String,
    /// Query handed to the paper fetchers.
    pub paper_query: String,
    /// Query the trend-analysis stage runs against the knowledge index.
    pub trend_query: String,
    /// How many historical entries trend analysis considers.
    pub search_top_k: usize,
    /// Voice settings for audio synthesis.
    pub voice: VoiceParameters,
}

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            knowledge_log: None,
            ledger_path: None,
            stage_timeout_secs: 120,
            news_topic: "artificial intelligence".to_string(),
            paper_query: "machine learning".to_string(),
            trend_query: "AI trends and recurring themes".to_string(),
            search_top_k: 8,
            voice: VoiceParameters::default(),
        }
    }
}

impl BriefConfig {
    /// Loads configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the file cannot be read, does not
    /// parse, or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::new(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            ConfigurationError::new(format!("invalid config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for values no pipeline can run with.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.stage_timeout_secs == 0 {
            return Err(ConfigurationError::new("stage_timeout_secs must be > 0"));
        }
        if self.search_top_k == 0 {
            return Err(ConfigurationError::new("search_top_k must be > 0"));
        }
        if self.news_topic.trim().is_empty() {
            return Err(ConfigurationError::new("news_topic cannot be empty"));
        }
        if self.paper_query.trim().is_empty() {
            return Err(ConfigurationError::new("paper_query cannot be empty"));
        }
        Ok(())
    }

    /// The stage timeout as a [`std::time::Duration`].
    #[must_use]
    pub fn stage_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.stage_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        let config = BriefConfig::default();
        config.validate().unwrap();
        assert_eq!(config.stage_timeout_secs, 120);
        assert_eq!(config.search_top_k, 8);
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brief.json");
        std::fs::write(
            &path,
            r#"{"data_root": "/var/lib/dailybrief", "stage_timeout_secs": 30}"#,
        )
        .unwrap();

        let config = BriefConfig::from_file(&path).unwrap();
        assert_eq!(config.data_root, PathBuf::from("/var/lib/dailybrief"));
        assert_eq!(config.stage_timeout_secs, 30);
        assert_eq!(config.news_topic, "artificial intelligence");
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = BriefConfig {
            stage_timeout_secs: 0,
            ..BriefConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = BriefConfig::from_file("/nonexistent/brief.json").unwrap_err();
        assert!(err.message.contains("cannot read"));
    }
}
