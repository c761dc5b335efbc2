//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Largest PDF sent to the model (megabytes)
    pub max_file_size_mb: u64,

    /// Date format requested from the model (e.g. "YYYYMMDD")
    pub date_format: String,

    /// Own company name, never reported as the counterparty
    pub company_name: String,

    /// Other spellings of the own company name
    pub company_aliases: Vec<String>,

    /// Free text appended to the prompt
    pub extra_prompt: Option<String>,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Size limit in bytes
    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.max_file_size_mb == 0 {
            return Err("max_file_size_mb must be greater than 0".to_string());
        }
        if self.date_format.trim().is_empty() {
            return Err("date_format must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extraction_timeout_secs: 120,
            max_file_size_mb: 32,
            date_format: "YYYYMMDD".to_string(),
            company_name: String::new(),
            company_aliases: Vec::new(),
            extra_prompt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.extraction_timeout(), Duration::from_secs(120));
        assert_eq!(config.max_file_bytes(), 32 * 1024 * 1024);
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ExtractorConfig {
            extraction_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_file_size() {
        let config = ExtractorConfig {
            max_file_size_mb: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_date_format() {
        let config = ExtractorConfig {
            date_format: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            company_name: "Example K.K.".to_string(),
            company_aliases: vec!["Example".to_string()],
            extra_prompt: Some("Dates are in the Japanese era".to_string()),
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("company_name = \"Acme\"").unwrap();
        assert_eq!(parsed.company_name, "Acme");
        assert_eq!(parsed.extraction_timeout_secs, 120);
    }
}
