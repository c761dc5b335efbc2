//! Configuration for batch runs

use crate::PipelineError;
use serde::{Deserialize, Serialize};

/// Default number of files processed at once
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 3;

/// Configuration for the Batch Scheduler and Item Processor
///
/// # Examples
///
/// ```
/// use p2f_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.concurrency_limit, 3);
/// assert!(!config.skip_format_check);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum extractions in flight
    pub concurrency_limit: usize,

    /// Process files even if their names already follow the template
    #[serde(default)]
    pub skip_format_check: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            skip_format_check: false,
        }
    }
}

impl PipelineConfig {
    /// Set the concurrency limit
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Enable or disable the format-check override
    pub fn with_skip_format_check(mut self, skip: bool) -> Self {
        self.skip_format_check = skip;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.concurrency_limit == 0 {
            return Err(PipelineError::Config(
                "concurrency_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = PipelineConfig::default().with_concurrency_limit(0);
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = PipelineConfig::default()
            .with_concurrency_limit(8)
            .with_skip_format_check(true);
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: PipelineConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_skip_format_check_defaults_to_false() {
        let config: PipelineConfig = serde_json::from_str(r#"{"concurrency_limit": 2}"#).unwrap();
        assert!(!config.skip_format_check);
    }
}
