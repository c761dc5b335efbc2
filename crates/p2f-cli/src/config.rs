//! Configuration management for the CLI.
//!
//! [`Config`] mirrors `~/.p2f/config.toml`. [`RunConfig`] is the immutable
//! value a run actually uses: the file config with command-line overrides
//! applied and every path resolved.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use p2f_extractor::ExtractorConfig;
use p2f_pipeline::{PipelineConfig, DEFAULT_CONCURRENCY_LIMIT};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// CLI configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model used for extraction
    pub model: String,

    /// Trading partner file, relative to the config directory
    pub trading_partner_file: PathBuf,

    /// Document type file, relative to the config directory
    pub document_type_file: PathBuf,

    /// Files processed at once
    pub max_concurrent_api_calls: usize,

    /// Timeout for one extraction (seconds)
    pub extraction_timeout_secs: u64,

    /// Largest PDF sent to the model (megabytes)
    pub max_file_size_mb: u64,

    /// Naming rule
    pub rule: RuleConfig,

    /// Own company, never used as the counterparty
    pub my_company: MyCompanyConfig,

    /// API connection
    pub api: ApiConfig,

    /// Output settings
    pub output: OutputSettings,
}

/// Naming rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// File name template
    pub file_name_format: String,

    /// Date format requested from the model
    pub date_format: String,
}

/// Own company names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MyCompanyConfig {
    /// Company name
    pub name: String,

    /// Other spellings
    pub alias: Vec<String>,
}

/// API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL
    pub endpoint: String,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Enable colored output
    pub color: bool,

    /// Default summary format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl OutputFormat {
    /// True if stdout carries output meant for other programs, so notes
    /// and questions belong on stderr.
    pub fn is_machine_readable(self) -> bool {
        !matches!(self, OutputFormat::Table)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: p2f_llm::openai::DEFAULT_MODEL.to_string(),
            trading_partner_file: PathBuf::from("trading_partners.csv"),
            document_type_file: PathBuf::from("document_type.csv"),
            max_concurrent_api_calls: DEFAULT_CONCURRENCY_LIMIT,
            extraction_timeout_secs: 120,
            max_file_size_mb: 32,
            rule: RuleConfig::default(),
            my_company: MyCompanyConfig::default(),
            api: ApiConfig::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            file_name_format: p2f_naming::DEFAULT_TEMPLATE.to_string(),
            date_format: "YYYYMMDD".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: p2f_llm::openai::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".p2f").join("config.toml"))
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            debug!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from `path`, writing defaults there on first run.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        info!("Wrote default configuration to {}", path.display());
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(CliError::Config("model must not be empty".into()));
        }
        if self.max_concurrent_api_calls == 0 {
            return Err(CliError::Config(
                "max_concurrent_api_calls must be greater than 0".into(),
            ));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(CliError::Config(
                "extraction_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.max_file_size_mb == 0 {
            return Err(CliError::Config("max_file_size_mb must be greater than 0".into()));
        }
        if self.api.endpoint.trim().is_empty() {
            return Err(CliError::Config("api.endpoint must not be empty".into()));
        }
        Ok(())
    }
}

/// Settings for one run, after command-line overrides.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Model used for extraction
    pub model: String,

    /// API base URL
    pub endpoint: String,

    /// API key
    pub api_key: String,

    /// Resolved trading partner file
    pub trading_partner_file: PathBuf,

    /// Resolved document type file
    pub document_type_file: PathBuf,

    /// File name template source
    pub file_name_format: String,

    /// File name filter (directory mode)
    pub filter: Option<Regex>,

    /// Skip the confirmation prompts
    pub assume_yes: bool,

    /// Own company name as configured
    pub company_name: String,

    /// Batch settings
    pub pipeline: PipelineConfig,

    /// Extraction settings
    pub extractor: ExtractorConfig,

    /// Summary format
    pub format: OutputFormat,

    /// Colored output
    pub color: bool,
}

impl RunConfig {
    /// Merge `config` (loaded from `config_path`) with the command line.
    ///
    /// Taxonomy files from the config file are relative to its directory;
    /// taxonomy files given on the command line are used as given.
    pub fn resolve(
        config: &Config,
        config_path: &Path,
        cli: &Cli,
        api_key: Option<String>,
    ) -> Result<Self> {
        let mut merged = config.clone();
        if let Some(model) = &cli.model {
            merged.model = model.clone();
        }
        if let Some(limit) = cli.concurrency {
            merged.max_concurrent_api_calls = limit;
        }
        merged.validate()?;

        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| CliError::Config(format!("{} is not set", API_KEY_ENV)))?;

        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let trading_partner_file = cli
            .trading_partner_file
            .clone()
            .unwrap_or_else(|| config_dir.join(&merged.trading_partner_file));
        let document_type_file = cli
            .document_type_file
            .clone()
            .unwrap_or_else(|| config_dir.join(&merged.document_type_file));

        let pipeline = PipelineConfig::default()
            .with_concurrency_limit(merged.max_concurrent_api_calls)
            .with_skip_format_check(cli.skip_format_check);

        let extractor = ExtractorConfig {
            extraction_timeout_secs: merged.extraction_timeout_secs,
            max_file_size_mb: merged.max_file_size_mb,
            date_format: merged.rule.date_format.clone(),
            company_name: merged.my_company.name.clone(),
            company_aliases: merged.my_company.alias.clone(),
            extra_prompt: cli.extra_prompt.clone(),
        };
        extractor.validate().map_err(CliError::Config)?;

        let format = cli.format.map(Into::into).unwrap_or(merged.output.format);
        let color = !cli.no_color && merged.output.color;

        Ok(Self {
            model: merged.model,
            endpoint: merged.api.endpoint,
            api_key,
            trading_partner_file,
            document_type_file,
            file_name_format: merged.rule.file_name_format,
            filter: cli.filter.clone(),
            assume_yes: cli.yes,
            company_name: merged.my_company.name,
            pipeline,
            extractor,
            format,
            color,
        })
    }
}
