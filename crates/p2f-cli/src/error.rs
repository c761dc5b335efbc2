//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid file name template
    #[error("Invalid file name format: {0}")]
    Template(#[from] p2f_naming::TemplateError),

    /// Taxonomy files could not be loaded
    #[error("Taxonomy error: {0}")]
    Taxonomy(#[from] p2f_taxonomy::TaxonomyError),

    /// Batch could not run
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] p2f_pipeline::PipelineError),

    /// Extractor could not be built
    #[error("Extractor error: {0}")]
    Extractor(#[from] p2f_extractor::ExtractorError),

    /// LLM provider could not be built
    #[error("LLM error: {0}")]
    Llm(#[from] p2f_llm::LlmError),

    /// Reading an answer from the terminal failed
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Operator pressed Ctrl-C at a prompt
    #[error("Interrupted")]
    Interrupted,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
