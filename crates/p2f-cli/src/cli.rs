//! CLI argument parsing.

use clap::Parser;
use regex::Regex;
use std::path::PathBuf;

/// p2f - Rename PDF documents after their contents.
///
/// Each PDF is read by a language model and renamed to
/// `{date}_{partner}_{documentType}_{amount}.pdf` (configurable), e.g.
/// `20250101_Maruyama Trading_請求書_2000.pdf`.
#[derive(Debug, Parser)]
#[command(name = "p2f")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// PDF file or directory of PDFs to rename
    pub path: PathBuf,

    /// Only rename files whose names match this regex (directory mode)
    #[arg(short, long, value_name = "REGEX", value_parser = parse_filter)]
    pub filter: Option<Regex>,

    /// Rename files even if their names already follow the format
    #[arg(short, long)]
    pub skip_format_check: bool,

    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Trading partner file
    #[arg(short, long, value_name = "FILE")]
    pub trading_partner_file: Option<PathBuf>,

    /// Document type file
    #[arg(short, long, value_name = "FILE")]
    pub document_type_file: Option<PathBuf>,

    /// Number of files processed at once
    #[arg(short, long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Extra instructions appended to the extraction prompt
    #[arg(short = 'p', long, value_name = "TEXT")]
    pub extra_prompt: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE", env = "P2F_CONFIG")]
    pub config: Option<PathBuf>,

    /// Answer yes to the confirmation prompts
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output format for the summary
    #[arg(long, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (new paths only)
    Quiet,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

/// Validate and compile the `--filter` value.
///
/// A value starting with `-` is almost always a flag swallowed as the
/// filter argument, so it is rejected.
pub fn parse_filter(value: &str) -> Result<Regex, String> {
    if value.trim().is_empty() {
        return Err("no value given for --filter".to_string());
    }
    if value.starts_with('-') {
        return Err("no value given for --filter".to_string());
    }
    Regex::new(value).map_err(|e| format!("--filter is not a valid regular expression: {}", e))
}
