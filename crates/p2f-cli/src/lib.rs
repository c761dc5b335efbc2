//! p2f CLI library.
//!
//! Configuration loading, terminal prompts, progress display and output
//! formatting for the `p2f` binary, plus the rename command that ties the
//! pipeline crates together.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod prompt;

pub use cli::Cli;
pub use config::{Config, OutputFormat, RunConfig};
pub use error::{CliError, Result};
pub use output::Formatter;
pub use prompt::ConsolePrompter;
