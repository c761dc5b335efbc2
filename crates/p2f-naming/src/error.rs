//! Template error types

use p2f_domain::Field;
use thiserror::Error;

/// Errors raised while parsing a filename template
///
/// Every one of these is fatal at startup: a bad template would make every
/// file in a batch fail the same way.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template string is empty
    #[error("Template is empty")]
    Empty,

    /// Placeholder name not one of date, partner, documentType, amount
    #[error("Unknown placeholder '{{{0}}}' (expected date, partner, documentType or amount)")]
    UnknownPlaceholder(String),

    /// `{` without `}` or a stray `}`
    #[error("Unbalanced brace at position {0}")]
    UnbalancedBrace(usize),

    /// Template has no placeholder at all
    #[error("Template contains no placeholders")]
    NoPlaceholders,

    /// Two placeholders with nothing between them cannot be told apart
    #[error("Placeholders {{{0}}} and {{{1}}} must be separated by literal text")]
    AdjacentPlaceholders(Field, Field),

    /// Renames stay inside the source directory
    #[error("Template must not contain path separators")]
    PathSeparator,

    /// Generated matcher failed to compile
    #[error("Failed to compile filename pattern: {0}")]
    Pattern(#[from] regex::Error),
}
