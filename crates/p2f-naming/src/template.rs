//! Filename template parsing, matching and rendering

use crate::error::TemplateError;
use p2f_domain::{ExtractedFields, Field};
use regex::Regex;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "{date}_{partner}_{documentType}_{amount}.pdf";

/// Substituted for fields the extraction left empty
pub const UNAVAILABLE_MARKER: &str = "unavailable";

/// Replacement for characters that cannot appear inside a text field
const REPLACEMENT: char = '-';

/// Used instead of [`REPLACEMENT`] when a field's separator is `-`
const ALT_REPLACEMENT: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        /// First character of the following literal, if any
        separator: Option<char>,
    },
}

/// A parsed filename template
///
/// Parsing validates the template once; matching and rendering cannot
/// fail afterwards.
#[derive(Debug, Clone)]
pub struct FileNameTemplate {
    source: String,
    segments: Vec<Segment>,
    matcher: Regex,
}

impl FileNameTemplate {
    /// Parse and validate a template string
    ///
    /// # Errors
    ///
    /// See [`TemplateError`] for the rejected shapes.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        if template.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => return Err(TemplateError::UnbalancedBrace(pos)),
                            _ => name.push(c),
                        }
                    }
                    if !closed {
                        return Err(TemplateError::UnbalancedBrace(pos));
                    }
                    let field = Field::from_placeholder(&name)
                        .ok_or(TemplateError::UnknownPlaceholder(name))?;

                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    } else if let Some(Segment::Field { field: previous, .. }) = segments.last() {
                        return Err(TemplateError::AdjacentPlaceholders(*previous, field));
                    }
                    segments.push(Segment::Field {
                        field,
                        separator: None,
                    });
                }
                '}' => return Err(TemplateError::UnbalancedBrace(pos)),
                '/' | '\\' => return Err(TemplateError::PathSeparator),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.iter().any(|s| matches!(s, Segment::Field { .. })) {
            return Err(TemplateError::NoPlaceholders);
        }

        // Each field's separator is the first character of the next literal
        for i in 0..segments.len() {
            let next = match segments.get(i + 1) {
                Some(Segment::Literal(text)) => text.chars().next(),
                _ => None,
            };
            if let Segment::Field { separator, .. } = &mut segments[i] {
                *separator = next;
            }
        }

        let matcher = Regex::new(&build_pattern(&segments))?;

        debug!("Compiled template '{}' to /{}/", template, matcher.as_str());

        Ok(Self {
            source: template.to_string(),
            segments,
            matcher,
        })
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholders in template order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field { field, .. } => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    /// Whether a file name already follows the template (full match)
    pub fn is_valid_format(&self, filename: &str) -> bool {
        self.matcher.is_match(filename)
    }

    /// [`is_valid_format`](Self::is_valid_format) applied to a path's final
    /// component
    pub fn is_valid_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.is_valid_format(name))
            .unwrap_or(false)
    }

    /// Render a file name from extracted fields
    ///
    /// Blank fields become [`UNAVAILABLE_MARKER`]. Digit fields keep only
    /// their digits (full-width digits are folded). Text fields have path
    /// separators, control characters and their own separator replaced by
    /// `-`. Digit slots also accept the marker when matching, so every
    /// rendered name passes [`is_valid_format`](Self::is_valid_format).
    pub fn render(&self, fields: &ExtractedFields) -> String {
        let mut name = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => name.push_str(text),
                Segment::Field { field, separator } => {
                    let value = fields.get(*field).trim();
                    let rendered = if field.is_numeric() {
                        digits_only(value)
                    } else {
                        sanitize_text(value, *separator)
                    };
                    if rendered.is_empty() {
                        debug!("Field {} is empty, using '{}'", field, UNAVAILABLE_MARKER);
                        name.push_str(UNAVAILABLE_MARKER);
                    } else {
                        name.push_str(&rendered);
                    }
                }
            }
        }
        name
    }
}

impl FromStr for FileNameTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FileNameTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Build the anchored regex for a parsed template
fn build_pattern(segments: &[Segment]) -> String {
    let mut pattern = String::from("^");
    for segment in segments {
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            Segment::Field { field, .. } if field.is_numeric() => {
                pattern.push_str("(?:[0-9]+|");
                pattern.push_str(&regex::escape(UNAVAILABLE_MARKER));
                pattern.push(')');
            }
            Segment::Field {
                separator: Some(sep),
                ..
            } => {
                pattern.push_str("[^");
                pattern.push_str(&regex::escape(&sep.to_string()));
                pattern.push_str("]+");
            }
            Segment::Field { separator: None, .. } => pattern.push_str(".+"),
        }
    }
    pattern.push('$');
    pattern
}

fn digits_only(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .filter(char::is_ascii_digit)
        .collect()
}

fn sanitize_text(value: &str, separator: Option<char>) -> String {
    let replacement = if separator == Some(REPLACEMENT) {
        ALT_REPLACEMENT
    } else {
        REPLACEMENT
    };
    value
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() || Some(c) == separator {
                replacement
            } else {
                c
            }
        })
        .collect()
}
