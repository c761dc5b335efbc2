//! p2f Filename Rules
//!
//! Decides whether a filename already follows the naming template and
//! renders new filenames from extracted fields.
//!
//! Templates use four placeholders:
//!
//! | Placeholder      | Matches in the format check                 |
//! |------------------|---------------------------------------------|
//! | `{date}`         | one or more digits                          |
//! | `{amount}`       | one or more digits                          |
//! | `{partner}`      | one or more characters except its separator |
//! | `{documentType}` | one or more characters except its separator |
//!
//! A text placeholder's separator is the first character of the literal
//! that follows it (`_` in the default template).
//!
//! # Examples
//!
//! ```
//! use p2f_naming::FileNameTemplate;
//! use p2f_domain::ExtractedFields;
//!
//! let template = FileNameTemplate::parse("{date}_{partner}_{documentType}_{amount}.pdf").unwrap();
//! let fields = ExtractedFields::new("20240115", "Acme Corp", "請求書", "15000");
//!
//! let name = template.render(&fields);
//! assert_eq!(name, "20240115_Acme Corp_請求書_15000.pdf");
//! assert!(template.is_valid_format(&name));
//! assert!(!template.is_valid_format("invoice_scan.pdf"));
//! ```

#![warn(missing_docs)]

mod error;
mod template;

pub use error::TemplateError;
pub use template::{FileNameTemplate, DEFAULT_TEMPLATE, UNAVAILABLE_MARKER};
