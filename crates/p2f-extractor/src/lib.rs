//! p2f Extractor
//!
//! Reads date, counterparty, document type and amount out of a PDF using an
//! LLM.
//!
//! # Architecture
//!
//! ```text
//! PDF → PdfExtractor → LLM → JSON → ExtractedFields → Item Processor
//! ```
//!
//! # Key Features
//!
//! - **Prompt construction**: response shape, date format, amount rules,
//!   own-company exclusion and the known vocabularies
//! - **Guard rails**: file size limit and a per-call timeout
//! - **Lenient parsing**: code fences, surrounding prose and numeric values
//!   are tolerated; the amount is reduced to digits
//!
//! # Example Usage
//!
//! ```no_run
//! use p2f_extractor::{ExtractorConfig, PdfExtractor};
//! use p2f_llm::MockProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(
//!     r#"{"date":"20240115","partner":"Acme Corp","documentType":"請求書","amount":"15000"}"#,
//! );
//! let partners = vec!["Acme Corp".to_string()];
//! let document_types = vec!["請求書".to_string()];
//!
//! let extractor = PdfExtractor::new(llm, ExtractorConfig::default(), &partners, &document_types)?;
//! let fields = extractor.extract_file(Path::new("invoice_scan.pdf")).await?;
//!
//! println!("{} {} {} {}", fields.date, fields.partner, fields.document_type, fields.amount);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::PdfExtractor;
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
