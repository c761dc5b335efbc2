//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and
//! infrastructure. Implementations live in other crates (`p2f-llm`,
//! `p2f-extractor`, `p2f-cli`) or in test code.

use crate::fields::ExtractedFields;
use std::future::Future;
use std::path::Path;

/// A document plus instructions sent to a language model
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// File name reported to the model
    pub filename: String,

    /// Raw PDF bytes
    pub document: Vec<u8>,

    /// Instruction text
    pub prompt: String,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (p2f-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Send a document and prompt, returning the model's text output
    fn generate(
        &self,
        request: &LlmRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model answering requests
    fn model_name(&self) -> &str;
}

/// Trait for reading document metadata out of a PDF
///
/// Implemented by the application layer (p2f-extractor). The pipeline
/// treats it as opaque: one call per file, fields or an error.
pub trait ExtractionGateway {
    /// Error type for extraction operations
    type Error;

    /// Extract date, partner, document type and amount from a file
    fn extract(
        &self,
        path: &Path,
    ) -> impl Future<Output = Result<ExtractedFields, Self::Error>> + Send;
}

/// Trait for asking the operator a question
///
/// Implemented by the CLI (line editor) and by scripted test doubles.
pub trait Prompter {
    /// Error type for prompt I/O
    type Error;

    /// Show `question` and return the operator's raw answer
    fn ask(&mut self, question: &str) -> Result<String, Self::Error>;
}
