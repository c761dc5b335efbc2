//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::PromptBuilder;
use p2f_domain::{ExtractedFields, ExtractionGateway, LlmProvider, LlmRequest};
use std::path::Path;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// Reads document fields out of PDFs with an LLM
pub struct PdfExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: ExtractorConfig,
    prompt: String,
}

impl<L> PdfExtractor<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    ///
    /// `partners` and `document_types` are the vocabularies the model is
    /// asked to prefer; they are baked into the prompt once.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError::Config`] if `config` fails validation.
    pub fn new(
        llm_provider: L,
        config: ExtractorConfig,
        partners: &[String],
        document_types: &[String],
    ) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let prompt = PromptBuilder::new(&config)
            .with_partners(partners)
            .with_document_types(document_types)
            .build();

        debug!("Prompt length: {} chars", prompt.chars().count());

        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
            prompt,
        })
    }

    /// The instruction sent with every document
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Model answering extraction requests
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Extract fields from one PDF
    pub async fn extract_file(&self, path: &Path) -> Result<ExtractedFields, ExtractorError> {
        let io_error = |source| ExtractorError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = tokio::fs::metadata(path).await.map_err(io_error)?.len();
        if size > self.config.max_file_bytes() {
            return Err(ExtractorError::FileTooLarge(size, self.config.max_file_bytes()));
        }

        let document = tokio::fs::read(path).await.map_err(io_error)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        info!("Extracting {} ({} bytes)", filename, document.len());

        let request = LlmRequest {
            filename,
            document,
            prompt: self.prompt.clone(),
        };

        // Call LLM with timeout
        let llm_response = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(&request),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("Raw model output for {}: {}", request.filename, llm_response);

        let fields = parse_llm_response(&llm_response)?;

        debug!(
            "Extracted from {}: date={} partner={} documentType={} amount={}",
            request.filename, fields.date, fields.partner, fields.document_type, fields.amount
        );

        Ok(fields)
    }
}

impl<L> ExtractionGateway for PdfExtractor<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: std::fmt::Display,
{
    type Error = ExtractorError;

    async fn extract(&self, path: &Path) -> Result<ExtractedFields, Self::Error> {
        self.extract_file(path).await
    }
}
