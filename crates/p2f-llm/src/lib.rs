//! p2f LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `p2f-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI Responses API integration
//!
//! # Examples
//!
//! ```
//! use p2f_llm::MockProvider;
//! use p2f_domain::{LlmProvider, LlmRequest};
//!
//! # tokio_test_block_on(async {
//! let provider = MockProvider::new(r#"{"date":"20240115"}"#);
//! let request = LlmRequest {
//!     filename: "scan.pdf".to_string(),
//!     document: Vec::new(),
//!     prompt: "Extract the date".to_string(),
//! };
//! assert_eq!(provider.generate(&request).await.unwrap(), r#"{"date":"20240115"}"#);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use p2f_domain::{LlmProvider, LlmRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key missing or rejected
    #[error("Unauthorized: check OPENAI_API_KEY")]
    Unauthorized,

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockResponse {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses keyed by the request's file name
/// without making any network calls.
///
/// # Examples
///
/// ```
/// use p2f_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("a.pdf", r#"{"partner":"Acme"}"#);
/// provider.add_error("broken.pdf");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    call_count: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all files
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Add a specific response for a given file name
    pub fn add_response(&mut self, filename: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(filename.into(), MockResponse::Text(response.into()));
    }

    /// Configure to return an error for a specific file name
    pub fn add_error(&mut self, filename: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(filename.into(), MockResponse::Error);
    }

    /// Wait before answering every request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    fn lookup(&self, filename: &str) -> Option<MockResponse> {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(filename)
            .cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.lookup(&request.filename) {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
