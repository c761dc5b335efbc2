//! OpenAI Provider Implementation
//!
//! Sends a PDF and an instruction to the OpenAI Responses API and returns
//! the model's text output.
//!
//! # Features
//!
//! - PDF passed inline as a base64 `input_file` data URL
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff on transport errors, 429 and 5xx
//!
//! # Examples
//!
//! ```no_run
//! use p2f_llm::OpenAiProvider;
//!
//! let api_key = std::env::var("OPENAI_API_KEY").unwrap();
//! let provider = OpenAiProvider::new("https://api.openai.com/v1", "gpt-4o-mini", api_key).unwrap();
//! ```

use crate::LlmError;
use base64::Engine;
use p2f_domain::{LlmProvider, LlmRequest};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// HTTP-level timeout for one request (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// OpenAI Responses API provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the Responses API
#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: Vec<InputMessage>,
}

#[derive(Debug, Serialize)]
struct InputMessage {
    role: &'static str,
    content: Vec<InputContent>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum InputContent {
    #[serde(rename = "input_file")]
    File { filename: String, file_data: String },
    #[serde(rename = "input_text")]
    Text { text: String },
}

/// Response from the Responses API (only the parts we read)
#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl ResponsesRequest {
    fn new(model: &str, request: &LlmRequest) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&request.document);
        Self {
            model: model.to_string(),
            input: vec![InputMessage {
                role: "user",
                content: vec![
                    InputContent::File {
                        filename: request.filename.clone(),
                        file_data: format!("data:application/pdf;base64,{}", encoded),
                    },
                    InputContent::Text {
                        text: request.prompt.clone(),
                    },
                ],
            }],
        }
    }
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part, like the SDK's `output_text`
    fn output_text(self) -> Result<String, LlmError> {
        if let Some(error) = self.error {
            return Err(LlmError::InvalidResponse(error.message));
        }
        let text: String = self
            .output
            .into_iter()
            .flat_map(|item| item.content)
            .filter(|part| part.kind == "output_text")
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(
                "Response contained no output text".to_string(),
            ));
        }
        Ok(text)
    }
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://api.openai.com/v1")
    /// - `model`: Model to use (e.g., "gpt-4o-mini")
    /// - `api_key`: Bearer token
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Unauthorized`] for a blank key and
    /// [`LlmError::Other`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Unauthorized);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// API base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let url = format!("{}/responses", self.endpoint);
        let body = ResponsesRequest::new(&self.model, request);

        debug!(
            "POST {} model={} file={} ({} bytes, base64 elided) prompt={} chars",
            url,
            self.model,
            request.filename,
            request.document.len(),
            request.prompt.chars().count()
        );

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response.json::<ResponsesResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        let text = parsed.output_text()?;
                        debug!("Model output for {}: {}", request.filename, text);
                        return Ok(text);
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    match status {
                        StatusCode::UNAUTHORIZED => return Err(LlmError::Unauthorized),
                        StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.model.clone()))
                        }
                        StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        s if s.is_server_error() => {
                            last_error = Some(LlmError::Communication(format!(
                                "HTTP {}: {}",
                                s, error_text
                            )));
                        }
                        s => {
                            return Err(LlmError::Communication(format!(
                                "HTTP {}: {}",
                                s, error_text
                            )))
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(
                    "Request for {} failed (attempt {}/{}), retrying in {:?}",
                    request.filename, attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        self.send(request).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LlmRequest {
        LlmRequest {
            filename: "invoice.pdf".to_string(),
            document: b"%PDF".to_vec(),
            prompt: "Extract".to_string(),
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = OpenAiProvider::new("https://api.openai.com/v1/", "gpt-4o-mini", "sk-test")
            .unwrap();
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1");
        assert_eq!(provider.model_name(), "gpt-4o-mini");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = OpenAiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "  ");
        assert!(matches!(result, Err(LlmError::Unauthorized)));
    }

    #[test]
    fn test_with_max_retries() {
        let provider = OpenAiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "sk-test")
            .unwrap()
            .with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ResponsesRequest::new("gpt-4o-mini", &request())).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["input"][0]["role"], "user");
        let content = &body["input"][0]["content"];
        assert_eq!(content[0]["type"], "input_file");
        assert_eq!(content[0]["filename"], "invoice.pdf");
        assert_eq!(content[0]["file_data"], "data:application/pdf;base64,JVBERg==");
        assert_eq!(content[1]["type"], "input_text");
        assert_eq!(content[1]["text"], "Extract");
    }

    #[test]
    fn test_output_text_joins_text_parts() {
        let response: ResponsesResponse = serde_json::from_str(
            r#"{
                "id": "resp_1",
                "output": [
                    {"type": "reasoning", "summary": []},
                    {"type": "message", "role": "assistant", "content": [
                        {"type": "output_text", "text": "{\"date\":", "annotations": []},
                        {"type": "output_text", "text": "\"20240115\"}", "annotations": []}
                    ]}
                ],
                "error": null
            }"#,
        )
        .unwrap();
        assert_eq!(response.output_text().unwrap(), r#"{"date":"20240115"}"#);
    }

    #[test]
    fn test_output_text_ignores_refusals() {
        let response: ResponsesResponse = serde_json::from_str(
            r#"{"output": [{"type": "message", "content": [
                {"type": "refusal", "refusal": "no"}
            ]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            response.output_text(),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_output_text_reports_api_error() {
        let response: ResponsesResponse =
            serde_json::from_str(r#"{"output": [], "error": {"message": "file too large"}}"#)
                .unwrap();
        match response.output_text() {
            Err(LlmError::InvalidResponse(message)) => assert_eq!(message, "file too large"),
            other => panic!("Expected InvalidResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_error_handling() {
        // Nothing listens on port 9 of localhost
        let provider = OpenAiProvider::new("http://127.0.0.1:9", DEFAULT_MODEL, "sk-test")
            .unwrap()
            .with_max_retries(1);

        let result = provider.generate(&request()).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[tokio::test]
    #[ignore] // Requires OPENAI_API_KEY and network access
    async fn test_openai_generate_integration() {
        let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
            return;
        };
        let provider = OpenAiProvider::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, api_key).unwrap();
        let result = provider.generate(&request()).await;
        assert!(result.is_ok() || matches!(result, Err(LlmError::InvalidResponse(_))));
    }
}
