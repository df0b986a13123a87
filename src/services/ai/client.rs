//! Gemini REST backend behind the `ModelBackend` seam.

use async_trait::async_trait;

use crate::services::config::DEFAULT_BASE_URL;

use super::error::BackendError;
use super::types::{ErrorWrapper, GenerateContentRequest, GenerateContentResponse, extract_text};

/// One provider attempt with a specific key. The dispatcher drives this;
/// tests substitute a scripted implementation.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, BackendError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<String, BackendError> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url
        );

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| BackendError::network(format!("Gemini request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| BackendError::parse(format!("Failed to parse Gemini response: {err}")))?;

        Ok(extract_text(parsed))
    }
}

fn map_http_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    BackendError::api(status, message)
}
