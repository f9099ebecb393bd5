//! Interpretation service client
//!
//! Generative-language `generateContent` call: the prompt goes in as
//! `contents[0].parts[0].text`, the answer comes back at
//! `candidates[0].content.parts[0].text`.

use serde_json::Value;

use crate::{ensure_success, ClientError};

pub const DEFAULT_INTERPRET_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

#[derive(Debug, Clone)]
pub struct InterpretationClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl InterpretationClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Ask for an interpretation of `prompt`. `Ok(None)` means the service
    /// answered but without any text.
    pub async fn interpret(&self, prompt: &str) -> Result<Option<String>, ClientError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = ensure_success(request.send().await?).await?;
        let status = response.status();
        let raw = response.text().await?;
        tracing::debug!(status = status.as_u16(), body = %raw, "Interpretation response");

        let value: Value = serde_json::from_str(&raw)?;
        Ok(extract_text(&value))
    }
}

/// Trimmed `candidates[0].content.parts[0].text`; absent or blank is None
pub fn extract_text(value: &Value) -> Option<String> {
    let text = value
        .pointer("/candidates/0/content/parts/0/text")?
        .as_str()?
        .trim();
    (!text.is_empty()).then(|| text.to_string())
}
