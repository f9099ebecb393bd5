//! Translation service client
//!
//! `POST {base}/convert` with `{"text": "..."}`. The response carries the
//! sign grammar text and the animation payload, which may be an array, an
//! object, or a JSON-encoded string of either. The payload is kept as raw
//! JSON here and only becomes a `KeyframeSequence` through `frames()`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use signa_core::{parse_frames, ParsedFrames, PayloadError};

use crate::{ensure_success, ClientError};

/// Default base URL of a locally running translation service
pub const DEFAULT_TRANSLATE_URL: &str = "http://127.0.0.1:8000";

/// Hand movement hint attached to a translation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandMovement {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub movement: String,
    #[serde(default)]
    pub duration: f64,
}

/// Body of a successful `/convert` call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub sign_grammar_text: Option<String>,
    #[serde(default)]
    pub frames_json: Option<Value>,
    /// Older servers wrap the payload as `movements.frames_json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movements: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub facial_expression: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub hand_movement: Option<HandMovement>,
}

/// A malformed optional field reads as absent instead of failing the response
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl TranslationResponse {
    /// Raw animation payload, wherever the server put it
    pub fn frames_payload(&self) -> Option<&Value> {
        if let Some(frames) = &self.frames_json {
            return Some(frames);
        }
        match &self.movements {
            Some(Value::Object(map)) if map.contains_key("frames_json") => map.get("frames_json"),
            other => other.as_ref(),
        }
    }

    /// Strict parse of the animation payload. No payload is an empty sequence.
    pub fn frames(&self) -> Result<ParsedFrames, PayloadError> {
        match self.frames_payload() {
            Some(payload) => parse_frames(payload),
            None => Ok(ParsedFrames::default()),
        }
    }
}

/// HTTP client for the translation service
#[derive(Debug, Clone)]
pub struct TranslationClient {
    client: reqwest::Client,
    base_url: String,
}

impl TranslationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing client (shared pool and timeouts)
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Translate `text`. The body is decoded leniently per field; only a
    /// body that is not a JSON object at all fails with `Decode`.
    pub async fn translate(&self, text: &str) -> Result<TranslationResponse, ClientError> {
        let body = serde_json::json!({ "text": text });

        tracing::debug!(url = %self.base_url, chars = text.len(), "Sending translation request");
        let response = self
            .client
            .post(format!("{}/convert", self.base_url))
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let raw = response.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
