//! Runtime configuration
//!
//! | Variable                     | Default                        |
//! |------------------------------|--------------------------------|
//! | `SIGNA_TRANSLATE_URL`        | `http://127.0.0.1:8000`        |
//! | `SIGNA_INTERPRET_URL`        | generative-language endpoint   |
//! | `GEMINI_API_KEY`             | unset                          |
//! | `SIGNA_REQUEST_TIMEOUT_SECS` | `30`                           |
//! | `SIGNA_TICK_MS`              | `16`                           |
//! | `SIGNA_CONFIDENCE_THRESHOLD` | `0.70`                         |
//! | `SIGNA_AVATAR`               | unset (built-in humanoid)      |
//!
//! A `.env` file in the working directory is loaded first. Command-line
//! flags override whatever the environment says.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use signa_client::{DEFAULT_INTERPRET_URL, DEFAULT_TRANSLATE_URL};
use signa_core::{SignaError, SignaResult};
use signa_gesture::CONFIDENCE_THRESHOLD;

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Base URL of the translation service
    pub translate_url: String,
    /// Full `generateContent` endpoint of the interpretation service
    pub interpret_url: String,
    pub api_key: Option<String>,
    /// Applies to every HTTP request
    pub request_timeout: Duration,
    /// Render tick interval
    pub tick_interval: Duration,
    pub confidence_threshold: f32,
    /// Avatar asset JSON; the built-in humanoid when unset
    pub avatar: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            interpret_url: DEFAULT_INTERPRET_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(30),
            tick_interval: Duration::from_millis(16),
            confidence_threshold: CONFIDENCE_THRESHOLD,
            avatar: None,
        }
    }
}

impl RuntimeConfig {
    /// Load `.env`, then read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Unparseable values are logged and
    /// fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        RuntimeConfig {
            translate_url: text("SIGNA_TRANSLATE_URL").unwrap_or(defaults.translate_url),
            interpret_url: text("SIGNA_INTERPRET_URL").unwrap_or(defaults.interpret_url),
            api_key: text("GEMINI_API_KEY"),
            request_timeout: parsed(&lookup, "SIGNA_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            tick_interval: parsed(&lookup, "SIGNA_TICK_MS")
                .filter(|ms: &u64| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            confidence_threshold: parsed(&lookup, "SIGNA_CONFIDENCE_THRESHOLD")
                .filter(|t: &f32| is_valid_threshold(*t))
                .unwrap_or(defaults.confidence_threshold),
            avatar: text("SIGNA_AVATAR").map(PathBuf::from),
        }
    }

    /// Override the gesture confidence threshold; it must lie in `0..=1`.
    pub fn set_confidence_threshold(&mut self, threshold: f32) -> SignaResult<()> {
        if !is_valid_threshold(threshold) {
            return Err(SignaError::Config(format!(
                "confidence threshold {threshold} is outside 0..=1"
            )));
        }
        self.confidence_threshold = threshold;
        Ok(())
    }

    /// Shared HTTP client with the configured timeout
    pub fn http_client(&self) -> SignaResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| SignaError::Transport(e.to_string()))
    }
}

fn is_valid_threshold(threshold: f32) -> bool {
    (0.0..=1.0).contains(&threshold)
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
