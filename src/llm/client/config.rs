//! LLM client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_SENTIMENT_PROMPT;
use crate::llm::retry::RetryPolicy;

/// Configuration for LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama API endpoint (default: http://localhost:11434)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for classification
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total number of attempts per review before giving up
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Seconds to wait between attempts
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// Temperature for generation (0.0 - 1.0); model default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens in response; model default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Custom classification prompt (uses the {review_text} placeholder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_prompt: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "gemma3:27b".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    fn base_default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            temperature: None,
            max_tokens: None,
            sentiment_prompt: None,
        }
    }

    /// Check if the config equals the default (for skip_serializing_if).
    pub fn is_default(&self) -> bool {
        *self == Self::base_default()
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_ENDPOINT`: Ollama API endpoint
    /// - `LLM_MODEL`: Model name
    /// - `LLM_TIMEOUT_SECS`: Per-request timeout
    /// - `LLM_RETRIES`: Attempts per review
    /// - `LLM_RETRY_DELAY_SECS`: Wait between attempts
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_SENTIMENT_PROMPT`: Custom classification prompt
    ///
    /// Unparseable numeric values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("LLM_ENDPOINT") {
            self.endpoint = val;
        }
        if let Ok(val) = std::env::var("LLM_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("LLM_TIMEOUT_SECS") {
            if let Ok(n) = val.parse() {
                self.timeout_secs = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_RETRIES") {
            if let Ok(n) = val.parse() {
                self.retries = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_RETRY_DELAY_SECS") {
            if let Ok(n) = val.parse() {
                self.retry_delay_secs = n;
            }
        }
        if let Ok(val) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(t) = val.parse() {
                self.temperature = Some(t);
            }
        }
        if let Ok(val) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = val.parse() {
                self.max_tokens = Some(n);
            }
        }
        if let Ok(val) = std::env::var("LLM_SENTIMENT_PROMPT") {
            self.sentiment_prompt = Some(val);
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_retry(mut self, retries: u32, delay_secs: u64) -> Self {
        self.retries = retries;
        self.retry_delay_secs = delay_secs;
        self
    }

    /// Get the classification prompt, using custom or default.
    pub fn get_sentiment_prompt(&self) -> &str {
        self.sentiment_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SENTIMENT_PROMPT)
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry policy derived from `retries` and `retry_delay_secs`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, Duration::from_secs(self.retry_delay_secs))
    }
}
