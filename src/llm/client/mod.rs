//! LLM client for review sentiment classification.
//!
//! Talks to the Ollama API for local LLM inference.

mod config;
mod prompts;

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use config::LlmConfig;
pub use prompts::{DEFAULT_SENTIMENT_PROMPT, REVIEW_TEXT_PLACEHOLDER};

use super::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::models::{normalize_label, ErrorKind, Sentiment};

/// LLM client for review classification.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama API response format. A missing `response` field reads as empty.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    ///
    /// Trailing slashes are stripped from the endpoint, wherever it came from.
    pub fn new(mut config: LlmConfig) -> Result<Self, LlmError> {
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LlmError::Connection(format!("failed to create HTTP client: {e}")))?;
        let retry = config.retry_policy();

        Ok(Self {
            config,
            client,
            retry,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used between retry attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Get the config.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Check if the LLM service is available.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.config.endpoint);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// List available models.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.config.endpoint);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        if !resp.status().is_success() {
            return Err(LlmError::Api {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        #[derive(Deserialize)]
        struct TagsResponse {
            models: Vec<ModelInfo>,
        }

        #[derive(Deserialize)]
        struct ModelInfo {
            name: String,
        }

        let tags: TagsResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Render the classification prompt for a review.
    pub fn render_prompt(&self, review_text: &str) -> String {
        self.config
            .get_sentiment_prompt()
            .replace(REVIEW_TEXT_PLACEHOLDER, review_text)
    }

    /// Classify the sentiment of a review.
    ///
    /// Never fails: transport errors are retried according to the retry
    /// policy and end up as `Error(ApiFailed)`, unusable answers as
    /// `Error(ParseFailed)`.
    pub async fn classify(&self, review_text: &str) -> Sentiment {
        let prompt = self.render_prompt(review_text);
        let max_attempts = self.retry.max_attempts();
        let mut attempt = 1;

        loop {
            info!(attempt, max_attempts, "Sending review to Ollama");

            match self.generate(&prompt).await {
                Ok(answer) => {
                    let sentiment = normalize_label(&answer);
                    match sentiment {
                        Sentiment::Error(_) => warn!(
                            response = %answer.trim(),
                            "Could not parse sentiment from LLM response"
                        ),
                        _ if sentiment.label() != Some(answer.trim()) => debug!(
                            response = %answer.trim(),
                            %sentiment,
                            "Unexpected LLM response format, matched by keyword"
                        ),
                        _ => info!(%sentiment, "Ollama responded"),
                    }
                    return sentiment;
                }
                Err(e) if e.is_retryable() => {
                    warn!(error = %e, attempt, max_attempts, "Error contacting Ollama API");
                    if !self.retry.has_next(attempt) {
                        warn!("Max retries reached, skipping this review");
                        return Sentiment::Error(ErrorKind::ApiFailed);
                    }
                    info!(
                        delay_secs = self.retry.delay().as_secs_f64(),
                        "Retrying after delay"
                    );
                    self.sleeper.sleep(self.retry.delay()).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Unreadable LLM response");
                    return Sentiment::Error(ErrorKind::ParseFailed);
                }
            }
        }
    }

    /// Send a single generation request and return the raw response text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let options = if self.config.temperature.is_some() || self.config.max_tokens.is_some() {
            Some(OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            })
        } else {
            None
        };
        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options,
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        // Read the body first so a dropped connection stays a transport error
        // and only an undecodable payload becomes a parse error.
        let body = resp.text().await.map_err(LlmError::from_transport)?;
        let ollama_resp: OllamaResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.response)
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request exceeded the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),
    /// API returned a non-success status
    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
}

impl LlmError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }

    /// Transport failures and HTTP errors are worth another attempt; a
    /// response that arrived but cannot be read is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Api { .. }
        )
    }
}
