//! LLM integration for review sentiment classification.
//!
//! Uses a local LLM (via Ollama) to label each review Positive, Negative or Neutral.

mod client;
mod retry;

pub use client::{LlmClient, LlmConfig, LlmError, DEFAULT_SENTIMENT_PROMPT};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
