#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llm_sentiment::llm::{LlmClient, LlmConfig, Sleeper};

pub const TEST_MODEL: &str = "test-model";

/// Records requested waits instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

pub fn test_config(endpoint: &str) -> LlmConfig {
    LlmConfig::default()
        .with_endpoint(endpoint)
        .with_model(TEST_MODEL)
        .with_retry(3, 5)
}

pub fn test_client(config: LlmConfig) -> (LlmClient, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = LlmClient::new(config)
        .expect("failed to create client")
        .with_sleeper(sleeper.clone());
    (client, sleeper)
}

/// A `/api/generate` success body carrying `text` as the model output.
pub fn generate_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "model": TEST_MODEL,
        "response": text,
        "done": true
    }))
}

/// Mount a mock answering every generate request with `text`.
pub async fn mount_answer(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(generate_response(text))
        .mount(server)
        .await;
}
