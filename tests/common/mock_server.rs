//! Mock Gemini endpoint for assistant tests.

use inkpress::models::AssistantConfig;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const TEST_MODEL: &str = "test-model";
pub const TEST_KEY: &str = "test-key";

/// Wrapper around wiremock MockServer speaking `generateContent`
pub struct MockGemini {
    pub server: MockServer,
}

impl MockGemini {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn endpoint() -> String {
        format!("/v1beta/models/{TEST_MODEL}:generateContent")
    }

    /// Assistant configuration pointing at this server, with fast retries
    pub fn config(&self) -> AssistantConfig {
        AssistantConfig {
            base_url: self.server.uri(),
            model: TEST_MODEL.to_string(),
            api_key: Some(TEST_KEY.to_string()),
            max_retries: 2,
            retry_base_delay_ms: 10,
            timeout_secs: 5,
            system_instruction: "You are a print expert.".to_string(),
        }
    }

    fn reply_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
    }

    /// Answer every request with `text`
    pub async fn mock_reply(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .and(header("x-goog-api-key", TEST_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::reply_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Answer the next `times` requests with an error status
    pub async fn mock_status(&self, status: u16, body: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint()))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// JSON bodies of the requests received so far
    pub async fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.requests()
            .await
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}
