//! Generative assistant client.
//!
//! Callers always get text back: failures are logged and replaced with a
//! user-facing fallback message.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::ProcessingError;
use crate::models::AssistantConfig;
use crate::rendering::{self, resample};

pub const ANALYZE_FALLBACK: &str = "The analysis service is busy. Try again in a few seconds.";
pub const ANALYZE_EMPTY: &str = "No response.";
pub const CHAT_FALLBACK: &str = "Connection error with the assistant.";

/// Longest side of the image sent for analysis
pub const ANALYZE_MAX_SIDE: u32 = 512;
pub const ANALYZE_JPEG_QUALITY: u8 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Describe an image according to `prompt`
    async fn analyze(&self, image: &[u8], prompt: &str) -> String;

    /// Continue a conversation
    async fn chat(&self, history: &[ChatMessage], message: &str) -> String;
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("No API key configured")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Image preparation failed: {0}")]
    Image(#[from] ProcessingError),

    #[error("Worker task failed: {0}")]
    Task(String),
}

impl AssistantError {
    /// 429 responses and quota messages are worth retrying
    pub fn is_rate_limited(&self) -> bool {
        match self {
            AssistantError::Status { status, body } => {
                *status == 429 || body.to_lowercase().contains("quota")
            }
            _ => false,
        }
    }
}

// Wire types for generateContent

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    fn jpeg(base64: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: "image/jpeg".to_string(),
                data: base64,
            }),
        }
    }
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Downscale to [`ANALYZE_MAX_SIDE`] and re-encode as JPEG, base64 encoded.
pub fn prepare_image(image: &[u8]) -> Result<String, ProcessingError> {
    let mut buffer = rendering::load(image)?;
    if buffer.width().max(buffer.height()) > ANALYZE_MAX_SIDE {
        buffer = resample::fit_longest_side(buffer, ANALYZE_MAX_SIDE)?;
    }
    let jpeg = rendering::encode_jpeg(&buffer, ANALYZE_JPEG_QUALITY)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(jpeg))
}

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiAssistant {
    config: AssistantConfig,
    client: reqwest::Client,
}

impl GeminiAssistant {
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("inkpress/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("No assistant API key configured, assistant replies will be fallbacks");
        }

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send with retries on rate limiting, doubling the delay each time.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        let mut delay = Duration::from_millis(self.config.retry_base_delay_ms);
        let mut attempt = 0;

        loop {
            match self.send(request).await {
                Err(e) if e.is_rate_limited() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Assistant rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                result => return result,
            }
        }
    }

    async fn send(&self, request: &GenerateRequest) -> Result<String, AssistantError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingApiKey)?;

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }

    async fn try_analyze(&self, image: &[u8], prompt: &str) -> Result<String, AssistantError> {
        let image = image.to_vec();
        let data = tokio::task::spawn_blocking(move || prepare_image(&image))
            .await
            .map_err(|e| AssistantError::Task(e.to_string()))??;

        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::jpeg(data), Part::text(prompt)],
            }],
        };
        self.generate(&request).await
    }

    async fn try_chat(
        &self,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, AssistantError> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|m| Content {
                role: Some(
                    match m.role {
                        ChatRole::User => "user",
                        ChatRole::Model => "model",
                    }
                    .to_string(),
                ),
                parts: vec![Part::text(m.text.clone())],
            })
            .collect();
        contents.push(Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(message)],
        });

        let request = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part::text(self.config.system_instruction.clone())],
            }),
            contents,
        };
        self.generate(&request).await
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn analyze(&self, image: &[u8], prompt: &str) -> String {
        match self.try_analyze(image, prompt).await {
            Ok(text) if text.trim().is_empty() => ANALYZE_EMPTY.to_string(),
            Ok(text) => {
                tracing::info!(chars = text.len(), "Assistant analysis complete");
                text
            }
            Err(e) => {
                tracing::error!(error = %e, "Assistant analysis failed");
                ANALYZE_FALLBACK.to_string()
            }
        }
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> String {
        match self.try_chat(history, message).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Assistant chat failed");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_fx::PixelBuffer;

    #[test]
    fn test_rate_limit_detection() {
        let status = |status, body: &str| AssistantError::Status {
            status,
            body: body.to_string(),
        };
        assert!(status(429, "").is_rate_limited());
        assert!(status(403, "Quota exceeded for project").is_rate_limited());
        assert!(!status(500, "internal").is_rate_limited());
        assert!(!AssistantError::MissingApiKey.is_rate_limited());
    }

    #[test]
    fn test_prepare_image_downscales() {
        let png = rendering::encode_png(&PixelBuffer::filled(1024, 256, [9, 9, 9, 255]), None)
            .unwrap();
        let b64 = prepare_image(&png).unwrap();
        let jpeg = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (512, 128));
    }

    #[test]
    fn test_prepare_image_keeps_small_images() {
        let png =
            rendering::encode_png(&PixelBuffer::filled(40, 30, [9, 9, 9, 255]), None).unwrap();
        let jpeg = base64::engine::general_purpose::STANDARD
            .decode(prepare_image(&png).unwrap())
            .unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Hello there");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::jpeg("AAAA".to_string()), Part::text("describe")],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "describe");
    }

    #[tokio::test]
    async fn test_missing_key_falls_back() {
        let assistant = GeminiAssistant::new(AssistantConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(assistant.chat(&[], "hi").await, CHAT_FALLBACK);
    }
}
