use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::instrument;
use zeroize::Zeroizing;

use crate::{errors::InferenceError, interfaces::inference::InferenceClient, settings::AppConfig};

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Gemini `generateContent` client. Built once at startup and shared by all requests.
pub struct GeminiClient {
    client: Client,
    api_key: Zeroizing<String>,
    model: String,
    endpoint: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.inference_timeout_secs))
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.gemini_base_url.trim_end_matches('/'),
            config.gemini_model
        );

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            model: config.gemini_model.clone(),
            endpoint,
            temperature: config.inference_temperature,
            max_output_tokens: config.inference_max_output_tokens,
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
            }
        })
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    #[instrument(skip(self, prompt))]
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        let res = self.client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: Value = res.json().await?;
        extract_text(&body).ok_or(InferenceError::EmptyResponse)
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

fn classify_status(status: StatusCode, body: &str) -> InferenceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InferenceError::Unauthorized(status.as_u16()),
        StatusCode::TOO_MANY_REQUESTS => InferenceError::QuotaExceeded,
        _ => InferenceError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppEnvironment;

    fn config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            database_url: "postgres://localhost/skills".into(),
            database_max_connections: 1,
            cors_allowed_origins: vec![],
            gemini_api_key: Zeroizing::new("secret-key".into()),
            gemini_model: "gemini-2.5-flash".into(),
            gemini_base_url: "https://example.test/".into(),
            inference_timeout_secs: 5,
            inference_temperature: 0.3,
            inference_max_output_tokens: 256,
        }
    }

    #[test]
    fn builds_model_endpoint() {
        let client = GeminiClient::new(&config()).unwrap();
        assert_eq!(
            client.endpoint,
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.model_name(), "gemini-2.5-flash");
    }

    #[test]
    fn request_body_carries_prompt_and_generation_config() {
        let client = GeminiClient::new(&config()).unwrap();
        let body = client.request_body("extract this");

        assert_eq!(body["contents"][0]["parts"][0]["text"], "extract this");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn debug_hides_api_key() {
        let client = GeminiClient::new(&config()).unwrap();
        assert!(!format!("{:?}", client).contains("secret-key"));
    }

    #[test]
    fn extracts_and_joins_text_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[{\"skill\":" }, { "text": "\"Rust\"}]" }] }
            }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("[{\"skill\":\"Rust\"}]"));
    }

    #[test]
    fn missing_text_is_none() {
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        assert_eq!(extract_text(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })), None);
        assert_eq!(
            extract_text(&json!({ "candidates": [{ "content": { "parts": [{ "text": "  " }] } }] })),
            None
        );
    }

    #[test]
    fn classifies_error_statuses() {
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, ""),
            InferenceError::Unauthorized(403)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            InferenceError::QuotaExceeded
        ));
        match classify_status(StatusCode::BAD_GATEWAY, &"x".repeat(1000)) {
            InferenceError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), MAX_ERROR_BODY_CHARS);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
