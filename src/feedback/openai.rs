//! OpenAI chat-completions feedback provider.
//!
//! Sends the rendered prompt as a single user message to `{api_base}/chat/completions`
//! and returns the first choice's content, trimmed. No retries, no caching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{FeedbackProvider, UpstreamError};
use crate::config::FeedbackConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiFeedback {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiFeedback {
    pub fn new(config: &FeedbackConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("daybook/", env!("CARGO_PKG_VERSION")))
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("no OPENAI_API_KEY configured, feedback requests will fail");
        }

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl FeedbackProvider for OpenAiFeedback {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            return Err(classify_status(status.as_u16(), error_message(&text)));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| UpstreamError::Malformed("response had no message content".into()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn classify_transport(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else if err.is_decode() {
        UpstreamError::Malformed(err.to_string())
    } else {
        UpstreamError::Network(err.to_string())
    }
}

fn classify_status(status: u16, message: String) -> UpstreamError {
    match status {
        401 | 403 => UpstreamError::Unauthorized { status, message },
        408 => UpstreamError::Timeout,
        429 => UpstreamError::RateLimited(message),
        500..=599 => UpstreamError::Unavailable { status, message },
        _ => UpstreamError::Rejected { status, message },
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_status(401, String::new()),
            UpstreamError::Unauthorized { status: 401, .. }
        ));
        assert!(matches!(classify_status(429, String::new()), UpstreamError::RateLimited(_)));
        assert!(matches!(
            classify_status(503, String::new()),
            UpstreamError::Unavailable { status: 503, .. }
        ));
        assert!(matches!(
            classify_status(400, String::new()),
            UpstreamError::Rejected { status: 400, .. }
        ));
    }

    #[test]
    fn error_message_prefers_structured_body() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(error_message(body), "Incorrect API key provided");
        assert_eq!(error_message("bad gateway"), "bad gateway");
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let config = FeedbackConfig {
            api_base: "http://localhost:9999/v1/".into(),
            model: "gpt-4".into(),
            api_key: Some("sk-test".into()),
        };
        let provider = OpenAiFeedback::new(&config).unwrap();
        assert_eq!(provider.endpoint, "http://localhost:9999/v1/chat/completions");
        assert_eq!(provider.model(), "gpt-4");
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = FeedbackConfig {
            api_base: "http://127.0.0.1:9".into(),
            ..FeedbackConfig::default()
        };
        let provider = OpenAiFeedback::new(&config).unwrap();
        let err = provider.generate("hello").await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingApiKey));
    }
}
