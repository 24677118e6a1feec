//! Reflective feedback on a journal entry from an external text-generation service.
//!
//! Provides [`render_prompt`], the [`FeedbackProvider`] trait and an OpenAI
//! chat-completions implementation. The provider is created via [`create_provider`]
//! from configuration.

pub mod openai;

use async_trait::async_trait;
use serde::Deserialize;

/// Why a generation call failed. The HTTP layer reports all of these the same way;
/// the split exists so a retry policy can tell transient causes apart.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("no API key configured for the feedback provider")]
    MissingApiKey,
    #[error("provider rejected the credentials ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("provider rate limit hit: {0}")]
    RateLimited(String),
    #[error("request to provider timed out")]
    Timeout,
    #[error("provider unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },
    #[error("provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("network error talking to provider: {0}")]
    Network(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    /// `true` when the same request could succeed if sent again later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Timeout | Self::Unavailable { .. } | Self::Network(_)
        )
    }
}

/// Generates free text for a prompt.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, UpstreamError>;

    /// Identifier of the model behind this provider, for logs.
    fn model(&self) -> &str;
}

/// The entry fields the prompt reads. Every field is optional; entries, partial
/// entries and plain objects are all accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptFields {
    #[serde(default)]
    pub todo: Option<Vec<String>>,
    #[serde(default)]
    pub wins: Option<Vec<String>>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub inspiration: Option<String>,
    #[serde(default)]
    pub emotions: Option<Vec<String>>,
    #[serde(default)]
    pub reflection: Option<String>,
}

impl From<&crate::journal::JournalEntry> for PromptFields {
    fn from(entry: &crate::journal::JournalEntry) -> Self {
        Self {
            todo: Some(entry.todo.clone()),
            wins: Some(entry.wins.clone()),
            quote: entry.quote.clone(),
            inspiration: entry.inspiration.clone(),
            emotions: Some(entry.emotions.clone()),
            reflection: Some(entry.reflection.clone()),
        }
    }
}

const NOT_AVAILABLE: &str = "N/A";

fn list_or_na(items: Option<&[String]>) -> String {
    let joined = items.map(|items| items.join(", ")).unwrap_or_default();
    if joined.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        joined
    }
}

fn text_or_na(text: Option<&str>) -> &str {
    text.filter(|t| !t.is_empty()).unwrap_or(NOT_AVAILABLE)
}

/// Render the fixed feedback prompt. Absent or empty fields read `N/A`.
pub fn render_prompt(fields: &PromptFields) -> String {
    format!(
        "\nYou are a compassionate therapist and journal advisor.\n\
         Here is someone's journal entry:\n\
         - Todo: {todo}\n\
         - Wins: {wins}\n\
         - Quote: {quote}\n\
         - Inspirational Thought: {inspiration}\n\
         - Emotions: {emotions}\n\
         - Reflection: {reflection}\n\
         \n\
         Please write a thoughtful, kind feedback (3–5 sentences) to help this person reflect and grow.\n",
        todo = list_or_na(fields.todo.as_deref()),
        wins = list_or_na(fields.wins.as_deref()),
        quote = text_or_na(fields.quote.as_deref()),
        inspiration = text_or_na(fields.inspiration.as_deref()),
        emotions = list_or_na(fields.emotions.as_deref()),
        reflection = text_or_na(fields.reflection.as_deref()),
    )
}

/// Create the feedback provider from config.
pub fn create_provider(
    config: &crate::config::FeedbackConfig,
) -> anyhow::Result<Box<dyn FeedbackProvider>> {
    let provider = openai::OpenAiFeedback::new(config)?;
    Ok(Box::new(provider))
}
