use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ChatMessage, Thread},
};

const SYSTEM_PROMPT: &str = "You are a first-rate editor. You turn long passages into \
                             concise text that keeps the key points.";

const SUMMARY_INSTRUCTION: &str = "Summarize the following conversation in about 100 characters.\n";

/// Thread summarizer backed by the OpenAI chat completions API
#[derive(Clone)]
pub struct SummaryService {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl SummaryService {
    /// `None` unless summarization is enabled and a key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.summarize_threads {
            return None;
        }
        let api_key = config.openai_api_key.clone()?;
        Some(Self::with_base_url(
            api_key,
            &config.openai_api_base,
            &config.openai_model,
        ))
    }

    pub fn with_base_url(api_key: SecretString, base_url: &str, model: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        }
    }

    /// Short summary of every message in the thread.
    pub async fn summarize(&self, thread: &Thread) -> AppResult<String> {
        let request = CompletionRequest {
            model: &self.model,
            messages: Self::build_messages(thread),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "OpenAI API error {status}: {error_text}"
            )));
        }

        let result: CompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse OpenAI response: {e}"))
        })?;

        let summary = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::ExternalService("OpenAI returned no choices".to_string()))?;

        tracing::debug!(model = %self.model, chars = summary.chars().count(), "Thread summarized");
        Ok(summary)
    }

    fn build_messages(thread: &Thread) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(format!("{SUMMARY_INSTRUCTION}{}", thread.concatenated_text())),
        ]
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}
