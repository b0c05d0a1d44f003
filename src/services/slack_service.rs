//! Slack Web API client.
//!
//! Handles:
//!   1. `conversations.replies` pagination (via [`ConversationSource`])
//!   2. `chat.getPermalink`
//!   3. `views.open` for the "add to Notion" modal

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        Message, RepliesPage, CONTENT_ACTION_ID, CONTENT_BLOCK_ID, TITLE_ACTION_ID,
        TITLE_BLOCK_ID,
    },
};

/// Paginated access to the replies of a conversation thread.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    async fn replies_page(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> AppResult<RepliesPage>;
}

// ---------------------------------------------------------------------------
// Slack API response types
// ---------------------------------------------------------------------------

/// Response from `conversations.replies`.
#[derive(Debug, Deserialize)]
struct RepliesResponse {
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

/// Response from `chat.getPermalink`.
#[derive(Debug, Deserialize)]
struct PermalinkResponse {
    permalink: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SlackService {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl SlackService {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config.slack_token.clone(), &config.slack_api_base)
    }

    pub fn with_base_url(token: SecretString, base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Fetch one page of replies for the thread anchored at `thread_ts`.
    pub async fn conversation_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> AppResult<RepliesPage> {
        let limit = limit.to_string();
        let mut query = vec![("channel", channel_id), ("ts", thread_ts), ("limit", limit.as_str())];
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor));
        }

        let response = self
            .http
            .get(self.endpoint("conversations.replies"))
            .bearer_auth(self.token.expose_secret())
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("Slack conversations.replies request failed: {e}"))
            })?;

        let replies: RepliesResponse = read_slack_response("conversations.replies", response).await?;

        Ok(RepliesPage {
            messages: replies.messages,
            has_more: replies.has_more,
            next_cursor: replies
                .response_metadata
                .map(|m| m.next_cursor)
                .filter(|c| !c.is_empty()),
        })
    }

    /// Resolve the permalink of a message.
    pub async fn get_permalink(&self, channel_id: &str, message_ts: &str) -> AppResult<String> {
        let response = self
            .http
            .get(self.endpoint("chat.getPermalink"))
            .bearer_auth(self.token.expose_secret())
            .query(&[("channel", channel_id), ("message_ts", message_ts)])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("Slack chat.getPermalink request failed: {e}"))
            })?;

        let body: PermalinkResponse = read_slack_response("chat.getPermalink", response).await?;
        Ok(body.permalink)
    }

    /// Open a modal view in response to an interaction trigger.
    pub async fn open_view(&self, trigger_id: &str, view: &Value) -> AppResult<()> {
        let response = self
            .http
            .post(self.endpoint("views.open"))
            .bearer_auth(self.token.expose_secret())
            .json(&json!({ "trigger_id": trigger_id, "view": view }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Slack views.open request failed: {e}")))?;

        let _: Value = read_slack_response("views.open", response).await?;
        Ok(())
    }

    /// Modal asking for a page title and body.
    pub fn build_input_modal() -> Value {
        json!({
            "type": "modal",
            "title": plain_text("Add to Notion DB"),
            "submit": plain_text("Add"),
            "close": plain_text("Cancel"),
            "blocks": [
                {
                    "type": "input",
                    "block_id": TITLE_BLOCK_ID,
                    "label": plain_text("Title"),
                    "element": {
                        "type": "plain_text_input",
                        "action_id": TITLE_ACTION_ID,
                        "placeholder": plain_text("Title"),
                    },
                },
                {
                    "type": "input",
                    "block_id": CONTENT_BLOCK_ID,
                    "label": plain_text("Details"),
                    "element": {
                        "type": "plain_text_input",
                        "action_id": CONTENT_ACTION_ID,
                        "multiline": true,
                        "placeholder": plain_text("Details"),
                    },
                },
            ],
        })
    }
}

#[async_trait]
impl ConversationSource for SlackService {
    async fn replies_page(
        &self,
        channel_id: &str,
        thread_ts: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> AppResult<RepliesPage> {
        self.conversation_replies(channel_id, thread_ts, cursor, limit)
            .await
    }
}

fn plain_text(text: &str) -> Value {
    json!({ "type": "plain_text", "text": text, "emoji": true })
}

/// Slack reports API failures as HTTP 200 with `"ok": false`.
async fn read_slack_response<T: DeserializeOwned>(method: &str, response: Response) -> AppResult<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::ExternalService(format!(
            "Slack {method} HTTP error {status}: {body}"
        )));
    }

    let body: Value = response.json().await.map_err(|e| {
        AppError::ExternalService(format!("Failed to parse Slack {method} response: {e}"))
    })?;

    if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        let err = body.get("error").and_then(Value::as_str).unwrap_or("unknown");
        return Err(AppError::ExternalService(format!("Slack {method} error: {err}")));
    }

    serde_json::from_value(body).map_err(|e| {
        AppError::ExternalService(format!("Unexpected Slack {method} response shape: {e}"))
    })
}
