use serde::{Deserialize, Serialize};
use validator::Validate;

/// Block/action ids of the "add to Notion" modal. The slash command opens
/// the modal with these ids and the interaction decoder reads them back.
pub const TITLE_BLOCK_ID: &str = "notion_title";
pub const TITLE_ACTION_ID: &str = "title";
pub const CONTENT_BLOCK_ID: &str = "notion_content";
pub const CONTENT_ACTION_ID: &str = "content";

/// A single Slack message as returned by `conversations.replies`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default)]
    pub text: String,

    #[serde(rename = "ts")]
    pub timestamp: String,

    /// Empty when Slack omits `thread_ts` (a root that was never replied to)
    #[serde(rename = "thread_ts", default, skip_serializing_if = "String::is_empty")]
    pub thread_timestamp: String,
}

impl Message {
    pub fn new(
        text: impl Into<String>,
        timestamp: impl Into<String>,
        thread_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            timestamp: timestamp.into(),
            thread_timestamp: thread_timestamp.into(),
        }
    }

    /// A root's own timestamp equals its thread timestamp.
    pub fn is_thread_root(&self) -> bool {
        self.thread_timestamp.is_empty() || self.thread_timestamp == self.timestamp
    }
}

/// Ordered messages of one conversation thread; index 0 is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thread {
    messages: Vec<Message>,
}

impl Thread {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn root(&self) -> Option<&Message> {
        self.messages.first()
    }

    pub fn replies(&self) -> &[Message] {
        self.messages.get(1..).unwrap_or(&[])
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Message texts in thread order separated by blank lines.
    pub fn concatenated_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// One page of a `conversations.replies` listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepliesPage {
    pub messages: Vec<Message>,
    pub has_more: bool,
    /// `None` when the listing is exhausted
    pub next_cursor: Option<String>,
}

/// Item a reaction was added to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReactionItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub ts: String,
}

/// `reaction_added` event body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReactionAdded {
    #[serde(default)]
    pub user: String,
    pub reaction: String,
    pub item: ReactionItem,
    #[serde(default)]
    pub event_ts: String,
}

/// Values submitted through the "add to Notion" modal
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ViewSubmission {
    pub user_id: String,

    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,

    pub content: String,
}

/// Slash command invocation (form-encoded by Slack)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub text: String,
    pub trigger_id: String,
    pub user_id: String,
    pub channel_id: String,
}

/// Every inbound request kind the bridge understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    UrlVerification { challenge: String },
    ReactionAdded(ReactionAdded),
    InteractionSubmit(ViewSubmission),
    SlashCommand(SlashCommand),
    /// Anything else; `kind` is the vendor type string for logging.
    Ignored { kind: String },
}

impl InboundEvent {
    pub fn kind(&self) -> &str {
        match self {
            InboundEvent::UrlVerification { .. } => "url_verification",
            InboundEvent::ReactionAdded(_) => "reaction_added",
            InboundEvent::InteractionSubmit(_) => "view_submission",
            InboundEvent::SlashCommand(_) => "slash_command",
            InboundEvent::Ignored { kind } => kind,
        }
    }
}
