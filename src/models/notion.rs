use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Notion rejects rich-text objects whose content exceeds this many characters.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Notion accepts at most this many children per create/append request.
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Emoji icon of a callout block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    /// Header block carrying the permalink and summary
    Document,
    /// Thread root
    Question,
    /// Every reply
    Note,
}

impl Icon {
    pub fn emoji(self) -> &'static str {
        match self {
            Icon::Document => "📙",
            Icon::Question => "❓",
            Icon::Note => "📝",
        }
    }
}

/// A run of text, optionally hyperlinked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub content: String,
    pub link: Option<String>,
}

impl TextRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: None,
        }
    }

    pub fn linked(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: Some(url.into()),
        }
    }

    /// Split `text` into runs that each fit Notion's per-object limit.
    /// Always yields at least one run.
    pub fn split(text: &str, link: Option<&str>) -> Vec<TextRun> {
        chunk_chars(text, MAX_TEXT_CHARS)
            .into_iter()
            .map(|content| match link {
                Some(url) => TextRun::linked(content, url),
                None => TextRun::plain(content),
            })
            .collect()
    }

    pub fn to_notion(&self) -> Value {
        let mut text = json!({ "content": self.content });
        if let Some(url) = &self.link {
            text["link"] = json!({ "url": url });
        }
        json!({ "type": "text", "text": text })
    }
}

/// One renderable unit of a Notion page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Callout { icon: Icon, rich_text: Vec<TextRun> },
    Paragraph { rich_text: Vec<TextRun> },
}

impl ContentBlock {
    pub fn icon(&self) -> Option<Icon> {
        match self {
            ContentBlock::Callout { icon, .. } => Some(*icon),
            ContentBlock::Paragraph { .. } => None,
        }
    }

    pub fn rich_text(&self) -> &[TextRun] {
        match self {
            ContentBlock::Callout { rich_text, .. } | ContentBlock::Paragraph { rich_text } => {
                rich_text
            }
        }
    }

    /// Concatenated content of every run.
    pub fn plain_text(&self) -> String {
        self.rich_text().iter().map(|r| r.content.as_str()).collect()
    }

    /// Block object in the shape the Notion API expects.
    pub fn to_notion(&self) -> Value {
        let rich_text: Vec<Value> = self.rich_text().iter().map(TextRun::to_notion).collect();
        match self {
            ContentBlock::Callout { icon, .. } => json!({
                "object": "block",
                "type": "callout",
                "callout": {
                    "rich_text": rich_text,
                    "icon": { "type": "emoji", "emoji": icon.emoji() },
                },
            }),
            ContentBlock::Paragraph { .. } => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": rich_text },
            }),
        }
    }
}

/// Page to be created in the destination database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

/// Id of a created Notion page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn chunk_chars(text: &str, max: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}
