//! Turns a collected thread into a Notion [`Document`].

use crate::models::{ContentBlock, Document, Icon, Message, TextRun, Thread};

const THREAD_LABEL: &str = "■ Slack thread\n";
const SUMMARY_LABEL: &str = "■ Summary\n\n";
const HEADER_SEPARATOR: &str = "\n\n";

pub struct DocumentAssembler;

impl DocumentAssembler {
    /// Build the page for `thread`.
    ///
    /// The title is the root message text. A header callout is prepended
    /// only when a non-empty permalink or summary is given; every message
    /// then becomes one callout in thread order.
    pub fn assemble(thread: &Thread, permalink: Option<&str>, summary: Option<&str>) -> Document {
        let title = thread
            .root()
            .map(|root| root.text.clone())
            .unwrap_or_default();

        let mut blocks = Vec::with_capacity(thread.len() + 1);
        if let Some(header) = Self::header_block(permalink, summary) {
            blocks.push(header);
        }
        if let Some(root) = thread.root() {
            blocks.push(Self::message_block(Icon::Question, root));
        }
        blocks.extend(
            thread
                .replies()
                .iter()
                .map(|reply| Self::message_block(Icon::Note, reply)),
        );

        Document { title, blocks }
    }

    /// Page created from the modal: the content field as one paragraph.
    pub fn assemble_note(title: &str, content: &str) -> Document {
        Document {
            title: title.to_string(),
            blocks: vec![ContentBlock::Paragraph {
                rich_text: TextRun::split(content, None),
            }],
        }
    }

    fn header_block(permalink: Option<&str>, summary: Option<&str>) -> Option<ContentBlock> {
        let permalink = permalink.filter(|p| !p.is_empty());
        let summary = summary.filter(|s| !s.is_empty());
        if permalink.is_none() && summary.is_none() {
            return None;
        }

        let mut rich_text = Vec::new();
        if let Some(url) = permalink {
            rich_text.push(TextRun::plain(THREAD_LABEL));
            rich_text.extend(TextRun::split(url, Some(url)));
        }
        if let Some(summary) = summary {
            if permalink.is_some() {
                rich_text.push(TextRun::plain(HEADER_SEPARATOR));
            }
            rich_text.push(TextRun::plain(SUMMARY_LABEL));
            rich_text.extend(TextRun::split(summary, None));
        }

        Some(ContentBlock::Callout {
            icon: Icon::Document,
            rich_text,
        })
    }

    fn message_block(icon: Icon, message: &Message) -> ContentBlock {
        ContentBlock::Callout {
            icon,
            rich_text: TextRun::split(&message.text, None),
        }
    }
}
