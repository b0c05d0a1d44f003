//! Collects every message of a Slack thread, following pagination.

use std::collections::HashSet;

use crate::{
    config::AnchorPolicy,
    error::{AppError, AppResult},
    models::Thread,
    services::ConversationSource,
};

/// Page size requested from `conversations.replies`.
pub const REPLIES_PAGE_LIMIT: u32 = 1000;

pub struct ThreadCollector<'a, S: ConversationSource + ?Sized> {
    source: &'a S,
    policy: AnchorPolicy,
}

impl<'a, S: ConversationSource + ?Sized> ThreadCollector<'a, S> {
    pub fn new(source: &'a S, policy: AnchorPolicy) -> Self {
        Self { source, policy }
    }

    /// Retrieve the ordered, de-duplicated messages of the thread anchored
    /// at `root_ts`.
    ///
    /// Returns an empty thread when the first page is empty, or when the
    /// anchor is a reply and the policy is [`AnchorPolicy::RootOnly`]. Any
    /// page error aborts the whole collection.
    pub async fn collect(&self, channel_id: &str, root_ts: &str) -> AppResult<Thread> {
        if channel_id.trim().is_empty() || root_ts.trim().is_empty() {
            return Err(AppError::Validation(
                "channel id and thread timestamp must not be empty".to_string(),
            ));
        }

        let mut messages = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut requested_cursors: HashSet<String> = HashSet::new();
        let mut pages = 0usize;

        loop {
            let page = self
                .source
                .replies_page(channel_id, root_ts, cursor.as_deref(), REPLIES_PAGE_LIMIT)
                .await?;
            pages += 1;

            if pages == 1 {
                let Some(anchor) = page.messages.first() else {
                    tracing::debug!(channel_id, root_ts, "Thread has no messages");
                    return Ok(Thread::empty());
                };

                if self.policy == AnchorPolicy::RootOnly && !anchor.is_thread_root() {
                    tracing::info!(
                        channel_id,
                        root_ts,
                        thread_ts = %anchor.thread_timestamp,
                        "Anchor message is a reply; skipping thread"
                    );
                    return Ok(Thread::empty());
                }
            }

            // Slack repeats the parent message at the top of every page
            for message in page.messages {
                if seen.insert(message.timestamp.clone()) {
                    messages.push(message);
                }
            }

            let next = match page.next_cursor {
                Some(next) if page.has_more && !next.is_empty() => next,
                _ => break,
            };

            if !requested_cursors.insert(next.clone()) {
                tracing::warn!(channel_id, root_ts, cursor = %next, "Pagination cursor repeated");
                break;
            }
            cursor = Some(next);
        }

        tracing::debug!(channel_id, root_ts, pages, messages = messages.len(), "Collected thread");
        Ok(Thread::from_messages(messages))
    }
}
