//! Orchestrates one decoded Slack event end to end.

use crate::{
    config::Config,
    error::AppResult,
    models::{PageId, ReactionAdded, SlashCommand, ViewSubmission},
    services::{
        DocumentAssembler, NotionService, SlackService, SummaryService, ThreadCollector,
    },
    utils::{sanitize_title, validate_request},
};

/// What a `reaction_added` event led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// Not the trigger reaction, or not on a message
    Skipped(&'static str),
    /// The anchor produced no messages (e.g. a reply under the root-only policy)
    EmptyThread,
    Published(PageId),
}

pub struct BridgeService<'a> {
    config: &'a Config,
    slack: &'a SlackService,
    notion: &'a NotionService,
    summarizer: Option<&'a SummaryService>,
}

impl<'a> BridgeService<'a> {
    pub fn new(
        config: &'a Config,
        slack: &'a SlackService,
        notion: &'a NotionService,
        summarizer: Option<&'a SummaryService>,
    ) -> Self {
        Self {
            config,
            slack,
            notion,
            summarizer,
        }
    }

    /// Export the reacted-to thread into the Notion database.
    pub async fn handle_reaction(&self, event: &ReactionAdded) -> AppResult<ReactionOutcome> {
        if event.reaction != self.config.trigger_reaction {
            return Ok(ReactionOutcome::Skipped("not the trigger reaction"));
        }
        if event.item.item_type != "message" {
            return Ok(ReactionOutcome::Skipped("reaction is not on a message"));
        }

        let channel = event.item.channel.as_str();
        let anchor_ts = event.item.ts.as_str();

        let thread = ThreadCollector::new(self.slack, self.config.anchor_policy)
            .collect(channel, anchor_ts)
            .await?;
        if thread.is_empty() {
            return Ok(ReactionOutcome::EmptyThread);
        }

        let permalink = self.slack.get_permalink(channel, anchor_ts).await?;

        let summary = match self.summarizer {
            Some(summarizer) => Some(summarizer.summarize(&thread).await?),
            None => None,
        };

        let document =
            DocumentAssembler::assemble(&thread, Some(permalink.as_str()), summary.as_deref());
        let page_id = self
            .notion
            .publish(&document, &self.config.notion_database)
            .await?;

        tracing::info!(
            channel,
            anchor_ts,
            messages = thread.len(),
            page_id = %page_id,
            "Exported Slack thread"
        );
        Ok(ReactionOutcome::Published(page_id))
    }

    /// Publish the title/content entered in the modal.
    pub async fn handle_submission(&self, submission: &ViewSubmission) -> AppResult<PageId> {
        let submission = ViewSubmission {
            title: sanitize_title(&submission.title),
            ..submission.clone()
        };
        validate_request(&submission)?;

        let document = DocumentAssembler::assemble_note(&submission.title, &submission.content);
        let page_id = self
            .notion
            .publish(&document, &self.config.notion_database)
            .await?;

        tracing::info!(user_id = %submission.user_id, page_id = %page_id, "Published modal submission");
        Ok(page_id)
    }

    /// Open the input modal for a slash command.
    pub async fn handle_slash_command(&self, command: &SlashCommand) -> AppResult<()> {
        let modal = SlackService::build_input_modal();
        self.slack.open_view(&command.trigger_id, &modal).await?;
        tracing::debug!(command = %command.command, user_id = %command.user_id, "Opened input modal");
        Ok(())
    }
}
