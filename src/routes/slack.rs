//! Slack webhook routes
//!
//! Endpoints:
//!   POST /slack/events          – Events API (URL verification, reaction_added)
//!   POST /slack/interaction     – Interactivity (modal submissions)
//!   POST /slack/slash_command   – Slash command opening the input modal
//!
//! Every response is produced by [`AckAlways`]. Only the form endpoints
//! honour `base64_bodies`; event callbacks are always raw JSON.

use axum::{extract::State, response::Response, routing::post, Router};

use crate::{
    error::AppResult,
    middleware::{Ack, AckAlways, SlackFormRequest, SlackRequest},
    models::InboundEvent,
    services::PayloadDecoder,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(events))
        .route("/interaction", post(interaction))
        .route("/slash_command", post(slash_command))
}

async fn events(State(state): State<AppState>, request: SlackRequest) -> Response {
    AckAlways::respond("/slack/events", handle_event(&state, &request.body).await)
}

async fn interaction(State(state): State<AppState>, request: SlackFormRequest) -> Response {
    AckAlways::respond(
        "/slack/interaction",
        handle_interaction(&state, &request.body).await,
    )
}

async fn slash_command(State(state): State<AppState>, request: SlackFormRequest) -> Response {
    AckAlways::respond(
        "/slack/slash_command",
        handle_slash_command(&state, &request.body).await,
    )
}

async fn handle_event(state: &AppState, body: &[u8]) -> AppResult<Ack> {
    match PayloadDecoder::decode_event(body)? {
        InboundEvent::UrlVerification { challenge } => Ok(Ack::Challenge(challenge)),
        InboundEvent::ReactionAdded(event) => {
            let outcome = state.bridge().handle_reaction(&event).await?;
            tracing::debug!(reaction = %event.reaction, ?outcome, "Handled reaction");
            Ok(Ack::Received)
        }
        other => {
            tracing::debug!(kind = other.kind(), "Ignoring event");
            Ok(Ack::Received)
        }
    }
}

async fn handle_interaction(state: &AppState, body: &[u8]) -> AppResult<Ack> {
    match PayloadDecoder::decode_interaction(body)? {
        InboundEvent::InteractionSubmit(submission) => {
            state.bridge().handle_submission(&submission).await?;
            Ok(Ack::Received)
        }
        other => {
            tracing::debug!(kind = other.kind(), "Ignoring interaction");
            Ok(Ack::Received)
        }
    }
}

async fn handle_slash_command(state: &AppState, body: &[u8]) -> AppResult<Ack> {
    match PayloadDecoder::decode_slash_command(body)? {
        InboundEvent::SlashCommand(command) => {
            state.bridge().handle_slash_command(&command).await?;
            Ok(Ack::Received)
        }
        other => {
            tracing::debug!(kind = other.kind(), "Ignoring slash command payload");
            Ok(Ack::Received)
        }
    }
}
