//! Decoding of raw Slack request bodies into [`InboundEvent`]s.
//!
//! Events API callbacks arrive as JSON; interactions and slash commands
//! arrive form-encoded, interactions carrying their JSON in a `payload`
//! field.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        InboundEvent, ReactionAdded, SlashCommand, ViewSubmission, CONTENT_ACTION_ID,
        CONTENT_BLOCK_ID, TITLE_ACTION_ID, TITLE_BLOCK_ID,
    },
};

// ---------------------------------------------------------------------------
// Slack payload shapes (only the fields we read)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UrlVerificationBody {
    challenge: String,
}

#[derive(Debug, Deserialize)]
struct InteractionPayload {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    user: Option<InteractionUser>,
    #[serde(default)]
    view: Option<InteractionView>,
}

#[derive(Debug, Deserialize)]
struct InteractionUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct InteractionView {
    state: ViewState,
}

#[derive(Debug, Deserialize)]
struct ViewState {
    #[serde(default)]
    values: HashMap<String, HashMap<String, ActionValue>>,
}

#[derive(Debug, Deserialize)]
struct ActionValue {
    #[serde(default)]
    value: Option<String>,
}

impl ViewState {
    fn value(&self, block_id: &str, action_id: &str) -> String {
        self.values
            .get(block_id)
            .and_then(|actions| actions.get(action_id))
            .and_then(|a| a.value.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

pub struct PayloadDecoder;

impl PayloadDecoder {
    /// Undo base64 transport wrapping applied by some front ends.
    pub fn unwrap_transport(body: &[u8], base64_wrapped: bool) -> AppResult<Vec<u8>> {
        if !base64_wrapped {
            return Ok(body.to_vec());
        }

        let trimmed = body.trim_ascii();
        STANDARD
            .decode(trimmed)
            .map_err(|e| AppError::Decode(format!("body is not valid base64: {e}")))
    }

    /// Decode an Events API request body.
    pub fn decode_event(body: &[u8]) -> AppResult<InboundEvent> {
        let envelope: Value = serde_json::from_slice(body)?;
        let kind = type_of(&envelope)
            .ok_or_else(|| AppError::Decode("event envelope has no type".to_string()))?;

        match kind {
            "url_verification" => {
                let body = UrlVerificationBody::deserialize(&envelope)?;
                Ok(InboundEvent::UrlVerification {
                    challenge: body.challenge,
                })
            }
            "event_callback" => {
                let event = envelope
                    .get("event")
                    .ok_or_else(|| AppError::Decode("event_callback without event".to_string()))?;
                Self::decode_inner_event(event)
            }
            other => Ok(InboundEvent::Ignored {
                kind: other.to_string(),
            }),
        }
    }

    fn decode_inner_event(event: &Value) -> AppResult<InboundEvent> {
        match type_of(event) {
            Some("reaction_added") => {
                let reaction = ReactionAdded::deserialize(event)?;
                Ok(InboundEvent::ReactionAdded(reaction))
            }
            Some(other) => Ok(InboundEvent::Ignored {
                kind: other.to_string(),
            }),
            None => Err(AppError::Decode("inner event has no type".to_string())),
        }
    }

    /// Decode an interactivity request body (`payload=<json>`).
    pub fn decode_interaction(body: &[u8]) -> AppResult<InboundEvent> {
        let payload = form_fields(body)
            .remove("payload")
            .ok_or_else(|| AppError::Decode("interaction body has no payload field".to_string()))?;

        let interaction: InteractionPayload = serde_json::from_str(&payload)?;
        if interaction.kind != "view_submission" {
            return Ok(InboundEvent::Ignored {
                kind: interaction.kind,
            });
        }

        let view = interaction
            .view
            .ok_or_else(|| AppError::Decode("view_submission without view".to_string()))?;

        Ok(InboundEvent::InteractionSubmit(ViewSubmission {
            user_id: interaction.user.map(|u| u.id).unwrap_or_default(),
            title: view.state.value(TITLE_BLOCK_ID, TITLE_ACTION_ID),
            content: view.state.value(CONTENT_BLOCK_ID, CONTENT_ACTION_ID),
        }))
    }

    /// Decode a slash command request body.
    pub fn decode_slash_command(body: &[u8]) -> AppResult<InboundEvent> {
        let mut fields = form_fields(body);
        let trigger_id = fields
            .remove("trigger_id")
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Decode("slash command has no trigger_id".to_string()))?;

        let mut take = |key: &str| fields.remove(key).unwrap_or_default();
        Ok(InboundEvent::SlashCommand(SlashCommand {
            command: take("command"),
            text: take("text"),
            trigger_id,
            user_id: take("user_id"),
            channel_id: take("channel_id"),
        }))
    }
}

fn type_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn form_fields(body: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(body).into_owned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_encode(pairs: &[(&str, &str)]) -> Vec<u8> {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
            .into_bytes()
    }

    #[test]
    fn test_decode_url_verification() {
        let body = br#"{"token":"t","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#;
        let event = PayloadDecoder::decode_event(body).unwrap();
        assert_eq!(
            event,
            InboundEvent::UrlVerification {
                challenge: "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P".to_string()
            }
        );
    }

    #[test]
    fn test_decode_reaction_added_callback() {
        let body = br#"{
            "type": "event_callback",
            "team_id": "T1",
            "event": {
                "type": "reaction_added",
                "user": "U1",
                "reaction": "slack-to-notion",
                "item": {"type": "message", "channel": "C1", "ts": "100.1"},
                "event_ts": "100.5"
            }
        }"#;
        match PayloadDecoder::decode_event(body).unwrap() {
            InboundEvent::ReactionAdded(r) => {
                assert_eq!(r.reaction, "slack-to-notion");
                assert_eq!(r.item.channel, "C1");
                assert_eq!(r.item.ts, "100.1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_unhandled_inner_event_is_ignored() {
        let body = br#"{"type":"event_callback","event":{"type":"app_mention","text":"hi"}}"#;
        let event = PayloadDecoder::decode_event(body).unwrap();
        assert_eq!(
            event,
            InboundEvent::Ignored {
                kind: "app_mention".to_string()
            }
        );
    }

    #[test]
    fn test_decode_unknown_envelope_is_ignored() {
        let body = br#"{"type":"app_rate_limited"}"#;
        let event = PayloadDecoder::decode_event(body).unwrap();
        assert_eq!(event.kind(), "app_rate_limited");
    }

    #[test]
    fn test_decode_malformed_json_is_decode_error() {
        let err = PayloadDecoder::decode_event(b"{not json").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_decode_callback_without_event_is_error() {
        let err = PayloadDecoder::decode_event(br#"{"type":"event_callback"}"#).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_decode_view_submission() {
        let payload = serde_json::json!({
            "type": "view_submission",
            "user": {"id": "U9"},
            "view": {"state": {"values": {
                "notion_title": {"title": {"type": "plain_text_input", "value": "Release notes"}},
                "notion_content": {"content": {"type": "plain_text_input", "value": "Ship v2 & celebrate"}}
            }}}
        })
        .to_string();
        let body = form_encode(&[("payload", payload.as_str())]);

        match PayloadDecoder::decode_interaction(&body).unwrap() {
            InboundEvent::InteractionSubmit(s) => {
                assert_eq!(s.user_id, "U9");
                assert_eq!(s.title, "Release notes");
                assert_eq!(s.content, "Ship v2 & celebrate");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_view_submission_missing_fields_default_empty() {
        let payload = r#"{"type":"view_submission","view":{"state":{"values":{}}}}"#;
        let body = form_encode(&[("payload", payload)]);
        match PayloadDecoder::decode_interaction(&body).unwrap() {
            InboundEvent::InteractionSubmit(s) => {
                assert!(s.title.is_empty());
                assert!(s.content.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_block_actions_is_ignored() {
        let body = form_encode(&[("payload", r#"{"type":"block_actions"}"#)]);
        let event = PayloadDecoder::decode_interaction(&body).unwrap();
        assert_eq!(event.kind(), "block_actions");
    }

    #[test]
    fn test_decode_interaction_without_payload_is_error() {
        let err = PayloadDecoder::decode_interaction(b"foo=bar").unwrap_err();
        assert!(err.to_string().contains("payload"));
    }

    #[test]
    fn test_decode_slash_command() {
        let body = form_encode(&[
            ("command", "/notion"),
            ("text", "hello world"),
            ("trigger_id", "13345224609.738474920.8088930838d88f008e0"),
            ("user_id", "U2147483697"),
            ("channel_id", "C2147483705"),
        ]);
        match PayloadDecoder::decode_slash_command(&body).unwrap() {
            InboundEvent::SlashCommand(cmd) => {
                assert_eq!(cmd.command, "/notion");
                assert_eq!(cmd.text, "hello world");
                assert_eq!(cmd.trigger_id, "13345224609.738474920.8088930838d88f008e0");
                assert_eq!(cmd.channel_id, "C2147483705");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_decode_slash_command_requires_trigger_id() {
        let body = form_encode(&[("command", "/notion")]);
        assert!(PayloadDecoder::decode_slash_command(&body).is_err());
    }

    #[test]
    fn test_unwrap_transport_passthrough() {
        let body = PayloadDecoder::unwrap_transport(b"a=b", false).unwrap();
        assert_eq!(body, b"a=b");
    }

    #[test]
    fn test_unwrap_transport_base64() {
        let wrapped = STANDARD.encode("payload=%7B%7D");
        let body = PayloadDecoder::unwrap_transport(wrapped.as_bytes(), true).unwrap();
        assert_eq!(body, b"payload=%7B%7D");
    }

    #[test]
    fn test_unwrap_transport_rejects_invalid_base64() {
        let err = PayloadDecoder::unwrap_transport(b"%%%", true).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
