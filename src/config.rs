use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::AppError;

/// How the thread collector treats a reaction on a message that is not a
/// thread root.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPolicy {
    /// Only root-anchored reactions produce a document; a reply anchor
    /// yields an empty thread after the first page.
    #[default]
    RootOnly,
    /// Collect whatever the replies endpoint returns for the anchor.
    AnyMessage,
}

/// Application configuration loaded from environment variables
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub slack_signing_secret: SecretString,

    pub slack_token: SecretString,

    pub notion_token: SecretString,

    /// Destination Notion database id
    pub notion_database: String,

    #[serde(default = "default_title_property")]
    pub notion_title_property: String,

    pub openai_api_key: Option<SecretString>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default)]
    pub summarize_threads: bool,

    #[serde(default = "default_trigger_reaction")]
    pub trigger_reaction: String,

    #[serde(default)]
    pub anchor_policy: AnchorPolicy,

    #[serde(default = "default_signature_max_age")]
    pub signature_max_age_secs: i64,

    /// Set when the front end (e.g. an API gateway) base64-wraps form bodies
    #[serde(default)]
    pub base64_bodies: bool,

    #[serde(default = "default_slack_api_base")]
    pub slack_api_base: String,

    #[serde(default = "default_notion_api_base")]
    pub notion_api_base: String,

    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_title_property() -> String {
    "Name".to_string()
}

fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_trigger_reaction() -> String {
    "slack-to-notion".to_string()
}

fn default_signature_max_age() -> i64 {
    300
}

fn default_slack_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_notion_api_base() -> String {
    "https://api.notion.com/v1".to_string()
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("SLACK_SIGNING_SECRET", self.slack_signing_secret.expose_secret()),
            ("SLACK_TOKEN", self.slack_token.expose_secret()),
            ("NOTION_TOKEN", self.notion_token.expose_secret()),
            ("NOTION_DATABASE", self.notion_database.as_str()),
            ("TRIGGER_REACTION", self.trigger_reaction.as_str()),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Configuration(format!("{name} must not be empty")));
            }
        }

        if self.summarize_threads && self.openai_api_key.is_none() {
            return Err(AppError::Configuration(
                "SUMMARIZE_THREADS is enabled but OPENAI_API_KEY is not set".to_string(),
            ));
        }

        if self.signature_max_age_secs <= 0 {
            return Err(AppError::Configuration(
                "SIGNATURE_MAX_AGE_SECS must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the Slack signing secret as bytes for HMAC keys
    pub fn signing_secret_bytes(&self) -> &[u8] {
        self.slack_signing_secret.expose_secret().as_bytes()
    }
}
