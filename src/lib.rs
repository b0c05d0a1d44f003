pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use anyhow::Result;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{
    config::Config,
    services::{BridgeService, NotionService, SlackService, SummaryService},
};

/// Slack never sends webhook bodies anywhere near this size.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub slack: SlackService,
    pub notion: NotionService,
    pub summarizer: Option<SummaryService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            slack: SlackService::new(&config),
            notion: NotionService::new(&config),
            summarizer: SummaryService::from_config(&config),
            config,
        }
    }

    pub fn bridge(&self) -> BridgeService<'_> {
        BridgeService::new(
            &self.config,
            &self.slack,
            &self.notion,
            self.summarizer.as_ref(),
        )
    }
}

/// Create the application with all routes and middleware
pub fn create_app(config: Config) -> Result<Router> {
    config.validate()?;

    let state = AppState::new(config);

    let app = Router::new()
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    Ok(app)
}
