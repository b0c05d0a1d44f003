use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slack_notion_bridge::{config::Config, create_app};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slack_notion_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!(
        anchor_policy = ?config.anchor_policy,
        summarize = config.summarize_threads,
        trigger_reaction = %config.trigger_reaction,
        "Starting Slack to Notion bridge on {}:{}",
        config.host,
        config.port
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = create_app(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Bridge listening at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
