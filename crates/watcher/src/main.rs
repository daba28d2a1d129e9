//! Headless request watcher: polls the mentorship API for the configured
//! account and logs every notification a UI would show.

mod presenter;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use mentor_client::HttpRequestDirectory;
use mentor_common::config::AppConfig;
use mentor_notifier::notification::inbox_path;
use mentor_notifier::{NotifierConfig, RequestStatusNotifier};

use crate::presenter::TerminalPresenter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mentor_watcher=info,mentor_notifier=info,mentor_client=info".into()),
        )
        .json()
        .init();

    tracing::info!("Mentorship request watcher starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    let directory = HttpRequestDirectory::new(
        config.api_url.clone(),
        Some(config.api_token.clone()),
        Duration::from_millis(config.http_timeout_ms),
    )?;

    tracing::info!(
        api_url = directory.base_url(),
        authenticated = directory.is_authenticated(),
        account = %config.auth_type,
        inbox = inbox_path(config.auth_type),
        "Session configured"
    );

    let notifier = RequestStatusNotifier::new(
        Arc::new(directory),
        NotifierConfig::from_app_config(&config),
    );
    let presenter = tokio::spawn(TerminalPresenter::new().run(notifier.subscribe()));

    notifier.start_background_check();

    // Run until Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal, stopping gracefully...");

    notifier.shutdown().await;
    let unread = notifier.get_new_messages_count();
    drop(notifier);

    let presenter = presenter.await?;
    tracing::info!(
        unread,
        shown = presenter.shown(),
        badge = presenter.badge(),
        "Mentorship request watcher stopped."
    );
    Ok(())
}
