mod app;
mod auth;
mod boxes;
mod campaigns;
mod config;
mod db;
mod donations;
mod error;
mod extract;
mod frames;
mod images;
mod institutions;
mod push;
mod reminders;
mod state;
mod storage;
mod subscriptions;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "donation_hub=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let reminder = config.reminder.clone();
    let app_state = AppState::init(config).await?;

    if reminder.enabled {
        reminders::job::spawn(reminder)?;
    } else {
        tracing::info!("weekly payment reminder job disabled");
    }

    app::serve(app::build_app(app_state)).await
}
