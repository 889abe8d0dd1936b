use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::{
    auth::repo::AccountRepo, boxes::repo::BoxRepo, campaigns::repo::CampaignRepo,
    config::AppConfig, donations::repo::DonationRepo, frames::repo::FrameRepo,
    institutions::repo::InstitutionRepo, push::repo::PushTokenRepo,
    subscriptions::repo::SubscriptionRepo,
};

/// Every persistence concern the handlers need, behind one object.
pub trait Database:
    AccountRepo
    + InstitutionRepo
    + CampaignRepo
    + BoxRepo
    + DonationRepo
    + FrameRepo
    + SubscriptionRepo
    + PushTokenRepo
    + Send
    + Sync
{
}

impl<T> Database for T where
    T: AccountRepo
        + InstitutionRepo
        + CampaignRepo
        + BoxRepo
        + DonationRepo
        + FrameRepo
        + SubscriptionRepo
        + PushTokenRepo
        + Send
        + Sync
{
}

/// Postgres-backed store; one table per entity.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) {
        match sqlx::migrate!("./migrations").run(&self.pool).await {
            Ok(()) => info!("migrations applied"),
            Err(e) => warn!(error = %e, "migration failed; continuing"),
        }
    }
}
