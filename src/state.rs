use std::sync::Arc;

use crate::auth::identity::{FirebaseVerifier, IdentityVerifier};
use crate::config::AppConfig;
use crate::db::{Database, PgStore};
use crate::reminders::notifier::{ExpoNotifier, Notifier};
use crate::storage::{Storage, StorageClient};

#[cfg(test)]
pub mod testing;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let store = PgStore::connect(&config).await?;
        store.migrate().await;

        // S3-compatible bucket for frame images
        let storage = Arc::new(Storage::new(&config.storage).await?) as Arc<dyn StorageClient>;
        let identity =
            Arc::new(FirebaseVerifier::new(&config.firebase)) as Arc<dyn IdentityVerifier>;
        let notifier = Arc::new(ExpoNotifier::new(&config.expo_push_url)?) as Arc<dyn Notifier>;

        Ok(Self {
            db: Arc::new(store),
            config,
            storage,
            identity,
            notifier,
        })
    }

    pub fn from_parts(
        db: Arc<dyn Database>,
        config: Arc<AppConfig>,
        storage: Arc<dyn StorageClient>,
        identity: Arc<dyn IdentityVerifier>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            db,
            config,
            storage,
            identity,
            notifier,
        }
    }
}
