use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo_types::{Account, AccountRow, Role};
use crate::db::PgStore;

#[async_trait]
pub trait AccountRepo: Send + Sync {
    /// Account matching both phone and role; `(phone, role)` is unique.
    async fn find_account(&self, phone: &str, role: Role) -> anyhow::Result<Option<Account>>;
    async fn find_account_by_id(&self, id: Uuid) -> anyhow::Result<Option<Account>>;
    async fn find_accounts_by_phone(&self, phone: &str) -> anyhow::Result<Vec<Account>>;
}

const ACCOUNT_COLUMNS: &str = "id, phone, email, name, role, created_at";

#[async_trait]
impl AccountRepo for PgStore {
    async fn find_account(&self, phone: &str, role: Role) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone = $1 AND role = $2"
        ))
        .bind(phone)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("find account by phone and role")?;
        row.map(Account::try_from).transpose().map_err(Into::into)
    }

    async fn find_account_by_id(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find account by id")?;
        row.map(Account::try_from).transpose().map_err(Into::into)
    }

    async fn find_accounts_by_phone(&self, phone: &str) -> anyhow::Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_all(&self.pool)
        .await
        .context("find accounts by phone")?;
        rows.into_iter()
            .map(|r| Account::try_from(r).map_err(Into::into))
            .collect()
    }
}
