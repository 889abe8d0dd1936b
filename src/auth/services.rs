use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use regex::Regex;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    claims::{Claims, TokenKind},
    dto::{LoginRequest, SessionIdentity},
    error::AuthError,
    identity::IdentityVerifier,
    repo::AccountRepo,
    repo_types::{Account, Role},
};
use crate::{config::JwtConfig, state::AppState};

const UNKNOWN_NAME: &str = "Unknown";

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+[1-9]\d{6,14}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

/// Strips spaces, dashes and parentheses; `None` unless the rest is E.164.
pub(crate) fn normalize_phone(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    is_valid_phone(&cleaned).then_some(cleaned)
}

/// Verifies the identity token, then finds the account for the verified phone and claimed role.
pub async fn resolve_session<V, A>(
    verifier: &V,
    accounts: &A,
    credentials: &LoginRequest,
) -> Result<SessionIdentity, AuthError>
where
    V: IdentityVerifier + ?Sized,
    A: AccountRepo + ?Sized,
{
    if credentials.id_token.trim().is_empty()
        || credentials.phone.trim().is_empty()
        || credentials.role.trim().is_empty()
    {
        return Err(AuthError::MissingCredentials);
    }
    let role: Role = credentials.role.parse()?;

    let verified = verifier.verify(credentials.id_token.trim()).await?;
    if verified.phone != credentials.phone.trim() {
        warn!(
            claimed = %credentials.phone,
            verified = %verified.phone,
            "claimed phone differs from verified phone"
        );
    }

    let account = accounts
        .find_account(&verified.phone, role)
        .await
        .map_err(AuthError::Store)?
        .ok_or(AuthError::AccountNotFound)?;

    info!(account_id = %account.id, %role, "account authenticated");
    Ok(session_identity(&account, &verified.phone))
}

pub(crate) fn session_identity(account: &Account, verified_phone: &str) -> SessionIdentity {
    let phone = if verified_phone.is_empty() {
        account.phone.clone()
    } else {
        verified_phone.to_string()
    };
    SessionIdentity {
        id: account.id.to_string(),
        phone,
        email: account.email.clone().unwrap_or_default(),
        name: account
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        role: account.role,
    }
}

/// Every role registered for `phone`, ordered by lookup precedence.
pub async fn roles_for_phone<A>(accounts: &A, phone: &str) -> anyhow::Result<Vec<Role>>
where
    A: AccountRepo + ?Sized,
{
    let found = accounts.find_accounts_by_phone(phone).await?;
    Ok(Role::PROBE_ORDER
        .into_iter()
        .filter(|r| found.iter().any(|a| a.role == *r))
        .collect())
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
            refresh_ttl: Duration::from_secs((cfg.refresh_ttl_minutes.max(1) as u64) * 60),
        }
    }

    fn sign_with_kind(
        &self,
        account_id: Uuid,
        phone: &str,
        role: Role,
        kind: TokenKind,
    ) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: account_id,
            phone: phone.to_string(),
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(%account_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, account_id: Uuid, phone: &str, role: Role) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, phone, role, TokenKind::Access)
    }

    pub fn sign_refresh(
        &self,
        account_id: Uuid,
        phone: &str,
        role: Role,
    ) -> anyhow::Result<String> {
        self.sign_with_kind(account_id, phone, role, TokenKind::Refresh)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(account_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from_config(&state.config.jwt)
    }
}
