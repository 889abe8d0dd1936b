use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{claims::IdTokenClaims, error::AuthError};
use crate::config::FirebaseConfig;

const JWKS_TTL: Duration = Duration::from_secs(60 * 60);
/// An unknown key id refetches a cached set only once it is at least this old.
const JWKS_MIN_REFRESH: Duration = Duration::from_secs(60);

/// Result of a successful identity-provider check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub phone: String,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// Verifies Firebase Auth ID tokens against Google's published signing keys.
pub struct FirebaseVerifier {
    http: reqwest::Client,
    project_id: String,
    jwks_url: String,
    keys: RwLock<Option<(JwkSet, Instant)>>,
}

impl FirebaseVerifier {
    pub fn new(cfg: &FirebaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            project_id: cfg.project_id.clone(),
            jwks_url: cfg.jwks_url.clone(),
            keys: RwLock::new(None),
        }
    }

    /// Looks `kid` up in the cached set. A miss on a set older than
    /// `JWKS_MIN_REFRESH` refetches once, since Google rotates keys inside the TTL.
    async fn signing_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        let cached = self.keys.read().await.clone();
        let set = match cached {
            Some((set, fetched)) if fetched.elapsed() < JWKS_TTL => {
                if let Some(jwk) = set.find(kid) {
                    return Ok(jwk.clone());
                }
                if fetched.elapsed() < JWKS_MIN_REFRESH {
                    return Err(AuthError::InvalidToken(format!("unknown key id {kid}")));
                }
                debug!(kid, "key id not in cached signing keys, refetching");
                self.fetch_key_set().await?
            }
            _ => self.fetch_key_set().await?,
        };
        set.find(kid)
            .cloned()
            .ok_or_else(|| AuthError::InvalidToken(format!("unknown key id {kid}")))
    }

    async fn fetch_key_set(&self) -> Result<JwkSet, AuthError> {
        let set: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::InvalidToken(format!("signing keys unavailable: {e}")))?
            .json()
            .await
            .map_err(|e| AuthError::InvalidToken(format!("signing keys malformed: {e}")))?;
        debug!(keys = set.keys.len(), "firebase signing keys refreshed");
        *self.keys.write().await = Some((set.clone(), Instant::now()));
        Ok(set)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.project_id.as_str()]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, id_token: &str) -> Result<VerifiedIdentity, AuthError> {
        let header =
            decode_header(id_token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("token has no key id".into()))?;

        let jwk = self.signing_key(&kid).await?;
        let key =
            DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let data = decode::<IdTokenClaims>(id_token, &key, &self.validation()).map_err(|e| {
            warn!(error = %e, "id token rejected");
            AuthError::InvalidToken(e.to_string())
        })?;
        identity_from_claims(data.claims)
    }
}

pub(crate) fn identity_from_claims(
    claims: IdTokenClaims,
) -> Result<VerifiedIdentity, AuthError> {
    if claims.sub.is_empty() {
        return Err(AuthError::InvalidToken("empty subject".into()));
    }
    let phone = claims
        .phone_number
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("token carries no phone number".into()))?;
    Ok(VerifiedIdentity {
        uid: claims.sub,
        phone,
    })
}
