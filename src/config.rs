use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub project_id: String,
    pub jwks_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base of the public object URLs handed to clients, without trailing slash.
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub firebase: FirebaseConfig,
    pub storage: StorageConfig,
    pub reminder: ReminderConfig,
    pub expo_push_url: String,
    /// Return the underlying reason of a failed login instead of the generic message.
    pub auth_expose_errors: bool,
}

const GOOGLE_SECURETOKEN_JWKS: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: env_or("JWT_ISSUER", "donation-hub"),
            audience: env_or("JWT_AUDIENCE", "donation-hub-clients"),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let firebase = FirebaseConfig {
            project_id: std::env::var("FIREBASE_PROJECT_ID")?,
            jwks_url: env_or("FIREBASE_JWKS_URL", GOOGLE_SECURETOKEN_JWKS),
        };
        let storage = StorageConfig {
            endpoint: env_or("S3_ENDPOINT", "http://localhost:9000"),
            bucket: env_or("S3_BUCKET", "frames"),
            access_key: env_or("S3_ACCESS_KEY", "minioadmin"),
            secret_key: env_or("S3_SECRET_KEY", "minioadmin"),
            region: env_or("S3_REGION", "us-east-1"),
            public_base_url: env_or("S3_PUBLIC_BASE_URL", "http://localhost:9000/frames")
                .trim_end_matches('/')
                .to_string(),
        };
        let reminder = ReminderConfig {
            enabled: env_parse("REMINDER_ENABLED", true),
            url: env_or("REMINDER_URL", "http://localhost:8080/api/boxes/reminders"),
        };
        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            jwt,
            firebase,
            storage,
            reminder,
            expo_push_url: env_or("EXPO_PUSH_URL", "https://exp.host/--/api/v2/push/send"),
            auth_expose_errors: env_parse("AUTH_EXPOSE_ERRORS", false),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("DONATION_HUB_TEST_BOOL", "not-a-bool");
        assert!(env_parse("DONATION_HUB_TEST_BOOL", true));
        std::env::set_var("DONATION_HUB_TEST_BOOL", "false");
        assert!(!env_parse("DONATION_HUB_TEST_BOOL", true));
        assert_eq!(env_parse("DONATION_HUB_TEST_MISSING", 42u32), 42);
    }
}
