use crate::error::ApiError;

use super::repo_types::UnknownRole;

pub const GENERIC_AUTH_FAILURE: &str = "Authentication failed. Invalid credentials.";

/// Reasons a login can fail. The kind is kept for logs; callers see one message by default.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("invalid identity token: {0}")]
    InvalidToken(String),
    #[error("User not found. Please register first.")]
    AccountNotFound,
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
    #[error("account lookup failed: {0}")]
    Store(anyhow::Error),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::InvalidToken(_) => "invalid_token",
            Self::AccountNotFound => "account_not_found",
            Self::UnknownRole(_) => "unknown_role",
            Self::Store(_) => "store",
        }
    }

    /// Boundary conversion: `expose` decides whether the caller learns the reason.
    pub fn into_api_error(self, expose: bool) -> ApiError {
        if expose {
            ApiError::AuthenticationFailed(self.to_string())
        } else {
            ApiError::AuthenticationFailed(GENERIC_AUTH_FAILURE.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_detail_by_default() {
        let err = AuthError::AccountNotFound.into_api_error(false);
        assert_eq!(err.to_string(), GENERIC_AUTH_FAILURE);
        assert_eq!(err.kind(), "authentication_failed");
    }

    #[test]
    fn exposed_detail_on_request() {
        let err = AuthError::AccountNotFound.into_api_error(true);
        assert_eq!(err.to_string(), "User not found. Please register first.");

        let err = AuthError::InvalidToken("expired".into()).into_api_error(true);
        assert_eq!(err.to_string(), "invalid identity token: expired");
    }

    #[test]
    fn kinds_are_distinct() {
        assert_eq!(AuthError::MissingCredentials.kind(), "missing_credentials");
        assert_eq!(AuthError::InvalidToken(String::new()).kind(), "invalid_token");
        assert_eq!(AuthError::AccountNotFound.kind(), "account_not_found");
        assert_eq!(
            AuthError::Store(anyhow::anyhow!("down")).kind(),
            "store"
        );
    }
}
