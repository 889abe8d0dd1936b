use serde::{Deserialize, Serialize};

use super::repo_types::Role;

/// Request body for login with an identity-provider token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Identity derived once at login and carried by the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub id: String,
    pub phone: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Response returned after login or refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: SessionIdentity,
}

/// Identity as seen from a bearer token alone.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub phone: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RolesQuery {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    /// Every role registered for the phone, in lookup precedence.
    pub roles: Vec<Role>,
    /// Role that wins when no role is specified.
    pub primary: Option<Role>,
}
