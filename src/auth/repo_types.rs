use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Role tag carried by every account and by the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
    Volunteer,
    Donor,
    BoxHolder,
}

impl Role {
    /// Precedence used when a phone number is looked up without a role.
    pub const PROBE_ORDER: [Role; 5] = [
        Role::User,
        Role::Admin,
        Role::Volunteer,
        Role::Donor,
        Role::BoxHolder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
            Role::Volunteer => "Volunteer",
            Role::Donor => "Donor",
            Role::BoxHolder => "BoxHolder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "volunteer" => Ok(Role::Volunteer),
            "donor" => Ok(Role::Donor),
            "boxholder" => Ok(Role::BoxHolder),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Account row as stored in the `accounts` table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub phone: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub phone: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Role,
    pub created_at: OffsetDateTime,
}

impl TryFrom<AccountRow> for Account {
    type Error = UnknownRole;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            role: r.role.parse()?,
            id: r.id,
            phone: r.phone,
            email: r.email,
            name: r.name,
            created_at: r.created_at,
        })
    }
}
