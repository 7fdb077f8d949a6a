use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(AppError::BadRequest(format!("Unknown role: {s}"))),
        }
    }
}

/// Encodes a role set for the `users.roles` column.
pub fn encode_roles(roles: &[Role]) -> String {
    serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes the `users.roles` column. A user always holds at least one role.
pub fn decode_roles(raw: &str) -> Result<Vec<Role>, AppError> {
    let roles: Vec<Role> = serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Corrupt role set {raw:?}: {e}")))?;
    if roles.is_empty() {
        return Err(AppError::Internal("User has no roles".to_string()));
    }
    Ok(roles)
}

/// The first role of the set; this is the one embedded in issued tokens.
pub fn primary_role(raw: &str) -> Result<Role, AppError> {
    decode_roles(raw).map(|roles| roles[0])
}
