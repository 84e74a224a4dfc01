//! User domain model.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Validate, require_non_empty};
use crate::error::{SpbuError, SpbuResult};
use crate::permission::{AccessLevel, Role};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    /// Role names as issued by the backend (e.g. `Operator`, `Super Admin`).
    #[serde(default)]
    pub roles: Vec<String>,
    /// Station the user is affiliated with. `None` for global users.
    #[serde(default)]
    pub spbu_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Roles this user holds that the system recognizes.
    pub fn known_roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().filter_map(|r| r.parse().ok())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.known_roles().any(|r| r == role)
    }
}

/// A stored user together with its password hash. Never serialized to
/// API consumers.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub name: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub roles: Vec<String>,
    #[serde(default)]
    pub spbu_id: Option<i64>,
}

impl Validate for CreateUser {
    fn validate(&self) -> SpbuResult<()> {
        require_non_empty("username", &self.username)?;
        require_non_empty("name", &self.name)?;
        require_non_empty("password", &self.password)?;
        if self.roles.is_empty() {
            return Err(SpbuError::validation("at least one role is required"));
        }
        if let Some(bad) = self.roles.iter().find(|r| r.parse::<Role>().is_err()) {
            return Err(SpbuError::validation(format!("unknown role: {bad}")));
        }
        Ok(())
    }
}

/// Credentials submitted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// The current user together with their evaluated permissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user: User,
    pub permissions: BTreeMap<String, AccessLevel>,
}
