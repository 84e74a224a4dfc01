//! In-memory implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is 16 random
//! bytes (a v4 UUID) generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::Utc;
use spbu_core::error::SpbuResult;
use spbu_core::models::Validate;
use spbu_core::models::user::{CreateUser, User, UserCredentials};
use spbu_core::repository::UserRepository;
use tracing::info;
use uuid::Uuid;

use crate::database::Database;
use crate::error::DbError;

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing.
pub fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Hash(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| DbError::Hash(format!("salt encoding error: {e}")))?;
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

#[derive(Clone)]
pub struct MemoryUserRepository {
    db: Database,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl MemoryUserRepository {
    pub fn new(db: Database) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Database, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, input: CreateUser) -> SpbuResult<User> {
        input.validate()?;
        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let mut tables = self.db.write().await;
        if tables
            .users
            .values()
            .any(|c| c.user.username.eq_ignore_ascii_case(&input.username))
        {
            return Err(DbError::Duplicate {
                entity: "user".into(),
                key: input.username,
            }
            .into());
        }
        if let Some(spbu_id) = input.spbu_id {
            if tables.stations.get(spbu_id).is_none() {
                return Err(DbError::not_found("spbu", spbu_id).into());
            }
        }

        let created = tables.users.insert_with(|id| UserCredentials {
            user: User {
                id,
                username: input.username,
                name: input.name,
                roles: input.roles,
                spbu_id: input.spbu_id,
                created_at: Utc::now(),
            },
            password_hash,
        });
        info!(user_id = created.user.id, username = %created.user.username, "User created");
        Ok(created.user.clone())
    }

    async fn get_by_id(&self, id: i64) -> SpbuResult<User> {
        let tables = self.db.read().await;
        tables
            .users
            .get(id)
            .map(|c| c.user.clone())
            .ok_or_else(|| DbError::not_found("user", id).into())
    }

    async fn get_credentials(&self, username: &str) -> SpbuResult<UserCredentials> {
        let tables = self.db.read().await;
        tables
            .users
            .values()
            .find(|c| c.user.username.eq_ignore_ascii_case(username))
            .cloned()
            .ok_or_else(|| DbError::not_found("user", username).into())
    }

    async fn list(&self, spbu_id: Option<i64>) -> SpbuResult<Vec<User>> {
        let tables = self.db.read().await;
        Ok(tables
            .users
            .values()
            .filter(|c| spbu_id.is_none() || c.user.spbu_id == spbu_id)
            .map(|c| c.user.clone())
            .collect())
    }
}
