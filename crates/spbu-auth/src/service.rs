//! Authentication service: login, token validation and logout.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use spbu_core::error::{SpbuError, SpbuResult};
use spbu_core::models::user::User;
use spbu_core::repository::UserRepository;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, AccessTokenClaims};

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// Authentication service.
///
/// Generic over the user repository so that the auth layer has no
/// dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
    /// Revoked token ids mapped to their expiry (Unix timestamp).
    revoked: Mutex<HashMap<String, i64>>,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self {
            user_repo,
            config,
            revoked: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Authenticate with username + password and issue an access token.
    pub async fn login(&self, username: &str, password: &str) -> SpbuResult<LoginOutput> {
        let creds = match self.user_repo.get_credentials(username).await {
            Ok(c) => c,
            Err(SpbuError::NotFound { .. }) => {
                password::verify_decoy(password, self.config.pepper.as_deref());
                warn!(username, "Login failed: unknown user");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify(password, &creds.password_hash, self.config.pepper.as_deref())?;
        if !valid {
            warn!(username, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let access_token = token::issue_access_token(&creds.user, &self.config)?;
        info!(user_id = creds.user.id, username, "User logged in");

        Ok(LoginOutput {
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
            user: creds.user,
        })
    }

    /// Validate a bearer token and load its user.
    ///
    /// Roles are read from the store, not from the token, so role changes
    /// take effect without re-login.
    pub async fn authenticate(&self, raw_token: &str) -> SpbuResult<(AccessTokenClaims, User)> {
        let claims = token::decode_access_token(raw_token, &self.config)?;
        let revoked = self.revoked.lock().contains_key(&claims.jti);
        if revoked {
            return Err(AuthError::TokenRevoked.into());
        }
        let user = self
            .user_repo
            .get_by_id(claims.user_id()?)
            .await
            .map_err(|e| match e {
                SpbuError::NotFound { .. } => {
                    SpbuError::from(AuthError::TokenInvalid("user no longer exists".into()))
                }
                other => other,
            })?;
        Ok((claims, user))
    }

    /// Revoke the token identified by `claims` (logout).
    pub fn logout(&self, claims: &AccessTokenClaims) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.lock();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti.clone(), claims.exp);
        info!(username = %claims.username, "User logged out");
    }

    /// Enforce the password policy for a new password.
    pub fn check_password_policy(&self, password: &str) -> Result<(), AuthError> {
        password::check_policy(password, self.config.min_password_length)
    }
}
