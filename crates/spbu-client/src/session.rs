//! Explicit session context.
//!
//! Login fills the context, logout and any 401 clear it. Clones share
//! the same session.

use std::sync::Arc;

use parking_lot::RwLock;
use spbu_core::models::user::User;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, session: Session) {
        info!(user_id = session.user.id, username = %session.user.username, "Signed in");
        *self.inner.write() = Some(session);
    }

    /// Drop the session. Returns whether one was present.
    pub fn sign_out(&self) -> bool {
        self.inner.write().take().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn clones_share_the_session() {
        let ctx = AuthContext::new();
        let other = ctx.clone();
        assert!(!other.is_authenticated());

        ctx.sign_in(Session {
            token: "t".into(),
            user: User {
                id: 7,
                username: "operator".into(),
                name: "Operator".into(),
                roles: vec!["Operator".into()],
                spbu_id: Some(1),
                created_at: Utc::now(),
            },
        });
        assert_eq!(other.token().as_deref(), Some("t"));
        assert_eq!(other.current_user().map(|u| u.id), Some(7));

        assert!(other.sign_out());
        assert!(!ctx.is_authenticated());
        assert!(!ctx.sign_out());
    }
}
