//! Route guard: decides whether a screen may be shown to the current user.

use spbu_core::models::user::User;
use spbu_core::permission::{self, ResourceKey};

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

const PUBLIC_PATHS: [&str; 3] = ["/", SIGN_IN_PATH, UNAUTHORIZED_PATH];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToSignIn,
    RedirectToUnauthorized,
}

impl RouteDecision {
    /// Path to navigate to instead, if any.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::RedirectToSignIn => Some(SIGN_IN_PATH),
            RouteDecision::RedirectToUnauthorized => Some(UNAUTHORIZED_PATH),
        }
    }
}

/// Resource protecting `path`, taken from its first segment
/// (`/adjustments/12` is guarded by `adjustments`).
pub fn resource_for_path(path: &str) -> Option<ResourceKey> {
    let first = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('/')
        .split('/')
        .next()
        .unwrap_or_default();
    ResourceKey::parse(first)
}

pub fn guard_route(path: &str, user: Option<&User>) -> RouteDecision {
    let bare = path.split(['?', '#']).next().unwrap_or_default();
    if PUBLIC_PATHS.contains(&bare) {
        return RouteDecision::Allow;
    }
    let Some(user) = user else {
        return RouteDecision::RedirectToSignIn;
    };
    match resource_for_path(bare) {
        Some(resource) if !permission::has_access(Some(user), resource.as_str()) => {
            RouteDecision::RedirectToUnauthorized
        }
        _ => RouteDecision::Allow,
    }
}
