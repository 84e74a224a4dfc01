//! Role-based permission evaluator.
//!
//! Every authorization decision in the system, client or server, is
//! answered here from a static role × resource table. Evaluation is pure
//! and never fails: absent users, unknown roles and unknown resource keys
//! all degrade to [`AccessLevel::None`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpbuError, SpbuResult};
use crate::models::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Operator,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Operator, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Operator => "Operator",
            Role::Admin => "Admin",
            Role::SuperAdmin => "Super Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SpbuError;

    /// Accepts the canonical names case-insensitively, ignoring spaces,
    /// dashes and underscores (`Super Admin`, `super_admin`, `SUPERADMIN`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "operator" => Ok(Role::Operator),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            _ => Err(SpbuError::validation(format!("unknown role: {s}"))),
        }
    }
}

/// A protected feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKey {
    Dashboard,
    Spbu,
    Tanks,
    Sales,
    Deliveries,
    Deposits,
    Prices,
    Adjustments,
    Reports,
    Predictions,
    Users,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 11] = [
        ResourceKey::Dashboard,
        ResourceKey::Spbu,
        ResourceKey::Tanks,
        ResourceKey::Sales,
        ResourceKey::Deliveries,
        ResourceKey::Deposits,
        ResourceKey::Prices,
        ResourceKey::Adjustments,
        ResourceKey::Reports,
        ResourceKey::Predictions,
        ResourceKey::Users,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::Dashboard => "dashboard",
            ResourceKey::Spbu => "spbu",
            ResourceKey::Tanks => "tanks",
            ResourceKey::Sales => "sales",
            ResourceKey::Deliveries => "deliveries",
            ResourceKey::Deposits => "deposits",
            ResourceKey::Prices => "prices",
            ResourceKey::Adjustments => "adjustments",
            ResourceKey::Reports => "reports",
            ResourceKey::Predictions => "predictions",
            ResourceKey::Users => "users",
        }
    }

    /// Parse a resource key, returning `None` for anything unknown.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access a role grants on a resource.
///
/// `Limited` means "can create but not approve or manage"; `Full` means
/// "can approve and manage". Ordering follows increasing privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessLevel {
    None,
    ReadOnly,
    Limited,
    Full,
}

/// The static permission table.
pub fn role_access(role: Role, resource: ResourceKey) -> AccessLevel {
    use AccessLevel::*;
    use ResourceKey as R;

    match role {
        Role::SuperAdmin => Full,
        Role::Admin => match resource {
            R::Dashboard | R::Tanks | R::Sales | R::Deliveries | R::Deposits | R::Adjustments => {
                Full
            }
            R::Spbu | R::Prices | R::Reports | R::Predictions => ReadOnly,
            R::Users => Limited,
        },
        Role::Operator => match resource {
            R::Sales | R::Deliveries | R::Deposits | R::Adjustments => Limited,
            R::Dashboard | R::Tanks | R::Prices => ReadOnly,
            R::Spbu | R::Reports | R::Predictions | R::Users => None,
        },
    }
}

/// Highest access any of the user's roles grants on `resource`.
pub fn access_for(user: Option<&User>, resource: ResourceKey) -> AccessLevel {
    user.into_iter()
        .flat_map(|u| u.known_roles())
        .map(|role| role_access(role, resource))
        .max()
        .unwrap_or(AccessLevel::None)
}

/// Like [`access_for`], keyed by the resource's string name.
pub fn access_level(user: Option<&User>, resource: &str) -> AccessLevel {
    match ResourceKey::parse(resource) {
        Some(key) => access_for(user, key),
        None => AccessLevel::None,
    }
}

pub fn has_access(user: Option<&User>, resource: &str) -> bool {
    access_level(user, resource) != AccessLevel::None
}

pub fn has_full_access(user: Option<&User>, resource: &str) -> bool {
    access_level(user, resource) == AccessLevel::Full
}

pub fn has_limited_access(user: Option<&User>, resource: &str) -> bool {
    access_level(user, resource) == AccessLevel::Limited
}

pub fn has_read_only_access(user: Option<&User>, resource: &str) -> bool {
    access_level(user, resource) == AccessLevel::ReadOnly
}

/// Whether the user holds at least `required` on `resource`.
pub fn allows(user: Option<&User>, resource: ResourceKey, required: AccessLevel) -> bool {
    access_for(user, resource) >= required
}

/// Fail with [`SpbuError::AuthorizationDenied`] unless [`allows`] holds.
pub fn require(user: &User, resource: ResourceKey, required: AccessLevel) -> SpbuResult<()> {
    if allows(Some(user), resource, required) {
        Ok(())
    } else {
        Err(SpbuError::denied(format!(
            "{} lacks {:?} access to {}",
            user.username, required, resource
        )))
    }
}

/// Access level on every resource, keyed by resource name.
pub fn permission_map(user: Option<&User>) -> BTreeMap<String, AccessLevel> {
    ResourceKey::ALL
        .into_iter()
        .map(|key| (key.as_str().to_string(), access_for(user, key)))
        .collect()
}

pub fn is_super_admin(user: &User) -> bool {
    user.has_role(Role::SuperAdmin)
}

/// Whether the user may see data belonging to station `spbu_id`.
///
/// Super Admins see every station; everyone else only their own.
pub fn can_view_station(user: &User, spbu_id: i64) -> bool {
    is_super_admin(user) || user.spbu_id == Some(spbu_id)
}

/// Station filter to apply to list queries for this user.
pub fn station_scope(user: &User) -> Option<i64> {
    if is_super_admin(user) {
        None
    } else {
        // Non-global users without an affiliation see nothing.
        Some(user.spbu_id.unwrap_or(-1))
    }
}

/// Station a new record created by `user` belongs to.
///
/// Station-bound users always create in their own station and may not
/// name another one. Super Admins must name the station explicitly.
pub fn resolve_station(user: &User, requested: Option<i64>) -> SpbuResult<i64> {
    if is_super_admin(user) {
        return requested.ok_or_else(|| SpbuError::validation("spbuId is required"));
    }
    match (user.spbu_id, requested) {
        (None, _) => Err(SpbuError::denied(format!(
            "{} is not assigned to a station",
            user.username
        ))),
        (Some(own), Some(other)) if own != other => Err(SpbuError::denied(format!(
            "{} cannot act on station {other}",
            user.username
        ))),
        (Some(own), _) => Ok(own),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(roles: &[&str]) -> User {
        User {
            id: 1,
            username: "u".into(),
            name: "U".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            spbu_id: Some(1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn super_admin_has_full_access_everywhere() {
        let u = user(&["Super Admin"]);
        for key in ResourceKey::ALL {
            assert!(has_full_access(Some(&u), key.as_str()), "{key}");
        }
    }

    #[test]
    fn no_user_or_no_roles_has_no_access() {
        let empty = user(&[]);
        let unknown = user(&["Cashier"]);
        for key in ResourceKey::ALL {
            assert!(!has_access(None, key.as_str()));
            assert!(!has_access(Some(&empty), key.as_str()));
            assert!(!has_access(Some(&unknown), key.as_str()));
        }
    }

    #[test]
    fn operator_has_limited_adjustments() {
        let op = user(&["Operator"]);
        assert!(has_limited_access(Some(&op), "adjustments"));
        assert!(!has_full_access(Some(&op), "adjustments"));
        assert!(has_access(Some(&op), "adjustments"));
    }

    #[test]
    fn admin_has_full_adjustments() {
        let admin = user(&["Admin"]);
        assert!(has_full_access(Some(&admin), "adjustments"));
        assert!(!has_limited_access(Some(&admin), "adjustments"));
    }

    #[test]
    fn read_only_levels() {
        let op = user(&["Operator"]);
        assert!(has_read_only_access(Some(&op), "tanks"));
        assert!(!has_access(Some(&op), "reports"));
        let admin = user(&["Admin"]);
        assert!(has_read_only_access(Some(&admin), "prices"));
    }

    #[test]
    fn unknown_resource_is_denied() {
        let sa = user(&["Super Admin"]);
        assert_eq!(access_level(Some(&sa), "payroll"), AccessLevel::None);
        assert!(!has_access(Some(&sa), ""));
    }

    #[test]
    fn multiple_roles_take_the_highest_level() {
        let both = user(&["Operator", "Admin"]);
        assert_eq!(access_level(Some(&both), "adjustments"), AccessLevel::Full);
        assert_eq!(access_level(Some(&both), "users"), AccessLevel::Limited);
    }

    #[test]
    fn role_names_are_lenient() {
        assert_eq!("super_admin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("SuperAdmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("OPERATOR".parse::<Role>().unwrap(), Role::Operator);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn station_resolution() {
        let op = user(&["Operator"]);
        assert_eq!(resolve_station(&op, None).unwrap(), 1);
        assert_eq!(resolve_station(&op, Some(1)).unwrap(), 1);
        assert!(resolve_station(&op, Some(2)).is_err());

        let mut sa = user(&["Super Admin"]);
        sa.spbu_id = None;
        assert!(resolve_station(&sa, None).is_err());
        assert_eq!(resolve_station(&sa, Some(9)).unwrap(), 9);
        assert!(can_view_station(&sa, 42));
        assert!(!can_view_station(&op, 42));
    }
}
