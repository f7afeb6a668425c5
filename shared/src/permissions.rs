//! Role-based capability checks.
//!
//! Roles map to a fixed list of `<resource>:<verb>` permission strings. The
//! table never changes at runtime and unknown roles hold nothing.

use crate::error::ApiError;

pub const DASHBOARD_VIEW: &str = "dashboard:view";
pub const ORDERS_READ: &str = "orders:read";
pub const ORDERS_UPDATE: &str = "orders:update";
pub const ORDERS_DELETE: &str = "orders:delete";
pub const ORDERS_EXPORT: &str = "orders:export";
pub const SUBSCRIPTIONS_READ: &str = "subscriptions:read";
pub const SUBSCRIPTIONS_UPDATE: &str = "subscriptions:update";
pub const SUBSCRIPTIONS_DELETE: &str = "subscriptions:delete";
pub const SUBSCRIPTIONS_EXPORT: &str = "subscriptions:export";
pub const PRODUCTS_READ: &str = "products:read";
pub const PRODUCTS_CREATE: &str = "products:create";
pub const PRODUCTS_UPDATE: &str = "products:update";
pub const PRODUCTS_DELETE: &str = "products:delete";
pub const SETTINGS_READ: &str = "settings:read";
pub const SETTINGS_UPDATE: &str = "settings:update";
pub const USERS_READ: &str = "users:read";
pub const USERS_MANAGE: &str = "users:manage";

const SUPER_ADMIN: &[&str] = &[
    DASHBOARD_VIEW,
    ORDERS_READ,
    ORDERS_UPDATE,
    ORDERS_DELETE,
    ORDERS_EXPORT,
    SUBSCRIPTIONS_READ,
    SUBSCRIPTIONS_UPDATE,
    SUBSCRIPTIONS_DELETE,
    SUBSCRIPTIONS_EXPORT,
    PRODUCTS_READ,
    PRODUCTS_CREATE,
    PRODUCTS_UPDATE,
    PRODUCTS_DELETE,
    SETTINGS_READ,
    SETTINGS_UPDATE,
    USERS_READ,
    USERS_MANAGE,
];

const ADMIN: &[&str] = &[
    DASHBOARD_VIEW,
    ORDERS_READ,
    ORDERS_UPDATE,
    ORDERS_DELETE,
    ORDERS_EXPORT,
    SUBSCRIPTIONS_READ,
    SUBSCRIPTIONS_UPDATE,
    SUBSCRIPTIONS_DELETE,
    SUBSCRIPTIONS_EXPORT,
    PRODUCTS_READ,
    PRODUCTS_CREATE,
    PRODUCTS_UPDATE,
    PRODUCTS_DELETE,
    SETTINGS_READ,
    USERS_READ,
];

const MANAGER: &[&str] = &[
    DASHBOARD_VIEW,
    ORDERS_READ,
    ORDERS_UPDATE,
    ORDERS_EXPORT,
    SUBSCRIPTIONS_READ,
    SUBSCRIPTIONS_UPDATE,
    SUBSCRIPTIONS_EXPORT,
    PRODUCTS_READ,
    PRODUCTS_CREATE,
    PRODUCTS_UPDATE,
    SETTINGS_READ,
];

const SUPPORT: &[&str] = &[
    DASHBOARD_VIEW,
    ORDERS_READ,
    ORDERS_UPDATE,
    SUBSCRIPTIONS_READ,
    SUBSCRIPTIONS_UPDATE,
    PRODUCTS_READ,
];

const VIEWER: &[&str] = &[DASHBOARD_VIEW, ORDERS_READ, SUBSCRIPTIONS_READ, PRODUCTS_READ];

/// Role name → granted permissions.
pub const ROLE_PERMISSIONS: &[(&str, &[&str])] = &[
    ("super-admin", SUPER_ADMIN),
    ("admin", ADMIN),
    ("manager", MANAGER),
    ("support", SUPPORT),
    ("viewer", VIEWER),
];

/// Permissions granted to `role`; empty for unknown roles.
pub fn permissions_for(role: &str) -> &'static [&'static str] {
    let role = role.trim();
    ROLE_PERMISSIONS
        .iter()
        .find(|(name, _)| *name == role)
        .map(|(_, perms)| *perms)
        .unwrap_or(&[])
}

pub fn has_permission(role: &str, permission: &str) -> bool {
    permissions_for(role).iter().any(|granted| *granted == permission)
}

/// True when `role` holds at least one of `permissions`.
pub fn has_any_permission(role: &str, permissions: &[&str]) -> bool {
    permissions
        .iter()
        .any(|permission| has_permission(role, permission))
}

/// True when `role` holds every one of `permissions`. Vacuously true for an
/// empty list.
pub fn has_all_permissions(role: &str, permissions: &[&str]) -> bool {
    permissions
        .iter()
        .all(|permission| has_permission(role, permission))
}

/// The one place UI code and the bulk dispatcher ask "may this role do X".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessPolicy {
    table: Option<&'static [(&'static str, &'static [&'static str])]>,
}

impl AccessPolicy {
    /// Policy backed by [`ROLE_PERMISSIONS`].
    pub const fn standard() -> Self {
        Self {
            table: None,
        }
    }

    /// Policy backed by a custom static table.
    pub const fn with_table(table: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self {
            table: Some(table),
        }
    }

    fn granted(&self, role: &str) -> &'static [&'static str] {
        match self.table {
            None => permissions_for(role),
            Some(table) => {
                let role = role.trim();
                table
                    .iter()
                    .find(|(name, _)| *name == role)
                    .map(|(_, perms)| *perms)
                    .unwrap_or(&[])
            },
        }
    }

    pub fn allows(&self, role: &str, permission: &str) -> bool {
        self.granted(role).iter().any(|granted| *granted == permission)
    }

    pub fn allows_any(&self, role: &str, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.allows(role, p))
    }

    pub fn allows_all(&self, role: &str, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.allows(role, p))
    }

    /// Like [`AccessPolicy::allows`] but produces the error surfaced to the
    /// caller on denial.
    pub fn require(&self, role: &str, permission: &str) -> Result<(), ApiError> {
        if self.allows(role, permission) {
            Ok(())
        } else {
            tracing::debug!(role, permission, "permission denied");
            Err(ApiError::PermissionDenied(permission.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_cannot_delete_subscriptions() {
        assert!(!has_permission("viewer", SUBSCRIPTIONS_DELETE));
        assert!(has_permission("viewer", SUBSCRIPTIONS_READ));
    }

    #[test]
    fn super_admin_holds_every_entry_in_its_table() {
        for permission in permissions_for("super-admin") {
            assert!(has_permission("super-admin", permission), "{permission}");
        }
        assert_eq!(permissions_for("super-admin").len(), SUPER_ADMIN.len());
    }

    #[test]
    fn unknown_role_fails_closed() {
        assert!(permissions_for("intern").is_empty());
        assert!(!has_permission("", DASHBOARD_VIEW));
        assert!(!has_any_permission("intern", &[DASHBOARD_VIEW, ORDERS_READ]));
    }

    #[test]
    fn any_and_all_reduce_with_or_and_and() {
        assert!(has_any_permission("support", &[ORDERS_DELETE, ORDERS_UPDATE]));
        assert!(!has_all_permissions("support", &[ORDERS_DELETE, ORDERS_UPDATE]));
        assert!(has_all_permissions("admin", &[ORDERS_DELETE, ORDERS_UPDATE]));
        assert!(!has_any_permission("admin", &[]));
        assert!(has_all_permissions("viewer", &[]));
    }

    #[test]
    fn role_lookup_trims_but_stays_case_sensitive() {
        assert!(has_permission(" manager ", PRODUCTS_CREATE));
        assert!(!has_permission("Manager", PRODUCTS_CREATE));
    }

    #[test]
    fn policy_require_reports_the_missing_permission() {
        let policy = AccessPolicy::standard();
        assert!(policy.require("admin", ORDERS_DELETE).is_ok());
        match policy.require("viewer", ORDERS_DELETE) {
            Err(ApiError::PermissionDenied(perm)) => assert_eq!(perm, ORDERS_DELETE),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn custom_table_replaces_the_standard_one() {
        static TABLE: &[(&str, &[&str])] = &[("auditor", &[ORDERS_EXPORT])];
        let policy = AccessPolicy::with_table(TABLE);
        assert!(policy.allows("auditor", ORDERS_EXPORT));
        assert!(!policy.allows("super-admin", ORDERS_EXPORT));
        assert!(policy.allows_any("auditor", &[ORDERS_READ, ORDERS_EXPORT]));
        assert!(!policy.allows_all("auditor", &[ORDERS_READ, ORDERS_EXPORT]));
    }
}
