//! Per-request context and role model.
//!
//! Every ledger operation receives a [`RequestContext`] by value. It is
//! built once from verified token claims and carries the tenant, koperasi,
//! acting user and role; nothing downstream looks these up from ambient state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::{KoperasiId, TenantId, UserId};

/// Role of the acting user within the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Tenant-wide administrator, may act on any koperasi of the tenant.
    AdminTenant,
    /// Koperasi administrator.
    Admin,
    /// Bookkeeper.
    Akuntan,
    /// Cashier; records transactions but cannot post them.
    Kasir,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AdminTenant => "admin_tenant",
            Self::Admin => "admin",
            Self::Akuntan => "akuntan",
            Self::Kasir => "kasir",
            Self::Viewer => "viewer",
        }
    }

    /// Whether the role may create and change chart of accounts entries.
    #[must_use]
    pub const fn can_manage_accounts(&self) -> bool {
        matches!(self, Self::AdminTenant | Self::Admin)
    }

    /// Whether the role may record draft journal entries.
    #[must_use]
    pub const fn can_record_journal(&self) -> bool {
        !matches!(self, Self::Viewer)
    }

    /// Whether the role may post or cancel journal entries.
    #[must_use]
    pub const fn can_post_journal(&self) -> bool {
        matches!(self, Self::AdminTenant | Self::Admin | Self::Akuntan)
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
        match s.trim().to_lowercase().as_str() {
            "admin_tenant" => Ok(Self::AdminTenant),
            "admin" => Ok(Self::Admin),
            "akuntan" => Ok(Self::Akuntan),
            "kasir" => Ok(Self::Kasir),
            "viewer" => Ok(Self::Viewer),
            other => Err(AppError::Unauthorized(format!("unknown role '{other}'"))),
        }
    }
}

/// Identity and scope of the caller for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// Tenant the caller belongs to.
    pub tenant_id: TenantId,
    /// Koperasi the caller is working in.
    pub koperasi_id: KoperasiId,
    /// Acting user.
    pub user_id: UserId,
    /// Role of the acting user.
    pub role: Role,
}

impl RequestContext {
    /// Creates a new request context.
    #[must_use]
    pub const fn new(
        tenant_id: TenantId,
        koperasi_id: KoperasiId,
        user_id: UserId,
        role: Role,
    ) -> Self {
        Self {
            tenant_id,
            koperasi_id,
            user_id,
            role,
        }
    }

    /// Resolves the koperasi a path parameter points at.
    ///
    /// Only tenant administrators may address a koperasi other than their own.
    /// Data access remains tenant-scoped either way.
    pub fn scope_to(&self, koperasi_id: KoperasiId) -> Result<Self, AppError> {
        if koperasi_id == self.koperasi_id || self.role == Role::AdminTenant {
            Ok(Self {
                koperasi_id,
                ..*self
            })
        } else {
            Err(AppError::Forbidden(format!(
                "koperasi {koperasi_id} is outside the caller's scope"
            )))
        }
    }

    /// Fails with `Forbidden` unless the role can manage accounts.
    pub fn require_account_manager(&self) -> Result<(), AppError> {
        if self.role.can_manage_accounts() {
            Ok(())
        } else {
            Err(forbidden(self.role, "manage the chart of accounts"))
        }
    }

    /// Fails with `Forbidden` unless the role can record journal entries.
    pub fn require_journal_writer(&self) -> Result<(), AppError> {
        if self.role.can_record_journal() {
            Ok(())
        } else {
            Err(forbidden(self.role, "record journal entries"))
        }
    }

    /// Fails with `Forbidden` unless the role can post or cancel entries.
    pub fn require_journal_poster(&self) -> Result<(), AppError> {
        if self.role.can_post_journal() {
            Ok(())
        } else {
            Err(forbidden(self.role, "post or cancel journal entries"))
        }
    }
}

fn forbidden(role: Role, action: &str) -> AppError {
    AppError::Forbidden(format!("role '{role}' may not {action}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx(role: Role) -> RequestContext {
        RequestContext::new(TenantId::new(), KoperasiId::new(), UserId::new(), role)
    }

    #[rstest]
    #[case(Role::AdminTenant, true, true, true)]
    #[case(Role::Admin, true, true, true)]
    #[case(Role::Akuntan, false, true, true)]
    #[case(Role::Kasir, false, true, false)]
    #[case(Role::Viewer, false, false, false)]
    fn test_role_permissions(
        #[case] role: Role,
        #[case] manage: bool,
        #[case] record: bool,
        #[case] post: bool,
    ) {
        let context = ctx(role);
        assert_eq!(context.require_account_manager().is_ok(), manage);
        assert_eq!(context.require_journal_writer().is_ok(), record);
        assert_eq!(context.require_journal_poster().is_ok(), post);
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in [
            Role::AdminTenant,
            Role::Admin,
            Role::Akuntan,
            Role::Kasir,
            Role::Viewer,
        ] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_scope_to_own_koperasi() {
        let context = ctx(Role::Kasir);
        let scoped = context.scope_to(context.koperasi_id).unwrap();
        assert_eq!(scoped, context);
    }

    #[test]
    fn test_scope_to_other_koperasi_is_forbidden() {
        let context = ctx(Role::Admin);
        let err = context.scope_to(KoperasiId::new()).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_tenant_admin_can_scope_to_any_koperasi() {
        let context = ctx(Role::AdminTenant);
        let other = KoperasiId::new();
        let scoped = context.scope_to(other).unwrap();
        assert_eq!(scoped.koperasi_id, other);
        assert_eq!(scoped.tenant_id, context.tenant_id);
        assert_eq!(scoped.user_id, context.user_id);
    }
}
