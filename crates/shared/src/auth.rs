//! Token claims carried by every authenticated request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{RequestContext, Role};
use crate::types::{KoperasiId, TenantId, UserId};

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: UserId,
    /// Tenant the user belongs to.
    pub tenant: TenantId,
    /// Koperasi the token is scoped to.
    pub koperasi: KoperasiId,
    /// User's role.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims for the given context.
    #[must_use]
    pub fn new(context: &RequestContext, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: context.user_id,
            tenant: context.tenant_id,
            koperasi: context.koperasi_id,
            role: context.role,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Builds the request context these claims describe.
    #[must_use]
    pub const fn context(&self) -> RequestContext {
        RequestContext::new(self.tenant, self.koperasi, self.sub, self.role)
    }
}
