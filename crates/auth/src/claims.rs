use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cashdesk_core::{TenantId, UserId};

use crate::{Action, Grant, Identity, Role};

/// JWT claims model (transport-agnostic).
///
/// This is the minimal set of claims cashdesk expects once a token has been
/// decoded/verified by whatever transport/security layer is in use. The
/// tenant binding may be absent for platform-level tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    /// Tenant context for the token, when the actor belongs to one.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,

    /// RBAC roles granted within the tenant context.
    #[serde(default)]
    pub roles: Vec<Role>,

    /// Explicitly granted actions within the tenant context.
    #[serde(default)]
    pub grants: Vec<String>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// is intentionally outside this crate.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

impl JwtClaims {
    /// Convert validated claims into an [`Identity`].
    ///
    /// Grant strings are recorded under the token's own tenant binding: a
    /// token bound to tenant T can only carry grants scoped to T.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub,
            tenant_id: self.tenant_id,
            roles: self.roles.clone(),
            grants: self
                .grants
                .iter()
                .map(|g| Grant {
                    tenant_id: self.tenant_id,
                    action: Action::new(g.clone()),
                })
                .collect(),
        }
    }
}
