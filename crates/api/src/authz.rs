//! Route-level authorization guard.
//!
//! Enforced before any data access: handlers call [`authorize_scoped`] and
//! get back either the active tenant or a ready-to-return generic forbidden
//! response. Denials never explain themselves in the response body.

use axum::response::Response;

use cashdesk_auth::{Action, Identity, PermissionEvaluator, TenantContext};
use cashdesk_core::TenantId;

use crate::app::errors;

/// Authorize `action` against a tenant-scoped resource type.
///
/// Denies when the request is anonymous, when the context is unscoped (a
/// tenant-scoped resource must never be evaluated ambiguously), and when no
/// grant under the active tenant covers the action.
pub fn authorize_scoped(
    context: &TenantContext,
    identity: Option<&Identity>,
    action: &Action,
) -> Result<TenantId, Response> {
    let Some(identity) = identity else {
        return Err(errors::forbidden());
    };
    let Some(tenant_id) = context.get() else {
        return Err(errors::forbidden());
    };

    PermissionEvaluator::new(context)
        .require(identity, action, Some(tenant_id))
        .map_err(|_| errors::forbidden())?;

    Ok(tenant_id)
}
