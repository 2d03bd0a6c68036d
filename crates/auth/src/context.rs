use std::sync::OnceLock;

use thiserror::Error;

use cashdesk_core::TenantId;

/// Double-binding the tenant context within one request scope.
///
/// This is a programming error: the scoping layer binds at most once per
/// request. A failed `set` never alters the previously bound value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("tenant context already bound to {bound}, rejected rebind to {attempted}")]
pub struct AlreadyBoundError {
    pub bound: TenantId,
    pub attempted: TenantId,
}

/// Tenant binding for one request.
///
/// Created fresh at request start, bound at most once by the scoping layer,
/// and read by permission evaluation and data access for the remainder of
/// the request. Interior one-shot cell so the context can be shared behind
/// an `Arc` without being writable twice. Never reused across requests.
#[derive(Debug, Default)]
pub struct TenantContext {
    scope: OnceLock<TenantId>,
}

impl TenantContext {
    /// Fresh, unscoped context.
    pub fn new() -> Self {
        Self {
            scope: OnceLock::new(),
        }
    }

    /// Pre-bound context (test and service wiring convenience).
    pub fn bound(tenant_id: TenantId) -> Self {
        let ctx = Self::new();
        let _ = ctx.scope.set(tenant_id);
        ctx
    }

    /// Bind the active tenant. Fails if the context is already bound.
    pub fn set(&self, tenant_id: TenantId) -> Result<(), AlreadyBoundError> {
        match self.scope.set(tenant_id) {
            Ok(()) => Ok(()),
            Err(attempted) => Err(AlreadyBoundError {
                bound: self.get().unwrap_or(attempted),
                attempted,
            }),
        }
    }

    /// The bound tenant, or `None` when the request is unscoped.
    pub fn get(&self) -> Option<TenantId> {
        self.scope.get().copied()
    }

    pub fn is_scoped(&self) -> bool {
        self.scope.get().is_some()
    }
}
