//! `cashdesk-auth` — pure authentication/authorization boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage. The API layer
//! derives an [`Identity`] from verified token claims, binds the request's
//! [`TenantContext`], and asks the [`PermissionEvaluator`] capability
//! questions scoped to that context.

pub mod claims;
pub mod context;
pub mod evaluate;
pub mod identity;
pub mod permissions;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use context::{AlreadyBoundError, TenantContext};
pub use evaluate::{AccessDenied, PermissionEvaluator};
pub use identity::{Grant, Identity};
pub use permissions::Action;
pub use roles::Role;
