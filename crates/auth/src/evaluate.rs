//! Capability evaluation scoped to the active tenant context.
//!
//! The evaluator is deterministic, performs no IO, and caches nothing across
//! requests: it borrows the request's [`TenantContext`] and answers from the
//! identity's grants alone.

use thiserror::Error;

use cashdesk_core::TenantId;

use crate::{Action, Identity, TenantContext};

/// Authorization denial.
///
/// Carries no detail about why access was denied; denials surface to the
/// transport layer as a generic "forbidden" outcome.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("forbidden")]
pub struct AccessDenied;

/// Answers capability queries for one request.
pub struct PermissionEvaluator<'a> {
    context: &'a TenantContext,
}

impl<'a> PermissionEvaluator<'a> {
    pub fn new(context: &'a TenantContext) -> Self {
        Self { context }
    }

    /// May `identity` perform `action` on a resource owned by
    /// `resource_tenant` (`None` for resources that are not tenant-scoped)?
    ///
    /// Decision order:
    /// 1. Unscoped context + tenant-scoped resource → deny. Ambiguous
    ///    scoping must never silently allow cross-tenant access.
    /// 2. Scoped context + differing resource tenant → deny.
    /// 3. Otherwise allow iff any grant recorded under the active scope
    ///    covers the action. Grants recorded under another tenant never
    ///    apply; global grants apply only to the unscoped case.
    pub fn evaluate(
        &self,
        identity: &Identity,
        action: &Action,
        resource_tenant: Option<TenantId>,
    ) -> bool {
        let scope = self.context.get();

        if scope.is_none() && resource_tenant.is_some() {
            return false;
        }
        if let (Some(active), Some(resource)) = (scope, resource_tenant) {
            if active != resource {
                return false;
            }
        }

        identity
            .effective_grants()
            .iter()
            .any(|grant| grant.tenant_id == scope && grant.action.covers(action))
    }

    /// [`Self::evaluate`] as a guard.
    pub fn require(
        &self,
        identity: &Identity,
        action: &Action,
        resource_tenant: Option<TenantId>,
    ) -> Result<(), AccessDenied> {
        if self.evaluate(identity, action, resource_tenant) {
            Ok(())
        } else {
            Err(AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grant, Role};
    use cashdesk_core::UserId;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn identity_with(tenant_id: Option<TenantId>, grants: Vec<Grant>) -> Identity {
        Identity {
            user_id: UserId::new(),
            tenant_id,
            roles: vec![],
            grants,
        }
    }

    #[test]
    fn scoped_grant_allows_matching_action_in_scope() {
        let tenant_id = TenantId::new();
        let ctx = TenantContext::bound(tenant_id);
        let identity = identity_with(
            Some(tenant_id),
            vec![Grant::scoped(tenant_id, Action::new("invoices.read"))],
        );

        let evaluator = PermissionEvaluator::new(&ctx);
        assert!(evaluator.evaluate(&identity, &Action::new("invoices.read"), Some(tenant_id)));
        assert!(!evaluator.evaluate(&identity, &Action::new("invoices.write"), Some(tenant_id)));
    }

    #[test]
    fn unscoped_context_denies_tenant_scoped_resources() {
        let tenant_id = TenantId::new();
        let ctx = TenantContext::new();
        // Even a wildcard grant recorded under the resource's tenant must not
        // pass an unscoped evaluation.
        let identity = identity_with(
            Some(tenant_id),
            vec![Grant::scoped(tenant_id, Action::new("*"))],
        );

        let evaluator = PermissionEvaluator::new(&ctx);
        assert!(!evaluator.evaluate(&identity, &Action::new("invoices.read"), Some(tenant_id)));
    }

    #[test]
    fn global_grant_never_satisfies_tenant_scoped_evaluation() {
        let tenant_id = TenantId::new();
        let ctx = TenantContext::bound(tenant_id);
        let identity = identity_with(None, vec![Grant::global(Action::new("*"))]);

        let evaluator = PermissionEvaluator::new(&ctx);
        assert!(!evaluator.evaluate(&identity, &Action::new("invoices.read"), Some(tenant_id)));
    }

    #[test]
    fn global_grant_allows_unscoped_resources_only() {
        let ctx = TenantContext::new();
        let identity = identity_with(None, vec![Grant::global(Action::new("system.health"))]);

        let evaluator = PermissionEvaluator::new(&ctx);
        assert!(evaluator.evaluate(&identity, &Action::new("system.health"), None));
        assert!(!evaluator.evaluate(&identity, &Action::new("system.health"), Some(TenantId::new())));
    }

    #[test]
    fn admin_role_grants_everything_within_own_tenant() {
        let tenant_id = TenantId::new();
        let ctx = TenantContext::bound(tenant_id);
        let identity = Identity {
            user_id: UserId::new(),
            tenant_id: Some(tenant_id),
            roles: vec![Role::new("admin")],
            grants: vec![],
        };

        let evaluator = PermissionEvaluator::new(&ctx);
        assert!(evaluator.evaluate(&identity, &Action::new("cashboxes.read"), Some(tenant_id)));
        assert!(evaluator.evaluate(&identity, &Action::new("invoices.write"), Some(tenant_id)));
    }

    proptest! {
        /// For any two distinct tenants, a grant recorded under one never
        /// authorizes an action evaluated against a resource of the other.
        #[test]
        fn cross_tenant_evaluation_always_denies(a in prop::array::uniform16(any::<u8>()),
                                                 b in prop::array::uniform16(any::<u8>())) {
            let tenant_a = TenantId::from_uuid(Uuid::from_bytes(a));
            let tenant_b = TenantId::from_uuid(Uuid::from_bytes(b));
            prop_assume!(tenant_a != tenant_b);

            let ctx = TenantContext::bound(tenant_a);
            let identity = identity_with(
                Some(tenant_a),
                vec![Grant::scoped(tenant_a, Action::new("*"))],
            );

            let evaluator = PermissionEvaluator::new(&ctx);
            prop_assert!(!evaluator.evaluate(&identity, &Action::new("invoices.read"), Some(tenant_b)));
        }
    }
}
