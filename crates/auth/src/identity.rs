use serde::{Deserialize, Serialize};

use cashdesk_core::{TenantId, UserId};

use crate::{Action, Role};

/// A recorded authorization: `action` may be exercised within the scope
/// `tenant_id`.
///
/// A grant with `tenant_id: None` is a global grant. Global grants apply only
/// to resources that are themselves not tenant-scoped; they never satisfy a
/// tenant-scoped evaluation (see [`crate::PermissionEvaluator`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub tenant_id: Option<TenantId>,
    pub action: Action,
}

impl Grant {
    pub fn scoped(tenant_id: TenantId, action: Action) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            action,
        }
    }

    pub fn global(action: Action) -> Self {
        Self {
            tenant_id: None,
            action,
        }
    }
}

/// An authenticated actor.
///
/// Owned by the authentication collaborator; read-only to this core. The
/// tenant binding may be absent (e.g. a platform-level service account).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub tenant_id: Option<TenantId>,
    pub roles: Vec<Role>,
    pub grants: Vec<Grant>,
}

impl Identity {
    /// All grants held by this identity: the explicitly recorded ones plus
    /// the ones its roles expand to within its own tenant binding.
    pub fn effective_grants(&self) -> Vec<Grant> {
        let mut grants = self.grants.clone();
        for role in &self.roles {
            grants.extend(grants_for_role(role, self.tenant_id));
        }
        grants
    }
}

/// Minimal role→grant policy.
///
/// Convention: "admin" grants all actions within the identity's own tenant.
/// This stays intentionally simple until a real policy source exists.
pub fn grants_for_role(role: &Role, tenant_id: Option<TenantId>) -> Vec<Grant> {
    match role.as_str() {
        "admin" => vec![Grant {
            tenant_id,
            action: Action::new("*"),
        }],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_role_expands_to_wildcard_in_own_tenant() {
        let tenant_id = TenantId::new();
        let identity = Identity {
            user_id: UserId::new(),
            tenant_id: Some(tenant_id),
            roles: vec![Role::new("admin")],
            grants: vec![],
        };

        let grants = identity.effective_grants();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].tenant_id, Some(tenant_id));
        assert!(grants[0].action.is_wildcard());
    }

    #[test]
    fn unknown_roles_expand_to_nothing() {
        let identity = Identity {
            user_id: UserId::new(),
            tenant_id: Some(TenantId::new()),
            roles: vec![Role::new("viewer")],
            grants: vec![],
        };
        assert!(identity.effective_grants().is_empty());
    }
}
