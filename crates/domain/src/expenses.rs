use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cashdesk_core::{EntityId, TenantId};

/// Expense read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub category_id: EntityId,
    pub amount: f64,
    pub note: Option<String>,
    pub spent_at: DateTime<Utc>,
}

/// Expense category read model.
///
/// `expense_count` is a denormalized count maintained by the data-access
/// collaborator. When absent, views count the relation on demand instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub name: String,
    pub expense_count: Option<u64>,
}
