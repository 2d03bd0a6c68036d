use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cashdesk_core::{EntityId, TenantId};

/// Cash box read model.
///
/// `is_active` mirrors the stored 0/1 integer; the view layer coerces it to
/// a boolean on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashBox {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub name: String,
    pub balance: f64,
    pub is_active: i64,
    pub created_at: DateTime<Utc>,
}

/// One movement in a cash box's ledger.
///
/// `source_type` is the stored discriminator of whatever produced the
/// movement; [`LEDGER_TYPE_LABELS`] maps the known ones to display labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub cashbox_id: EntityId,
    pub amount: f64,
    pub source_type: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Closed display-label table for ledger sources.
///
/// Unmapped discriminators render as their raw value, so new source types
/// degrade gracefully instead of failing projection.
pub const LEDGER_TYPE_LABELS: &[(&str, &str)] = &[
    ("invoice_payment", "Invoice payment"),
    ("installment", "Installment collection"),
    ("expense", "Expense"),
    ("manual", "Manual adjustment"),
    ("transfer", "Cash box transfer"),
];
