use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cashdesk_core::{EntityId, TenantId};

/// Invoice read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: EntityId,
    pub tenant_id: TenantId,
    /// Fiscal series the invoice was numbered under (e.g. "A").
    pub serial: String,
    /// Sequential number within the series.
    pub number: u32,
    pub total: f64,
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    /// Human-readable reference, e.g. `A-000123`.
    ///
    /// Used wherever the invoice is shown to people: projected views and the
    /// payment-received notification.
    pub fn display_number(&self) -> String {
        format!("{}-{:06}", self.serial, self.number)
    }
}

/// Payment read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub invoice_id: EntityId,
    pub amount: f64,
    pub method: String,
    /// Absolute URL of the stored receipt document, when one was uploaded.
    pub receipt_url: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// Installment read model.
///
/// `paid` mirrors the stored 0/1 integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub invoice_id: EntityId,
    pub sequence: u32,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid: i64,
}
