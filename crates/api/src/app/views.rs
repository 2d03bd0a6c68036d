//! Per-entity-type projections.
//!
//! These schemas are the only place deciding what leaves the API: attributes
//! not named here (tenant ids, internal flags) never appear in a response.
//! Relation fields render only when a handler explicitly loaded them.

use serde_json::json;

use cashdesk_domain::{CashBox, Category, Expense, Installment, Invoice, LEDGER_TYPE_LABELS, LedgerEntry, Payment};
use cashdesk_projection::{Coerce, Computed, ProjectError, Projection, ProjectorRegistry, Record};

pub const CASHBOX: &str = "cashbox";
pub const LEDGER_ENTRY: &str = "ledger_entry";
pub const INVOICE: &str = "invoice";
pub const PAYMENT: &str = "payment";
pub const INSTALLMENT: &str = "installment";
pub const EXPENSE: &str = "expense";
pub const CATEGORY: &str = "category";

pub fn registry() -> ProjectorRegistry {
    ProjectorRegistry::new()
        .with(cashbox())
        .with(ledger_entry())
        .with(invoice())
        .with(payment())
        .with(installment())
        .with(expense())
        .with(category())
}

fn cashbox() -> Projection {
    Projection::new(CASHBOX)
        .attr("id")
        .attr("name")
        .attr("balance")
        .attr_coerced("is_active", Coerce::BoolFromInt)
        .attr_coerced("created_at", Coerce::DateFormat("%Y-%m-%d %H:%M"))
        .relation("entries", ledger_entry())
}

fn ledger_entry() -> Projection {
    Projection::new(LEDGER_ENTRY)
        .attr("id")
        .attr("cashbox_id")
        .attr("amount")
        .attr("source_type")
        .computed(
            "type_label",
            Computed::Label {
                source: "source_type",
                table: LEDGER_TYPE_LABELS,
            },
        )
        .attr("description")
        .attr_coerced("occurred_at", Coerce::DateFormat("%d/%m/%Y"))
}

fn invoice() -> Projection {
    Projection::new(INVOICE)
        .attr("id")
        .attr("display_number")
        .attr("serial")
        .attr("number")
        .attr("total")
        .attr_coerced("issued_at", Coerce::DateFormat("%d/%m/%Y"))
        .relation("payments", payment())
        .relation("installments", installment())
}

fn payment() -> Projection {
    Projection::new(PAYMENT)
        .attr("id")
        .attr("invoice_id")
        .attr("amount")
        .attr("method")
        .computed(
            "receipt_path",
            Computed::PathFromUrl {
                source: "receipt_url",
            },
        )
        .attr_coerced("paid_at", Coerce::DateFormat("%d/%m/%Y %H:%M"))
        .relation("invoice", invoice_summary())
}

/// Nested invoice view for payment responses (no relation fields of its own).
fn invoice_summary() -> Projection {
    Projection::new(INVOICE)
        .attr("id")
        .attr("display_number")
        .attr("total")
}

fn installment() -> Projection {
    Projection::new(INSTALLMENT)
        .attr("id")
        .attr("invoice_id")
        .attr("sequence")
        .attr("amount")
        .attr("due_date")
        .attr_coerced("paid", Coerce::BoolFromInt)
}

fn expense() -> Projection {
    Projection::new(EXPENSE)
        .attr("id")
        .attr("category_id")
        .attr("amount")
        .attr("note")
        .attr_coerced("spent_at", Coerce::DateFormat("%d/%m/%Y"))
        .relation("category", category())
}

fn category() -> Projection {
    Projection::new(CATEGORY)
        .attr("id")
        .attr("name")
        .computed(
            "expense_count",
            Computed::CountOf {
                relation: "expenses",
                precomputed: Some("expense_count"),
            },
        )
}

// -------------------------
// Record builders
// -------------------------

pub fn cashbox_record(cashbox: &CashBox) -> Result<Record, ProjectError> {
    Record::from_serialize(cashbox)
}

pub fn ledger_entry_record(entry: &LedgerEntry) -> Result<Record, ProjectError> {
    Record::from_serialize(entry)
}

/// Invoice records carry the derived display number alongside stored
/// attributes, so the projection can treat it as a plain field.
pub fn invoice_record(invoice: &Invoice) -> Result<Record, ProjectError> {
    Ok(Record::from_serialize(invoice)?.with("display_number", json!(invoice.display_number())))
}

pub fn payment_record(payment: &Payment) -> Result<Record, ProjectError> {
    Record::from_serialize(payment)
}

pub fn installment_record(installment: &Installment) -> Result<Record, ProjectError> {
    Record::from_serialize(installment)
}

pub fn expense_record(expense: &Expense) -> Result<Record, ProjectError> {
    Record::from_serialize(expense)
}

pub fn category_record(category: &Category) -> Result<Record, ProjectError> {
    Record::from_serialize(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashdesk_core::{EntityId, TenantId};
    use cashdesk_projection::LoadedRelations;
    use chrono::Utc;

    #[test]
    fn cashbox_view_redacts_tenant_id_and_coerces_is_active() {
        let cb = CashBox {
            id: EntityId::new(),
            tenant_id: TenantId::new(),
            name: "Front desk".to_string(),
            balance: 120.50,
            is_active: 1,
            created_at: Utc::now(),
        };

        let out = registry()
            .project(CASHBOX, &cashbox_record(&cb).unwrap(), &LoadedRelations::none())
            .unwrap();

        assert!(!out.contains_key("tenant_id"));
        assert_eq!(out.get("is_active"), Some(&json!(true)));
        assert_eq!(out.get("balance"), Some(&json!(120.50)));
        assert!(!out.contains_key("entries"));
    }

    #[test]
    fn invoice_view_exposes_display_number() {
        let inv = Invoice {
            id: EntityId::new(),
            tenant_id: TenantId::new(),
            serial: "A".to_string(),
            number: 42,
            total: 900.0,
            issued_at: Utc::now(),
        };

        let out = registry()
            .project(INVOICE, &invoice_record(&inv).unwrap(), &LoadedRelations::none())
            .unwrap();

        assert_eq!(out.get("display_number"), Some(&json!("A-000042")));
        assert!(!out.contains_key("payments"));
        assert!(!out.contains_key("installments"));
    }

    #[test]
    fn payment_view_renders_receipt_path_and_null_when_absent() {
        let base = Payment {
            id: EntityId::new(),
            tenant_id: TenantId::new(),
            invoice_id: EntityId::new(),
            amount: 10.0,
            method: "cash".to_string(),
            receipt_url: Some("https://files.example.com/receipts/r1.pdf".to_string()),
            paid_at: Utc::now(),
        };

        let out = registry()
            .project(PAYMENT, &payment_record(&base).unwrap(), &LoadedRelations::none())
            .unwrap();
        assert_eq!(out.get("receipt_path"), Some(&json!("/receipts/r1.pdf")));

        let without = Payment {
            receipt_url: None,
            ..base
        };
        let out = registry()
            .project(PAYMENT, &payment_record(&without).unwrap(), &LoadedRelations::none())
            .unwrap();
        assert_eq!(out.get("receipt_path"), Some(&serde_json::Value::Null));
    }
}
