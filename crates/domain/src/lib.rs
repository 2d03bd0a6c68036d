//! `cashdesk-domain` — business read models and collaborator seams.
//!
//! The business entities here are plain read models: rows as the data-access
//! collaborator hands them over, before projection shapes them for clients.
//! Persistence itself stays external; [`store::TenantStore`] is the seam and
//! ships with an in-memory implementation for dev/test wiring.

pub mod cashbox;
pub mod expenses;
pub mod invoicing;
pub mod notify;
pub mod store;

pub use cashbox::{CashBox, LEDGER_TYPE_LABELS, LedgerEntry};
pub use expenses::{Category, Expense};
pub use invoicing::{Installment, Invoice, Payment};
pub use notify::{PaymentNotifier, RecordingPaymentNotifier, TracingPaymentNotifier};
pub use store::{InMemoryTenantStore, TenantStore};
