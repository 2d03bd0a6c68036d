//! Payment notification collaborator.
//!
//! Fire-and-forget: emitting a notification must never fail the payment flow
//! or block the request. Delivery transport (mail, push, ...) is an external
//! collaborator behind this seam.

use std::sync::Mutex;

use cashdesk_core::TenantId;

/// Sink for "payment received" notifications.
pub trait PaymentNotifier: Send + Sync {
    /// `invoice_reference` is the human-readable display number of the
    /// related invoice (e.g. `A-000123`), not an internal id.
    fn payment_received(&self, tenant_id: TenantId, invoice_reference: &str, amount: f64);
}

/// Default sink: structured log emission only.
#[derive(Debug, Default)]
pub struct TracingPaymentNotifier;

impl PaymentNotifier for TracingPaymentNotifier {
    fn payment_received(&self, tenant_id: TenantId, invoice_reference: &str, amount: f64) {
        tracing::info!(
            %tenant_id,
            invoice = invoice_reference,
            amount,
            "payment received"
        );
    }
}

/// Recording sink for tests and local inspection.
#[derive(Debug, Default)]
pub struct RecordingPaymentNotifier {
    inner: Mutex<Vec<(TenantId, String, f64)>>,
}

impl RecordingPaymentNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(TenantId, String, f64)> {
        self.inner.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl PaymentNotifier for RecordingPaymentNotifier {
    fn payment_received(&self, tenant_id: TenantId, invoice_reference: &str, amount: f64) {
        if let Ok(mut sent) = self.inner.lock() {
            sent.push((tenant_id, invoice_reference.to_string(), amount));
        }
    }
}
