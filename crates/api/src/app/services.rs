//! Service container: tenant-isolated stores, the notification sink, and
//! the projection registry, wired in-memory for dev/test.

use std::sync::Arc;

use chrono::Utc;

use cashdesk_core::{DomainError, EntityId, TenantId};
use cashdesk_domain::{
    CashBox, Category, Expense, InMemoryTenantStore, Installment, Invoice, LedgerEntry, Payment,
    PaymentNotifier, TenantStore, TracingPaymentNotifier,
};
use cashdesk_projection::ProjectorRegistry;

use crate::app::views;

pub struct AppServices {
    cashboxes: Arc<InMemoryTenantStore<EntityId, CashBox>>,
    entries: Arc<InMemoryTenantStore<EntityId, LedgerEntry>>,
    invoices: Arc<InMemoryTenantStore<EntityId, Invoice>>,
    payments: Arc<InMemoryTenantStore<EntityId, Payment>>,
    installments: Arc<InMemoryTenantStore<EntityId, Installment>>,
    expenses: Arc<InMemoryTenantStore<EntityId, Expense>>,
    categories: Arc<InMemoryTenantStore<EntityId, Category>>,
    notifier: Arc<dyn PaymentNotifier>,
    registry: ProjectorRegistry,
}

impl AppServices {
    pub fn new_in_memory() -> Self {
        Self::with_notifier(Arc::new(TracingPaymentNotifier))
    }

    pub fn with_notifier(notifier: Arc<dyn PaymentNotifier>) -> Self {
        Self {
            cashboxes: Arc::new(InMemoryTenantStore::new()),
            entries: Arc::new(InMemoryTenantStore::new()),
            invoices: Arc::new(InMemoryTenantStore::new()),
            payments: Arc::new(InMemoryTenantStore::new()),
            installments: Arc::new(InMemoryTenantStore::new()),
            expenses: Arc::new(InMemoryTenantStore::new()),
            categories: Arc::new(InMemoryTenantStore::new()),
            notifier,
            registry: views::registry(),
        }
    }

    pub fn registry(&self) -> &ProjectorRegistry {
        &self.registry
    }

    // -------------------------
    // Seeding (dev/test wiring)
    // -------------------------

    pub fn insert_cashbox(&self, cashbox: CashBox) {
        self.cashboxes.upsert(cashbox.tenant_id, cashbox.id, cashbox);
    }

    pub fn insert_entry(&self, entry: LedgerEntry) {
        self.entries.upsert(entry.tenant_id, entry.id, entry);
    }

    pub fn insert_invoice(&self, invoice: Invoice) {
        self.invoices.upsert(invoice.tenant_id, invoice.id, invoice);
    }

    pub fn insert_installment(&self, installment: Installment) {
        self.installments
            .upsert(installment.tenant_id, installment.id, installment);
    }

    pub fn insert_expense(&self, expense: Expense) {
        self.expenses.upsert(expense.tenant_id, expense.id, expense);
    }

    pub fn insert_category(&self, category: Category) {
        self.categories.upsert(category.tenant_id, category.id, category);
    }

    // -------------------------
    // Tenant-scoped queries
    // -------------------------

    pub fn cashboxes_list(&self, tenant_id: TenantId) -> Vec<CashBox> {
        self.cashboxes.list(tenant_id)
    }

    pub fn cashbox_get(&self, tenant_id: TenantId, id: &EntityId) -> Option<CashBox> {
        self.cashboxes.get(tenant_id, id)
    }

    pub fn entries_for_cashbox(&self, tenant_id: TenantId, cashbox_id: EntityId) -> Vec<LedgerEntry> {
        self.entries
            .list(tenant_id)
            .into_iter()
            .filter(|e| e.cashbox_id == cashbox_id)
            .collect()
    }

    pub fn invoices_list(&self, tenant_id: TenantId) -> Vec<Invoice> {
        self.invoices.list(tenant_id)
    }

    pub fn invoice_get(&self, tenant_id: TenantId, id: &EntityId) -> Option<Invoice> {
        self.invoices.get(tenant_id, id)
    }

    pub fn payments_for_invoice(&self, tenant_id: TenantId, invoice_id: EntityId) -> Vec<Payment> {
        self.payments
            .list(tenant_id)
            .into_iter()
            .filter(|p| p.invoice_id == invoice_id)
            .collect()
    }

    pub fn installments_for_invoice(
        &self,
        tenant_id: TenantId,
        invoice_id: EntityId,
    ) -> Vec<Installment> {
        self.installments
            .list(tenant_id)
            .into_iter()
            .filter(|i| i.invoice_id == invoice_id)
            .collect()
    }

    pub fn expenses_list(&self, tenant_id: TenantId) -> Vec<Expense> {
        self.expenses.list(tenant_id)
    }

    pub fn categories_list(&self, tenant_id: TenantId) -> Vec<Category> {
        self.categories.list(tenant_id)
    }

    pub fn category_get(&self, tenant_id: TenantId, id: &EntityId) -> Option<Category> {
        self.categories.get(tenant_id, id)
    }

    pub fn expenses_count_for_category(&self, tenant_id: TenantId, category_id: EntityId) -> u64 {
        self.expenses
            .list(tenant_id)
            .into_iter()
            .filter(|e| e.category_id == category_id)
            .count() as u64
    }

    // -------------------------
    // Payment completion
    // -------------------------

    /// Record a payment against an invoice and emit the payment-received
    /// notification.
    ///
    /// The notification is fire-and-forget: it is templated with the
    /// invoice's display number and its emission can neither fail nor delay
    /// the payment itself.
    pub fn register_payment(
        &self,
        tenant_id: TenantId,
        invoice_id: EntityId,
        amount: f64,
        method: String,
        receipt_url: Option<String>,
    ) -> Result<(Payment, Invoice), DomainError> {
        let invoice = self
            .invoice_get(tenant_id, &invoice_id)
            .ok_or(DomainError::NotFound)?;

        let payment = Payment {
            id: EntityId::new(),
            tenant_id,
            invoice_id,
            amount,
            method,
            receipt_url,
            paid_at: Utc::now(),
        };
        self.payments.upsert(tenant_id, payment.id, payment.clone());

        self.notifier
            .payment_received(tenant_id, &invoice.display_number(), amount);

        Ok((payment, invoice))
    }
}
