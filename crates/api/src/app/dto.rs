use std::collections::HashSet;

use serde::Deserialize;

use cashdesk_core::{FieldError, Validator};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterPaymentRequest {
    pub amount: f64,
    pub method: String,
    pub receipt_url: Option<String>,
}

impl RegisterPaymentRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.require_positive("amount", self.amount)
            .require_non_empty("method", &self.method)
            .require_max_len("method", &self.method, 32);
        if let Some(url) = &self.receipt_url {
            v.require_non_empty("receipt_url", url)
                .require_max_len("receipt_url", url, 2048);
        }
        v.finish()
    }
}

// -------------------------
// Query parameters
// -------------------------

/// `?include=entries` / `?include=payments,installments` — the client's
/// explicit opt-in to eager-load relations for projection.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeQuery {
    pub include: Option<String>,
}

impl IncludeQuery {
    pub fn requested(&self) -> HashSet<&str> {
        self.include
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
