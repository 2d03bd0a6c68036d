use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use cashdesk_auth::{Action, Identity, TenantContext};
use cashdesk_core::DomainError;
use cashdesk_projection::{Loaded, LoadedRelations};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors, views};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(get_one))
        .route("/:id/payments", post(register_payment))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("invoices.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let invoices = services.invoices_list(tenant_id);
    let items = match common::project_items(&services, views::INVOICE, &invoices, views::invoice_record)
    {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
    Path(id): Path<String>,
    Query(query): Query<dto::IncludeQuery>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("invoices.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let id = match common::parse_entity_id(&id, "invoice") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(invoice) = services.invoice_get(tenant_id, &id) else {
        return errors::not_found();
    };

    let requested = query.requested();
    let mut loaded = LoadedRelations::new();
    if requested.contains("payments") {
        let payments = services.payments_for_invoice(tenant_id, id);
        let records = match common::relation_records(&payments, views::payment_record) {
            Ok(records) => records,
            Err(resp) => return resp,
        };
        loaded.insert("payments", Loaded::Many(records));
    }
    if requested.contains("installments") {
        let installments = services.installments_for_invoice(tenant_id, id);
        let records = match common::relation_records(&installments, views::installment_record) {
            Ok(records) => records,
            Err(resp) => return resp,
        };
        loaded.insert("installments", Loaded::Many(records));
    }

    match common::project_item(&services, views::INVOICE, views::invoice_record(&invoice), &loaded)
    {
        Ok(out) => (StatusCode::OK, Json(out)).into_response(),
        Err(resp) => resp,
    }
}

async fn register_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RegisterPaymentRequest>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("payments.create"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    if let Err(fields) = body.validate() {
        return errors::validation_failed(fields);
    }

    let invoice_id = match common::parse_entity_id(&id, "invoice") {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let (payment, invoice) = match services.register_payment(
        tenant_id,
        invoice_id,
        body.amount,
        body.method,
        body.receipt_url,
    ) {
        Ok(done) => done,
        Err(DomainError::NotFound) => return errors::not_found(),
        Err(e) => {
            tracing::error!("payment registration failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            );
        }
    };

    let invoice_record = match views::invoice_record(&invoice) {
        Ok(record) => record,
        Err(e) => return errors::projection_failure(e),
    };
    let loaded = LoadedRelations::new().with("invoice", Loaded::One(Some(invoice_record)));

    match common::project_item(&services, views::PAYMENT, views::payment_record(&payment), &loaded)
    {
        Ok(out) => (StatusCode::CREATED, Json(out)).into_response(),
        Err(resp) => resp,
    }
}
