use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use cashdesk_auth::{Action, Identity, TenantContext};
use cashdesk_projection::{Loaded, LoadedRelations};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors, views};
use crate::authz;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(get_one))
        .route("/:id/entries", get(list_entries))
}

async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("cashboxes.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let boxes = services.cashboxes_list(tenant_id);
    let items = match common::project_items(&services, views::CASHBOX, &boxes, views::cashbox_record)
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
        &Action::new("cashboxes.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let id = match common::parse_entity_id(&id, "cash box") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Some(cashbox) = services.cashbox_get(tenant_id, &id) else {
        return errors::not_found();
    };

    let mut loaded = LoadedRelations::new();
    if query.requested().contains("entries") {
        let entries = services.entries_for_cashbox(tenant_id, id);
        let records = match common::relation_records(&entries, views::ledger_entry_record) {
            Ok(records) => records,
            Err(resp) => return resp,
        };
        loaded.insert("entries", Loaded::Many(records));
    }

    match common::project_item(&services, views::CASHBOX, views::cashbox_record(&cashbox), &loaded)
    {
        Ok(out) => (StatusCode::OK, Json(out)).into_response(),
        Err(resp) => resp,
    }
}

async fn list_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("cashboxes.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let id = match common::parse_entity_id(&id, "cash box") {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if services.cashbox_get(tenant_id, &id).is_none() {
        return errors::not_found();
    }

    let entries = services.entries_for_cashbox(tenant_id, id);
    let items = match common::project_items(
        &services,
        views::LEDGER_ENTRY,
        &entries,
        views::ledger_entry_record,
    ) {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
