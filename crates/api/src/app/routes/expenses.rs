use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
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
        .route("/expenses", get(list_expenses))
        .route("/categories", get(list_categories))
}

async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
    Query(query): Query<dto::IncludeQuery>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("expenses.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let include_category = query.requested().contains("category");
    let mut items = Vec::new();
    for expense in services.expenses_list(tenant_id) {
        let mut loaded = LoadedRelations::new();
        if include_category {
            // A dangling category reference renders as null rather than
            // losing the expense row.
            let category = services.category_get(tenant_id, &expense.category_id);
            let record = match category.as_ref().map(views::category_record).transpose() {
                Ok(record) => record,
                Err(e) => return errors::projection_failure(e),
            };
            loaded.insert("category", Loaded::One(record));
        }

        match common::project_item(&services, views::EXPENSE, views::expense_record(&expense), &loaded)
        {
            Ok(out) => items.push(out),
            Err(resp) => return resp,
        }
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
) -> axum::response::Response {
    let tenant_id = match authz::authorize_scoped(
        &context,
        identity.as_deref(),
        &Action::new("categories.read"),
    ) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let mut items = Vec::new();
    for category in services.categories_list(tenant_id) {
        let mut loaded = LoadedRelations::new();
        if category.expense_count.is_none() {
            // No denormalized count on the row: count the relation on demand.
            let count = services.expenses_count_for_category(tenant_id, category.id);
            loaded.insert("expenses", Loaded::Count(count));
        }

        match common::project_item(
            &services,
            views::CATEGORY,
            views::category_record(&category),
            &loaded,
        ) {
            Ok(out) => items.push(out),
            Err(resp) => return resp,
        }
    }

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
