use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use cashdesk_auth::{Identity, TenantContext};

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(context): Extension<Arc<TenantContext>>,
    identity: Option<Extension<Identity>>,
) -> axum::response::Response {
    let Some(Extension(identity)) = identity else {
        return errors::forbidden();
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "user_id": identity.user_id.to_string(),
            "tenant_id": context.get().map(|t| t.to_string()),
            "roles": identity.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}
