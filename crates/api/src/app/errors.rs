use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use cashdesk_core::FieldError;
use cashdesk_projection::ProjectError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Generic authorization denial.
///
/// Deliberately detail-free: the body never says whether the identity was
/// missing, the scope was absent, or a grant didn't cover the action.
pub fn forbidden() -> axum::response::Response {
    (
        StatusCode::FORBIDDEN,
        axum::Json(json!({ "error": "forbidden" })),
    )
        .into_response()
}

pub fn not_found() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}

pub fn invalid_id(what: &'static str) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("invalid {what} id"))
}

/// Per-field validation failure (recoverable; the client fixes and retries).
pub fn validation_failed(fields: Vec<FieldError>) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({
            "error": "validation_failed",
            "fields": fields,
        })),
    )
        .into_response()
}

/// Projection failures are programming errors: log the detail, return a
/// generic 500.
pub fn projection_failure(err: ProjectError) -> axum::response::Response {
    tracing::error!("projection failed: {err}");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal error",
    )
}
