//! Authentication and tenant-scoping layers.
//!
//! Ordering matters: the authentication layer runs first and, when a valid
//! bearer token is present, attaches an [`Identity`] extension. The scoping
//! layer then installs a fresh [`TenantContext`] for every request and binds
//! it from the identity's tenant — at most once per request. Neither layer
//! rejects a request; authorization is enforced per-route.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use cashdesk_auth::{Identity, JwtClaims, TenantContext, validate_claims};

/// HS256 token decoding for the authentication layer.
///
/// Claim-window validation is delegated to [`validate_claims`], so the
/// decoder itself only checks the signature and shape.
pub struct Hs256TokenDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256TokenDecoder {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn decode(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<JwtClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
    }
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<Hs256TokenDecoder>,
}

/// Attach an [`Identity`] extension when the request carries a valid token.
///
/// Absent, malformed, or out-of-window tokens leave the request anonymous;
/// it still proceeds to the next layer.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(token) = extract_bearer(req.headers()) {
        match state.jwt.decode(token) {
            Ok(claims) => match validate_claims(&claims, Utc::now()) {
                Ok(()) => {
                    req.extensions_mut().insert(claims.identity());
                }
                Err(e) => tracing::debug!("rejected token claims: {e}"),
            },
            Err(e) => tracing::debug!("token decode failed: {e}"),
        }
    }

    next.run(req).await
}

/// Install a fresh tenant context and bind it from the identity, if any.
///
/// Runs for every request and always calls the next handler: an absent
/// identity or tenant binding leaves the context unscoped rather than
/// rejecting the request here.
pub async fn scope_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let context = Arc::new(TenantContext::new());

    if let Some(identity) = req.extensions().get::<Identity>() {
        bind_scope(identity, &context);
    }

    req.extensions_mut().insert(context);
    next.run(req).await
}

/// Bind the context from the identity's tenant binding, when present.
pub fn bind_scope(identity: &Identity, context: &TenantContext) {
    if let Some(tenant_id) = identity.tenant_id {
        // The context is freshly created per request; a failed bind here
        // means the wiring installed the scoping layer twice.
        if let Err(e) = context.set(tenant_id) {
            tracing::error!("tenant scope bind failed: {e}");
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}
