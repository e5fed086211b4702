//! Gate middleware.
//!
//! Extracts the JWT from `Authorization: Bearer <token>`, validates it,
//! and stores the `Claims` in request extensions for downstream handlers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tradedesk_core::ServiceError;

use crate::service::IdentityService;

/// Require a valid bearer token on every non-public path.
pub async fn gate(
    State(svc): State<Arc<IdentityService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if is_public_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ServiceError::Unauthorized("missing authorization token".into()))?;

    let claims = svc.verify_token(token)?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Paths reachable without a session.
pub fn is_public_path(path: &str) -> bool {
    matches!(
        path,
        "/" | "/health" | "/version" | "/meta/schema" | "/auth/login"
    )
}
