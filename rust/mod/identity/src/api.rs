use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tradedesk_core::ServiceError;

use crate::service::{Claims, CurrentUser, IdentityService, LoginResponse};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn build_router(svc: Arc<IdentityService>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .with_state(svc)
}

/// POST /auth/login
async fn login(
    State(svc): State<Arc<IdentityService>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    Ok(Json(svc.login(&body.email, &body.password)?))
}

/// GET /auth/me: the bearer's identity, from the gate's claims.
async fn me(claims: Option<Extension<Claims>>) -> Result<Json<CurrentUser>, ServiceError> {
    let Extension(claims) =
        claims.ok_or_else(|| ServiceError::Unauthorized("not signed in".into()))?;
    Ok(Json(CurrentUser::from(&claims)))
}
