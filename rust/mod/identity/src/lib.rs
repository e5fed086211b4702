//! Identity module: email/password sign-in and the session gate.
//!
//! Users are configured on the server with an argon2id password hash.
//! `POST /auth/login` issues an HS256 JWT; [`gate`] rejects every
//! non-public request without a valid one.
//!
//! ```ignore
//! let identity = IdentityModule::new(config);
//! let app = Router::new()
//!     .nest("/auth", identity.routes())
//!     .layer(middleware::from_fn_with_state(identity.service(), gate));
//! ```

pub mod api;
pub mod middleware;
pub mod password;
pub mod service;

use std::sync::Arc;

use axum::Router;
use tradedesk_core::Module;

pub use middleware::{gate, is_public_path};
pub use password::{hash_password, verify_password};
pub use service::{Claims, CurrentUser, IdentityConfig, IdentityService, LoginResponse, UserEntry};

pub struct IdentityModule {
    service: Arc<IdentityService>,
}

impl IdentityModule {
    pub fn new(config: IdentityConfig) -> Self {
        Self {
            service: Arc::new(IdentityService::new(config)),
        }
    }

    /// Shared service, used as the gate middleware state.
    pub fn service(&self) -> Arc<IdentityService> {
        Arc::clone(&self.service)
    }
}

impl Module for IdentityModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    fn make_app() -> Router {
        let identity = IdentityModule::new(IdentityConfig {
            users: vec![UserEntry {
                email: "owner@tradedesk.in".into(),
                name: "Owner".into(),
                password_hash: hash_password("open-sesame").unwrap(),
            }],
            jwt_secret: "test-secret".into(),
            expire_secs: 600,
        });
        Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/masters/units", get(|| async { "units" }))
            .nest("/auth", identity.routes())
            .layer(axum::middleware::from_fn_with_state(identity.service(), gate))
    }

    fn login_request(email: &str, password: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::json!({"email": email, "password": password}).to_string(),
            ))
            .unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(t) = token {
            builder = builder.header("authorization", format!("Bearer {}", t));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn sign_in_then_me() {
        let app = make_app();

        let resp = app
            .clone()
            .oneshot(login_request("owner@tradedesk.in", "open-sesame"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["token_type"], "Bearer");
        let token = body["access_token"].as_str().unwrap().to_string();

        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let me = body_json(resp).await;
        assert_eq!(me["email"], "owner@tradedesk.in");
        assert_eq!(me["name"], "Owner");

        let resp = app
            .oneshot(get_request("/masters/units", Some(&token)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let resp = make_app()
            .oneshot(login_request("owner@tradedesk.in", "guess"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "UNAUTHENTICATED");
        assert_eq!(body["message"], "invalid email or password");
    }

    #[tokio::test]
    async fn gate_blocks_without_token() {
        let app = make_app();

        let resp = app
            .clone()
            .oneshot(get_request("/masters/units", None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["code"], "UNAUTHENTICATED");

        let resp = app
            .clone()
            .oneshot(get_request("/auth/me", Some("not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
