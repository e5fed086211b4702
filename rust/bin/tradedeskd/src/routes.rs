//! Route registration: collects all module routes + system endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tradedesk_identity::{gate, IdentityService};

/// Build the complete router.
///
/// System endpoints stay public; everything else sits behind the gate.
pub fn build_router(
    identity: Arc<IdentityService>,
    module_routes: Vec<(String, Router)>,
    schema_json: serde_json::Value,
) -> Router {
    let mut app = Router::new()
        .route("/", get(version))
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/meta/schema", get(schema_endpoint))
        .with_state(Arc::new(schema_json));

    // Mount each module's routes under /{module_name}.
    for (name, router) in module_routes {
        app = app.nest(&format!("/{}", name), router);
    }

    app.layer(middleware::from_fn_with_state(identity, gate))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "tradedeskd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve the field schema as JSON for frontends.
async fn schema_endpoint(State(schema): State<Arc<serde_json::Value>>) -> impl IntoResponse {
    axum::Json(schema.as_ref().clone())
}
