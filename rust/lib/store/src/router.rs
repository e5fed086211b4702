//! Collection router: CRUD routes for one KvStore model.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tradedesk_core::{ListResult, ServiceError};

use crate::kv::{KvOps, KvStore};

struct CollectionState<T: KvStore> {
    ops: KvOps<T>,
}

/// Build an Axum router for CRUD on a KvStore model.
///
/// Routes:
///   GET    /{resources}         list the whole collection
///   POST   /{resources}         create (server assigns the id)
///   GET    /{resources}/{id}    get by key
///   PUT    /{resources}/{id}    full update
///   DELETE /{resources}/{id}    delete
pub fn collection_router<T: KvStore>(ops: KvOps<T>, resource_path: &str) -> Router {
    let state = Arc::new(CollectionState { ops });

    let list_path = format!("/{}", resource_path);
    let item_path = format!("/{}/{{id}}", resource_path);

    Router::new()
        .route(&list_path, get(list_handler::<T>).post(create_handler::<T>))
        .route(
            &item_path,
            get(get_handler::<T>)
                .put(update_handler::<T>)
                .delete(delete_handler::<T>),
        )
        .with_state(state)
}

async fn list_handler<T: KvStore>(
    State(state): State<Arc<CollectionState<T>>>,
) -> Result<Json<ListResult<T>>, ServiceError> {
    let items = state.ops.list()?;
    Ok(Json(ListResult::new(items)))
}

async fn get_handler<T: KvStore>(
    State(state): State<Arc<CollectionState<T>>>,
    Path(id): Path<String>,
) -> Result<Json<T>, ServiceError> {
    Ok(Json(state.ops.get_or_err(&id)?))
}

async fn create_handler<T: KvStore>(
    State(state): State<Arc<CollectionState<T>>>,
    Json(record): Json<T>,
) -> Result<(StatusCode, Json<T>), ServiceError> {
    let created = state.ops.save_new(record)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_handler<T: KvStore>(
    State(state): State<Arc<CollectionState<T>>>,
    Path(id): Path<String>,
    Json(mut record): Json<T>,
) -> Result<Json<T>, ServiceError> {
    let body_key = record.key_value();
    if !body_key.is_empty() && body_key != id {
        return Err(ServiceError::Validation(format!(
            "URL key '{}' does not match body key '{}'",
            id, body_key
        )));
    }
    record.set_key(&id);
    Ok(Json(state.ops.save(record)?))
}

async fn delete_handler<T: KvStore>(
    State(state): State<Arc<CollectionState<T>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServiceError> {
    state.ops.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
