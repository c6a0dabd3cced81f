use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::{item::now, Item};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use service::errors::ServiceError;
use service::items::legacy::integer_id;
use tracing::{info, warn};

use crate::{errors::JsonApiError, routes::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Name to match, ignoring case.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LazyCreateQuery {
    /// Must parse as a 32-bit integer.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// Body of `PUT /api/items/{id}`. Fields left out are written as empty.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdateItemInput {
    pub name: String,
    pub description: String,
}

#[utoipa::path(
    post, path = "/api/items", tag = "items",
    request_body = crate::openapi::CreateItemDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ItemDoc),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Json(mut item): Json<Item>,
) -> Result<(StatusCode, Json<Item>), JsonApiError> {
    item.stamp_created(now());
    let saved = state
        .repo
        .save(item)
        .await
        .map_err(|e| JsonApiError::from_service("Create Failed", e))?;
    info!(id = %saved.id, name = %saved.name, "item_created");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(
    get, path = "/api/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ItemDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Item>, JsonApiError> {
    state
        .repo
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| JsonApiError::from_service("Read Failed", e))
}

#[utoipa::path(
    get, path = "/api/items/search", tag = "items",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items, possibly none", body = [crate::openapi::ItemDoc]),
        (status = 500, description = "Search Failed")
    )
)]
pub async fn search(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state
        .repo
        .find_by_name(&q.name)
        .await
        .map_err(|e| JsonApiError::from_service("Search Failed", e))?;
    info!(name = %q.name, count = items.len(), "search items");
    Ok(Json(items))
}

#[utoipa::path(
    put, path = "/api/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    request_body = crate::openapi::UpdateItemDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ItemDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateItemInput>,
) -> Result<Json<Item>, JsonApiError> {
    let mut existing = state
        .repo
        .get(&id)
        .await
        .map_err(|e| JsonApiError::from_service("Update Failed", e))?;

    existing.apply_update(input.name, input.description, now());
    let saved = state
        .repo
        .save(existing)
        .await
        .map_err(|e| JsonApiError::from_service("Update Failed", e))?;
    info!(id = %saved.id, "item_updated");
    Ok(Json(saved))
}

#[utoipa::path(
    delete, path = "/api/items/{id}", tag = "items",
    params(("id" = String, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<StatusCode, JsonApiError> {
    let exists = state
        .repo
        .exists(&id)
        .await
        .map_err(|e| JsonApiError::from_service("Delete Failed", e))?;
    if !exists {
        return Err(JsonApiError::from_service("Delete Failed", ServiceError::not_found(&format!("item {id}"))));
    }

    state
        .repo
        .delete(&id)
        .await
        .map_err(|e| JsonApiError::from_service("Delete Failed", e))?;
    info!(%id, "item_deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/items", tag = "items",
    responses(
        (status = 200, description = "Every stored item", body = [crate::openapi::ItemDoc]),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Item>>, JsonApiError> {
    let items = state
        .repo
        .find_all()
        .await
        .map_err(|e| JsonApiError::from_service("List Failed", e))?;
    info!(count = items.len(), "list items");
    Ok(Json(items))
}

/// Create an item from query parameters.
///
/// Deprecated: this mutates state through GET. Kept for existing callers;
/// use `POST /api/items` instead.
#[utoipa::path(
    get, path = "/api/items/create", tag = "items",
    params(LazyCreateQuery),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ItemDoc),
        (status = 400, description = "id missing or not an integer"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn lazy_create(
    State(state): State<ServerState>,
    Query(q): Query<LazyCreateQuery>,
) -> Result<(StatusCode, Json<Item>), JsonApiError> {
    warn!(id = ?q.id, "GET-based create used; prefer POST /api/items");
    let id = integer_id(q.id.as_deref()).map_err(|e| JsonApiError::from_service("Create Failed", e))?;
    let item = Item::new(id, q.name, q.desc, now());
    let saved = state
        .repo
        .save(item)
        .await
        .map_err(|e| JsonApiError::from_service("Create Failed", e))?;
    info!(id = %saved.id, "item_created");
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Report the backing store and the item count. Always answers 200; a store
/// failure shows up as `status = "ERROR"` in the body.
#[utoipa::path(
    get, path = "/api/items/info", tag = "items",
    responses((status = 200, description = "Connection status", body = crate::openapi::ConnectionInfoDoc))
)]
pub async fn connection_info(State(state): State<ServerState>) -> Json<Map<String, Value>> {
    Json(service::items::connection_info(&state.repo).await)
}
