pub mod items;

use axum::{routing::get, Json, Router};
use service::ItemRepository;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

/// Shared handler state. Cloned per request; the repository only holds an
/// `Arc` to the store.
#[derive(Clone)]
pub struct ServerState {
    pub repo: ItemRepository,
}

impl ServerState {
    pub fn new(repo: ItemRepository) -> Self {
        Self { repo }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: item routes plus the OpenAPI document.
///
/// The static segments `search`, `create` and `info` take precedence over `:id`.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let item_routes = Router::new()
        .route("/api/items", get(items::list).post(items::create))
        .route("/api/items/search", get(items::search))
        .route("/api/items/create", get(items::lazy_create))
        .route("/api/items/info", get(items::connection_info))
        .route(
            "/api/items/:id",
            get(items::get).put(items::update).delete(items::delete),
        );

    Router::new()
        .merge(item_routes)
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
