use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDoc {
    pub id: String,
    pub name: String,
    pub description: String,
    /// RFC 3339 timestamp with offset.
    pub created_at: String,
    /// RFC 3339 timestamp with offset.
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct CreateItemDoc {
    /// Optional; generated when empty or missing.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
}

#[derive(Serialize, ToSchema)]
pub struct UpdateItemDoc {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, ToSchema)]
pub struct ConnectionInfoDoc {
    /// `CONNECTED` or `ERROR`.
    pub status: String,
    pub endpoint: Option<String>,
    pub redis_version: Option<String>,
    pub redis_mode: Option<String>,
    pub os: Option<String>,
    pub tcp_port: Option<String>,
    pub uptime_in_seconds: Option<String>,
    pub server_name: Option<String>,
    pub item_count: Option<u64>,
    /// Present only when `status` is `ERROR`.
    pub error: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::items::create,
        crate::routes::items::get,
        crate::routes::items::search,
        crate::routes::items::update,
        crate::routes::items::delete,
        crate::routes::items::list,
        crate::routes::items::lazy_create,
        crate::routes::items::connection_info,
    ),
    components(
        schemas(
            ItemDoc,
            CreateItemDoc,
            UpdateItemDoc,
            ConnectionInfoDoc,
        )
    ),
    tags(
        (name = "items")
    )
)]
pub struct ApiDoc;
