pub mod metadata;
pub mod source;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::models::{ErrorBody, MetadataResult, SourceInfo};

#[derive(OpenApi)]
#[openapi(
    paths(metadata::get_metadata, source::get_source),
    components(schemas(MetadataResult, SourceInfo, ErrorBody)),
    tags((name = "metadata", description = "Link preview metadata"))
)]
pub struct ApiDoc;

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "archives-server",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
