use axum::extract::Query;
use axum::Json;
use validator::Validate;

use super::metadata::{validation_error, UrlQuery};
use crate::error::AppResult;
use crate::metadata::{brand_name, classify, normalized_host, parse_request_url};
use crate::models::{ErrorBody, SourceInfo};

/// GET /source?url=<encoded-url>
///
/// Describes where a link points without fetching it: bare hostname,
/// display brand and the extraction strategy that would run.
#[utoipa::path(
    get,
    path = "/source",
    params(UrlQuery),
    responses(
        (status = 200, description = "Source description", body = SourceInfo),
        (status = 400, description = "Missing or invalid URL", body = ErrorBody),
    ),
    tag = "metadata"
)]
pub async fn get_source(Query(params): Query<UrlQuery>) -> AppResult<Json<SourceInfo>> {
    params.validate().map_err(validation_error)?;
    let url = parse_request_url(&params.url)?;

    Ok(Json(SourceInfo {
        hostname: normalized_host(&url).unwrap_or_default(),
        brand: brand_name(url.as_str()),
        strategy: classify(url.as_str()).to_string(),
    }))
}
