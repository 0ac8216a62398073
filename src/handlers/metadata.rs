use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{ErrorBody, MetadataResult};
use crate::state::AppState;

// ── Query params ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UrlQuery {
    /// Absolute http(s) URL of the page to look at.
    #[serde(default)]
    #[validate(length(min = 1, message = "URL is required."))]
    pub url: String,
}

pub(crate) fn validation_error(e: validator::ValidationErrors) -> AppError {
    AppError::Validation(
        e.field_errors()
            .values()
            .flat_map(|v| v.iter())
            .filter_map(|e| e.message.as_ref())
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Handler ────────────────────────────────────────────────────────────────

/// GET /metadata?url=<encoded-url>
///
/// Returns title, description, preview image and tags for the given URL.
/// Every call fetches fresh; failures come back as `{ "error": reason }`.
#[utoipa::path(
    get,
    path = "/metadata",
    params(UrlQuery),
    responses(
        (status = 200, description = "Preview metadata", body = MetadataResult),
        (status = 400, description = "Missing, invalid or private URL", body = ErrorBody),
        (status = 422, description = "Nothing usable found on the page", body = ErrorBody),
        (status = 502, description = "Upstream could not be fetched or parsed", body = ErrorBody),
        (status = 504, description = "Upstream timed out", body = ErrorBody),
    ),
    tag = "metadata"
)]
pub async fn get_metadata(
    State(state): State<AppState>,
    Query(params): Query<UrlQuery>,
) -> AppResult<Json<MetadataResult>> {
    params.validate().map_err(validation_error)?;

    info!(url = %params.url, "Fetching link metadata");

    let result = state
        .metadata
        .get_metadata(&params.url)
        .await
        .inspect_err(|e| warn!(url = %params.url, reason = %e, "Link metadata unavailable"))?;

    Ok(Json(result))
}
