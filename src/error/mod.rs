use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why a metadata extraction produced nothing usable.
///
/// The `Display` text is the reason shown to the user verbatim, so keep it
/// short and human-readable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("URL is required.")]
    MissingUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL resolves to a private or reserved address.")]
    BlockedAddress,

    #[error("Could not find the host for the provided URL.")]
    HostNotFound,

    #[error("Could not fetch metadata. Please check the URL and add details manually.")]
    Fetch,

    #[error("Timed out while fetching metadata.")]
    Timeout,

    #[error("Failed to fetch the page. Status: {0}")]
    Status(u16),

    #[error("Could not parse page data: {0}")]
    Parse(String),

    #[error("No metadata found for this URL.")]
    NoMetadata,

    #[error("Failed to fetch tweet data.")]
    TweetFetch,

    #[error("Could not find tweet data.")]
    TweetNotFound,

    #[error("Could not determine title from {0} URL.")]
    UndeterminedTitle(&'static str),
}

impl ExtractionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractionError::MissingUrl
            | ExtractionError::InvalidUrl(_)
            | ExtractionError::BlockedAddress => StatusCode::BAD_REQUEST,
            ExtractionError::HostNotFound
            | ExtractionError::Fetch
            | ExtractionError::Status(_)
            | ExtractionError::Parse(_)
            | ExtractionError::TweetFetch => StatusCode::BAD_GATEWAY,
            ExtractionError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ExtractionError::NoMetadata
            | ExtractionError::TweetNotFound
            | ExtractionError::UndeterminedTitle(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Extraction(e) => (e.status_code(), e.to_string()),
            AppError::Internal => {
                tracing::error!("Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    async fn body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_returns_400() {
        let response = AppError::Validation("URL is required.".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn internal_error_returns_500() {
        let response = AppError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn invalid_url_returns_400() {
        let response =
            AppError::from(ExtractionError::InvalidUrl("relative URL".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_status_returns_502_and_embeds_code() {
        let response = AppError::from(ExtractionError::Status(404)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response.into_body()).await;
        assert_eq!(json["error"], "Failed to fetch the page. Status: 404");
    }

    #[tokio::test]
    async fn timeout_returns_504() {
        let response = AppError::from(ExtractionError::Timeout).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn no_metadata_returns_422_with_reason() {
        let response = AppError::from(ExtractionError::NoMetadata).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response.into_body()).await;
        assert_eq!(json["error"], "No metadata found for this URL.");
    }

    #[test]
    fn undetermined_title_names_the_source() {
        let e = ExtractionError::UndeterminedTitle("WSJ");
        assert_eq!(e.to_string(), "Could not determine title from WSJ URL.");
    }

    #[tokio::test]
    async fn validation_error_body_has_error_key() {
        let response = AppError::Validation("URL is required.".into()).into_response();
        let json = body_json(response.into_body()).await;
        assert_eq!(json["error"], "URL is required.");
    }
}
