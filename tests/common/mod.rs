// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

use archives_server::{
    config::ExtractorConfig, handlers, metadata::MetadataService, state::AppState,
};

/// Extractor settings for tests: loopback allowed so httpmock servers are
/// reachable, and a short timeout so a hung upstream fails fast.
pub fn test_config() -> ExtractorConfig {
    ExtractorConfig {
        allow_private_networks: true,
        fetch_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

/// Test settings with the tweet mirror pointed at `base`.
pub fn config_with_mirror(base: &str) -> ExtractorConfig {
    ExtractorConfig {
        twitter_mirror_base: Url::parse(base).expect("mock server URL"),
        ..test_config()
    }
}

pub fn service(config: ExtractorConfig) -> MetadataService {
    MetadataService::new(config).expect("Failed to build metadata service")
}

/// Build the application router without the rate limiter and metrics
/// layers, which need a real socket and a global recorder.
pub fn create_test_app(config: ExtractorConfig) -> Router {
    let state = AppState {
        metadata: service(config),
    };
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metadata", get(handlers::metadata::get_metadata))
        .route("/source", get(handlers::source::get_source))
        .with_state(state)
}

/// Percent-encode `url` for use as the `url` query parameter.
pub fn encoded(url: &str) -> String {
    urlencoding::encode(url).into_owned()
}

/// Send an unauthenticated GET and return `(status, json_body)`.
pub async fn get_no_auth(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
