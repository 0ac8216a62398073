//! Link metadata extraction.
//!
//! [`MetadataService::get_metadata`] is the only entry point the link form
//! needs: it validates the URL, picks a [`Source`] and runs the matching
//! extractor. Callers never learn which extractor ran.

pub mod behance;
pub mod fetch;
pub mod generic;
pub mod html;
pub mod source;
pub mod twitter;
pub mod wsj;

use std::sync::Arc;

use url::Url;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::models::MetadataResult;

pub use fetch::Fetcher;
pub use source::{brand_name, classify, normalized_host, Source};

/// Parse and check a user-supplied URL: absolute, http(s), with a host.
pub fn parse_request_url(raw: &str) -> Result<Url, ExtractionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExtractionError::MissingUrl);
    }

    let url = Url::parse(raw).map_err(|e| ExtractionError::InvalidUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ExtractionError::InvalidUrl(format!(
                "unsupported scheme \"{other}\""
            )))
        }
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ExtractionError::InvalidUrl("URL has no host".into()));
    }

    Ok(url)
}

/// Stateless between calls; cloning shares the HTTP connection pool.
#[derive(Clone, Debug)]
pub struct MetadataService {
    fetcher: Fetcher,
    config: Arc<ExtractorConfig>,
}

impl MetadataService {
    pub fn new(config: ExtractorConfig) -> Result<Self, reqwest::Error> {
        Ok(MetadataService {
            fetcher: Fetcher::new(&config)?,
            config: Arc::new(config),
        })
    }

    /// Fetch preview metadata for `raw_url`.
    pub async fn get_metadata(&self, raw_url: &str) -> Result<MetadataResult, ExtractionError> {
        let url = parse_request_url(raw_url)?;
        let source = classify(url.as_str());
        tracing::debug!(url = %url, strategy = %source, "Extracting link metadata");

        let result = self.extract(source, &url).await?;
        if result.is_empty() {
            return Err(ExtractionError::NoMetadata);
        }
        Ok(result)
    }

    /// Run one specific extractor against an already-validated URL.
    ///
    /// The deadline sits above the per-fetch timeout, so extractors with an
    /// offline fallback get to use it when their fetch times out.
    pub async fn extract(
        &self,
        source: Source,
        url: &Url,
    ) -> Result<MetadataResult, ExtractionError> {
        tokio::time::timeout(self.config.extraction_deadline(), self.dispatch(source, url))
            .await
            .map_err(|_| {
                tracing::warn!(url = %url, strategy = %source, "Metadata extraction timed out");
                ExtractionError::Timeout
            })?
    }

    async fn dispatch(
        &self,
        source: Source,
        url: &Url,
    ) -> Result<MetadataResult, ExtractionError> {
        match source {
            Source::Generic => generic::extract(&self.fetcher, url).await,
            Source::SocialMedia => {
                twitter::extract(&self.fetcher, url, &self.config.twitter_mirror_base).await
            }
            Source::Portfolio => {
                behance::extract(&self.fetcher, url, self.config.behance_fetch_covers).await
            }
            Source::NewsSite => wsj::extract(&self.fetcher, url, &self.config).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_request_url("https://example.com/page").is_ok());
        assert!(parse_request_url("  http://example.com  ").is_ok());
    }

    #[test]
    fn empty_url_is_missing() {
        assert_eq!(parse_request_url("   "), Err(ExtractionError::MissingUrl));
    }

    #[test]
    fn rejects_relative_and_non_http() {
        assert!(matches!(
            parse_request_url("not-a-url"),
            Err(ExtractionError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_request_url("ftp://example.com/file"),
            Err(ExtractionError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_request_url("javascript:alert(1)"),
            Err(ExtractionError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_network() {
        let service = MetadataService::new(ExtractorConfig::default()).unwrap();
        let err = service.get_metadata("example dot com").await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid URL"));
    }
}
