//! Open Graph scraping for any page without a dedicated extractor.

use scraper::Html;
use url::Url;

use super::fetch::Fetcher;
use super::html::{first_text, meta_name, meta_property, resolve_image_url};
use crate::error::ExtractionError;
use crate::models::MetadataResult;

pub async fn extract(fetcher: &Fetcher, url: &Url) -> Result<MetadataResult, ExtractionError> {
    let page = fetcher.get_ok(url, Some("text/html")).await?;
    parse_page(&page.body, &page.url)
}

/// Pull title, description and preview image out of `html`.
///
/// `base` is the URL the document was served from, used to absolutise the
/// image. A page yielding none of the three is `NoMetadata`.
pub fn parse_page(html: &str, base: &Url) -> Result<MetadataResult, ExtractionError> {
    let document = Html::parse_document(html);

    let title = meta_property(&document, "og:title")
        .or_else(|| meta_name(&document, "twitter:title"))
        .or_else(|| first_text(&document, "title"));

    let description = meta_property(&document, "og:description")
        .or_else(|| meta_name(&document, "twitter:description"))
        .or_else(|| meta_name(&document, "description"));

    let image_url = meta_property(&document, "og:image")
        .or_else(|| meta_property(&document, "og:image:url"))
        .or_else(|| meta_name(&document, "twitter:image"))
        .and_then(|raw| resolve_image_url(&raw, base));

    if title.is_none() && description.is_none() && image_url.is_none() {
        return Err(ExtractionError::NoMetadata);
    }

    Ok(MetadataResult {
        title,
        description,
        image_url,
        tags: Vec::new(),
    })
}
