//! The Wall Street Journal sits behind a paywall and often refuses
//! scrapers, so titles degrade from page tags to the article slug.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::fetch::Fetcher;
use super::html::{first_text, meta_name, meta_property, resolve_image_url};
use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use crate::models::MetadataResult;

static DATE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d{2}-\d{2}-\d{4}$").expect("valid date suffix regex"));

/// Title from the last path segment, e.g.
/// "/articles/fed-holds-rates-as-ai-spending-01-02-2024" -> "Fed Holds Rates As Ai Spending".
///
/// Purely alphabetic words are title-cased; anything else ("s&p", "500",
/// "q3") is upper-cased.
pub fn title_from_slug(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.rev().find(|s| !s.is_empty())?;
    let segment = urlencoding::decode(segment).ok()?;
    let slug = DATE_SUFFIX.replace(&segment, "");

    let words: Vec<String> = slug
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            if word.chars().all(char::is_alphabetic) {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            } else {
                word.to_uppercase()
            }
        })
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

pub async fn extract(
    fetcher: &Fetcher,
    url: &Url,
    config: &ExtractorConfig,
) -> Result<MetadataResult, ExtractionError> {
    let slug_title = title_from_slug(url);

    match fetcher.get_ok(url, Some("text/html")).await {
        Ok(page) => from_page(&page.body, &page.url, slug_title, config),
        Err(e) => {
            tracing::info!(error = %e, url = %url, "WSJ fetch failed, using slug title");
            let title = slug_title.ok_or(ExtractionError::UndeterminedTitle("WSJ"))?;
            Ok(MetadataResult {
                title: Some(title),
                description: Some(config.wsj_fallback_description.clone()),
                image_url: None,
                tags: config.wsj_tags.clone(),
            })
        }
    }
}

/// Build the result from a fetched article page, falling back to
/// `slug_title` when the page carries no usable headline.
pub fn from_page(
    html: &str,
    base: &Url,
    slug_title: Option<String>,
    config: &ExtractorConfig,
) -> Result<MetadataResult, ExtractionError> {
    let document = Html::parse_document(html);

    let title = meta_property(&document, "og:title")
        .or_else(|| first_text(&document, "h1"))
        .or(slug_title)
        .ok_or(ExtractionError::UndeterminedTitle("WSJ"))?;

    let description = meta_property(&document, "og:description")
        .or_else(|| meta_name(&document, "description"))
        .unwrap_or_else(|| config.wsj_fallback_description.clone());

    let image_url =
        meta_property(&document, "og:image").and_then(|raw| resolve_image_url(&raw, base));

    Ok(MetadataResult {
        title: Some(title),
        description: Some(description),
        image_url,
        tags: config.wsj_tags.clone(),
    })
}
