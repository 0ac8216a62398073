//! Behance project pages render client-side; the gallery slug is the only
//! signal that is always there. The cover image is best-effort enrichment.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

use super::fetch::Fetcher;
use super::html::{first_attr, first_text, meta_property, resolve_image_url};
use crate::error::ExtractionError;
use crate::models::MetadataResult;

static GALLERY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/gallery/(\d+)/([^/]+)").expect("valid gallery regex"));

/// Cover sizes in the embedded project state, largest first.
const COVER_KEYS: &[&str] = &["original", "max_808", "808", "404", "230", "202", "115"];

const COVER_IMAGE_SELECTORS: &[&str] = &[
    "img[class*='ProjectCover']",
    ".project-cover img",
    "img[class*='project-cover']",
];

/// "/gallery/123/brand-identity-for-acme" -> "Brand Identity For Acme".
pub fn title_from_path(url: &Url) -> Option<String> {
    let caps = GALLERY_PATH.captures(url.path())?;
    let slug = urlencoding::decode(caps.get(2)?.as_str()).ok()?;

    let words: Vec<String> = slug
        .split('-')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn extract(
    fetcher: &Fetcher,
    url: &Url,
    fetch_cover: bool,
) -> Result<MetadataResult, ExtractionError> {
    let title = title_from_path(url).ok_or(ExtractionError::UndeterminedTitle("Behance"))?;

    let image_url = if fetch_cover {
        match fetcher.get_ok(url, Some("text/html")).await {
            Ok(page) => cover_image(&page.body, &page.url),
            Err(e) => {
                tracing::debug!(error = %e, url = %url, "Skipping Behance cover image");
                None
            }
        }
    } else {
        None
    };

    Ok(MetadataResult {
        title: Some(title),
        description: None,
        image_url,
        tags: Vec::new(),
    })
}

/// Find the project cover: embedded state first, then `og:image`, then the DOM.
pub fn cover_image(html: &str, base: &Url) -> Option<String> {
    let document = Html::parse_document(html);

    state_cover(&document)
        .or_else(|| meta_property(&document, "og:image"))
        .or_else(|| {
            COVER_IMAGE_SELECTORS
                .iter()
                .find_map(|sel| first_attr(&document, sel, "src"))
        })
        .and_then(|raw| resolve_image_url(&raw, base))
}

/// The embedded store is undocumented third-party state, so any shape
/// mismatch just yields `None`.
fn state_cover(document: &Html) -> Option<String> {
    let raw = first_text(document, "script#beconfig-store_state")?;
    let state: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(e) => {
            tracing::debug!(error = %e, "Behance store state is not valid JSON");
            return None;
        }
    };

    let covers = state.pointer("/project/project/covers")?;
    COVER_KEYS
        .iter()
        .find_map(|key| covers.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://www.behance.net/gallery/123456/brand-identity-for-acme").unwrap()
    }

    #[test]
    fn derives_title_from_gallery_slug() {
        assert_eq!(
            title_from_path(&page_url()).as_deref(),
            Some("Brand Identity For Acme")
        );
    }

    #[test]
    fn decodes_percent_encoded_slug() {
        let url = Url::parse("https://www.behance.net/gallery/9/caf%C3%A9-menu/modules").unwrap();
        assert_eq!(title_from_path(&url).as_deref(), Some("Café Menu"));
    }

    #[test]
    fn non_gallery_paths_have_no_title() {
        for path in [
            "https://www.behance.net/someuser",
            "https://www.behance.net/gallery/abc/slug",
            "https://www.behance.net/gallery/123",
        ] {
            assert!(title_from_path(&Url::parse(path).unwrap()).is_none(), "{path}");
        }
    }

    #[test]
    fn prefers_largest_cover_in_store_state() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://mir-s3-cdn-cf.behance.net/og.png">
            <script type="application/json" id="beconfig-store_state">
                {"project":{"project":{"covers":{"115":"https://cdn/115.png","404":"https://cdn/404.png","max_808":"https://cdn/808.png"}}}}
            </script>
        </head></html>"#;
        assert_eq!(
            cover_image(html, &page_url()).as_deref(),
            Some("https://cdn/808.png")
        );
    }

    #[test]
    fn broken_store_state_falls_back_to_og_image() {
        let html = r#"<html><head>
            <meta property="og:image" content="/og.png">
            <script type="application/json" id="beconfig-store_state">{"project": nope</script>
        </head></html>"#;
        assert_eq!(
            cover_image(html, &page_url()).as_deref(),
            Some("https://www.behance.net/og.png")
        );
    }

    #[test]
    fn falls_back_to_cover_element() {
        let html = r#"<body><div class="project-cover"><img src="covers/main.jpg"></div></body>"#;
        assert_eq!(
            cover_image(html, &page_url()).as_deref(),
            Some("https://www.behance.net/gallery/123456/covers/main.jpg")
        );
    }

    #[test]
    fn no_cover_anywhere_is_none() {
        assert!(cover_image("<html></html>", &page_url()).is_none());
    }
}
