use scraper::{Html, Selector};
use url::Url;

/// Content of the first `<meta property="...">`, trimmed, if non-empty.
pub fn meta_property(doc: &Html, property: &str) -> Option<String> {
    meta_content(doc, &format!(r#"meta[property="{property}"]"#))
}

/// Content of the first `<meta name="...">`, trimmed, if non-empty.
pub fn meta_name(doc: &Html, name: &str) -> Option<String> {
    meta_content(doc, &format!(r#"meta[name="{name}"]"#))
}

fn meta_content(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(non_empty)
}

/// Trimmed text of the first element matching `selector`.
pub fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| non_empty(&el.text().collect::<String>()))
}

/// Trimmed attribute of the first element matching `selector`.
pub fn first_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector)
        .find_map(|el| el.value().attr(attr).and_then(non_empty))
}

/// Make an image reference absolute against the page it came from.
///
/// Returns `None` when the reference cannot be turned into an http(s) URL,
/// so a broken relative path never reaches the caller.
pub fn resolve_image_url(raw: &str, base: &Url) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let resolved = base.join(raw).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}

pub fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
