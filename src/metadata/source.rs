use strum::{Display, EnumString};
use url::Url;

/// Which extraction strategy a URL is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Source {
    Generic,
    SocialMedia,
    Portfolio,
    NewsSite,
}

/// Lowercased hostname with any leading `www.` removed.
pub fn normalized_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
    Some(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}

/// `host` is `domain` itself or one of its subdomains.
fn matches_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Pick the extraction strategy for `url`. Never fails: anything that is
/// not a known source, including a URL without a host, is `Generic`.
pub fn classify(url: &str) -> Source {
    let Some(host) = Url::parse(url.trim()).ok().and_then(|u| normalized_host(&u)) else {
        return Source::Generic;
    };

    if matches_domain(&host, "twitter.com") || matches_domain(&host, "x.com") {
        Source::SocialMedia
    } else if matches_domain(&host, "behance.net") {
        Source::Portfolio
    } else if matches_domain(&host, "wsj.com") {
        Source::NewsSite
    } else {
        Source::Generic
    }
}

const BRANDS: &[(&str, &str)] = &[
    ("x.com", "X"),
    ("twitter.com", "X"),
    ("newyorker.com", "The New Yorker"),
    ("github.com", "GitHub"),
    ("youtube.com", "YouTube"),
    ("youtu.be", "YouTube"),
    ("vimeo.com", "Vimeo"),
    ("behance.net", "Behance"),
    ("dribbble.com", "Dribbble"),
    ("medium.com", "Medium"),
    ("substack.com", "Substack"),
    ("figma.com", "Figma"),
    ("producthunt.com", "Product Hunt"),
    ("techcrunch.com", "TechCrunch"),
    ("theverge.com", "The Verge"),
    ("nytimes.com", "The New York Times"),
    ("wsj.com", "The Wall Street Journal"),
];

/// Display name for the site a link points to, e.g. "The Wall Street Journal".
///
/// Accepts a full URL or a bare hostname. Unknown hosts use their first
/// label, capitalised.
pub fn brand_name(url_or_host: &str) -> String {
    let host = Url::parse(url_or_host)
        .ok()
        .and_then(|u| normalized_host(&u))
        .unwrap_or_else(|| {
            let lower = url_or_host.trim().to_ascii_lowercase();
            lower.strip_prefix("www.").unwrap_or(&lower).to_string()
        });

    if let Some((_, brand)) = BRANDS.iter().find(|(domain, _)| matches_domain(&host, domain)) {
        return brand.to_string();
    }

    match host.split_once('.') {
        Some((first, _)) if !first.is_empty() => capitalize(first),
        _ => url_or_host.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_twitter_and_x_to_social_media() {
        for url in [
            "https://twitter.com/jane/status/1",
            "https://www.twitter.com/jane/status/1",
            "https://X.com/jane/status/1",
            "http://mobile.twitter.com/jane",
        ] {
            assert_eq!(classify(url), Source::SocialMedia, "{url}");
        }
    }

    #[test]
    fn routes_behance_to_portfolio() {
        assert_eq!(
            classify("https://www.behance.net/gallery/123/My-Project"),
            Source::Portfolio
        );
    }

    #[test]
    fn routes_wsj_to_news_site() {
        assert_eq!(
            classify("https://www.WSJ.com/articles/headline-01-02-2024"),
            Source::NewsSite
        );
    }

    #[test]
    fn lookalike_hosts_are_generic() {
        assert_eq!(classify("https://notx.com/a"), Source::Generic);
        assert_eq!(classify("https://x.com.evil.org/a"), Source::Generic);
        assert_eq!(classify("https://example.com/x.com"), Source::Generic);
    }

    #[test]
    fn malformed_urls_fall_through_to_generic() {
        assert_eq!(classify("not a url"), Source::Generic);
        assert_eq!(classify(""), Source::Generic);
        assert_eq!(classify("mailto:jane@x.com"), Source::Generic);
    }

    #[test]
    fn source_displays_snake_case() {
        assert_eq!(Source::SocialMedia.to_string(), "social_media");
        assert_eq!("news_site".parse::<Source>().unwrap(), Source::NewsSite);
    }

    #[test]
    fn brand_name_uses_known_table() {
        assert_eq!(brand_name("https://www.wsj.com/articles/a"), "The Wall Street Journal");
        assert_eq!(brand_name("https://x.com/jane"), "X");
        assert_eq!(brand_name("gist.github.com"), "GitHub");
    }

    #[test]
    fn brand_name_capitalises_unknown_hosts() {
        assert_eq!(brand_name("https://www.example.com/page"), "Example");
        assert_eq!(brand_name("localhost"), "localhost");
    }
}
