//! Tweets are client-rendered, so their metadata comes from a mirror API
//! that serves the same path as JSON.

use serde::Deserialize;
use url::Url;

use super::fetch::Fetcher;
use crate::error::ExtractionError;
use crate::models::MetadataResult;

#[derive(Debug, Deserialize)]
pub struct MirrorResponse {
    pub tweet: Option<Tweet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Tweet {
    pub text: Option<String>,
    pub author: Author,
    pub media: Media,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: Option<String>,
    pub screen_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Media {
    pub photos: Vec<Photo>,
    pub videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub struct Photo {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Video {
    pub thumbnail_url: Option<String>,
}

/// Point `url` at the mirror host, keeping the status path.
pub fn mirror_url(url: &Url, mirror_base: &Url) -> Url {
    let mut mirrored = mirror_base.clone();
    mirrored.set_path(url.path());
    mirrored.set_query(None);
    mirrored.set_fragment(None);
    mirrored
}

pub async fn extract(
    fetcher: &Fetcher,
    url: &Url,
    mirror_base: &Url,
) -> Result<MetadataResult, ExtractionError> {
    let api_url = mirror_url(url, mirror_base);

    let page = fetcher
        .get(&api_url, Some("application/json"))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, url = %api_url, "Tweet mirror request failed");
            ExtractionError::TweetFetch
        })?;

    if !page.is_success() {
        tracing::warn!(
            url = %api_url,
            status = page.status.as_u16(),
            "Tweet mirror returned error status"
        );
        return Err(ExtractionError::TweetFetch);
    }

    let response: MirrorResponse = serde_json::from_str(&page.body).map_err(|e| {
        tracing::warn!(error = %e, url = %api_url, "Tweet mirror returned malformed JSON");
        ExtractionError::Parse("tweet data is not valid JSON".into())
    })?;

    from_mirror(response)
}

/// Reshape a mirror payload into link metadata.
pub fn from_mirror(response: MirrorResponse) -> Result<MetadataResult, ExtractionError> {
    let tweet = response.tweet.ok_or(ExtractionError::TweetNotFound)?;
    let author = tweet.author;

    let handle = non_blank(author.screen_name.as_deref());
    let name = non_blank(author.name.as_deref()).or(handle);

    let title = non_blank(tweet.text.as_deref())
        .map(str::to_string)
        .or_else(|| name.map(|name| format!("Tweet from {name}")))
        .unwrap_or_else(|| "Tweet".to_string());

    let description = match (name, handle) {
        (Some(name), Some(handle)) => Some(format!("Tweet from {name} (@{handle})")),
        (Some(name), None) => Some(format!("Tweet from {name}")),
        _ => None,
    };

    let image_url = tweet
        .media
        .photos
        .into_iter()
        .find_map(|p| p.url)
        .or_else(|| tweet.media.videos.into_iter().find_map(|v| v.thumbnail_url))
        .or(author.avatar_url)
        .filter(|u| Url::parse(u).is_ok());

    Ok(MetadataResult {
        title: Some(title),
        description,
        image_url,
        tags: Vec::new(),
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
