use std::net::IpAddr;

use reqwest::header::{ACCEPT, LOCATION};
use reqwest::redirect::Policy;
use reqwest::{Client as ReqwestClient, Response, StatusCode};
use url::Url;

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;

/// Hops followed before a redirect chain counts as a fetch failure.
pub const MAX_REDIRECTS: usize = 10;

/// Returns `true` if `ip` is a private, loopback, or link-local address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}

/// A response body together with where it actually came from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against this.
    pub url: Url,
    pub status: StatusCode,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Outbound HTTP shared by every extractor.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: ReqwestClient,
    allow_private_networks: bool,
}

impl Fetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self, reqwest::Error> {
        let client = ReqwestClient::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.as_str())
            // Redirects are followed by hand so every hop passes `check_host`.
            .redirect(Policy::none())
            .build()?;

        Ok(Fetcher {
            client,
            allow_private_networks: config.allow_private_networks,
        })
    }

    /// GET `url`, returning the page whatever its status code.
    ///
    /// The host is resolved up front so an unknown host is reported as such
    /// and private destinations can be refused before connecting. The same
    /// check runs again for every redirect hop.
    pub async fn get(
        &self,
        url: &Url,
        accept: Option<&str>,
    ) -> Result<FetchedPage, ExtractionError> {
        self.check_host(url).await?;
        self.follow_redirects(url, accept).await
    }

    /// Fetch `url`, whose host has already been checked, then follow up to
    /// [`MAX_REDIRECTS`] redirects, checking each new destination.
    async fn follow_redirects(
        &self,
        url: &Url,
        accept: Option<&str>,
    ) -> Result<FetchedPage, ExtractionError> {
        let mut current = url.clone();

        for hop in 0..=MAX_REDIRECTS {
            if hop > 0 {
                self.check_host(&current).await?;
            }

            let mut request = self.client.get(current.clone());
            if let Some(accept) = accept {
                request = request.header(ACCEPT, accept);
            }

            let response = request.send().await.map_err(|e| {
                tracing::warn!(error = ?e, url = %current, "Failed to fetch URL for metadata");
                classify_transport_error(&e)
            })?;

            if let Some(next) = redirect_target(&current, &response)? {
                tracing::debug!(from = %current, to = %next, "Following redirect");
                current = next;
                continue;
            }

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                tracing::warn!(error = ?e, url = %current, "Failed to read response body");
                classify_transport_error(&e)
            })?;

            tracing::debug!(
                url = %url,
                final_url = %current,
                status = status.as_u16(),
                "Fetched page"
            );

            return Ok(FetchedPage {
                url: current,
                status,
                body,
            });
        }

        tracing::warn!(url = %url, max = MAX_REDIRECTS, "Too many redirects");
        Err(ExtractionError::Fetch)
    }

    /// Like [`Fetcher::get`], but a non-2xx status is an error.
    pub async fn get_ok(
        &self,
        url: &Url,
        accept: Option<&str>,
    ) -> Result<FetchedPage, ExtractionError> {
        let page = self.get(url, accept).await?;
        if !page.is_success() {
            tracing::warn!(
                url = %url,
                status = page.status.as_u16(),
                "Upstream returned error status"
            );
            return Err(ExtractionError::Status(page.status.as_u16()));
        }
        Ok(page)
    }

    async fn check_host(&self, url: &Url) -> Result<(), ExtractionError> {
        let host = url
            .host_str()
            .ok_or_else(|| ExtractionError::InvalidUrl("URL has no host".into()))?;
        let port = url.port_or_known_default().unwrap_or(80);
        // IPv6 literals keep their brackets in `host_str`, which lookup_host accepts.
        let lookup_target = format!("{host}:{port}");

        let addrs: Vec<_> = tokio::net::lookup_host(&lookup_target)
            .await
            .map_err(|e| {
                tracing::warn!(error = ?e, host = %host, "Could not resolve host");
                ExtractionError::HostNotFound
            })?
            .collect();

        if addrs.is_empty() {
            return Err(ExtractionError::HostNotFound);
        }

        if !self.allow_private_networks && addrs.iter().any(|a| is_private_ip(a.ip())) {
            tracing::warn!(host = %host, "Refusing to fetch private or reserved address");
            return Err(ExtractionError::BlockedAddress);
        }

        Ok(())
    }
}

/// Where a 3xx response points, resolved against the URL that produced it.
/// `None` when the response is not a redirect or carries no `Location`.
fn redirect_target(current: &Url, response: &Response) -> Result<Option<Url>, ExtractionError> {
    if !response.status().is_redirection() {
        return Ok(None);
    }
    let Some(location) = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
    else {
        return Ok(None);
    };

    let next = current.join(location).map_err(|e| {
        tracing::warn!(error = %e, url = %current, location, "Unparseable redirect location");
        ExtractionError::Fetch
    })?;

    match next.scheme() {
        "http" | "https" => Ok(Some(next)),
        other => {
            tracing::warn!(url = %current, scheme = other, "Refusing redirect to non-http scheme");
            Err(ExtractionError::Fetch)
        }
    }
}

fn classify_transport_error(e: &reqwest::Error) -> ExtractionError {
    if e.is_timeout() {
        ExtractionError::Timeout
    } else {
        ExtractionError::Fetch
    }
}
