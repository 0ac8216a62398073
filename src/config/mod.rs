use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const DEFAULT_TWITTER_MIRROR: &str = "https://api.fxtwitter.com";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Extra time the whole extraction gets on top of a single fetch, so DNS and
/// parsing never cut off a fallback that the fetch timeout would allow.
pub const EXTRACTION_HEADROOM: Duration = Duration::from_secs(2);
pub const WSJ_FALLBACK_DESCRIPTION: &str = "From The Wall Street Journal";
pub const WSJ_TAGS: &[&str] = &["wsj", "news", "finance"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be true or false, got {value:?}")]
    InvalidBool { name: &'static str, value: String },

    #[error("{name} must be an absolute URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Settings the extraction pipeline reads on every call.
///
/// Defaults mirror the constants the link form has always used; tests swap
/// the mirror base for a local mock server.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    pub user_agent: String,
    pub twitter_mirror_base: Url,
    pub fetch_timeout: Duration,
    pub allow_private_networks: bool,
    pub behance_fetch_covers: bool,
    pub wsj_tags: Vec<String>,
    pub wsj_fallback_description: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            twitter_mirror_base: default_mirror(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            allow_private_networks: false,
            behance_fetch_covers: true,
            wsj_tags: WSJ_TAGS.iter().map(|t| t.to_string()).collect(),
            wsj_fallback_description: WSJ_FALLBACK_DESCRIPTION.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Upper bound on one whole extraction, DNS checks and fallbacks included.
    pub fn extraction_deadline(&self) -> Duration {
        self.fetch_timeout + EXTRACTION_HEADROOM
    }
}

fn default_mirror() -> Url {
    Url::parse(DEFAULT_TWITTER_MIRROR).expect("default mirror URL is valid")
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub extractor: ExtractorConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = ExtractorConfig::default();

        let twitter_mirror_base = match env::var("TWITTER_MIRROR_URL") {
            Ok(value) => Url::parse(&value).map_err(|_| ConfigError::InvalidUrl {
                name: "TWITTER_MIRROR_URL",
                value,
            })?,
            Err(_) => defaults.twitter_mirror_base,
        };

        let extractor = ExtractorConfig {
            user_agent: env::var("ARCHIVES_USER_AGENT").unwrap_or(defaults.user_agent),
            twitter_mirror_base,
            fetch_timeout: Duration::from_secs(parse_var(
                "FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )?),
            allow_private_networks: parse_bool("ALLOW_PRIVATE_NETWORKS", false)?,
            behance_fetch_covers: parse_bool("BEHANCE_FETCH_COVERS", true)?,
            wsj_tags: defaults.wsj_tags,
            wsj_fallback_description: defaults.wsj_fallback_description,
        };

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: parse_var("SERVER_PORT", 8080)?,
            is_dev: env::var("APP_ENV").as_deref() != Ok("production"),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            rate_limit_per_second: parse_var("RATE_LIMIT_PER_SECOND", 2)?,
            rate_limit_burst: parse_var("RATE_LIMIT_BURST", 10)?,
            extractor,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidBool { name, value }),
        },
        Err(_) => Ok(default),
    }
}
