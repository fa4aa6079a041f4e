//! Cache backend configuration module

use serde::{Deserialize, Serialize};

/// Redis backend configuration
///
/// The access token is never part of source text; it comes from the
/// environment or a configuration file and is kept out of `Debug` output.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Redis connection URL, without credentials
    pub url: String,

    /// Access token / password for the Redis server
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Maximum number of attempts per command (and per connection)
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubles each attempt)
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            token: None,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl std::fmt::Debug for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "****"))
            .field("max_retries", &self.max_retries)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .finish()
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, max_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_retries = max_retries.max(1);
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    /// Connection URL with the token injected as the password.
    ///
    /// A URL that already carries credentials is returned unchanged.
    pub fn connection_url(&self) -> String {
        let token = match self.token.as_deref() {
            Some(token) if !token.is_empty() => token,
            _ => return self.url.clone(),
        };

        match self.url.find("://") {
            Some(proto_end) if !self.url.contains('@') => {
                let (proto, rest) = self.url.split_at(proto_end + 3);
                format!("{}default:{}@{}", proto, token, rest)
            }
            _ => self.url.clone(),
        }
    }
}
