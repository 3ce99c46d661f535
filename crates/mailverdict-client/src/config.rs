//! Client configuration.

use url::Url;

use crate::error::{Error, Result};
use crate::request::Endpoint;

/// Environment variable holding the service base URL.
pub const API_URL_ENV: &str = "MAILVERDICT_API_URL";

const DEFAULT_USER_AGENT: &str = concat!("mailverdict/", env!("CARGO_PKG_VERSION"));

/// Classification service configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `https://classifier.example.com`.
    pub base_url: Url,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Whether proxies from the environment (`HTTP_PROXY`, ...) are honored.
    pub use_env_proxy: bool,
}

impl ClientConfig {
    /// Creates a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or not http(s).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(base_url: impl AsRef<str>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }

    /// Reads the base URL from `MAILVERDICT_API_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the variable is unset or blank,
    /// or a URL error when it does not parse.
    pub fn from_env() -> Result<Self> {
        let value = std::env::var(API_URL_ENV).unwrap_or_default();
        if value.trim().is_empty() {
            return Err(Error::InvalidConfig(format!("{API_URL_ENV} is not set")));
        }
        Self::new(value.trim())
    }

    /// Full URL of an endpoint.
    ///
    /// Any path on the base URL is kept, so a service mounted under a prefix
    /// works too.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL does not parse.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{}", endpoint.path()))?)
    }
}

/// Builder for client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    base_url: String,
    user_agent: Option<String>,
    use_env_proxy: bool,
}

impl ClientConfigBuilder {
    /// Creates a new builder with the given base URL.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().to_string(),
            user_agent: None,
            use_env_proxy: true,
        }
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Connects directly, ignoring proxy environment variables.
    #[must_use]
    pub const fn no_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid, not http(s), or carries
    /// a query or fragment.
    pub fn build(self) -> Result<ClientConfig> {
        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "unsupported URL scheme: {}",
                base_url.scheme()
            )));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(Error::InvalidConfig(format!(
                "base URL must not carry a query or fragment: {base_url}"
            )));
        }

        Ok(ClientConfig {
            base_url,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            use_env_proxy: self.use_env_proxy,
        })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        let config = ClientConfig::new("http://localhost:8000").unwrap();
        assert_eq!(
            config.endpoint_url(Endpoint::Text).unwrap().as_str(),
            "http://localhost:8000/api/classify/text"
        );
        assert_eq!(
            config.endpoint_url(Endpoint::File).unwrap().as_str(),
            "http://localhost:8000/api/classify/file"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let config = ClientConfig::new("https://example.com/classifier/").unwrap();
        assert_eq!(
            config.endpoint_url(Endpoint::Text).unwrap().as_str(),
            "https://example.com/classifier/api/classify/text"
        );
    }

    #[test]
    fn test_builder_user_agent() {
        let config = ClientConfig::builder("http://localhost:8000")
            .user_agent("tests/1.0")
            .build()
            .unwrap();
        assert_eq!(config.user_agent, "tests/1.0");

        let config = ClientConfig::new("http://localhost:8000").unwrap();
        assert!(config.user_agent.starts_with("mailverdict/"));
        assert!(config.use_env_proxy);
    }

    #[test]
    fn test_builder_no_proxy() {
        let config = ClientConfig::builder("http://localhost:8000")
            .no_proxy()
            .build()
            .unwrap();
        assert!(!config.use_env_proxy);
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(
            ClientConfig::new("not a url").unwrap_err(),
            Error::Url(_)
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com").unwrap_err(),
            Error::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_query_and_fragment_are_rejected() {
        for url in [
            "http://localhost:8000/?k=v",
            "http://localhost:8000/base?",
            "http://localhost:8000/#top",
        ] {
            assert!(
                matches!(ClientConfig::new(url).unwrap_err(), Error::InvalidConfig(_)),
                "{url} should be rejected"
            );
        }
    }
}
