//! The BatCave source: configuration and capability composition.
//!
//! # Example
//!
//! ```rust,no_run
//! use batcave_core::{BatCave, SourceConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> batcave_core::Result<()> {
//! let source = BatCave::with_config(SourceConfig::builder().timeout(10).build())?;
//! let sections = source.catalog().homepage(1).await?;
//! for section in sections {
//!     println!("{}: {} comics", section.title, section.items.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use url::Url;

use crate::Result;
use crate::catalog::CatalogReader;
use crate::favorites::FavoritesReader;
use crate::fetch::{FetchConfig, HttpClient};
use crate::links::{TagAction, link_to_id, tag_action};
use crate::session::SessionManager;

/// Site address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://batcave.biz";

/// Configuration for a [`BatCave`] source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Site root every path is resolved against (default: `https://batcave.biz`).
    pub base_url: Url,
    /// Timeout and User-Agent for every request.
    pub fetch: FetchConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), fetch: FetchConfig::default() }
    }
}

impl SourceConfig {
    pub fn builder() -> SourceConfigBuilder {
        SourceConfigBuilder::new()
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL parses")
}

/// Builder for [`SourceConfig`].
///
/// ```rust
/// use batcave_core::SourceConfig;
/// use url::Url;
///
/// let config = SourceConfig::builder()
///     .base_url(Url::parse("http://127.0.0.1:8080").unwrap())
///     .timeout(5)
///     .user_agent("batcave-test")
///     .build();
/// assert_eq!(config.fetch.timeout, 5);
/// ```
pub struct SourceConfigBuilder {
    config: SourceConfig,
}

impl SourceConfigBuilder {
    pub fn new() -> Self {
        Self { config: SourceConfig::default() }
    }

    pub fn base_url(mut self, value: Url) -> Self {
        self.config.base_url = value;
        self
    }

    /// Request timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    pub fn build(self) -> SourceConfig {
        self.config
    }
}

impl Default for SourceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The site adapter. Every capability shares one HTTP client and cookie jar,
/// so a login through [`BatCave::session`] applies to [`BatCave::favorites`].
#[derive(Debug, Clone)]
pub struct BatCave {
    http: Arc<HttpClient>,
}

impl BatCave {
    /// A source for the public site with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(SourceConfig::default())
    }

    pub fn with_config(config: SourceConfig) -> Result<Self> {
        let http = HttpClient::new(config.base_url, config.fetch)?;
        Ok(Self { http: Arc::new(http) })
    }

    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }

    pub fn catalog(&self) -> CatalogReader {
        CatalogReader::new(Arc::clone(&self.http))
    }

    pub fn session(&self) -> SessionManager {
        SessionManager::new(Arc::clone(&self.http))
    }

    pub fn favorites(&self) -> FavoritesReader {
        FavoritesReader::new(Arc::clone(&self.http))
    }

    /// See [`link_to_id`].
    pub fn link_to_id(&self, link: &str) -> Option<String> {
        link_to_id(link)
    }

    /// See [`tag_action`].
    pub fn tag_action(&self, namespace: &str, tag: &str) -> TagAction {
        tag_action(namespace, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SourceConfig::default();
        assert_eq!(config.base_url.as_str(), "https://batcave.biz/");
        assert_eq!(config.fetch.timeout, 30);
    }

    #[test]
    fn test_builder_overrides() {
        let config = SourceConfig::builder()
            .base_url(Url::parse("http://localhost:1234").unwrap())
            .timeout(3)
            .user_agent("agent/1.0")
            .build();
        assert_eq!(config.base_url.as_str(), "http://localhost:1234/");
        assert_eq!(config.fetch.timeout, 3);
        assert_eq!(config.fetch.user_agent, "agent/1.0");
    }

    #[test]
    fn test_capabilities_share_session() {
        let source = BatCave::new().unwrap();
        assert!(!source.session().is_logged_in());
        assert_eq!(source.session().register_url().unwrap(), "https://batcave.biz/index.php?do=register");
        assert_eq!(source.link_to_id("https://batcave.biz/1-a.html").as_deref(), Some("1-a"));
    }
}
