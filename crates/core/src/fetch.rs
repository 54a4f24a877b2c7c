//! HTTP access to the site.
//!
//! [`HttpClient`] issues exactly one request per call and hands back the
//! status, the `Set-Cookie` headers and the body. It never retries and never
//! interprets the status; pipelines decide what a non-success answer means.
//! Cookies persist in a jar shared by every request of the client, which is
//! how a login carries over to favorites listings.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, SET_COOKIE, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::{Result, SourceError};

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// A response as seen by the pipelines.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    /// Raw `Set-Cookie` header values of the final response.
    pub set_cookies: Vec<String>,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fails with [`SourceError::Transport`] unless the status is 2xx.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() { Ok(self) } else { Err(SourceError::transport(self.status, &self.body)) }
    }

    /// Value of a cookie set by this response.
    pub fn set_cookie(&self, name: &str) -> Option<&str> {
        self.set_cookies.iter().find_map(|header| cookie_value(header, name))
    }
}

/// Cookie-aware HTTP client bound to the site's base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    config: FetchConfig,
}

impl HttpClient {
    /// Builds a client for `base_url`.
    pub fn new(base_url: Url, config: FetchConfig) -> Result<Self> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(SourceError::InvalidUrl(format!("{} (expected http or https)", base_url)));
        }

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(SourceError::HttpError)?;

        Ok(Self { client, jar, base_url, config })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a site path (or absolute URL) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SourceError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Issues a GET for a site path.
    pub async fn get(&self, path: &str) -> Result<FetchedPage> {
        let url = self.url(path)?;
        self.send("GET", self.client.get(url)).await
    }

    /// Issues a form-encoded POST with `Referer` and `Origin` set to the site root.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<FetchedPage> {
        let url = self.url(path)?;
        let origin = self.base_url.origin().ascii_serialization();
        let request = self
            .client
            .post(url)
            .header(REFERER, format!("{}/", origin))
            .header(ORIGIN, origin)
            .form(form);
        self.send("POST", request).await
    }

    /// The `Cookie` header the jar would send to the site, if any.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Value of a cookie currently stored for the site.
    pub fn stored_cookie(&self, name: &str) -> Option<String> {
        self.cookie_header().and_then(|header| cookie_value(&header, name).map(str::to_string))
    }

    /// Expires every cookie stored for the site's origin.
    pub fn clear_cookies(&self) {
        let Some(header) = self.cookie_header() else {
            return;
        };
        let names: Vec<&str> = header
            .split(';')
            .filter_map(|pair| pair.split_once('=').map(|(n, _)| n.trim()))
            .collect();
        self.expire_cookies(&names);
        tracing::debug!(origin = %self.base_url, "cleared site cookies");
    }

    /// Expires the named cookies for the site's origin, leaving the rest in place.
    pub fn expire_cookies(&self, names: &[&str]) {
        let host = self.base_url.host_str().unwrap_or_default();
        for name in names {
            self.jar.add_cookie_str(&format!("{}=; Max-Age=0; Path=/", name), &self.base_url);
            self.jar
                .add_cookie_str(&format!("{}=; Max-Age=0; Path=/; Domain={}", name, host), &self.base_url);
        }
    }

    async fn send(&self, method: &'static str, request: RequestBuilder) -> Result<FetchedPage> {
        let response = request
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout { timeout: self.config.timeout }
                } else {
                    SourceError::HttpError(e)
                }
            })?;

        let page = read_page(response).await?;
        tracing::debug!(method, url = %page.url, status = page.status, bytes = page.body.len(), "fetched");
        Ok(page)
    }
}

async fn read_page(response: Response) -> Result<FetchedPage> {
    let url = response.url().to_string();
    let status = response.status().as_u16();
    let set_cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect();
    let body = response.text().await?;

    Ok(FetchedPage { url, status, set_cookies, body })
}

/// Finds `name=value` in a `Set-Cookie` or `Cookie` header.
fn cookie_value<'h>(header: &'h str, name: &str) -> Option<&'h str> {
    header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(n, _)| n.trim() == name)
        .map(|(_, v)| v.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(status: u16, set_cookies: &[&str]) -> FetchedPage {
        FetchedPage {
            url: "https://batcave.biz/".to_string(),
            status,
            set_cookies: set_cookies.iter().map(|s| s.to_string()).collect(),
            body: "body".to_string(),
        }
    }

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_rejects_non_http_base() {
        let base = Url::parse("ftp://batcave.biz").unwrap();
        assert!(matches!(HttpClient::new(base, FetchConfig::default()), Err(SourceError::InvalidUrl(_))));
    }

    #[test]
    fn test_url_joins_paths() {
        let client = HttpClient::new(Url::parse("https://batcave.biz").unwrap(), FetchConfig::default()).unwrap();
        assert_eq!(client.url("/comix/").unwrap().as_str(), "https://batcave.biz/comix/");
        assert_eq!(client.url("/page/2/").unwrap().as_str(), "https://batcave.biz/page/2/");
    }

    #[test]
    fn test_ensure_success() {
        assert!(page(200, &[]).ensure_success().is_ok());
        let err = page(404, &[]).ensure_success().unwrap_err();
        assert!(matches!(err, SourceError::Transport { status: 404, .. }));
    }

    #[test]
    fn test_set_cookie_lookup() {
        let p = page(200, &["PHPSESSID=abc; path=/", "dle_user_id=42; expires=Fri, 01 Jan 2100 00:00:00 GMT; path=/"]);
        assert_eq!(p.set_cookie("dle_user_id"), Some("42"));
        assert_eq!(p.set_cookie("PHPSESSID"), Some("abc"));
        assert_eq!(p.set_cookie("dle_password"), None);
    }

    #[test]
    fn test_cookie_jar_roundtrip_and_clear() {
        let base = Url::parse("https://batcave.biz").unwrap();
        let client = HttpClient::new(base.clone(), FetchConfig::default()).unwrap();
        client.jar.add_cookie_str("dle_user_id=42; Path=/", &base);
        assert_eq!(client.stored_cookie("dle_user_id").as_deref(), Some("42"));

        client.clear_cookies();
        assert!(client.stored_cookie("dle_user_id").is_none());
    }

    #[test]
    fn test_expire_cookies_keeps_others() {
        let base = Url::parse("https://batcave.biz").unwrap();
        let client = HttpClient::new(base.clone(), FetchConfig::default()).unwrap();
        client.jar.add_cookie_str("dle_user_id=42; Path=/", &base);
        client.jar.add_cookie_str("dle_password=abc; Path=/", &base);
        client.jar.add_cookie_str("PHPSESSID=s1; Path=/", &base);

        client.expire_cookies(&["dle_user_id", "dle_password"]);
        assert!(client.stored_cookie("dle_user_id").is_none());
        assert!(client.stored_cookie("dle_password").is_none());
        assert_eq!(client.stored_cookie("PHPSESSID").as_deref(), Some("s1"));
    }

    #[test]
    fn test_fetch_unreachable_host() {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let config = FetchConfig { timeout: 2, ..Default::default() };
        let result = std::thread::spawn(move || {
            let client = HttpClient::new(base, config).unwrap();
            tokio::runtime::Runtime::new().unwrap().block_on(client.get("/"))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(SourceError::HttpError(_)) | Err(SourceError::Timeout { .. })));
    }
}
