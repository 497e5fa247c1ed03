//! HTTP client for the embed host

use crate::error::{FetchCause, FetchStage, ResolveError};
use reqwest::header::{HeaderMap, COOKIE, LOCATION, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Origin the embed pages are served from
pub const DEFAULT_SITE_ORIGIN: &str = "https://kwik.cx";

/// Desktop Chrome user agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Proxy URL
    pub proxy_url: Option<String>,
    /// Origin sent as `Origin` and `Referer` on the page request
    pub site_origin: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy_url: None,
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Set per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Route requests through a proxy
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    /// Set the origin the browser headers are pinned to
    pub fn with_site_origin(mut self, origin: impl Into<String>) -> Self {
        self.site_origin = origin.into().trim_end_matches('/').to_string();
        self
    }
}

/// Embed page body plus the cookies it set
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Full response body
    pub html: String,
    /// Raw `Set-Cookie` header values
    pub set_cookies: Vec<String>,
}

/// Outcome of the bypass POST, redirects left unfollowed
#[derive(Debug, Clone)]
pub struct BypassResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl BypassResponse {
    /// Raw `Location` header, if any
    pub fn location(&self) -> Option<&reqwest::header::HeaderValue> {
        self.headers.get(LOCATION)
    }
}

/// Client for the embed host
///
/// Holds no cookie store; session state is passed in explicitly per call.
#[derive(Debug, Clone)]
pub struct KwikClient {
    page_client: Client,
    bypass_client: Client,
    config: ResolverConfig,
}

impl KwikClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, ResolveError> {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ResolverConfig) -> Result<Self, ResolveError> {
        let page_client = Self::builder(&config)?
            .build()
            .map_err(ResolveError::Client)?;
        let bypass_client = Self::builder(&config)?
            .redirect(Policy::none())
            .build()
            .map_err(ResolveError::Client)?;

        Ok(Self {
            page_client,
            bypass_client,
            config,
        })
    }

    fn builder(config: &ResolverConfig) -> Result<ClientBuilder, ResolveError> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true);

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(ResolveError::Client)?;
            builder = builder.proxy(proxy);
        }

        Ok(builder)
    }

    /// Get client configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Referer sent with the page request
    pub fn origin_referer(&self) -> String {
        format!("{}/", self.config.site_origin.trim_end_matches('/'))
    }

    /// Create a request with the browser header set pinned to the site origin
    fn browser_request(
        &self,
        client: &Client,
        method: Method,
        url: &str,
        referer: &str,
    ) -> reqwest::RequestBuilder {
        client
            .request(method, url)
            .header("User-Agent", &self.config.user_agent)
            .header("Referer", referer)
            .header("Origin", self.config.site_origin.trim_end_matches('/'))
            .header("Accept", HTML_ACCEPT)
    }

    /// GET the embed page
    ///
    /// Fails on any non-2xx status.
    pub async fn fetch_page(&self, link: &str) -> Result<FetchedPage, ResolveError> {
        let response = self
            .browser_request(&self.page_client, Method::GET, link, &self.origin_referer())
            .send()
            .await
            .map_err(|e| ResolveError::fetch(FetchStage::Page, e))?;

        let status = response.status();
        debug!("Embed page responded with status {}", status);
        if !status.is_success() {
            return Err(ResolveError::Fetch {
                stage: FetchStage::Page,
                cause: FetchCause::Status(status.as_u16()),
            });
        }

        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        let html = response
            .text()
            .await
            .map_err(|e| ResolveError::fetch(FetchStage::Page, e))?;

        Ok(FetchedPage { html, set_cookies })
    }

    /// POST the hidden token to the form action without following redirects
    ///
    /// `cookie` is sent as-is, even when empty. `referer` replaces the
    /// origin referer of the page request.
    pub async fn submit_bypass(
        &self,
        action: &str,
        token: &str,
        cookie: &str,
        referer: &str,
    ) -> Result<BypassResponse, ResolveError> {
        let response = self
            .browser_request(&self.bypass_client, Method::POST, action, referer)
            .header(COOKIE, cookie)
            .form(&[("_token", token)])
            .send()
            .await
            .map_err(|e| ResolveError::fetch(FetchStage::Bypass, e))?;

        let status = response.status();
        debug!("Bypass endpoint responded with status {}", status);

        Ok(BypassResponse {
            status,
            headers: response.headers().clone(),
        })
    }
}
