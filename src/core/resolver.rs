//! Embed link resolution
//!
//! One resolution is a fixed sequence: fetch the embed page, unpack the
//! hidden form, post its token back with the page's session cookie and read
//! the media location off the 302 that follows.

use crate::core::session::Session;
use crate::error::{RedirectReason, ResolveError};
use crate::platform::client::{BypassResponse, KwikClient, ResolverConfig};
use crate::platform::page::{extract_form, extract_payload};
use crate::utils::url::{is_embed_url, parse_embed_url, resolve_action_url};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// Resolves embed links into direct media URLs
///
/// Holds only configuration and connection pools, so one instance can serve
/// any number of concurrent resolutions.
#[derive(Debug, Clone)]
pub struct KwikResolver {
    client: KwikClient,
}

impl KwikResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Result<Self, ResolveError> {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Result<Self, ResolveError> {
        Ok(Self {
            client: KwikClient::with_config(config)?,
        })
    }

    /// Get resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        self.client.config()
    }

    /// Resolve an embed link into the direct media URL
    ///
    /// Each network call is attempted once; the first failing stage ends the
    /// resolution. Both requests use the normalized page URL, which is also
    /// the Referer of the bypass POST.
    pub async fn resolve(&self, link: &str) -> Result<String, ResolveError> {
        let page_url = parse_embed_url(link)?;
        let link = link.trim();
        if !is_embed_url(page_url.as_str()) {
            warn!("{} does not look like a kwik embed page, trying anyway", link);
        }
        info!("Resolving embed link: {}", link);

        let page = self.client.fetch_page(page_url.as_str()).await?;
        let session = Session::from_set_cookies(page.set_cookies.iter().map(String::as_str));
        if session.has_cookie() {
            debug!("Captured session cookie");
        } else {
            warn!("Embed page set no session cookie, continuing without one");
        }

        let payload = extract_payload(&page.html)?;
        let decoded = payload.decode()?;
        debug!("Unpacked {} characters of hidden markup", decoded.chars().count());

        let form = extract_form(&decoded)?;
        let action = resolve_action_url(&page_url, &form.action)?;
        debug!("Submitting bypass form to {}", action);

        let response = self
            .client
            .submit_bypass(action.as_str(), &form.token, session.cookie(), page_url.as_str())
            .await?;

        let direct_url = capture_redirect(&response)?;
        info!("Resolved direct URL for {}", link);
        Ok(direct_url)
    }
}

/// Take the media location from the bypass response
fn capture_redirect(response: &BypassResponse) -> Result<String, ResolveError> {
    if response.status != StatusCode::FOUND {
        warn!("Bypass expected 302, got {}", response.status);
        return Err(ResolveError::Bypass {
            status: response.status.as_u16(),
        });
    }

    let location = response.location().ok_or(ResolveError::Redirect {
        reason: RedirectReason::MissingLocation,
    })?;

    location
        .to_str()
        .map(str::to_string)
        .map_err(|_| ResolveError::Redirect {
            reason: RedirectReason::InvalidLocation,
        })
}
