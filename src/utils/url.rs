//! URL utilities for embed links and form actions

use crate::error::{ParseStage, ResolveError};
use url::Url;

/// Parse and validate a caller-supplied embed link
pub fn parse_embed_url(link: &str) -> Result<Url, ResolveError> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::InvalidUrl("Empty URL".to_string()));
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ResolveError::InvalidUrl(format!(
                "Unsupported scheme: {}",
                scheme
            )))
        }
    }

    if parsed.host_str().is_none() {
        return Err(ResolveError::InvalidUrl("Missing host".to_string()));
    }

    Ok(parsed)
}

/// Check if URL looks like a kwik embed page (`kwik.<tld>/e/<id>`)
pub fn is_embed_url(link: &str) -> bool {
    let Ok(parsed) = Url::parse(link) else {
        return false;
    };

    let on_kwik_host = parsed
        .host_str()
        .map(|host| host.trim_start_matches("www."))
        .is_some_and(|host| host.starts_with("kwik."));

    on_kwik_host
        && parsed
            .path()
            .strip_prefix("/e/")
            .is_some_and(|id| !id.is_empty())
}

/// Resolve a form action against the page it came from
///
/// Absolute actions are returned unchanged.
pub fn resolve_action_url(page: &Url, action: &str) -> Result<Url, ResolveError> {
    page.join(action).map_err(|_| ResolveError::Parse {
        stage: ParseStage::Form,
    })
}
