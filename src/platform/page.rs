//! Markup scanning for the embed page and the decoded bypass form

use crate::error::{ParseStage, ResolveError};
use crate::platform::packed::PackedPayload;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

// ("<encoded>", <int>, "<alphabet>", <offset>, <base>, <int>[letter])
static PAYLOAD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\(\s*"([^",]*)"\s*,\s*\d+\s*,\s*"([^",]*)"\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*\d+[a-zA-Z]?\s*\)"#,
    )
    .unwrap()
});

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"action="([^"]+)""#).unwrap());

static VALUE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"value="([^"]+)""#).unwrap());

static SESSION_COOKIE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(kwik_session=[^;]+)").unwrap());

/// Hidden form found in the decoded markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BypassForm {
    /// Submission URL, as written in the markup
    pub action: String,
    /// Hidden `_token` value
    pub token: String,
}

/// Extract the packed call arguments from the embed page
///
/// Only the first call-shaped match counts.
pub fn extract_payload(html: &str) -> Result<PackedPayload, ResolveError> {
    let payload_missing = || ResolveError::Parse {
        stage: ParseStage::Payload,
    };

    let captures = PAYLOAD_RE.captures(html).ok_or_else(payload_missing)?;
    let offset = captures[3].parse::<i64>().map_err(|_| payload_missing())?;
    let base = captures[4].parse::<u32>().map_err(|_| payload_missing())?;

    let payload = PackedPayload {
        encoded: captures[1].to_string(),
        alphabet: captures[2].to_string(),
        offset,
        base,
    };
    debug!(
        "Packed payload: {} chars, alphabet {:?}, offset {}, base {}",
        payload.encoded.len(),
        payload.alphabet,
        payload.offset,
        payload.base
    );

    Ok(payload)
}

/// Extract the form action and hidden token from decoded markup
pub fn extract_form(decoded: &str) -> Result<BypassForm, ResolveError> {
    let first_group = |re: &Regex| {
        re.captures(decoded)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    };

    match (first_group(&ACTION_RE), first_group(&VALUE_RE)) {
        (Some(action), Some(token)) => Ok(BypassForm { action, token }),
        _ => Err(ResolveError::Parse {
            stage: ParseStage::Form,
        }),
    }
}

/// Find the `kwik_session=<value>` pair among `Set-Cookie` header values
pub fn extract_session_cookie<'a, I>(set_cookies: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    set_cookies.into_iter().find_map(|header| {
        SESSION_COOKIE_RE
            .captures(header)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
    })
}
