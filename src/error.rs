//! Error types for kwik-resolver

use std::fmt;
use thiserror::Error;

/// Main error type for a single resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid embed URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch {stage}: {cause}")]
    Fetch {
        stage: FetchStage,
        #[source]
        cause: FetchCause,
    },

    #[error("{}", .stage.message())]
    Parse { stage: ParseStage },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("302 redirect received but Location header was unusable ({reason})")]
    Redirect { reason: RedirectReason },

    #[error("Bypass failed. Expected 302, got {status}")]
    Bypass { status: u16 },
}

impl ResolveError {
    /// Build a fetch error from a transport failure
    pub fn fetch(stage: FetchStage, error: reqwest::Error) -> Self {
        ResolveError::Fetch {
            stage,
            cause: FetchCause::from(error),
        }
    }

    /// Stable machine-readable tag for this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::InvalidUrl(_) => "invalid-url",
            ResolveError::Client(_) => "client",
            ResolveError::Fetch { .. } => "fetch",
            ResolveError::Parse { .. } => "parse",
            ResolveError::Decode(_) => "decode",
            ResolveError::Redirect { .. } => "redirect",
            ResolveError::Bypass { .. } => "bypass",
        }
    }

    /// Check if error suggests the target site changed its page format
    pub fn is_site_change(&self) -> bool {
        matches!(
            self,
            ResolveError::Parse { .. } | ResolveError::Decode(_) | ResolveError::Redirect { .. }
        )
    }

    /// Check if error is a network timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ResolveError::Fetch {
                cause: FetchCause::Timeout,
                ..
            }
        )
    }
}

/// Network call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// Initial GET of the embed page
    Page,
    /// POST to the hidden form action
    Bypass,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Page => write!(f, "page"),
            FetchStage::Bypass => write!(f, "bypass"),
        }
    }
}

/// Why a network call failed
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("timed out")]
    Timeout,

    #[error("status {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for FetchCause {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchCause::Timeout
        } else {
            FetchCause::Transport(error)
        }
    }
}

/// Markup that did not contain the expected pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// Packed call arguments in the embed page
    Payload,
    /// Action URL and token in the decoded form
    Form,
}

impl ParseStage {
    fn message(&self) -> &'static str {
        match self {
            ParseStage::Payload => {
                "Obfuscated payload parameters not found; the site structure might have changed"
            }
            ParseStage::Form => "Failed to extract hidden form action or token",
        }
    }
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStage::Payload => write!(f, "payload"),
            ParseStage::Form => write!(f, "form"),
        }
    }
}

/// Problem with the Location header of a 302 response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    MissingLocation,
    InvalidLocation,
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectReason::MissingLocation => write!(f, "missing-location"),
            RedirectReason::InvalidLocation => write!(f, "invalid-location"),
        }
    }
}

/// Packed string decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("base {base} is out of range for an alphabet of {len} characters")]
    InvalidBase { base: u32, len: usize },

    #[error("segment {index} overflows the numeral range")]
    Overflow { index: usize },

    #[error("segment {index} yields invalid character code {code}")]
    InvalidCharCode { index: usize, code: i64 },
}
