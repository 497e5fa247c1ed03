//! Per-resolution session state

use crate::platform::page::extract_session_cookie;

/// Cookie captured from the embed page for one resolution
///
/// Created from the page response and dropped when the resolution ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie: String,
}

impl Session {
    /// Capture the session cookie from raw `Set-Cookie` header values
    ///
    /// A missing cookie yields an empty session rather than an error.
    pub fn from_set_cookies<'a, I>(set_cookies: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            cookie: extract_session_cookie(set_cookies).unwrap_or_default(),
        }
    }

    /// `Cookie` header value to echo back, possibly empty
    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    /// Check if the page issued a session cookie
    pub fn has_cookie(&self) -> bool {
        !self.cookie.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_set_cookies() {
        let session = Session::from_set_cookies([
            "XSRF-TOKEN=abc; path=/",
            "kwik_session=s3cr3t; path=/; httponly",
        ]);
        assert!(session.has_cookie());
        assert_eq!(session.cookie(), "kwik_session=s3cr3t");
    }

    #[test]
    fn test_session_without_cookie() {
        let session = Session::from_set_cookies(["XSRF-TOKEN=abc; path=/"]);
        assert!(!session.has_cookie());
        assert_eq!(session.cookie(), "");
        assert_eq!(session, Session::default());
    }
}
