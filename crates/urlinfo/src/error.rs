// ABOUTME: Error types for URL lookups including the ErrorCode enum and LookupError struct.
// ABOUTME: Separates fatal request-shape errors from fetch failures that degrade to empty metadata.

use std::fmt;

/// Error codes representing the categories of lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Request,
    InvalidUrl,
    PrivateHost,
    Fetch,
    Timeout,
    TooManyRedirects,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Request => "bad request",
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::PrivateHost => "private host blocked",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::TooManyRedirects => "too many redirects",
        };
        write!(f, "{}", s)
    }
}

/// The error type for lookup operations.
#[derive(Debug, thiserror::Error)]
pub struct LookupError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urlinfo: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl LookupError {
    fn new(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
        }
    }

    /// Create a Request error (missing parameter, wrong method).
    pub fn request(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::new(ErrorCode::Request, String::new(), op, source)
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a PrivateHost error.
    pub fn private_host(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::PrivateHost, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, url, op, source)
    }

    /// Create a TooManyRedirects error.
    pub fn too_many_redirects(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::TooManyRedirects, url, op, source)
    }

    /// Returns true for errors the caller must fix: these are reported, never absorbed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::Request | ErrorCode::InvalidUrl | ErrorCode::PrivateHost
        )
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a PrivateHost error.
    pub fn is_private_host(&self) -> bool {
        self.code == ErrorCode::PrivateHost
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is a TooManyRedirects error.
    pub fn is_too_many_redirects(&self) -> bool {
        self.code == ErrorCode::TooManyRedirects
    }

    /// Short human-readable reason without the op/url prefix, used in API responses.
    pub fn reason(&self) -> String {
        match self.source {
            Some(ref src) => src.to_string(),
            None => self.code.to_string(),
        }
    }
}
