//! Error types for BatCave source operations.
//!
//! This module defines the main error type [`SourceError`] which represents
//! every failure a pipeline can surface to its caller: transport failures,
//! non-success responses, invalid caller input and unsupported operations.
//!
//! Missing sub-elements inside a page are *not* errors. They degrade to
//! absent fields on the produced records.
//!
//! # Example
//!
//! ```rust
//! use batcave_core::{FacetToken, SourceError};
//!
//! match FacetToken::parse("g14") {
//!     Err(SourceError::InvalidFacetToken(token)) => assert_eq!(token, "g14"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use thiserror::Error;

/// Maximum number of bytes of a response body kept in error messages.
pub const EXCERPT_LEN: usize = 300;

/// Main error type for extraction, session and transport operations.
#[derive(Error, Debug)]
pub enum SourceError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other failures that happen before a status code is available.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided or built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The server answered with a non-success status.
    ///
    /// Carries the status code and a truncated excerpt of the body for diagnostics.
    #[error("HTTP error {status}: {excerpt}")]
    Transport { status: u16, excerpt: String },

    /// Neither the session cookies nor the response body confirmed the login.
    #[error("Login failed. Status: {status}. Response: {excerpt}")]
    LoginFailed { status: u16, excerpt: String },

    /// The top-level content of a detail page could not be found.
    #[error("No content could be extracted from {0}")]
    NoContent(String),

    /// Category token not shaped as `<key>_<id>`.
    #[error("Invalid category token: {0:?} (expected <key>_<id>)")]
    InvalidFacetToken(String),

    /// Operation the site adapter does not implement.
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

impl SourceError {
    /// Builds a [`SourceError::Transport`] from a status and the raw body.
    pub fn transport(status: u16, body: &str) -> Self {
        Self::Transport { status, excerpt: excerpt(body).to_string() }
    }

    /// Builds a [`SourceError::LoginFailed`] from a status and the raw body.
    pub fn login_failed(status: u16, body: &str) -> Self {
        Self::LoginFailed { status, excerpt: excerpt(body).to_string() }
    }
}

/// Truncates a body to [`EXCERPT_LEN`] bytes on a character boundary.
pub fn excerpt(body: &str) -> &str {
    if body.len() <= EXCERPT_LEN {
        return body;
    }
    let mut end = EXCERPT_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Result type alias for SourceError.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_display_has_status_and_excerpt() {
        let err = SourceError::transport(503, "<html>Service Unavailable</html>");
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("Service Unavailable"));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "a".repeat(1000);
        assert_eq!(excerpt(&body).len(), EXCERPT_LEN);
    }

    #[test]
    fn test_excerpt_respects_char_boundary() {
        let body = format!("{}é", "a".repeat(EXCERPT_LEN - 1));
        let cut = excerpt(&body);
        assert_eq!(cut.len(), EXCERPT_LEN - 1);
    }

    #[test]
    fn test_login_failed_error() {
        let err = SourceError::login_failed(200, "nope");
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn test_unsupported_error() {
        let err = SourceError::Unsupported("favorites.add_folder");
        assert_eq!(err.to_string(), "favorites.add_folder is not supported");
    }
}
