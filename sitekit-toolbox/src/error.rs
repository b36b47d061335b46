//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Toolbox error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum ToolboxError {
    /// Caller supplied malformed or missing input
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Transport-level failure (connect, TLS, HTTP status, body read)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// An upstream call exceeded its deadline
    #[error("{0}")]
    Timeout(String),

    /// The DNS resolver could not be constructed
    #[error("Resolver error: {0}")]
    ResolverError(String),

    /// WHOIS client or server failure
    #[error("WHOIS query failed: {0}")]
    WhoisError(String),

    /// HTML minifier failure
    #[error("Minification failed: {0}")]
    MinifyError(String),
}

impl ToolboxError {
    /// Whether the error is caused by user input rather than infrastructure.
    ///
    /// Callers log at `warn` when this returns `true` and at `error` otherwise.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// The message without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::ValidationError(m)
            | Self::NetworkError(m)
            | Self::Timeout(m)
            | Self::ResolverError(m)
            | Self::WhoisError(m)
            | Self::MinifyError(m) => m,
        }
    }
}

/// Toolbox Result type alias
pub type ToolboxResult<T> = std::result::Result<T, ToolboxError>;
