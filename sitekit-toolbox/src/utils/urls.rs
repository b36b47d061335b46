//! URL normalization and relative link resolution.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{ToolboxError, ToolboxResult};

#[allow(clippy::expect_used)]
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:f|ht)tps?://").expect("valid scheme regex"));

pub const INVALID_URL: &str = "The provided URL does not appear to be a valid URL.";

/// Prepend `http://` unless the input already carries an http(s) or ftp(s) scheme.
pub fn normalize(candidate: &str) -> String {
    let candidate = candidate.trim();
    if SCHEME_RE.is_match(candidate) {
        candidate.to_string()
    } else {
        format!("http://{candidate}")
    }
}

/// Normalize and parse, requiring both a scheme and a host.
pub fn parse_target(candidate: &str) -> ToolboxResult<Url> {
    let normalized = normalize(candidate);
    let url =
        Url::parse(&normalized).map_err(|_| ToolboxError::ValidationError(INVALID_URL.to_string()))?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(ToolboxError::ValidationError(INVALID_URL.to_string())),
    }
}

/// RFC 3986 reference resolution. Absolute references pass through.
///
/// Falls back to the raw reference when the base itself does not parse.
pub fn resolve(base: &str, relative: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(relative))
        .map_or_else(|_| relative.to_string(), String::from)
}
