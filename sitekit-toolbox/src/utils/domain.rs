//! Domain name validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ToolboxError, ToolboxResult};

/// Hostname shape accepted by the DNS lookup: labels of letters, digits and
/// interior hyphens, at least two of them.
#[allow(clippy::expect_used)]
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9][a-z0-9-]{0,61}[a-z0-9]$")
        .expect("valid domain regex")
});

/// Looser shape used before WHOIS queries; the TLD must be alphabetic.
#[allow(clippy::expect_used)]
static WHOIS_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-z0-9-]+\.)+[a-z]{2,63}$").expect("valid whois domain regex")
});

pub const MISSING_DOMAIN: &str = "Please provide a domain name.";
pub const INVALID_DOMAIN: &str =
    "Invalid domain format. Please enter a valid domain (e.g., example.com).";

/// Structural check for a DNS hostname. Empty input, leading or trailing
/// dots and bare TLDs are rejected.
pub fn is_valid_domain(candidate: &str) -> bool {
    DOMAIN_RE.is_match(candidate)
}

/// Structural check applied before a WHOIS query.
pub fn is_valid_whois_domain(candidate: &str) -> bool {
    WHOIS_DOMAIN_RE.is_match(candidate)
}

/// Trim the input and convert internationalised labels to ASCII.
///
/// Returns the ASCII form, which is what gets validated and queried.
pub fn to_ascii(domain: &str) -> ToolboxResult<String> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(ToolboxError::ValidationError(MISSING_DOMAIN.to_string()));
    }
    if domain.is_ascii() {
        return Ok(domain.to_string());
    }
    idna::domain_to_ascii_strict(domain)
        .map_err(|_| ToolboxError::ValidationError(INVALID_DOMAIN.to_string()))
}

/// Normalize and validate a domain for DNS lookups.
pub fn validate_domain(domain: &str) -> ToolboxResult<String> {
    let ascii = to_ascii(domain)?;
    if !is_valid_domain(&ascii) {
        return Err(ToolboxError::ValidationError(INVALID_DOMAIN.to_string()));
    }
    Ok(ascii)
}

/// Normalize and validate a domain for WHOIS queries.
pub fn validate_whois_domain(domain: &str) -> ToolboxResult<String> {
    let ascii = to_ascii(domain)?;
    if !is_valid_whois_domain(&ascii) {
        return Err(ToolboxError::ValidationError(INVALID_DOMAIN.to_string()));
    }
    Ok(ascii)
}
