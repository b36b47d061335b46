//! WHOIS lookup and response parsing.

use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use regex::Regex;
use whois_rust::{WhoIs, WhoIsLookupOptions};

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{WhoisParsedData, WhoisResult};

/// Default TLD → WHOIS server map.
pub const EMBEDDED_WHOIS_SERVERS: &str = include_str!("whois_servers.json");

/// Phrases registries use to say a name is not registered.
const NOT_REGISTERED_MARKERS: &[&str] = &[
    "no match for",
    "not found",
    "no data found",
    "no entries found",
    "no matching record",
    "is available for registration",
    "object does not exist",
    "status: free",
    "status: available",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

static REGISTRAR: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^\s*Registrar:\s*(.+)$",
        r"(?im)^\s*Registrar Name:\s*(.+)$",
        r"(?im)^\s*Sponsoring Registrar:\s*(.+)$",
        r"(?im)^\s*registrar\.+:\s*(.+)$",
    ])
});

static CREATED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^\s*Creation Date:\s*(.+)$",
        r"(?im)^\s*Created Date:\s*(.+)$",
        r"(?im)^\s*Created(?: On)?:\s*(.+)$",
        r"(?im)^\s*Registration (?:Time|Date):\s*(.+)$",
        r"(?im)^\s*Registered on:\s*(.+)$",
    ])
});

static EXPIRES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^\s*Registry Expiry Date:\s*(.+)$",
        r"(?im)^\s*Registrar Registration Expiration Date:\s*(.+)$",
        r"(?im)^\s*Expir(?:y|ation) (?:Date|Time):\s*(.+)$",
        r"(?im)^\s*Expires(?: On)?:\s*(.+)$",
        r"(?im)^\s*paid-till:\s*(.+)$",
    ])
});

static UPDATED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^\s*Updated Date:\s*(.+)$",
        r"(?im)^\s*Last Updated(?: On)?:\s*(.+)$",
        r"(?im)^\s*Last Modified:\s*(.+)$",
        r"(?im)^\s*Changed:\s*(.+)$",
    ])
});

static NAME_SERVERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^\s*Name Server:\s*(\S+)",
        r"(?im)^\s*nserver:\s*(\S+)",
    ])
});

static STATUS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^\s*(?:Domain )?Status:\s*(\S+)",
        r"(?im)^\s*state:\s*(\S+)",
    ])
});

static EMAIL: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"]));

/// Build a client from a JSON server map.
pub fn build_client(servers_json: &str) -> ToolboxResult<WhoIs> {
    WhoIs::from_string(servers_json)
        .map_err(|e| ToolboxError::WhoisError(format!("invalid WHOIS server map: {e}")))
}

/// Query WHOIS for `domain`, following registry referrals.
pub async fn whois_lookup(
    client: &WhoIs,
    domain: &str,
    timeout: Duration,
) -> ToolboxResult<WhoisResult> {
    let options = WhoIsLookupOptions::from_string(domain)
        .map_err(|e| ToolboxError::ValidationError(format!("Invalid domain: {e}")))?;

    debug!("[WHOIS] Querying {domain}");
    let raw = tokio::time::timeout(timeout, client.lookup_async(options))
        .await
        .map_err(|_| {
            ToolboxError::Timeout(format!(
                "WHOIS query timed out after {} seconds.",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| ToolboxError::WhoisError(e.to_string()))?;

    Ok(parse_whois_response(domain, &raw))
}

/// Turn raw WHOIS text into a result, detecting unregistered names.
pub(crate) fn parse_whois_response(domain: &str, raw: &str) -> WhoisResult {
    let parsed = WhoisParsedData {
        registrar: first_match(&REGISTRAR, raw),
        creation_date: first_match(&CREATED, raw),
        expiration_date: first_match(&EXPIRES, raw),
        last_updated: first_match(&UPDATED, raw),
        name_servers: all_matches(&NAME_SERVERS, raw, true),
        emails: all_matches(&EMAIL, raw, true),
        status: all_matches(&STATUS, raw, false),
    };

    if is_not_registered(raw, &parsed) {
        debug!("[WHOIS] {domain} appears unregistered");
        return WhoisResult {
            domain: domain.to_string(),
            whois_raw: None,
            is_registered: false,
            parsed_data: WhoisParsedData::default(),
        };
    }

    WhoisResult {
        domain: domain.to_string(),
        whois_raw: Some(raw.to_string()),
        is_registered: true,
        parsed_data: parsed,
    }
}

/// A marker only counts when the text carries no registration facts.
fn is_not_registered(raw: &str, parsed: &WhoisParsedData) -> bool {
    if raw.trim().is_empty() {
        return true;
    }
    if parsed.registrar.is_some() || parsed.creation_date.is_some() {
        return false;
    }
    let lower = raw.to_lowercase();
    NOT_REGISTERED_MARKERS.iter().any(|m| lower.contains(m))
}

fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .find(|v| !v.is_empty())
    })
}

/// Every capture (or whole match when there is no group), deduplicated in
/// first-seen order.
fn all_matches(patterns: &[Regex], text: &str, lowercase: bool) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(text) {
            let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            let value = m.as_str().trim().trim_end_matches('.');
            let value = if lowercase {
                value.to_lowercase()
            } else {
                value.to_string()
            };
            if !value.is_empty() && !values.contains(&value) {
                values.push(value);
            }
        }
    }
    values
}
