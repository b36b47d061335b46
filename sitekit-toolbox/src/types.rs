//! Public types returned by toolbox operations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// DNS record types covered by the aggregated lookup.
///
/// Declaration order is the query order, and `Ord` follows it so a
/// `BTreeMap<DnsRecordType, _>` serializes its keys in query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Text record.
    Txt,
    /// Canonical name (alias) record.
    Cname,
    /// Start of authority record.
    Soa,
    /// Service locator record.
    Srv,
    /// Pointer record (reverse DNS).
    Ptr,
    /// Certificate Authority Authorization record.
    Caa,
}

impl DnsRecordType {
    /// Every record type, in the order the aggregator queries them.
    pub const ALL: [Self; 10] = [
        Self::A,
        Self::Aaaa,
        Self::Mx,
        Self::Ns,
        Self::Txt,
        Self::Cname,
        Self::Soa,
        Self::Srv,
        Self::Ptr,
        Self::Caa,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
            Self::Soa => "SOA",
            Self::Srv => "SRV",
            Self::Ptr => "PTR",
            Self::Caa => "CAA",
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-specific payload of a DNS record.
///
/// Internally tagged by `type`, so the variant name doubles as the
/// record type on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum DnsRecordData {
    A {
        ip: String,
    },
    Aaaa {
        ip: String,
    },
    Mx {
        priority: u16,
        target: String,
    },
    Ns {
        target: String,
    },
    Txt {
        txt: String,
    },
    Cname {
        target: String,
    },
    Soa {
        mname: String,
        rname: String,
        serial: u32,
        refresh: i64,
        retry: i64,
        expire: i64,
        minimum_ttl: u32,
    },
    Srv {
        priority: u16,
        weight: u16,
        port: u16,
        target: String,
    },
    Ptr {
        target: String,
    },
    Caa {
        flags: u8,
        tag: String,
        value: String,
    },
}

impl DnsRecordData {
    /// The record type this payload belongs to.
    pub const fn record_type(&self) -> DnsRecordType {
        match self {
            Self::A { .. } => DnsRecordType::A,
            Self::Aaaa { .. } => DnsRecordType::Aaaa,
            Self::Mx { .. } => DnsRecordType::Mx,
            Self::Ns { .. } => DnsRecordType::Ns,
            Self::Txt { .. } => DnsRecordType::Txt,
            Self::Cname { .. } => DnsRecordType::Cname,
            Self::Soa { .. } => DnsRecordType::Soa,
            Self::Srv { .. } => DnsRecordType::Srv,
            Self::Ptr { .. } => DnsRecordType::Ptr,
            Self::Caa { .. } => DnsRecordType::Caa,
        }
    }
}

/// A single normalized DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecordEntry {
    /// Queried owner name, without the trailing dot.
    pub host: String,
    /// Record type plus its type-specific fields.
    #[serde(flatten)]
    pub data: DnsRecordData,
    /// Time-to-live in seconds.
    pub ttl: u32,
}

impl DnsRecordEntry {
    pub const fn record_type(&self) -> DnsRecordType {
        self.data.record_type()
    }
}

/// Outcome of querying one record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// At least one answer (may still be empty if nothing matched the type).
    Found(Vec<DnsRecordEntry>),
    /// The name exists but has no records of this type.
    NotFound,
    /// NXDOMAIN.
    DomainDoesNotExist,
    /// The query exceeded its lifetime.
    Timeout,
    /// Any other resolver failure.
    TransportError(String),
}

/// Aggregated multi-type DNS lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsLookupResult {
    /// Queried domain.
    pub domain: String,
    /// Records keyed by type; a key exists only when it has entries.
    pub records: BTreeMap<DnsRecordType, Vec<DnsRecordEntry>>,
    /// Per-type failures (informational when `records` is non-empty).
    #[serde(skip)]
    pub errors: Vec<String>,
}

impl DnsLookupResult {
    /// Whether any record type produced entries.
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Result of an HTTP header probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderProbeResult {
    /// Requested URL, replaced by the final URL when redirects occurred.
    pub url: String,
    /// Final HTTP status code (`None` when the request failed).
    pub status_code: Option<u16>,
    /// Human-readable status phrase.
    pub status_message: String,
    /// All response headers; repeated names are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub errors: Vec<String>,
}

impl HeaderProbeResult {
    /// Payload reported when the probe could not get any response.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: None,
            status_message: "Request Failed".to_string(),
            headers: BTreeMap::new(),
            errors: vec![error.into()],
        }
    }
}

/// Result of a favicon / web app manifest probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaviconProbeResult {
    /// Fetched page URL (after scheme normalization).
    pub url: String,
    /// Absolute favicon URL.
    pub favicon: Option<String>,
    /// Absolute manifest URL.
    pub manifest: Option<String>,
    pub has_favicon: bool,
    pub has_manifest: bool,
    /// Informational findings (missing favicon / manifest) or the fetch error.
    pub errors: Vec<String>,
}

impl FaviconProbeResult {
    /// Payload reported when the page itself could not be fetched.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            errors: vec![error.into()],
            ..Self::default()
        }
    }
}

/// Fields extracted from a raw WHOIS response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisParsedData {
    /// Domain registrar (e.g. "Cloudflare, Inc.").
    pub registrar: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
    pub last_updated: Option<String>,
    /// Authoritative name servers, lowercased and deduplicated.
    pub name_servers: Vec<String>,
    /// Contact e-mail addresses found in the response.
    pub emails: Vec<String>,
    /// EPP status codes.
    pub status: Vec<String>,
}

/// WHOIS query result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoisResult {
    /// The queried domain name.
    pub domain: String,
    /// Raw WHOIS response text (`None` when unregistered).
    pub whois_raw: Option<String>,
    pub is_registered: bool,
    pub parsed_data: WhoisParsedData,
}

/// HTML minification input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinifyRequest {
    #[serde(default)]
    pub html_code: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub remove_comments: bool,
}

/// HTML minification output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinifyResult {
    pub minified_html: String,
    /// Input length in characters.
    pub original_length: usize,
    /// Output length in characters.
    pub minified_length: usize,
    pub removed_comments: bool,
}

/// Privacy policy generator input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivacyPolicyRequest {
    #[serde(default)]
    pub website_name: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub contact_email: String,
    /// Adds the Google Analytics subsection.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub uses_ga: bool,
    /// Adds the Google AdSense section.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub uses_adsense: bool,
    /// Switches personal-information clauses to the newsletter wording.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub collects_emails: bool,
}

/// Generated privacy policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyPolicyResult {
    pub policy_html: String,
    pub website_name: String,
    pub contact_email: String,
}

/// Accept a JSON boolean or a `"true"`/`"false"` string (form posts).
///
/// Anything other than a case-insensitive `"true"` is `false`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}
