//! Website diagnostic toolbox.
//!
//! DNS record aggregation, HTTP header and favicon probes, WHOIS lookup,
//! HTML minification and privacy policy generation. Operations are
//! independent and keep no state between calls.

mod error;
mod services;
mod types;
pub mod utils;

pub use error::{ToolboxError, ToolboxResult};
pub use services::{
    DEFAULT_USER_AGENT, INVALID_CONTACT_EMAIL, INVALID_WEBSITE_URL, MISSING_FIELDS, MISSING_HTML,
    NO_FAVICON, NO_MANIFEST, NO_RECORDS_FOUND, RecordResolver, ToolboxOptions, ToolboxService,
};
pub use types::{
    DnsLookupResult, DnsRecordData, DnsRecordEntry, DnsRecordType, FaviconProbeResult,
    HeaderProbeResult, LookupOutcome, MinifyRequest, MinifyResult, PrivacyPolicyRequest,
    PrivacyPolicyResult, WhoisParsedData, WhoisResult,
};
