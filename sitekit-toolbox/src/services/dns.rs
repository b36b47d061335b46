//! Best-effort multi-type DNS aggregation.

use async_trait::async_trait;
use log::{debug, warn};

use crate::types::{DnsLookupResult, DnsRecordType, LookupOutcome};

/// Error reported when nothing was found and no query failed.
pub const NO_RECORDS_FOUND: &str =
    "No DNS records found for this domain or domain does not exist. Please check the spelling.";

/// Answers a single (domain, record type) query.
#[async_trait]
pub trait RecordResolver: Send + Sync {
    async fn resolve(&self, domain: &str, record_type: DnsRecordType) -> LookupOutcome;
}

/// Query every type in [`DnsRecordType::ALL`] one after another.
///
/// Per-type failures are collected in `errors` and never abort the scan.
/// NXDOMAIN on one type does not stop the remaining queries.
pub async fn aggregate<R>(resolver: &R, domain: &str) -> DnsLookupResult
where
    R: RecordResolver + ?Sized,
{
    let mut result = DnsLookupResult {
        domain: domain.to_string(),
        ..DnsLookupResult::default()
    };

    for record_type in DnsRecordType::ALL {
        match resolver.resolve(domain, record_type).await {
            LookupOutcome::Found(entries) if !entries.is_empty() => {
                result.records.insert(record_type, entries);
            }
            LookupOutcome::Found(_) | LookupOutcome::NotFound => {
                debug!("No {record_type} records for {domain}");
            }
            LookupOutcome::DomainDoesNotExist => {
                debug!("NXDOMAIN for {domain} ({record_type})");
            }
            LookupOutcome::Timeout => {
                warn!("DNS query for {record_type} on {domain} timed out");
                result
                    .errors
                    .push(format!("DNS query for {record_type} timed out."));
            }
            LookupOutcome::TransportError(reason) => {
                warn!("DNS query for {record_type} on {domain} failed: {reason}");
                result
                    .errors
                    .push(format!("Error querying {record_type} records: {reason}"));
            }
        }
    }

    if result.records.is_empty() && result.errors.is_empty() {
        result.errors.push(NO_RECORDS_FOUND.to_string());
    }
    result
}
