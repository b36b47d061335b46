//! Hickory-backed [`RecordResolver`] used by the DNS aggregation.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::{
    ResolveError, TokioResolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
    proto::{
        ProtoErrorKind,
        rr::{Record, RecordType, record_data::RData},
    },
};
use log::debug;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{DnsRecordData, DnsRecordEntry, DnsRecordType, LookupOutcome};

use super::dns::RecordResolver;

/// Resolver built fresh for each aggregated lookup, so no answer cache
/// outlives the request.
pub struct HickoryRecordResolver {
    inner: TokioResolver,
    lifetime: Duration,
}

impl HickoryRecordResolver {
    /// Build a resolver targeting `nameservers`, or the host system
    /// configuration when the list is empty.
    ///
    /// `timeout` bounds each attempt and the whole query lifetime.
    pub fn new(nameservers: &[IpAddr], timeout: Duration) -> ToolboxResult<Self> {
        let inner = if nameservers.is_empty() {
            let mut builder = TokioResolver::builder_tokio().map_err(|e| {
                ToolboxError::ResolverError(format!("failed to load system DNS configuration: {e}"))
            })?;
            builder.options_mut().timeout = timeout;
            builder.build()
        } else {
            let config = ResolverConfig::from_parts(
                None,
                vec![],
                NameServerConfigGroup::from_ips_clear(nameservers, 53, true),
            );
            let mut opts = ResolverOpts::default();
            opts.timeout = timeout;
            TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
                .with_options(opts)
                .build()
        };
        Ok(Self {
            inner,
            lifetime: timeout,
        })
    }
}

#[async_trait]
impl RecordResolver for HickoryRecordResolver {
    async fn resolve(&self, domain: &str, record_type: DnsRecordType) -> LookupOutcome {
        let query = self.inner.lookup(fqdn(domain), to_hickory(record_type));
        match tokio::time::timeout(self.lifetime, query).await {
            Ok(Ok(lookup)) => {
                let entries: Vec<DnsRecordEntry> = lookup
                    .record_iter()
                    .filter_map(|record| to_entry(domain, record))
                    .filter(|entry| entry.record_type() == record_type)
                    .collect();
                debug!("{record_type} lookup for {domain}: {} record(s)", entries.len());
                LookupOutcome::Found(entries)
            }
            Ok(Err(err)) => classify(&err),
            Err(_) => LookupOutcome::Timeout,
        }
    }
}

const fn to_hickory(record_type: DnsRecordType) -> RecordType {
    match record_type {
        DnsRecordType::A => RecordType::A,
        DnsRecordType::Aaaa => RecordType::AAAA,
        DnsRecordType::Mx => RecordType::MX,
        DnsRecordType::Ns => RecordType::NS,
        DnsRecordType::Txt => RecordType::TXT,
        DnsRecordType::Cname => RecordType::CNAME,
        DnsRecordType::Soa => RecordType::SOA,
        DnsRecordType::Srv => RecordType::SRV,
        DnsRecordType::Ptr => RecordType::PTR,
        DnsRecordType::Caa => RecordType::CAA,
    }
}

/// Map a resolver error onto the per-type outcome.
fn classify(err: &ResolveError) -> LookupOutcome {
    if err.is_nx_domain() {
        return LookupOutcome::DomainDoesNotExist;
    }
    if err.is_no_records_found() {
        return LookupOutcome::NotFound;
    }
    if let Some(proto) = err.proto()
        && matches!(proto.kind(), ProtoErrorKind::Timeout)
    {
        return LookupOutcome::Timeout;
    }
    LookupOutcome::TransportError(err.to_string())
}

/// Absolute form of `domain`, so resolv.conf search suffixes never apply.
fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{domain}.")
    }
}

fn trim_name(name: &impl ToString) -> String {
    name.to_string().trim_end_matches('.').to_string()
}

/// Normalize one answer record. Records of unsupported types yield `None`.
fn to_entry(host: &str, record: &Record) -> Option<DnsRecordEntry> {
    let data = match record.data() {
        RData::A(a) => DnsRecordData::A { ip: a.to_string() },
        RData::AAAA(aaaa) => DnsRecordData::Aaaa {
            ip: aaaa.to_string(),
        },
        RData::MX(mx) => DnsRecordData::Mx {
            priority: mx.preference(),
            target: trim_name(mx.exchange()),
        },
        RData::NS(ns) => DnsRecordData::Ns {
            target: trim_name(&ns.0),
        },
        RData::TXT(txt) => DnsRecordData::Txt {
            txt: txt
                .iter()
                .map(|part| String::from_utf8_lossy(part).into_owned())
                .collect(),
        },
        RData::CNAME(cname) => DnsRecordData::Cname {
            target: trim_name(&cname.0),
        },
        RData::SOA(soa) => DnsRecordData::Soa {
            mname: trim_name(soa.mname()),
            rname: trim_name(soa.rname()),
            serial: soa.serial(),
            refresh: i64::from(soa.refresh()),
            retry: i64::from(soa.retry()),
            expire: i64::from(soa.expire()),
            minimum_ttl: soa.minimum(),
        },
        RData::SRV(srv) => DnsRecordData::Srv {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            target: trim_name(srv.target()),
        },
        RData::PTR(ptr) => DnsRecordData::Ptr {
            target: trim_name(&ptr.0),
        },
        RData::CAA(caa) => DnsRecordData::Caa {
            flags: if caa.issuer_critical() { 128 } else { 0 },
            tag: caa.tag().as_str().to_string(),
            value: String::from_utf8_lossy(caa.raw_value()).into_owned(),
        },
        _ => return None,
    };
    Some(DnsRecordEntry {
        host: host.trim_end_matches('.').to_string(),
        data,
        ttl: record.ttl(),
    })
}
