//! Service façade exposing all toolbox operations.

mod dns;
mod favicon;
mod http_headers;
mod minify;
mod privacy_policy;
mod resolver;
mod whois;

use std::net::IpAddr;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use whois_rust::WhoIs;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{
    DnsLookupResult, FaviconProbeResult, HeaderProbeResult, MinifyRequest, MinifyResult,
    PrivacyPolicyRequest, PrivacyPolicyResult, WhoisResult,
};
use crate::utils::{domain, urls};

pub use dns::{NO_RECORDS_FOUND, RecordResolver};
pub use favicon::{NO_FAVICON, NO_MANIFEST};
pub use minify::MISSING_HTML;
pub use privacy_policy::{INVALID_CONTACT_EMAIL, INVALID_WEBSITE_URL, MISSING_FIELDS};

/// Desktop Chrome user agent; some sites refuse unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Tunables for [`ToolboxService`].
#[derive(Debug, Clone)]
pub struct ToolboxOptions {
    /// Per-type DNS timeout (attempt and lifetime).
    pub dns_timeout: Duration,
    /// Page fetch and header probe timeout.
    pub http_timeout: Duration,
    /// `/site.webmanifest` existence check timeout.
    pub manifest_timeout: Duration,
    pub whois_timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Upstream DNS servers; empty means the system configuration.
    pub nameservers: Vec<IpAddr>,
    /// TLD → server map as JSON; `None` uses the embedded map.
    pub whois_servers: Option<String>,
}

impl Default for ToolboxOptions {
    fn default() -> Self {
        Self {
            dns_timeout: Duration::from_secs(5),
            http_timeout: Duration::from_secs(10),
            manifest_timeout: Duration::from_secs(5),
            whois_timeout: Duration::from_secs(10),
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            nameservers: Vec::new(),
            whois_servers: None,
        }
    }
}

/// Entry point for all diagnostic operations.
///
/// Holds the shared HTTP connection pool and WHOIS server map; everything
/// else is built per call.
///
/// ```rust,no_run
/// use sitekit_toolbox::{ToolboxOptions, ToolboxService};
/// # async fn demo() -> sitekit_toolbox::ToolboxResult<()> {
/// let toolbox = ToolboxService::new(ToolboxOptions::default())?;
/// let dns = toolbox.dns_lookup("example.com").await?;
/// # Ok(())
/// # }
/// ```
pub struct ToolboxService {
    client: Client,
    whois: WhoIs,
    options: ToolboxOptions,
}

impl ToolboxService {
    pub fn new(options: ToolboxOptions) -> ToolboxResult<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(options.max_redirects))
            .build()
            .map_err(|e| ToolboxError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        let whois = whois::build_client(
            options
                .whois_servers
                .as_deref()
                .unwrap_or(whois::EMBEDDED_WHOIS_SERVERS),
        )?;

        Ok(Self {
            client,
            whois,
            options,
        })
    }

    /// Query all supported record types for `domain`.
    ///
    /// A fresh resolver is built for every call; failing to build one is
    /// the only error besides validation.
    pub async fn dns_lookup(&self, domain: &str) -> ToolboxResult<DnsLookupResult> {
        let domain = domain::validate_domain(domain)?;
        let resolver =
            resolver::HickoryRecordResolver::new(&self.options.nameservers, self.options.dns_timeout)?;
        Ok(dns::aggregate(&resolver, &domain).await)
    }

    /// Same as [`Self::dns_lookup`] against a caller-supplied resolver.
    pub async fn dns_lookup_with<R>(&self, resolver: &R, domain: &str) -> ToolboxResult<DnsLookupResult>
    where
        R: RecordResolver + ?Sized,
    {
        let domain = domain::validate_domain(domain)?;
        Ok(dns::aggregate(resolver, &domain).await)
    }

    /// Status, headers and final URL of `url`. Scheme-less input gets `http://`.
    pub async fn header_check(&self, url: &str) -> ToolboxResult<HeaderProbeResult> {
        let target = urls::parse_target(url)?;
        let display = urls::normalize(url);
        http_headers::header_check(&self.client, &target, &display, self.options.http_timeout).await
    }

    /// Favicon and web app manifest of the page at `url`.
    pub async fn favicon_check(&self, url: &str) -> ToolboxResult<FaviconProbeResult> {
        let target = urls::parse_target(url)?;
        let display = urls::normalize(url);
        debug!("[Favicon] Checking {display}");
        favicon::favicon_check(
            &self.client,
            &target,
            &display,
            self.options.http_timeout,
            self.options.manifest_timeout,
        )
        .await
    }

    /// Registration data for `domain`. Unregistered names are not an error.
    pub async fn whois_lookup(&self, domain: &str) -> ToolboxResult<WhoisResult> {
        let domain = domain::validate_whois_domain(domain)?;
        whois::whois_lookup(&self.whois, &domain, self.options.whois_timeout).await
    }

    #[allow(clippy::unused_self)]
    pub fn minify_html(&self, request: &MinifyRequest) -> ToolboxResult<MinifyResult> {
        minify::minify_html(request)
    }

    /// All validation problems of a policy request, or `Ok`.
    #[allow(clippy::unused_self)]
    pub fn validate_privacy_policy(&self, request: &PrivacyPolicyRequest) -> Result<(), Vec<String>> {
        privacy_policy::validate(request)
    }

    /// Render a privacy policy dated today (local time).
    #[allow(clippy::unused_self)]
    pub fn privacy_policy(&self, request: &PrivacyPolicyRequest) -> ToolboxResult<PrivacyPolicyResult> {
        privacy_policy::generate(request, chrono::Local::now().date_naive())
    }
}
