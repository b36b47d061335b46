//! Shared application state.

use std::sync::Arc;

use sitekit_toolbox::{DnsLookupResult, RecordResolver, ToolboxResult, ToolboxService};

use crate::config::AppConfig;

/// Handed to every handler through `web::Data`.
pub struct AppState {
    pub toolbox: ToolboxService,
    /// Fixed resolver for `/dns_lookup`; `None` builds a fresh one per request.
    resolver: Option<Arc<dyn RecordResolver>>,
}

impl AppState {
    pub const fn new(toolbox: ToolboxService) -> Self {
        Self {
            toolbox,
            resolver: None,
        }
    }

    /// Route every DNS lookup through `resolver`.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn RecordResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let options = config.toolbox.to_options()?;
        Ok(Self::new(ToolboxService::new(options)?))
    }

    pub async fn dns_lookup(&self, domain: &str) -> ToolboxResult<DnsLookupResult> {
        match &self.resolver {
            Some(resolver) => self.toolbox.dns_lookup_with(resolver.as_ref(), domain).await,
            None => self.toolbox.dns_lookup(domain).await,
        }
    }
}
