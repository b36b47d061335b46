//! Favicon and web app manifest discovery.

use std::sync::LazyLock;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::FaviconProbeResult;
use crate::utils::urls;

pub const NO_FAVICON: &str = "No standard favicon link found in HTML.";
pub const NO_MANIFEST: &str =
    "Web App Manifest not found (neither linked in HTML nor at /site.webmanifest).";

const FAVICON_RELS: &[&str] = &["icon", "apple-touch-icon", "mask-icon"];

#[allow(clippy::expect_used)]
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("link[rel]").expect("valid link selector"));

/// Link targets declared by a page, relative hrefs still unresolved.
#[derive(Debug, Default, PartialEq, Eq)]
struct DeclaredLinks {
    favicon: Option<String>,
    manifest: Option<String>,
}

fn is_favicon_rel(rel: &str) -> bool {
    rel.trim().eq_ignore_ascii_case("shortcut icon")
        || rel
            .split_ascii_whitespace()
            .any(|token| FAVICON_RELS.iter().any(|r| r.eq_ignore_ascii_case(token)))
}

fn is_manifest_rel(rel: &str) -> bool {
    rel.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("manifest"))
}

/// First favicon link with an `href`, and the first manifest link.
fn extract_links(html: &str) -> DeclaredLinks {
    let document = Html::parse_document(html);
    let mut links = DeclaredLinks::default();
    let mut manifest_seen = false;

    for element in document.select(&LINK_SELECTOR) {
        let rel = element.value().attr("rel").unwrap_or_default();
        let href = element
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty());

        if links.favicon.is_none() && is_favicon_rel(rel) {
            links.favicon = href.map(String::from);
        }
        if !manifest_seen && is_manifest_rel(rel) {
            manifest_seen = true;
            links.manifest = href.map(String::from);
        }
    }
    links
}

/// Fetch `target` and report its favicon and manifest.
///
/// Fails only when the page itself cannot be fetched; missing favicon or
/// manifest are reported through `errors`.
pub async fn favicon_check(
    client: &Client,
    target: &Url,
    display_url: &str,
    page_timeout: Duration,
    manifest_timeout: Duration,
) -> ToolboxResult<FaviconProbeResult> {
    debug!("[Favicon] GET {target}");
    let fetch_error =
        |e: reqwest::Error| ToolboxError::NetworkError(format!("Could not fetch content from the URL: {e}"));

    let response = client
        .get(target.clone())
        .timeout(page_timeout)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(fetch_error)?;
    let page_url = response.url().to_string();
    let body = response.text().await.map_err(fetch_error)?;

    let declared = extract_links(&body);
    let mut result = FaviconProbeResult {
        url: display_url.to_string(),
        ..FaviconProbeResult::default()
    };

    if let Some(href) = declared.favicon {
        result.favicon = Some(urls::resolve(&page_url, &href));
        result.has_favicon = true;
    } else {
        result.errors.push(NO_FAVICON.to_string());
    }

    result.manifest = match declared.manifest {
        Some(href) => Some(urls::resolve(&page_url, &href)),
        None => probe_well_known_manifest(client, &page_url, manifest_timeout).await,
    };
    result.has_manifest = result.manifest.is_some();
    if !result.has_manifest {
        result.errors.push(NO_MANIFEST.to_string());
    }

    Ok(result)
}

/// HEAD `<origin>/site.webmanifest`; any 2xx confirms it.
async fn probe_well_known_manifest(
    client: &Client,
    page_url: &str,
    timeout: Duration,
) -> Option<String> {
    let manifest_url = Url::parse(page_url).ok()?.join("/site.webmanifest").ok()?;
    debug!("[Favicon] HEAD {manifest_url}");
    match client.head(manifest_url.clone()).timeout(timeout).send().await {
        Ok(resp) if resp.status().is_success() => Some(manifest_url.to_string()),
        Ok(resp) => {
            debug!("[Favicon] {manifest_url} returned {}", resp.status());
            None
        }
        Err(e) => {
            debug!("[Favicon] {manifest_url} unreachable: {e}");
            None
        }
    }
}
