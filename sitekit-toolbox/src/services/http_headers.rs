//! HTTP header probe.

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use reqwest::{Client, Response};
use url::Url;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::HeaderProbeResult;

/// Reason phrases reported for the status codes we expect to see.
const STATUS_MESSAGES: &[(u16, &str)] = &[
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (204, "No Content"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (429, "Too Many Requests"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
];

pub fn status_message(code: u16) -> &'static str {
    STATUS_MESSAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map_or("Unknown Status", |(_, m)| *m)
}

/// Probe `target` with HEAD, falling back to a GET whose body is never read
/// when HEAD answers with an error status.
///
/// `display_url` is reported unless redirects moved the request elsewhere.
pub async fn header_check(
    client: &Client,
    target: &Url,
    display_url: &str,
    timeout: Duration,
) -> ToolboxResult<HeaderProbeResult> {
    debug!("[HTTP] HEAD {target}");
    let mut response = client
        .head(target.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| map_request_error(&e, timeout))?;

    if response.status().as_u16() >= 400 {
        debug!(
            "[HTTP] HEAD returned {}, retrying with GET",
            response.status().as_u16()
        );
        response = client
            .get(target.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_request_error(&e, timeout))?;
    }

    Ok(summarize(response, target, display_url))
}

/// Collect status and headers. The response is dropped here, so a GET
/// body is never downloaded.
fn summarize(response: Response, target: &Url, display_url: &str) -> HeaderProbeResult {
    let status = response.status().as_u16();

    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let url = if response.url() == target {
        display_url.to_string()
    } else {
        response.url().to_string()
    };

    HeaderProbeResult {
        url,
        status_code: Some(status),
        status_message: status_message(status).to_string(),
        headers,
        errors: Vec::new(),
    }
}

pub(crate) fn map_request_error(err: &reqwest::Error, timeout: Duration) -> ToolboxError {
    if err.is_timeout() {
        ToolboxError::Timeout(format!(
            "Request timed out after {} seconds.",
            timeout.as_secs()
        ))
    } else {
        ToolboxError::NetworkError(format!("Failed to connect or resolve URL: {err}"))
    }
}
