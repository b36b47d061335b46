use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use sitekit_toolbox::utils::domain::{INVALID_DOMAIN, MISSING_DOMAIN};
use sitekit_toolbox::{WhoisParsedData, WhoisResult};

use super::{DomainQuery, param};
use crate::error::ApiError;
use crate::response::{ApiResponse, reply};
use crate::state::AppState;

fn unregistered(domain: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "domain": domain,
        "whois_raw": null,
        "is_registered": false,
        "parsed_data": WhoisParsedData::default(),
    })
}

/// WHOIS for `?domain=`. An unregistered name answers 200 with
/// `success: false`.
#[tracing::instrument(skip_all, fields(domain = ?query.domain))]
pub async fn whois_checker(
    state: web::Data<AppState>,
    query: web::Query<DomainQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(domain) = param(query.domain.as_deref()) else {
        return Err(
            ApiError::bad_request(MISSING_DOMAIN, "Domain parameter is missing.")
                .with_data(unregistered(None)),
        );
    };

    let result: WhoisResult = match state.toolbox.whois_lookup(domain).await {
        Ok(result) => result,
        Err(err) if err.is_expected() => {
            return Err(ApiError::from_toolbox(&err, INVALID_DOMAIN)
                .with_errors(vec!["Invalid domain format.".to_string()])
                .with_data(unregistered(Some(domain))));
        }
        Err(err) => {
            let message = format!(
                "WHOIS query failed due to a server or connection error: {}",
                err.detail()
            );
            return Err(ApiError::from_toolbox(&err, message.clone())
                .with_errors(vec![message])
                .with_data(unregistered(Some(domain))));
        }
    };

    if result.is_registered {
        return Ok(reply(ApiResponse::ok("WHOIS lookup successful.", result)));
    }

    let message = format!(
        "No WHOIS information found for '{}'. It is likely unregistered.",
        result.domain
    );
    Ok(reply(ApiResponse::build(
        false,
        message.clone(),
        result,
        vec![message],
        StatusCode::OK,
    )))
}
