use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use sitekit_toolbox::utils::domain::{INVALID_DOMAIN, MISSING_DOMAIN};

use super::{DomainQuery, param};
use crate::error::ApiError;
use crate::response::{ApiResponse, reply};
use crate::state::AppState;

/// Every supported record type for `?domain=`.
///
/// 200 when any type answered (per-type failures listed in `errors`),
/// 404 when nothing was found.
#[tracing::instrument(skip_all, fields(domain = ?query.domain))]
pub async fn dns_lookup(
    state: web::Data<AppState>,
    query: web::Query<DomainQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(domain) = param(query.domain.as_deref()) else {
        return Err(ApiError::bad_request(
            MISSING_DOMAIN,
            "Domain parameter is missing.",
        ));
    };

    let result = match state.dns_lookup(domain).await {
        Ok(result) => result,
        Err(err) if err.is_expected() => {
            return Err(ApiError::from_toolbox(&err, INVALID_DOMAIN)
                .with_errors(vec!["Invalid domain format.".to_string()]));
        }
        Err(err) => return Err(err.into()),
    };

    let errors = result.errors.clone();
    let response = if result.has_records() {
        ApiResponse::build(
            true,
            "DNS records fetched successfully.",
            result,
            errors,
            StatusCode::OK,
        )
    } else {
        ApiResponse::build(
            false,
            "No DNS records found or domain does not exist.",
            result,
            errors,
            StatusCode::NOT_FOUND,
        )
    };
    Ok(reply(response))
}
