use actix_web::{HttpResponse, web};
use sitekit_toolbox::utils::urls;
use sitekit_toolbox::{HeaderProbeResult, ToolboxError};

use super::{UrlQuery, param};
use crate::error::ApiError;
use crate::response::{ApiResponse, reply};
use crate::state::AppState;

#[tracing::instrument(skip_all, fields(url = ?query.url))]
pub async fn header_checker(
    state: web::Data<AppState>,
    query: web::Query<UrlQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(url) = param(query.url.as_deref()) else {
        return Err(ApiError::bad_request(
            "URL parameter is missing.",
            "No URL provided in the request.",
        ));
    };

    match state.toolbox.header_check(url).await {
        Ok(result) => Ok(reply(ApiResponse::ok(
            "Successfully retrieved HTTP headers.",
            result,
        ))),
        Err(err) if err.is_expected() => Err(ApiError::from_toolbox(&err, "Invalid URL format.")),
        Err(err) => {
            let message = if matches!(err, ToolboxError::Timeout(_)) {
                "Failed to fetch URL headers: Timeout."
            } else {
                "Failed to fetch URL headers."
            };
            let data = HeaderProbeResult::failed(urls::normalize(url), err.detail());
            Err(ApiError::from_toolbox(&err, message).with_data(data))
        }
    }
}
