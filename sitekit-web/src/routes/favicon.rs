use actix_web::{HttpResponse, web};
use sitekit_toolbox::FaviconProbeResult;
use sitekit_toolbox::utils::urls;

use super::{UrlQuery, param};
use crate::error::ApiError;
use crate::response::{ApiResponse, reply};
use crate::state::AppState;

/// Favicon and manifest discovery. Missing assets are reported in
/// `data.errors` and still answer 200.
#[tracing::instrument(skip_all, fields(url = ?query.url))]
pub async fn favicon_checker(
    state: web::Data<AppState>,
    query: web::Query<UrlQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(url) = param(query.url.as_deref()) else {
        return Err(ApiError::bad_request(
            "URL parameter is missing.",
            "URL parameter is missing.",
        ));
    };

    match state.toolbox.favicon_check(url).await {
        Ok(result) => Ok(reply(ApiResponse::ok(
            "Favicon and Web App Manifest checks completed.",
            result,
        ))),
        Err(err) if err.is_expected() => Err(ApiError::from_toolbox(&err, "Invalid URL format.")),
        Err(err) => {
            let data = FaviconProbeResult::failed(urls::normalize(url), err.detail());
            Err(ApiError::from_toolbox(
                &err,
                "Could not fetch content from the URL. It might be down or blocking requests.",
            )
            .with_data(data))
        }
    }
}
