use actix_web::{HttpRequest, HttpResponse, web};
use sitekit_toolbox::{MinifyRequest, MinifyResult};

use super::{JsonOrForm, body_or_default};
use crate::error::ApiError;
use crate::response::{ApiResponse, reply};
use crate::state::AppState;

pub async fn minify_html(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Result<JsonOrForm<MinifyRequest>, actix_web::Error>,
) -> Result<HttpResponse, ApiError> {
    let request = body_or_default(&req, body)?;

    match state.toolbox.minify_html(&request) {
        Ok(result) => Ok(reply(ApiResponse::ok(
            "HTML content successfully minified.",
            result,
        ))),
        Err(err) if err.is_expected() => Err(ApiError::from_toolbox(
            &err,
            "No HTML code provided for minification.",
        )),
        Err(err) => {
            let message = format!(
                "An unexpected error occurred during minification: {}",
                err.detail()
            );
            let length = request.html_code.chars().count();
            let data = MinifyResult {
                minified_html: request.html_code,
                original_length: length,
                minified_length: length,
                removed_comments: request.remove_comments,
            };
            Err(ApiError::from_toolbox(&err, message.clone())
                .with_errors(vec![message])
                .with_data(data))
        }
    }
}
