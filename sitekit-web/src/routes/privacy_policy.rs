use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use sitekit_toolbox::PrivacyPolicyRequest;

use super::{JsonOrForm, body_or_default};
use crate::error::ApiError;
use crate::response::{ApiResponse, reply};
use crate::state::AppState;

/// Every validation problem is reported in one 400 response.
pub async fn privacy_policy(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Result<JsonOrForm<PrivacyPolicyRequest>, actix_web::Error>,
) -> Result<HttpResponse, ApiError> {
    let request = body_or_default(&req, body)?;

    if let Err(errors) = state.toolbox.validate_privacy_policy(&request) {
        tracing::warn!("Privacy policy input rejected: {}", errors.join(" "));
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Input validation failed.",
            errors,
        ));
    }

    let policy = state.toolbox.privacy_policy(&request)?;
    Ok(reply(ApiResponse::ok(
        "Privacy Policy successfully generated.",
        policy,
    )))
}
