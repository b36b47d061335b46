//! Envelopes for unmatched routes, wrong methods and uncaught faults.

use actix_web::dev::ServiceResponse;
use actix_web::error::QueryPayloadError;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse};

use crate::error::ApiError;
use crate::response::{ApiResponse, reply};

pub const NOT_FOUND_MESSAGE: &str = "The requested URL was not found on the server. If you entered the URL manually please check your spelling and try again.";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "The method is not allowed for the requested URL.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred. Please try again later.";

pub async fn not_found() -> HttpResponse {
    reply(ApiResponse::failure(
        NOT_FOUND_MESSAGE,
        vec!["Not Found".to_string()],
        StatusCode::NOT_FOUND,
    ))
}

pub async fn method_not_allowed() -> HttpResponse {
    reply(ApiResponse::failure(
        METHOD_NOT_ALLOWED_MESSAGE,
        vec!["Method Not Allowed".to_string()],
        StatusCode::METHOD_NOT_ALLOWED,
    ))
}

/// Malformed query strings get a 400 envelope instead of a plain-text body.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::bad_request("Invalid query string.", err.to_string()).into()
}

/// Replace non-JSON 500 responses with the generic envelope.
pub fn error_handlers<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error)
}

fn internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_envelope = res
        .response()
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_envelope {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    tracing::error!("Unhandled server error on {}", res.request().path());
    let (req, _) = res.into_parts();
    let response = reply(ApiResponse::failure(
        INTERNAL_ERROR_MESSAGE,
        vec!["Internal Server Error".to_string()],
        StatusCode::INTERNAL_SERVER_ERROR,
    ));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
