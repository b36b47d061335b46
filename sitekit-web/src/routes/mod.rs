//! HTTP routes.

pub mod dns;
pub mod favicon;
pub mod fallback;
pub mod headers;
pub mod index;
pub mod minify;
pub mod privacy_policy;
pub mod whois;

use actix_web::http::header;
use actix_web::{Either, HttpRequest, web};
use serde::Deserialize;

use crate::error::ApiError;

/// `?url=` parameter.
#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

/// `?domain=` parameter.
#[derive(Debug, Deserialize)]
pub struct DomainQuery {
    pub domain: Option<String>,
}

/// POST body accepted as JSON or as a urlencoded form.
pub type JsonOrForm<T> = Either<web::Json<T>, web::Form<T>>;

/// Unwrap the body. A request without one yields `T::default()`; a body
/// that is present but unreadable (malformed, too large, wrong content
/// type) is rejected with the extractor's status.
pub fn body_or_default<T: Default>(
    req: &HttpRequest,
    body: Result<JsonOrForm<T>, actix_web::Error>,
) -> Result<T, ApiError> {
    match body {
        Ok(Either::Left(json)) => Ok(json.into_inner()),
        Ok(Either::Right(form)) => Ok(form.into_inner()),
        Err(_) if !has_body(req) => Ok(T::default()),
        Err(err) => {
            let status = err.as_response_error().status_code();
            tracing::warn!("Rejected request body ({status}): {err}");
            Err(ApiError::new(
                status,
                "Invalid request body.",
                vec![err.to_string()],
            ))
        }
    }
}

fn has_body(req: &HttpRequest) -> bool {
    let headers = req.headers();
    headers.contains_key(header::TRANSFER_ENCODING)
        || headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .is_some_and(|len| len > 0)
}

/// Non-blank value of an optional parameter.
pub fn param(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Register every endpoint. Known paths answer other methods with 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::get().to(index::index))
            .default_service(web::to(fallback::method_not_allowed)),
    )
    .service(
        web::resource("/dns_lookup")
            .route(web::get().to(dns::dns_lookup))
            .default_service(web::to(fallback::method_not_allowed)),
    )
    .service(
        web::resource("/favicon_checker")
            .route(web::get().to(favicon::favicon_checker))
            .default_service(web::to(fallback::method_not_allowed)),
    )
    .service(
        web::resource("/header_checker")
            .route(web::get().to(headers::header_checker))
            .default_service(web::to(fallback::method_not_allowed)),
    )
    .service(
        web::resource("/whois_checker")
            .route(web::get().to(whois::whois_checker))
            .default_service(web::to(fallback::method_not_allowed)),
    )
    .service(
        web::resource("/minify_html")
            .route(web::post().to(minify::minify_html))
            .default_service(web::to(fallback::method_not_allowed)),
    )
    .service(
        web::resource("/privacy_policy")
            .route(web::post().to(privacy_policy::privacy_policy))
            .default_service(web::to(fallback::method_not_allowed)),
    );
}
