//! JSON API over the sitekit diagnostic toolbox.
//!
//! Every endpoint answers with the `{success, message, data, errors}`
//! envelope from [`response::ApiResponse`].

pub mod config;
pub mod error;
pub mod logging;
pub mod response;
pub mod routes;
pub mod state;

use actix_cors::Cors;
use actix_service::ServiceFactory;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::config::{AppConfig, CorsConfig};
use crate::state::AppState;

/// Cross-origin policy allowing the single configured origin.
pub fn cors(config: &CorsConfig) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_any_header()
        .max_age(3600);
    let origin = config.allow_origin.trim().trim_end_matches('/');
    if origin == "*" {
        cors.allow_any_origin()
    } else {
        cors.allowed_origin(origin)
    }
}

/// Assemble the application: routes, fallbacks, body limits, CORS and the
/// access log.
pub fn create_app(
    state: web::Data<AppState>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let limit = config.server.max_body_bytes;
    App::new()
        .app_data(state)
        .app_data(web::PayloadConfig::new(limit))
        .app_data(web::JsonConfig::default().limit(limit))
        .app_data(web::FormConfig::default().limit(limit))
        .app_data(web::QueryConfig::default().error_handler(routes::fallback::query_error))
        .configure(routes::configure)
        .default_service(web::to(routes::fallback::not_found))
        .wrap(routes::fallback::error_handlers())
        .wrap(cors(&config.cors))
        .wrap_fn(|req, srv| logging::log_request(req, srv))
}
