use actix_web::HttpResponse;
use serde::Serialize;

use crate::response::{ApiResponse, reply};

pub const WELCOME: &str = "Welcome to the Modular API! Check /favicon_checker or /dns_lookup.";

#[derive(Debug, Serialize)]
struct IndexData {
    api_version: &'static str,
}

pub async fn index() -> HttpResponse {
    reply(ApiResponse::ok(WELCOME, IndexData { api_version: "1.0" }))
}
