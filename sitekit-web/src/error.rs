//! Error type returned by route handlers.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use sitekit_toolbox::ToolboxError;

use crate::response::ApiResponse;

/// A failure rendered as an envelope with `success: false`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiResponse<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status,
            body: ApiResponse {
                success: false,
                message: message.into(),
                data: Value::Object(serde_json::Map::new()),
                errors,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, vec![error.into()])
    }

    /// Map a toolbox error: validation becomes 400, anything else 500.
    ///
    /// Logged at `warn` for caller mistakes and `error` otherwise.
    pub fn from_toolbox(err: &ToolboxError, message: impl Into<String>) -> Self {
        if err.is_expected() {
            tracing::warn!("ToolboxError: {err}");
        } else {
            tracing::error!("ToolboxError: {err}");
        }
        let status = if err.is_expected() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, message, vec![err.detail().to_string()])
    }

    /// Replace the error list.
    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.body.errors = errors;
        self
    }

    /// Attach a payload to the failure envelope.
    #[must_use]
    pub fn with_data(mut self, data: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(data) {
            self.body.data = value;
        }
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.body.message
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(&self.body)
    }
}

impl From<ToolboxError> for ApiError {
    fn from(err: ToolboxError) -> Self {
        let message = if err.is_expected() {
            err.detail().to_string()
        } else {
            format!("An unexpected error occurred: {}", err.detail())
        };
        let api = Self::from_toolbox(&err, message.clone());
        if err.is_expected() {
            api
        } else {
            api.with_errors(vec![message])
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use actix_web::body::MessageBody;

    use super::*;

    fn body_json(err: &ApiError) -> Value {
        let bytes = err.error_response().into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::from(ToolboxError::ValidationError("bad input".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let json = body_json(&err);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "bad input");
        assert_eq!(json["errors"][0], "bad input");
        assert_eq!(json["data"], serde_json::json!({}));
    }

    #[test]
    fn test_infrastructure_maps_to_500() {
        let err = ApiError::from(ToolboxError::ResolverError("no nameservers".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "An unexpected error occurred: no nameservers");
        let json = body_json(&err);
        assert_eq!(
            json["errors"],
            serde_json::json!(["An unexpected error occurred: no nameservers"])
        );
    }

    #[test]
    fn test_with_data() {
        let err = ApiError::bad_request("Missing", "x missing")
            .with_data(serde_json::json!({"domain": null}));
        let json = body_json(&err);
        assert_eq!(json["data"]["domain"], Value::Null);
        assert_eq!(json["errors"], serde_json::json!(["x missing"]));
    }
}
