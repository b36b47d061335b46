//! Uniform JSON response envelope.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Placeholder payload; serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyData {}

/// Body of every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T = EmptyData> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub errors: Vec<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Pair an envelope with the status code it is sent with.
    pub fn build(
        success: bool,
        message: impl Into<String>,
        data: T,
        errors: Vec<String>,
        status: StatusCode,
    ) -> (Self, StatusCode) {
        (
            Self {
                success,
                message: message.into(),
                data,
                errors,
            },
            status,
        )
    }

    /// 200 with no errors.
    pub fn ok(message: impl Into<String>, data: T) -> (Self, StatusCode) {
        Self::build(true, message, data, Vec::new(), StatusCode::OK)
    }

    /// Serialize as the response body with `status`.
    pub fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl ApiResponse<EmptyData> {
    /// Failure envelope without a payload.
    pub fn failure(
        message: impl Into<String>,
        errors: Vec<String>,
        status: StatusCode,
    ) -> (Self, StatusCode) {
        Self::build(false, message, EmptyData::default(), errors, status)
    }
}

/// Turn a `(envelope, status)` pair into an HTTP response.
pub fn reply<T: Serialize>((envelope, status): (ApiResponse<T>, StatusCode)) -> HttpResponse {
    envelope.respond(status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_serialize_as_empty_collections() {
        let (envelope, status) = ApiResponse::failure("nope", vec!["boom".into()], StatusCode::BAD_REQUEST);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "nope");
        assert_eq!(json["data"], serde_json::json!({}));
        assert_eq!(json["errors"], serde_json::json!(["boom"]));
    }

    #[test]
    fn test_ok_envelope() {
        let (envelope, status) = ApiResponse::ok("done", serde_json::json!({"api_version": "1.0"}));
        assert_eq!(status, StatusCode::OK);
        assert!(envelope.success);
        assert!(envelope.errors.is_empty());
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["data"]["api_version"], "1.0");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_build_keeps_errors_on_success() {
        let (envelope, status) = ApiResponse::build(
            true,
            "partial",
            EmptyData::default(),
            vec!["DNS query for CAA timed out.".into()],
            StatusCode::OK,
        );
        assert_eq!(status, StatusCode::OK);
        assert!(envelope.success);
        assert_eq!(envelope.errors.len(), 1);
    }
}
