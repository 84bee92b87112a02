//! Mapping of service failures onto HTTP status codes.

use axum::http::StatusCode;

use crate::adapters::http::dto::ErrorResponse;
use crate::usecases::ports::DelayServiceError;

pub const INTERNAL_ERROR_TAG: &str = "Internal server error";
pub const METHOD_NOT_ALLOWED_TAG: &str = "Method not allowed";
pub const PAYLOAD_TOO_LARGE_TAG: &str = "Payload too large";

pub fn service_error_reply(err: &DelayServiceError) -> (StatusCode, ErrorResponse) {
    match err {
        DelayServiceError::Validation(validation) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(validation.tag(), validation.to_string()),
        ),
        DelayServiceError::Decode(_) | DelayServiceError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(INTERNAL_ERROR_TAG, err.to_string()),
        ),
    }
}

pub fn method_not_allowed_reply() -> (StatusCode, ErrorResponse) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorResponse::new(
            METHOD_NOT_ALLOWED_TAG,
            "Only GET and POST methods are supported",
        ),
    )
}

/// Reply for a request body that could not be buffered. Only an oversized
/// body keeps its own status.
pub fn body_rejected_reply(status: StatusCode, detail: String) -> (StatusCode, ErrorResponse) {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        (status, ErrorResponse::new(PAYLOAD_TOO_LARGE_TAG, detail))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(INTERNAL_ERROR_TAG, detail),
        )
    }
}
