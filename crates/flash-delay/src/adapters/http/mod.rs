pub mod dto;
pub mod error;
pub mod request;

pub use dto::{DelayPayload, DelayResponse, ErrorResponse, HealthResponse};
pub use error::{body_rejected_reply, method_not_allowed_reply, service_error_reply};
pub use request::decode_write_body;
