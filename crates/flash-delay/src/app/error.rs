use crate::app::http_api::ServerError;
use crate::usecases::ports::ApiError;

/// Exit codes follow sysexits(3), as the rest of the CLI does.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    /// EX_USAGE: the service rejected the input.
    pub const INVALID_INPUT: i32 = 64;
    /// EX_UNAVAILABLE: the service could not be reached.
    pub const UNAVAILABLE: i32 = 69;
    /// EX_IOERR: the service failed or replied with something unreadable.
    pub const EXTERNAL: i32 = 74;
    /// EX_CONFIG: the server configuration is unusable.
    pub const CONFIG: i32 = 78;
}

pub fn exit_code_for_api_error(error: &ApiError) -> i32 {
    match error {
        ApiError::Transport(_) => exit_codes::UNAVAILABLE,
        ApiError::Status { status, .. } if (400..500).contains(status) => exit_codes::INVALID_INPUT,
        ApiError::Status { .. } | ApiError::Decode(_) => exit_codes::EXTERNAL,
    }
}

pub fn exit_code_for_server_error(error: &ServerError) -> i32 {
    match error {
        ServerError::InvalidListen { .. } => exit_codes::CONFIG,
        ServerError::Io { .. } => exit_codes::UNAVAILABLE,
        ServerError::Task(_) => exit_codes::GENERAL_ERROR,
    }
}
