use thiserror::Error;

use crate::domain::DelayValidationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Delay store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum DelayServiceError {
    #[error(transparent)]
    Validation(#[from] DelayValidationError),
    #[error("Failed to decode request body: {0}")]
    Decode(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DelayServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, DelayServiceError::Validation(_))
    }
}

/// Failure of a call made by a client of the State Service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Server returned {status}: {error} ({message})")]
    Status {
        status: u16,
        error: String,
        message: String,
    },
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Validation rejections will fail the same way on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) | ApiError::Decode(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
        }
    }
}
