use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Invalid listen address: {message}")]
    InvalidListen { message: String },
    #[error("API server I/O error ({operation}): {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("API server task failed: {0}")]
    Task(String),
}
