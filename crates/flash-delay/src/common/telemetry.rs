#![expect(clippy::print_stderr, reason = "Tracing not initialized yet")]

//! Tracing setup.
//!
//! `RUST_LOG` sets the filter. `FLASH_DELAY_LOG` redirects output to a file,
//! `FLASH_DELAY_LOG_FORMAT` picks `text` or `json` and
//! `FLASH_DELAY_LOG_STREAM` picks `stderr` or `stdout`.

use std::io::IsTerminal;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LOG_FILE_ENV: &str = "FLASH_DELAY_LOG";
const LOG_FORMAT_ENV: &str = "FLASH_DELAY_LOG_FORMAT";
const LOG_STREAM_ENV: &str = "FLASH_DELAY_LOG_STREAM";

/// Keeps the non-blocking file writer flushing until dropped.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum LogStream {
    #[default]
    Stderr,
    Stdout,
}

/// Where and how log lines are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct LogSettings {
    file: Option<PathBuf>,
    format: LogFormat,
    stream: LogStream,
}

impl LogSettings {
    fn from_env() -> Self {
        let file = env_trimmed(LOG_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let format = match env_trimmed(LOG_FORMAT_ENV).map(|v| v.to_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let stream = match env_trimmed(LOG_STREAM_ENV).map(|v| v.to_lowercase()).as_deref() {
            Some("stdout") => LogStream::Stdout,
            _ => LogStream::Stderr,
        };
        Self {
            file,
            format,
            stream,
        }
    }

    /// Opens the sink. A file that cannot be opened falls back to stderr.
    fn open_writer(&self) -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
        let Some(path) = &self.file else {
            return stream_writer(self.stream);
        };
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard), false)
            }
            Err(err) => {
                eprintln!(
                    "Warning: failed to open log file {}: {}",
                    path.display(),
                    err
                );
                stream_writer(LogStream::Stderr)
            }
        }
    }
}

/// Installs the global subscriber. `default_level` applies when `RUST_LOG`
/// is unset or unparseable.
pub fn init_tracing(default_level: &str) -> TelemetryGuard {
    let settings = LogSettings::from_env();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (writer, guard, ansi) = settings.open_writer();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false);
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = match settings.format {
        LogFormat::Json => Box::new(builder.with_ansi(false).json().with_writer(writer).finish()),
        LogFormat::Text => Box::new(
            builder
                .with_thread_names(true)
                .with_ansi(ansi)
                .with_writer(writer)
                .finish(),
        ),
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return TelemetryGuard { _guard: None };
    }
    TelemetryGuard { _guard: guard }
}

fn stream_writer(stream: LogStream) -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
    match stream {
        LogStream::Stdout => (
            BoxMakeWriter::new(std::io::stdout),
            None,
            std::io::stdout().is_terminal(),
        ),
        LogStream::Stderr => (
            BoxMakeWriter::new(std::io::stderr),
            None,
            std::io::stderr().is_terminal(),
        ),
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::EnvGuard;

    #[test]
    fn test_settings_from_env() {
        {
            let _file = EnvGuard::set(LOG_FILE_ENV, " /tmp/flash-delay.log ");
            let _format = EnvGuard::set(LOG_FORMAT_ENV, "JSON ");
            let _stream = EnvGuard::set(LOG_STREAM_ENV, "stdout");
            assert_eq!(
                LogSettings::from_env(),
                LogSettings {
                    file: Some(PathBuf::from("/tmp/flash-delay.log")),
                    format: LogFormat::Json,
                    stream: LogStream::Stdout,
                }
            );
        }

        let _file = EnvGuard::set(LOG_FILE_ENV, "  ");
        let _format = EnvGuard::set(LOG_FORMAT_ENV, "yaml");
        let _stream = EnvGuard::remove(LOG_STREAM_ENV);
        assert_eq!(LogSettings::from_env(), LogSettings::default());
    }
}
