//! Server and client configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::domain::DelayBounds;
use crate::domain::DelayValue;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    listen: String,
    initial: DelayValue,
    max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            initial: DelayValue::DEFAULT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn listen(&self) -> &str {
        &self.listen
    }

    pub fn initial(&self) -> DelayValue {
        self.initial
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// `FLASH_DELAY_LISTEN` wins over `PORT`; `PORT` binds all interfaces
    /// the way hosted platforms expect.
    pub fn from_env() -> Self {
        let listen = env_non_empty("FLASH_DELAY_LISTEN")
            .or_else(listen_from_port)
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let initial = DelayBounds::STANDARD.clamp_int(parse_env(
            "FLASH_DELAY_INITIAL",
            i64::from(DelayValue::DEFAULT.get()),
        ));
        Self {
            listen,
            initial,
            max_body_bytes: parse_env("FLASH_DELAY_MAX_BODY", DEFAULT_MAX_BODY_BYTES),
        }
    }

    pub fn with_listen(mut self, listen: impl Into<String>) -> Self {
        self.listen = listen.into();
        self
    }

    pub fn with_initial(mut self, initial: DelayValue) -> Self {
        self.initial = initial;
        self
    }

    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    poll_interval: Duration,
    request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn from_env() -> Self {
        Self {
            base_url: env_non_empty("FLASH_DELAY_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            poll_interval: Duration::from_millis(parse_env_positive(
                "FLASH_DELAY_POLL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            )),
            request_timeout: Duration::from_millis(parse_env_positive(
                "FLASH_DELAY_HTTP_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!("Poll interval must be positive; keeping current interval");
            return self;
        }
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn listen_from_port() -> Option<String> {
    let port = env_non_empty("PORT")?;
    match port.parse::<u16>() {
        Ok(port) => Some(format!("0.0.0.0:{port}")),
        Err(_) => {
            warn!(value = %port, "Invalid PORT; ignoring");
            None
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    let Some(value) = env_non_empty(key) else {
        return default;
    };
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(value = %value, key, "Invalid numeric config; using default");
            default
        }
    }
}

fn parse_env_positive(key: &str, default: u64) -> u64 {
    match parse_env(key, default) {
        0 => {
            warn!(key, "Config value must be at least 1; using default");
            default
        }
        parsed => parsed,
    }
}
