#![expect(dead_code, reason = "Test harness helpers are used selectively.")]

//! Test harness exports.

use std::sync::Arc;
use std::time::Duration;

use assert_cmd::Command;
use flash_delay::ClientConfig;
use flash_delay::DelayBounds;
use flash_delay::HttpDelayApi;
use flash_delay::InMemoryDelayStore;
use flash_delay::ServerConfig;
use flash_delay::ServerHandle;
use flash_delay::SystemClock;
use flash_delay::spawn_server;

pub const LOOPBACK_EPHEMERAL: &str = "127.0.0.1:0";

/// An address nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

pub fn flash_delay_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("flash-delay"));
    cmd.env_remove("FLASH_DELAY_URL")
        .env_remove("FLASH_DELAY_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Starts a server on an ephemeral loopback port inside the current runtime.
pub async fn start_server(initial: u32) -> ServerHandle {
    let config = ServerConfig::default()
        .with_listen(LOOPBACK_EPHEMERAL)
        .with_initial(DelayBounds::STANDARD.clamp_int(i64::from(initial)));
    let store = Arc::new(InMemoryDelayStore::new(config.initial()));
    spawn_server(&config, store, Arc::new(SystemClock::new()))
        .await
        .expect("start delay server")
}

pub fn api_client(base_url: &str) -> Arc<HttpDelayApi> {
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_request_timeout(Duration::from_secs(2));
    Arc::new(HttpDelayApi::new(&config, Arc::new(SystemClock::new())).expect("build client"))
}

/// A server on its own runtime, for driving the CLI binary from a plain
/// `#[test]`.
pub struct BackgroundServer {
    runtime: tokio::runtime::Runtime,
    handle: Option<ServerHandle>,
    url: String,
}

impl BackgroundServer {
    pub fn start(initial: u32) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("build runtime");
        let handle = runtime.block_on(start_server(initial));
        let url = handle.base_url();
        Self {
            runtime,
            handle: Some(handle),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for BackgroundServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.runtime.block_on(handle.shutdown());
        }
    }
}
