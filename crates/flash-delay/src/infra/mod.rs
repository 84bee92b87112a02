//! Infrastructure: storage, clock, HTTP client and configuration.

pub mod config;
pub mod http_client;
mod store;
mod system_clock;

pub use config::{ClientConfig, ServerConfig};
pub use http_client::HttpDelayApi;
pub use store::InMemoryDelayStore;
pub use system_clock::SystemClock;
