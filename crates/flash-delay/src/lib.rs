#![deny(clippy::all)]
#![allow(dead_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Shared delay state service and polling sync client for the ESP32 flash
//! controller.

mod adapters;
mod app;
mod common;
mod domain;
mod infra;
mod usecases;

#[cfg(test)]
mod test_support;

pub use app::Application;
pub use app::http_api::{ServerError, ServerHandle, spawn_server, start_api_server};
pub use domain::{
    DEFAULT_DELAY, DELAY_STEP, DelayBounds, DelaySnapshot, DelayValue, MAX_DELAY, MIN_DELAY,
};
pub use infra::{ClientConfig, HttpDelayApi, InMemoryDelayStore, ServerConfig, SystemClock};
pub use usecases::ports::{ApiError, Clock, DelayApi, DelayStore};
pub use usecases::{
    ControlEvent, DelayChange, DeviceFollower, DisplayState, SyncClient, SyncOutcome,
    run_sync_loop,
};
