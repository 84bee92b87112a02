//! In-process stand-in for the State Service.

use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use crate::domain::DelayBounds;
use crate::domain::DelaySnapshot;
use crate::domain::DelayValue;
use crate::usecases::ports::ApiError;
use crate::usecases::ports::DelayApi;

pub struct MockDelayApi {
    value: Mutex<DelayValue>,
    bounds: DelayBounds,
    offline: AtomicBool,
    fetches: AtomicUsize,
    submitted: Mutex<Vec<i64>>,
}

impl MockDelayApi {
    pub fn new(value: u32) -> Self {
        Self::with_bounds(value, DelayBounds::STANDARD)
    }

    pub fn with_bounds(value: u32, bounds: DelayBounds) -> Self {
        Self {
            value: Mutex::new(bounds.clamp_int(i64::from(value))),
            bounds,
            offline: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Simulates a write made by some other client.
    pub fn set_remote(&self, value: u32) {
        *self.value.lock().unwrap() = self.bounds.clamp_int(i64::from(value));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<i64> {
        self.submitted.lock().unwrap().clone()
    }

    fn snapshot(&self) -> DelaySnapshot {
        DelaySnapshot {
            value: *self.value.lock().unwrap(),
            bounds: self.bounds,
            timestamp_ms: 1_700_000_000_000,
        }
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DelayApi for MockDelayApi {
    async fn fetch(&self) -> Result<DelaySnapshot, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.snapshot())
    }

    async fn submit(&self, candidate: i64) -> Result<DelaySnapshot, ApiError> {
        self.submitted.lock().unwrap().push(candidate);
        self.check_online()?;
        *self.value.lock().unwrap() = self.bounds.clamp_int(candidate);
        Ok(self.snapshot())
    }
}
