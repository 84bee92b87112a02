//! Device-side consumer of the delay.
//!
//! Mirrors what the flash controller firmware does: poll the read endpoint,
//! adopt whatever comes back as the blink period, keep the last good value
//! when a poll fails.

use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::domain::DelayValue;
use crate::usecases::ports::DelayApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayChange {
    pub previous: DelayValue,
    pub current: DelayValue,
}

pub struct DeviceFollower<A: DelayApi + ?Sized> {
    api: Arc<A>,
    effective: DelayValue,
    consecutive_failures: u32,
}

impl<A: DelayApi + ?Sized> DeviceFollower<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            effective: DelayValue::DEFAULT,
            consecutive_failures: 0,
        }
    }

    pub fn effective(&self) -> DelayValue {
        self.effective
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// One poll. Returns the change when the effective delay moved.
    pub async fn tick(&mut self) -> Option<DelayChange> {
        match self.api.fetch().await {
            Ok(snapshot) => {
                if self.consecutive_failures > 0 {
                    info!(
                        failures = self.consecutive_failures,
                        "Delay source reachable again"
                    );
                }
                self.consecutive_failures = 0;
                if snapshot.value == self.effective {
                    return None;
                }
                let change = DelayChange {
                    previous: self.effective,
                    current: snapshot.value,
                };
                self.effective = snapshot.value;
                info!(
                    previous = change.previous.get(),
                    delay = change.current.get(),
                    "Blink delay changed"
                );
                Some(change)
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    error = %err,
                    failures = self.consecutive_failures,
                    delay = self.effective.get(),
                    "Delay poll failed; keeping current delay"
                );
                None
            }
        }
    }
}
