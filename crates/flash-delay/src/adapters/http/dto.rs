//! JSON shapes of the `/api/delay` endpoint.

use serde::Deserialize;
use serde::Serialize;

use crate::domain::DelayBounds;
use crate::domain::DelaySnapshot;

pub const UPDATED_MESSAGE: &str = "Delay updated successfully";

/// Body of a successful read or write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayResponse {
    pub delay: u32,
    pub min: u32,
    pub max: u32,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl DelayResponse {
    pub fn read(snapshot: &DelaySnapshot) -> Self {
        Self {
            delay: snapshot.value.get(),
            min: snapshot.bounds.min(),
            max: snapshot.bounds.max(),
            timestamp: snapshot.timestamp_ms,
            message: None,
        }
    }

    pub fn written(snapshot: &DelaySnapshot) -> Self {
        Self {
            message: Some(UPDATED_MESSAGE),
            ..Self::read(snapshot)
        }
    }
}

/// Client-side view of a success body.
///
/// Only `delay` is required so the minimal `{ "delay": n }` reply decodes
/// too; missing bounds fall back to the standard range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DelayPayload {
    pub delay: f64,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl DelayPayload {
    /// Re-validates against the reported bounds.
    pub fn into_snapshot(self, received_at_ms: i64) -> DelaySnapshot {
        let bounds = match (self.min, self.max) {
            (Some(min), Some(max)) => DelayBounds::try_new(min, max).unwrap_or_default(),
            _ => DelayBounds::STANDARD,
        };
        DelaySnapshot {
            value: bounds.clamp(self.delay),
            bounds,
            timestamp_ms: self.timestamp.unwrap_or(received_at_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_ms: u64,
}
