//! Read and write use cases for the canonical delay.

use std::sync::Arc;

use tracing::info;

use crate::domain::DelayBounds;
use crate::domain::DelayCandidate;
use crate::domain::DelaySnapshot;
use crate::domain::DelayValidationError;
use crate::domain::DelayValue;
use crate::usecases::ports::Clock;
use crate::usecases::ports::DelayServiceError;
use crate::usecases::ports::DelayStore;

#[derive(Debug, Clone, PartialEq)]
pub struct DelayWriteInput {
    /// `None` when the payload had no usable `delay` field.
    pub candidate: Option<DelayCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWriteOutput {
    pub snapshot: DelaySnapshot,
    pub previous: DelayValue,
}

pub trait ReadDelayUseCase: Send + Sync {
    fn execute(&self) -> Result<DelaySnapshot, DelayServiceError>;
}

pub struct ReadDelayUseCaseImpl {
    store: Arc<dyn DelayStore>,
    clock: Arc<dyn Clock>,
    bounds: DelayBounds,
}

impl ReadDelayUseCaseImpl {
    pub fn new(store: Arc<dyn DelayStore>, clock: Arc<dyn Clock>, bounds: DelayBounds) -> Self {
        Self {
            store,
            clock,
            bounds,
        }
    }
}

impl ReadDelayUseCase for ReadDelayUseCaseImpl {
    fn execute(&self) -> Result<DelaySnapshot, DelayServiceError> {
        let value = self.store.current()?;
        Ok(DelaySnapshot {
            value,
            bounds: self.bounds,
            timestamp_ms: self.clock.unix_ms(),
        })
    }
}

pub trait WriteDelayUseCase: Send + Sync {
    fn execute(&self, input: DelayWriteInput) -> Result<DelayWriteOutput, DelayServiceError>;
}

pub struct WriteDelayUseCaseImpl {
    store: Arc<dyn DelayStore>,
    clock: Arc<dyn Clock>,
    bounds: DelayBounds,
}

impl WriteDelayUseCaseImpl {
    pub fn new(store: Arc<dyn DelayStore>, clock: Arc<dyn Clock>, bounds: DelayBounds) -> Self {
        Self {
            store,
            clock,
            bounds,
        }
    }
}

impl WriteDelayUseCase for WriteDelayUseCaseImpl {
    fn execute(&self, input: DelayWriteInput) -> Result<DelayWriteOutput, DelayServiceError> {
        let candidate = input.candidate.ok_or(DelayValidationError::Missing)?;
        let requested = candidate.parse()?;
        let value = self.bounds.clamp(requested);
        let previous = self.store.replace(value)?;
        info!(
            previous = previous.get(),
            delay = value.get(),
            requested,
            "Delay updated"
        );
        Ok(DelayWriteOutput {
            snapshot: DelaySnapshot {
                value,
                bounds: self.bounds,
                timestamp_ms: self.clock.unix_ms(),
            },
            previous,
        })
    }
}
