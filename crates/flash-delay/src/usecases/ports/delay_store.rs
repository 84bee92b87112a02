use crate::domain::DelayValue;
use crate::usecases::ports::StoreError;

/// Owner of the canonical delay value.
///
/// The in-memory implementation is per process. A store backed by shared
/// storage can be swapped in without changing the HTTP contract.
pub trait DelayStore: Send + Sync {
    fn current(&self) -> Result<DelayValue, StoreError>;

    /// Replaces the value and returns the one it overwrote.
    fn replace(&self, value: DelayValue) -> Result<DelayValue, StoreError>;
}
