//! In-memory delay store.

use std::sync::Mutex;

use crate::common::mutex_lock_or_recover;
use crate::domain::DelayValue;
use crate::usecases::ports::DelayStore;
use crate::usecases::ports::StoreError;

/// Holds the value for the lifetime of the process. Separate processes do
/// not see each other's writes.
pub struct InMemoryDelayStore {
    value: Mutex<DelayValue>,
}

impl InMemoryDelayStore {
    pub fn new(initial: DelayValue) -> Self {
        Self {
            value: Mutex::new(initial),
        }
    }
}

impl Default for InMemoryDelayStore {
    fn default() -> Self {
        Self::new(DelayValue::DEFAULT)
    }
}

impl DelayStore for InMemoryDelayStore {
    fn current(&self) -> Result<DelayValue, StoreError> {
        Ok(*mutex_lock_or_recover(&self.value))
    }

    fn replace(&self, value: DelayValue) -> Result<DelayValue, StoreError> {
        let mut guard = mutex_lock_or_recover(&self.value);
        Ok(std::mem::replace(&mut *guard, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DelayBounds;
    use std::sync::Arc;

    #[test]
    fn test_starts_at_initial() {
        let store = InMemoryDelayStore::default();
        assert_eq!(store.current().unwrap(), DelayValue::DEFAULT);
    }

    #[test]
    fn test_replace_returns_previous() {
        let store = InMemoryDelayStore::default();
        let next = DelayBounds::STANDARD.clamp_int(1200);
        assert_eq!(store.replace(next).unwrap(), DelayValue::DEFAULT);
        assert_eq!(store.current().unwrap(), next);
    }

    #[test]
    fn test_concurrent_writers_leave_one_of_their_values() {
        let store = Arc::new(InMemoryDelayStore::default());
        let bounds = DelayBounds::STANDARD;
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.replace(bounds.clamp_int(100 + i * 100)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let last = store.current().unwrap().get();
        assert!((100..=800).contains(&last));
        assert_eq!(last % 100, 0);
    }
}
