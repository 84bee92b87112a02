//! Mock delay store for use case tests.

use std::sync::Mutex;

use crate::domain::DelayValue;
use crate::usecases::ports::DelayStore;
use crate::usecases::ports::StoreError;

pub struct MockDelayStore {
    value: Mutex<DelayValue>,
    failure: Option<StoreError>,
    writes: Mutex<Vec<DelayValue>>,
}

impl MockDelayStore {
    pub fn new(value: DelayValue) -> Self {
        Self {
            value: Mutex::new(value),
            failure: None,
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(StoreError::Unavailable(reason.to_string())),
            ..Self::new(DelayValue::DEFAULT)
        }
    }

    pub fn writes(&self) -> Vec<DelayValue> {
        self.writes.lock().unwrap().clone()
    }

    pub fn value(&self) -> DelayValue {
        *self.value.lock().unwrap()
    }
}

impl DelayStore for MockDelayStore {
    fn current(&self) -> Result<DelayValue, StoreError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(*self.value.lock().unwrap())
    }

    fn replace(&self, value: DelayValue) -> Result<DelayValue, StoreError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.writes.lock().unwrap().push(value);
        let mut guard = self.value.lock().unwrap();
        Ok(std::mem::replace(&mut *guard, value))
    }
}
