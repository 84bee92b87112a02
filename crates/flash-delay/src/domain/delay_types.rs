//! Delay value and bounds types.

use std::fmt;

pub const MIN_DELAY: u32 = 50;
pub const MAX_DELAY: u32 = 2000;
pub const DEFAULT_DELAY: u32 = 500;
/// Increment used by the discrete up/down controls.
pub const DELAY_STEP: u32 = 50;

/// Inclusive range a [`DelayValue`] must live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayBounds {
    min: u32,
    max: u32,
}

impl DelayBounds {
    pub const STANDARD: Self = Self {
        min: MIN_DELAY,
        max: MAX_DELAY,
    };

    /// Returns `None` when `min > max`.
    pub fn try_new(min: u32, max: u32) -> Option<Self> {
        if min > max {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps into range first, then rounds to the nearest integer.
    ///
    /// Infinities clamp to the nearest bound. NaN has no nearest bound and
    /// maps to `min`; callers that must reject it should go through
    /// [`DelayCandidate::parse`](crate::domain::DelayCandidate::parse) first.
    pub fn clamp(&self, candidate: f64) -> DelayValue {
        if candidate.is_nan() {
            return DelayValue(self.min);
        }
        let clamped = candidate.clamp(f64::from(self.min), f64::from(self.max));
        DelayValue(clamped.round() as u32)
    }

    pub fn clamp_int(&self, candidate: i64) -> DelayValue {
        let clamped = candidate.clamp(i64::from(self.min), i64::from(self.max));
        DelayValue(clamped as u32)
    }
}

impl Default for DelayBounds {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for DelayBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A delay in milliseconds that is always inside the bounds it was clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DelayValue(u32);

impl DelayValue {
    pub const DEFAULT: Self = Self(DEFAULT_DELAY);

    pub fn get(self) -> u32 {
        self.0
    }

    /// Moves by `steps * DELAY_STEP` and clamps the result into `bounds`.
    pub fn stepped(self, steps: i64, bounds: DelayBounds) -> Self {
        let target = i64::from(self.0).saturating_add(steps.saturating_mul(i64::from(DELAY_STEP)));
        bounds.clamp_int(target)
    }
}

impl Default for DelayValue {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DelayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DelayValue> for u32 {
    fn from(value: DelayValue) -> Self {
        value.0
    }
}

/// The canonical value as observed at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelaySnapshot {
    pub value: DelayValue,
    pub bounds: DelayBounds,
    /// Milliseconds since the Unix epoch, taken on the server.
    pub timestamp_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_value() {
        assert_eq!(DelayValue::default().get(), 500);
    }

    #[test]
    fn test_bounds_reject_inverted_range() {
        assert!(DelayBounds::try_new(10, 5).is_none());
        assert!(DelayBounds::try_new(5, 5).is_some());
    }

    #[test]
    fn test_clamp_below_min() {
        let bounds = DelayBounds::STANDARD;
        assert_eq!(bounds.clamp(-10.0).get(), MIN_DELAY);
        assert_eq!(bounds.clamp(49.4).get(), MIN_DELAY);
        assert_eq!(bounds.clamp(f64::NEG_INFINITY).get(), MIN_DELAY);
    }

    #[test]
    fn test_clamp_above_max() {
        let bounds = DelayBounds::STANDARD;
        assert_eq!(bounds.clamp(3000.0).get(), MAX_DELAY);
        assert_eq!(bounds.clamp(2000.6).get(), MAX_DELAY);
        assert_eq!(bounds.clamp(f64::INFINITY).get(), MAX_DELAY);
    }

    #[test]
    fn test_clamp_rounds_to_nearest() {
        let bounds = DelayBounds::STANDARD;
        assert_eq!(bounds.clamp(75.9).get(), 76);
        assert_eq!(bounds.clamp(75.4).get(), 75);
        assert_eq!(bounds.clamp(75.5).get(), 76);
    }

    #[test]
    fn test_clamp_nan_maps_to_min() {
        assert_eq!(DelayBounds::STANDARD.clamp(f64::NAN).get(), MIN_DELAY);
    }

    #[test]
    fn test_stepped_clamps() {
        let bounds = DelayBounds::STANDARD;
        assert_eq!(bounds.clamp_int(1990).stepped(1, bounds).get(), 2000);
        assert_eq!(bounds.clamp_int(60).stepped(-1, bounds).get(), 50);
        assert_eq!(DelayValue::DEFAULT.stepped(1, bounds).get(), 550);
    }

    proptest! {
        #[test]
        fn prop_clamp_always_in_bounds(candidate in proptest::num::f64::ANY) {
            let bounds = DelayBounds::STANDARD;
            prop_assert!(bounds.contains(bounds.clamp(candidate).get()));
        }

        #[test]
        fn prop_clamp_matches_round_then_clamp(candidate in -10_000.0f64..10_000.0) {
            let bounds = DelayBounds::STANDARD;
            let expected = candidate.round().clamp(f64::from(MIN_DELAY), f64::from(MAX_DELAY)) as u32;
            prop_assert_eq!(bounds.clamp(candidate).get(), expected);
        }
    }
}
