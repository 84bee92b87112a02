//! Domain layer: the delay value and its validation rules.

mod candidate;
mod delay_types;

pub use candidate::DelayCandidate;
pub use candidate::DelayValidationError;
pub use delay_types::*;
