pub mod clock;
pub mod delay_api;
pub mod delay_store;
pub mod errors;
#[cfg(test)]
pub(crate) mod test_support;

pub use clock::Clock;
pub use delay_api::DelayApi;
pub use delay_store::DelayStore;
pub use errors::{ApiError, DelayServiceError, StoreError};
