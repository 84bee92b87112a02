mod mock_api;
mod mock_clock;
mod mock_store;

pub use mock_api::MockDelayApi;
pub use mock_clock::FixedClock;
pub use mock_store::MockDelayStore;
