use async_trait::async_trait;

use crate::domain::DelaySnapshot;
use crate::usecases::ports::ApiError;

/// Remote view of the State Service used by sync clients and followers.
#[async_trait]
pub trait DelayApi: Send + Sync {
    async fn fetch(&self) -> Result<DelaySnapshot, ApiError>;

    async fn submit(&self, candidate: i64) -> Result<DelaySnapshot, ApiError>;
}
