mod delay;
mod follower;
mod sync_client;

pub use delay::{
    DelayWriteInput, DelayWriteOutput, ReadDelayUseCase, ReadDelayUseCaseImpl, WriteDelayUseCase,
    WriteDelayUseCaseImpl,
};
pub use follower::{DelayChange, DeviceFollower};
pub use sync_client::{ControlEvent, DisplayState, SyncClient, SyncOutcome, run_sync_loop};
pub mod ports;
