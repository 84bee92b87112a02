mod sync;
pub mod telemetry;

pub use sync::mutex_lock_or_recover;
pub use sync::poison_recovery_count;
