//! Polling sync client.
//!
//! Keeps a local display of the canonical delay and reconciles it with the
//! State Service on a fixed cadence. User input is echoed locally first and
//! written through afterwards; every network outcome is returned as a
//! [`SyncOutcome`] that callers log and drop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::debug;
use tracing::warn;

use crate::domain::DelayBounds;
use crate::domain::DelaySnapshot;
use crate::domain::DelayValue;
use crate::usecases::ports::ApiError;
use crate::usecases::ports::DelayApi;

/// What the user currently sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub value: DelayValue,
    pub bounds: DelayBounds,
    /// True between a slider drag and its commit.
    pub dragging: bool,
    /// Server timestamp of the last snapshot applied to the display.
    pub last_synced_ms: Option<i64>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            value: DelayValue::DEFAULT,
            bounds: DelayBounds::STANDARD,
            dragging: false,
            last_synced_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The server's snapshot was applied to the display.
    Synced(DelaySnapshot),
    /// A poll landed mid-drag; the display kept the user's position.
    HeldByDrag(DelaySnapshot),
    Failed(ApiError),
}

impl SyncOutcome {
    /// Logs the outcome. Failures are not surfaced any further; the next
    /// poll is the retry.
    pub fn report(&self, operation: &'static str) {
        match self {
            SyncOutcome::Synced(snapshot) => {
                debug!(operation, delay = snapshot.value.get(), "Sync applied");
            }
            SyncOutcome::HeldByDrag(snapshot) => {
                debug!(
                    operation,
                    delay = snapshot.value.get(),
                    "Sync deferred while dragging"
                );
            }
            SyncOutcome::Failed(err) => {
                warn!(operation, error = %err, retryable = err.is_retryable(), "Sync failed");
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_))
    }
}

/// User input delivered to [`run_sync_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Slider moved; echo only.
    Drag(i64),
    /// Slider released; write through.
    Commit(i64),
    Increment,
    Decrement,
}

pub struct SyncClient<A: DelayApi + ?Sized> {
    api: Arc<A>,
    display: DisplayState,
}

impl<A: DelayApi + ?Sized> SyncClient<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            display: DisplayState::default(),
        }
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    /// Reads the canonical value and overwrites the display unless a drag
    /// is in progress.
    pub async fn poll(&mut self) -> SyncOutcome {
        match self.api.fetch().await {
            Ok(snapshot) => {
                self.display.bounds = snapshot.bounds;
                if self.display.dragging {
                    return SyncOutcome::HeldByDrag(snapshot);
                }
                self.apply(snapshot);
                SyncOutcome::Synced(snapshot)
            }
            Err(err) => SyncOutcome::Failed(err),
        }
    }

    /// Optimistic echo while the slider moves. Sends nothing.
    pub fn drag(&mut self, position: i64) {
        self.display.dragging = true;
        self.display.value = self.display.bounds.clamp_int(position);
    }

    /// Slider released: display the clamped position and write it through.
    pub async fn commit(&mut self, position: i64) -> SyncOutcome {
        self.display.dragging = false;
        let target = self.display.bounds.clamp_int(position);
        self.display.value = target;
        self.send(i64::from(target.get())).await
    }

    pub async fn increment(&mut self) -> SyncOutcome {
        self.step(1).await
    }

    pub async fn decrement(&mut self) -> SyncOutcome {
        self.step(-1).await
    }

    pub async fn handle(&mut self, event: ControlEvent) -> Option<SyncOutcome> {
        match event {
            ControlEvent::Drag(position) => {
                self.drag(position);
                None
            }
            ControlEvent::Commit(position) => Some(self.commit(position).await),
            ControlEvent::Increment => Some(self.increment().await),
            ControlEvent::Decrement => Some(self.decrement().await),
        }
    }

    async fn step(&mut self, steps: i64) -> SyncOutcome {
        self.display.dragging = false;
        let candidate = self.display.value.stepped(steps, self.display.bounds);
        self.display.value = candidate;
        self.send(i64::from(candidate.get())).await
    }

    async fn send(&mut self, candidate: i64) -> SyncOutcome {
        match self.api.submit(candidate).await {
            Ok(snapshot) => {
                self.apply(snapshot);
                SyncOutcome::Synced(snapshot)
            }
            Err(err) => SyncOutcome::Failed(err),
        }
    }

    fn apply(&mut self, snapshot: DelaySnapshot) {
        self.display.value = snapshot.value;
        self.display.bounds = snapshot.bounds;
        self.display.last_synced_ms = Some(snapshot.timestamp_ms);
    }
}

/// Drives a [`SyncClient`] until `shutdown` flips to true or the control
/// channel closes.
///
/// `on_display` is called whenever the displayed value changes.
pub async fn run_sync_loop<A, F>(
    mut client: SyncClient<A>,
    poll_interval: Duration,
    mut controls: mpsc::Receiver<ControlEvent>,
    mut shutdown: watch::Receiver<bool>,
    mut on_display: F,
) -> DisplayState
where
    A: DelayApi + ?Sized,
    F: FnMut(&DisplayState),
{
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut shown: Option<DelayValue> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                client.poll().await.report("poll");
            }
            event = controls.recv() => {
                let Some(event) = event else {
                    break;
                };
                if let Some(outcome) = client.handle(event).await {
                    outcome.report("write");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }

        let display = client.display();
        if shown != Some(display.value) {
            shown = Some(display.value);
            on_display(&display);
        }
    }

    client.display()
}
