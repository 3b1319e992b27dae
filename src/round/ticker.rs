//! One-second tick source for the countdown.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, instrument, warn};

/// A background task that sends a tick every period.
///
/// The task is aborted when the ticker is dropped, so the owner controls
/// its lifetime by holding it only while the countdown runs.
#[derive(Debug)]
pub struct CountdownTicker {
    handle: JoinHandle<()>,
    tick_rx: mpsc::UnboundedReceiver<()>,
}

impl CountdownTicker {
    /// Starts a one-second ticker. Must be called inside a tokio runtime.
    pub fn start() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// Shortest period a ticker accepts.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Starts a ticker with a custom period. The first tick arrives after
    /// one full period. Periods below [`Self::MIN_PERIOD`] are raised to it.
    #[instrument]
    pub fn with_period(period: Duration) -> Self {
        if period < Self::MIN_PERIOD {
            warn!(?period, "Ticker period too short, using minimum");
        }
        let period = period.max(Self::MIN_PERIOD);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tick_tx.send(()).is_err() {
                    break;
                }
            }
        });
        debug!("Countdown ticker started");
        Self { handle, tick_rx }
    }

    /// Returns how many ticks arrived since the last call, without waiting.
    pub fn drain(&mut self) -> u32 {
        let mut ticks = 0;
        while self.tick_rx.try_recv().is_ok() {
            ticks += 1;
        }
        ticks
    }

    /// Waits for the next tick. Returns `false` if the task has stopped.
    pub async fn next(&mut self) -> bool {
        self.tick_rx.recv().await.is_some()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
        debug!("Countdown ticker stopped");
    }
}
