//! Periodic refresh ticker
//!
//! A background task marks a refresh as due once per interval. The main loop
//! polls the ticker between frames and does the loading itself, so fetching
//! and rendering stay on one task.

use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handle to the background ticker
pub struct RefreshTicker {
    due: mpsc::Receiver<()>,
    stop: Option<oneshot::Sender<()>>,
}

impl RefreshTicker {
    /// Starts ticking; the first refresh is due one full `period` from now
    pub fn spawn(period: Duration) -> Self {
        // One slot: ticks that land while a refresh is already due collapse into it
        let (due_tx, due) = mpsc::channel(1);
        let (stop, mut stopped) = oneshot::channel();

        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        debug!(?period, "refresh due");
                        let _ = due_tx.try_send(());
                    }
                    _ = &mut stopped => break,
                }
            }
        });

        Self {
            due,
            stop: Some(stop),
        }
    }

    /// True once per elapsed interval, without blocking
    pub fn poll(&mut self) -> bool {
        self.due.try_recv().is_ok()
    }

    /// Stops the background task
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

impl Drop for RefreshTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
