//! Progress simulation
//!
//! Generation backends report nothing while they work, so user feedback is
//! driven on a fixed cadence instead: every 200 ms the value creeps toward
//! 95, then jumps to 100 when the attempt finishes (success or failure)
//! and resets to 0 shortly after. The ticker task is cancelled
//! unconditionally on finish so it can never outlive the attempt.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_millis(200);
const RESET_DELAY: Duration = Duration::from_millis(500);

// Stored in tenths of a percent so the atomic stays integral.
const CAP: u32 = 950;
const DONE: u32 = 1000;
const MIN_STEP: u32 = 5;

/// Read-only view of the progress value, cloneable across tasks.
#[derive(Clone, Debug)]
pub struct ProgressHandle {
    value: Arc<AtomicU32>,
}

impl ProgressHandle {
    /// Current progress in percent (0.0 ..= 100.0).
    pub fn percent(&self) -> f32 {
        self.value.load(Ordering::SeqCst) as f32 / 10.0
    }
}

/// Owns the simulated progress value and its ticker task.
pub struct ProgressSimulator {
    value: Arc<AtomicU32>,
    ticker: Option<JoinHandle<()>>,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU32::new(0)),
            ticker: None,
        }
    }

    pub fn handle(&self) -> ProgressHandle {
        ProgressHandle {
            value: Arc::clone(&self.value),
        }
    }

    /// Current progress in percent.
    pub fn percent(&self) -> f32 {
        self.value.load(Ordering::SeqCst) as f32 / 10.0
    }

    /// Reset to 0 and start ticking toward the 95% cap. Each tick advances
    /// by `max(0.5, (95 - p) / 20)` percent, so movement is fast at first
    /// and slows as it approaches the cap.
    pub fn start(&mut self) {
        self.cancel_ticker();
        self.value.store(0, Ordering::SeqCst);
        let value = Arc::clone(&self.value);
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK);
            interval.tick().await; // first tick fires immediately
            loop {
                interval.tick().await;
                let current = value.load(Ordering::SeqCst);
                let step = ((CAP - current) / 20).max(MIN_STEP);
                value.store((current + step).min(CAP), Ordering::SeqCst);
            }
        }));
    }

    /// Stop ticking, show 100%, and reset to 0 after a short beat. Called
    /// on both success and failure paths.
    pub fn finish(&mut self) {
        self.cancel_ticker();
        self.value.store(DONE, Ordering::SeqCst);
        let value = Arc::clone(&self.value);
        tokio::spawn(async move {
            tokio::time::sleep(RESET_DELAY).await;
            value.store(0, Ordering::SeqCst);
        });
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn advances_but_never_passes_the_cap() {
        let mut progress = ProgressSimulator::new();
        progress.start();
        tokio::time::sleep(Duration::from_millis(650)).await;
        let percent = progress.percent();
        assert!(percent > 0.0, "progress should have moved: {percent}");
        assert!(percent <= 95.0, "progress must cap at 95: {percent}");
        progress.finish();
    }

    #[tokio::test]
    async fn finish_shows_done_then_resets() {
        let mut progress = ProgressSimulator::new();
        progress.start();
        tokio::time::sleep(Duration::from_millis(250)).await;
        progress.finish();
        assert_eq!(progress.percent(), 100.0);
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(progress.percent(), 0.0);
    }

    #[tokio::test]
    async fn handle_tracks_the_simulator() {
        let mut progress = ProgressSimulator::new();
        let handle = progress.handle();
        progress.start();
        progress.finish();
        assert_eq!(handle.percent(), 100.0);
    }
}
