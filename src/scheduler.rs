//! Periodic cycle scheduler with cooperative shutdown
//!
//! Runs the task immediately, then once per interval. Shutdown is observed
//! between cycles: a cycle in progress always finishes first.

use std::future::Future;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

pub struct DailyScheduler {
    period: Duration,
}

enum Wake {
    Tick,
    Signal { closed: bool },
}

impl DailyScheduler {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Drive `task` until `shutdown` turns true or its sender is dropped
    ///
    /// `task` receives the 1-based iteration number. Returns the number of
    /// completed cycles, or the first cycle error for the caller to report.
    pub async fn run<F, Fut, E>(&self, mut shutdown: watch::Receiver<bool>, mut task: F) -> Result<u64, E>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        log::info!("⏰ Starting scheduler (interval: {}s)", self.period.as_secs());

        let mut timer = interval(self.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut completed = 0u64;

        loop {
            if *shutdown.borrow() {
                log::info!("Shutdown requested, stopping after {} cycle(s)", completed);
                return Ok(completed);
            }

            let wake = tokio::select! {
                _ = timer.tick() => Wake::Tick,
                changed = shutdown.changed() => Wake::Signal { closed: changed.is_err() },
            };

            match wake {
                Wake::Tick => {}
                Wake::Signal { closed: true } => {
                    log::info!("Shutdown channel closed, stopping after {} cycle(s)", completed);
                    return Ok(completed);
                }
                // Flag re-read at the top of the loop
                Wake::Signal { closed: false } => continue,
            }

            let iteration = completed + 1;
            log::info!("🔄 Cycle {} starting", iteration);
            task(iteration).await?;
            completed = iteration;
            log::info!("✅ Cycle {} completed, next in {}s", iteration, self.period.as_secs());
        }
    }
}
