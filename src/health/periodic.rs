// src/health/periodic.rs
use super::result::{panicked, CheckResult, Checker};
use super::updater::{StatusUpdater, Updater};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Re-evaluates a wrapped checker on a fixed interval and serves the cached
/// result, so `check()` never blocks on the real evaluation.
///
/// The first evaluation happens one full period after construction; until
/// then `check()` reports the default (healthy, empty) result. The background
/// task stops on [`stop`](Self::stop) or when the checker is dropped.
pub struct PeriodicChecker {
    updater: StatusUpdater,
    period: Duration,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PeriodicChecker {
    /// Spawns the evaluation task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside a tokio runtime.
    pub fn new<C>(checker: C, period: Duration) -> Self
    where
        C: Checker + 'static,
    {
        assert!(!period.is_zero(), "periodic check period must be non-zero");

        let updater = StatusUpdater::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run(
            Arc::new(checker),
            period,
            updater.clone(),
            shutdown_rx,
        ));

        Self {
            updater,
            period,
            shutdown_tx,
            task,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Signals the background task to exit. An evaluation already in flight
    /// finishes and is stored; no further evaluation starts after it.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Checker for PeriodicChecker {
    fn check(&self) -> CheckResult {
        self.updater.check()
    }
}

impl Drop for PeriodicChecker {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    checker: Arc<dyn Checker>,
    period: Duration,
    updater: StatusUpdater,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // Shutdown wins over a tick that became ready during an evaluation.
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("Periodic check shutting down");
                    break;
                }
            }
            _ = ticker.tick() => {
                let checker = checker.clone();
                let result = match tokio::task::spawn_blocking(move || checker.check()).await {
                    Ok(result) => result,
                    Err(e) if e.is_panic() => {
                        let result = panicked(e.into_panic());
                        warn!("Periodic check failed: {}", result.message);
                        result
                    }
                    Err(e) => {
                        debug!("Periodic check cancelled: {}", e);
                        break;
                    }
                };

                debug!(failed = result.failed(), "Periodic check evaluated");
                updater.update(result);
            }
        }
    }
}
