//! Cancellable fixed-period task.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::warn;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Runs a unit of work immediately and then once per period until stopped.
///
/// Runs never overlap: a slow run delays the next tick instead of queueing a
/// burst. [`PeriodicTask::stop`] takes `self`, so a task can be stopped only
/// once, and it waits for the loop to exit before returning.
pub struct PeriodicTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(period: Duration, mut work: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period.max(MIN_PERIOD));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = work() => {}
                }
            }
        });

        Self { token, handle }
    }

    pub(crate) fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!("periodic task ended abnormally: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_task(period: Duration) -> (PeriodicTask, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let task = PeriodicTask::spawn(period, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_every_period() {
        let (task, runs) = counting_task(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(24)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);

        task.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_runs_after_stop() {
        let (task, runs) = counting_task(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(task.is_running());
        task.stop().await;
        let after_stop = runs.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), after_stop);
        assert_eq!(after_stop, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_work_ends_the_loop() {
        let task = PeriodicTask::spawn(Duration::from_secs(1), || async {
            panic!("tick failed");
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(!task.is_running());
        task.stop().await;
    }
}
