use std::time::Duration;

use grader_logging::grader_debug;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Repeating refresh trigger that can be torn down.
///
/// The first tick fires one full period after start. A slow tick delays the
/// following ones instead of bursting to catch up. The timer stops when it is
/// cancelled, dropped, or when the callback returns `false`.
pub struct RefreshTimer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshTimer {
    /// Spawns the timer on the current tokio runtime.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticks = time::interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        if !on_tick() {
                            break;
                        }
                    }
                }
            }
            grader_debug!("Refresh timer stopped");
        });

        Self { cancel, task }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancels and waits for the timer task to exit.
    pub async fn stop(mut self) {
        self.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
