// Periodic refresh schedule
//
// A background task that emits a message on a fixed period. The handle
// returned by `start` owns the task: stopping or dropping it ends the
// ticks, so teardown never depends on the channel being closed.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Lifecycle handle for a running refresh timer
#[derive(Debug)]
pub struct RefreshHandle {
    period: Duration,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Send a clone of `msg` on `tx` every `period`
    ///
    /// The first tick fires one full period after start; the caller is
    /// expected to refresh once itself at startup. Ticks missed while the
    /// runtime was busy are delayed, not bunched up.
    pub fn start<T>(period: Duration, tx: UnboundedSender<T>, msg: T) -> Self
    where
        T: Clone + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(msg.clone()).is_err() {
                    // Receiver gone, nothing left to refresh
                    break;
                }
            }
        });
        tracing::debug!(period_ms = period.as_millis() as u64, "Refresh schedule started");
        Self { period, task }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the timer; no further ticks are sent
    pub fn stop(self) {
        // Drop does the work
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(period_ms = self.period.as_millis() as u64, "Refresh schedule stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::sync::mpsc::error::TryRecvError;

    fn drain(rx: &mut mpsc::UnboundedReceiver<u8>) -> usize {
        let mut n = 0;
        while rx.try_recv().is_ok() {
            n += 1;
        }
        n
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_on_fixed_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = RefreshHandle::start(Duration::from_millis(5000), tx, 1u8);

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(drain(&mut rx), 0, "no tick before the first period");

        tokio::time::sleep(Duration::from_millis(10_002)).await;
        assert_eq!(drain(&mut rx), 3);
        assert!(handle.is_running());
        assert_eq!(handle.period(), Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = RefreshHandle::start(Duration::from_millis(1000), tx, 7u8);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(drain(&mut rx), 2);

        handle.stop();
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(drain(&mut rx), 0);
        // The sender lived inside the aborted task
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let _handle = RefreshHandle::start(Duration::from_millis(1000), tx, 0u8);
        }
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(drain(&mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_exits_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = RefreshHandle::start(Duration::from_millis(1000), tx, 0u8);
        drop(rx);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        tokio::task::yield_now().await;
        assert!(!handle.is_running());
    }
}
