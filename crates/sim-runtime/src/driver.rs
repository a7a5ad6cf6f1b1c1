use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};

use sim_core::{SimSession, TickUpdate};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};
use crate::metrics::TickLatencyMetrics;

pub type SharedSession = Arc<Mutex<SimSession>>;
pub type SharedMetrics = Arc<StdMutex<TickLatencyMetrics>>;
pub type SharedRunLog = Arc<StdMutex<Box<dyn RunLogWriter + Send>>>;

/// Wall-clock milliseconds since the unix epoch, for stamping price points.
pub fn unix_ms_now() -> u64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos / 1_000_000).max(0) as u64
}

/// Recurring timer that advances the session one tick per firing. The task is
/// bound to this handle: `stop` or dropping the handle aborts it, so a torn
/// down view cannot leak a timer that keeps mutating unobserved state.
pub struct TickDriver {
    handle: JoinHandle<()>,
}

impl TickDriver {
    pub fn spawn<F>(
        session: SharedSession,
        interval_ms: u64,
        metrics: SharedMetrics,
        run_log: SharedRunLog,
        sink: F,
    ) -> Self
    where
        F: Fn(TickUpdate) + Send + 'static,
    {
        assert!(interval_ms > 0, "interval_ms must be positive");

        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(Duration::from_millis(interval_ms));
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // the first interval firing is immediate; the first real tick
            // lands one full interval after spawn
            timer.tick().await;

            loop {
                timer.tick().await;
                let now_ms = unix_ms_now();
                let started = Instant::now();
                let update = session.lock().await.apply_tick(now_ms);
                let elapsed_micros = started.elapsed().as_micros().min(u64::MAX as u128) as u64;

                if let Ok(mut metrics) = metrics.lock() {
                    metrics.record_latency_micros(elapsed_micros);
                }
                if let Ok(mut log) = run_log.lock() {
                    log.write(RunLogEvent::new(
                        update.tick,
                        RunLogEventKind::TickApplied,
                        None,
                    ));
                }

                sink(update);
            }
        });

        Self { handle }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
