//! Recurring job scheduler
//!
//! Runs named jobs on fixed wall-clock intervals for the process lifetime.
//! Ticks of different jobs are independent tasks and may overlap; nothing
//! here assumes mutual exclusion between jobs. Each tick runs under a hard
//! timeout so a stuck job cannot block its own schedule.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tracing::{error, info};

/// Default hard timeout for one job execution
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Process-wide scheduler for recurring background jobs
pub struct RecurringJobScheduler {
    job_timeout: Duration,
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl RecurringJobScheduler {
    pub fn new(job_timeout: Duration) -> Self {
        Self {
            job_timeout,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Run `job` once at `now + initial_delay`, then every `interval`
    /// thereafter, until the process shuts down. A tick that exceeds the
    /// scheduler's timeout is abandoned; the next tick runs on schedule.
    pub fn schedule<F, Fut>(&self, name: &str, initial_delay: Duration, interval: Duration, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let job_name = name.to_string();
        let job_timeout = self.job_timeout;

        info!(
            job = %job_name,
            initial_delay_secs = initial_delay.as_secs(),
            interval_secs = interval.as_secs(),
            "registering recurring job"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + initial_delay, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                info!(job = %job_name, "running recurring job");
                if timeout(job_timeout, job()).await.is_err() {
                    error!(job = %job_name, "job exceeded its timeout and was abandoned for this tick");
                }
            }
        });

        if let Ok(mut handles) = self.handles.lock() {
            handles.push((name.to_string(), handle));
        }
    }

    /// Number of registered standing jobs
    pub fn job_count(&self) -> usize {
        self.handles.lock().map(|handles| handles.len()).unwrap_or(0)
    }

    /// Abort every standing job. Jobs keep running if the scheduler is
    /// merely dropped; only an explicit shutdown stops them.
    pub fn shutdown(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            for (name, handle) in handles.drain(..) {
                info!(job = %name, "stopping recurring job");
                handle.abort();
            }
        }
    }
}

impl Default for RecurringJobScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_JOB_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_initial_delay_then_on_interval() {
        let scheduler = RecurringJobScheduler::default();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler.schedule(
            "counter",
            Duration::from_secs(10),
            Duration::from_secs(30),
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_initial_delay_runs_immediately() {
        let scheduler = RecurringJobScheduler::default();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler.schedule(
            "immediate",
            Duration::ZERO,
            Duration::from_secs(60),
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        sleep(Duration::from_millis(10)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_tick_does_not_block_the_next() {
        let scheduler = RecurringJobScheduler::new(Duration::from_secs(60));
        let starts = Arc::new(AtomicUsize::new(0));

        let counter = starts.clone();
        scheduler.schedule(
            "stuck",
            Duration::ZERO,
            Duration::from_secs(120),
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    // never finishes within the timeout
                    sleep(Duration::from_secs(3600)).await;
                }
            },
        );

        sleep(Duration::from_secs(1)).await;
        assert_eq!(starts.load(Ordering::SeqCst), 1);

        sleep(Duration::from_secs(120)).await;
        assert_eq!(starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_standing_jobs() {
        let scheduler = RecurringJobScheduler::default();
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = runs.clone();
        scheduler.schedule(
            "stoppable",
            Duration::ZERO,
            Duration::from_secs(10),
            move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            },
        );

        sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.job_count(), 1);

        scheduler.shutdown();
        assert_eq!(scheduler.job_count(), 0);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
