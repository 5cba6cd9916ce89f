//! Booking service configuration
//!
//! Scheduling knobs for the booking core, loaded from environment variables
//! with the production defaults baked in.

use std::env;
use std::time::Duration;

use crate::scheduler::DEFAULT_JOB_TIMEOUT;

/// Configuration for the recurring jobs and the notification lead time
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Interval between status recalculation sweeps
    pub status_sweep_interval: Duration,
    /// Interval between expired auth-session cleanups
    pub auth_cleanup_interval: Duration,
    /// Interval between upcoming-session notification scans
    pub notification_scan_interval: Duration,
    /// Interval between post-session review sweeps
    pub review_sweep_interval: Duration,
    /// Hard per-tick timeout for every recurring job
    pub job_timeout: Duration,
    /// Minutes before a session start at which the reminder fires
    pub notification_lead_minutes: i64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            status_sweep_interval: Duration::from_secs(30 * 60),
            auth_cleanup_interval: Duration::from_secs(24 * 60 * 60),
            notification_scan_interval: Duration::from_secs(60 * 60),
            review_sweep_interval: Duration::from_secs(6 * 60 * 60),
            job_timeout: DEFAULT_JOB_TIMEOUT,
            notification_lead_minutes: 30,
        }
    }
}

impl BookingConfig {
    /// Create a BookingConfig from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            status_sweep_interval: minutes_var(
                "STATUS_SWEEP_INTERVAL_MINUTES",
                defaults.status_sweep_interval,
            ),
            auth_cleanup_interval: minutes_var(
                "AUTH_CLEANUP_INTERVAL_MINUTES",
                defaults.auth_cleanup_interval,
            ),
            notification_scan_interval: minutes_var(
                "NOTIFICATION_SCAN_INTERVAL_MINUTES",
                defaults.notification_scan_interval,
            ),
            review_sweep_interval: minutes_var(
                "REVIEW_SWEEP_INTERVAL_MINUTES",
                defaults.review_sweep_interval,
            ),
            job_timeout: minutes_var("JOB_TIMEOUT_MINUTES", defaults.job_timeout),
            notification_lead_minutes: env::var("NOTIFICATION_LEAD_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.notification_lead_minutes),
        }
    }
}

fn minutes_var(var: &str, default: Duration) -> Duration {
    env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(|minutes| Duration::from_secs(minutes * 60))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_defaults() {
        unsafe {
            env::remove_var("STATUS_SWEEP_INTERVAL_MINUTES");
            env::remove_var("NOTIFICATION_LEAD_MINUTES");
        }

        let config = BookingConfig::from_env();
        assert_eq!(config.status_sweep_interval, Duration::from_secs(30 * 60));
        assert_eq!(config.auth_cleanup_interval, Duration::from_secs(86400));
        assert_eq!(config.notification_scan_interval, Duration::from_secs(3600));
        assert_eq!(config.job_timeout, Duration::from_secs(300));
        assert_eq!(config.notification_lead_minutes, 30);
    }

    #[test]
    #[serial]
    fn test_config_env_overrides() {
        unsafe {
            env::set_var("STATUS_SWEEP_INTERVAL_MINUTES", "5");
            env::set_var("NOTIFICATION_LEAD_MINUTES", "15");
        }

        let config = BookingConfig::from_env();
        assert_eq!(config.status_sweep_interval, Duration::from_secs(5 * 60));
        assert_eq!(config.notification_lead_minutes, 15);

        unsafe {
            env::remove_var("STATUS_SWEEP_INTERVAL_MINUTES");
            env::remove_var("NOTIFICATION_LEAD_MINUTES");
        }
    }
}
