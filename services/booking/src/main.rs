use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use booking::config::BookingConfig;
use booking::dispatcher::DelayedDispatcher;
use booking::jobs::{Jobs, half_hour_alignment_delay};
use booking::notifier::LogNotifier;
use booking::repositories::PgBookingStore;
use booking::scheduler::RecurringJobScheduler;
use booking::store::BookingStore;
use common::database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting booking worker service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let config = BookingConfig::from_env();
    let store: Arc<dyn BookingStore> = Arc::new(PgBookingStore::new(pool));
    let dispatcher = DelayedDispatcher::new(Arc::new(LogNotifier));
    let jobs = Jobs::new(store, dispatcher, config.notification_lead_minutes);

    let scheduler = RecurringJobScheduler::new(config.job_timeout);

    {
        let jobs = jobs.clone();
        scheduler.schedule(
            "status_sweep",
            Duration::ZERO,
            config.status_sweep_interval,
            move || {
                let jobs = jobs.clone();
                async move { jobs.status_sweep().await }
            },
        );
    }

    {
        let jobs = jobs.clone();
        scheduler.schedule(
            "auth_session_cleanup",
            Duration::ZERO,
            config.auth_cleanup_interval,
            move || {
                let jobs = jobs.clone();
                async move { jobs.auth_session_cleanup().await }
            },
        );
    }

    {
        // first scan lands on the next half-hour boundary
        let jobs = jobs.clone();
        scheduler.schedule(
            "upcoming_notification_scan",
            half_hour_alignment_delay(Utc::now()),
            config.notification_scan_interval,
            move || {
                let jobs = jobs.clone();
                async move { jobs.upcoming_notification_scan().await }
            },
        );
    }

    {
        let jobs = jobs.clone();
        scheduler.schedule(
            "review_prompt_sweep",
            Duration::ZERO,
            config.review_sweep_interval,
            move || {
                let jobs = jobs.clone();
                async move { jobs.review_prompt_sweep().await }
            },
        );
    }

    info!(
        "Booking worker started with {} recurring jobs",
        scheduler.job_count()
    );

    // Keep the service running
    tokio::signal::ctrl_c().await?;
    info!("Shutting down booking worker");
    scheduler.shutdown();

    Ok(())
}
