//! Weekly workflow trigger
//!
//! Sleeps until the configured weekday/hour (UTC) and fires the workflow.
//! Runs are single-flight: the scheduler and the on-demand API endpoint
//! share one lock, and an overlapping trigger is skipped rather than
//! queued, so a double-fire can never produce duplicate notifications.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, Utc, Weekday};

use crate::services::workflow::run_workflow;
use crate::AppState;

/// Next schedule firing strictly after `after`
pub fn next_fire_time(after: DateTime<Utc>, weekday: Weekday, hour: u32) -> DateTime<Utc> {
    let mut candidate = after
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .expect("hour validated at config load")
        .and_utc();

    while candidate <= after || candidate.weekday() != weekday {
        candidate = candidate + ChronoDuration::days(1);
    }

    candidate
}

/// Scheduler loop; spawned at startup when the schedule is enabled
pub async fn run_scheduler(state: AppState) {
    let weekday = state.config.schedule.weekday();
    let hour = state.config.schedule.hour;

    loop {
        let now = Utc::now();
        let next = next_fire_time(now, weekday, hour);
        let wait = (next - now)
            .to_std()
            .unwrap_or_else(|_| std::time::Duration::from_secs(0));

        tracing::info!("Next scheduled workflow run at {next}");
        tokio::time::sleep(wait).await;

        // Single-flight: skip this firing if a run is already in flight
        match state.run_lock.clone().try_lock_owned() {
            Ok(_guard) => {
                let outcome = run_workflow(&state).await;
                tracing::info!("Scheduled workflow run completed: {outcome:?}");
            }
            Err(_) => {
                tracing::warn!("Workflow run already in flight, skipping scheduled trigger");
            }
        }
    }
}
