use std::sync::Arc;
use std::time::Duration;

use chrono::Local;

use crate::config::ScheduleMode;
use crate::services::analyzer::Analyzer;
use crate::utils::next_daily_run;

/// Starts the background loop. It never returns on its own.
pub fn spawn(analyzer: Arc<Analyzer>, mode: ScheduleMode, startup_delay: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(startup_delay).await;
        match mode {
            ScheduleMode::DailyAt { hour } => run_daily(analyzer, hour).await,
            ScheduleMode::Every(period) => run_every(analyzer, period).await,
        }
    })
}

async fn run_daily(analyzer: Arc<Analyzer>, hour: u32) {
    tracing::info!("Daily scheduler started (runs at {:02}:00)", hour);
    loop {
        let now = Local::now();
        let target = next_daily_run(&now, hour);
        let wait = (target - now).to_std().unwrap_or_default();
        tracing::info!("Next run at {} ({:.2} h from now)", target.format("%Y-%m-%d %H:%M"), wait.as_secs_f64() / 3600.0);

        tokio::time::sleep(wait).await;
        run_guarded(&analyzer, "Scheduled").await;
    }
}

async fn run_every(analyzer: Arc<Analyzer>, period: Duration) {
    tracing::info!("Interval scheduler started (every {:.1} h)", period.as_secs_f64() / 3600.0);
    loop {
        run_guarded(&analyzer, "Scheduled").await;
        tokio::time::sleep(period).await;
    }
}

/// One run in its own task. A panic is logged instead of killing the caller,
/// and dropping the returned future does not stop the run.
pub async fn run_guarded(analyzer: &Arc<Analyzer>, trigger: &str) -> bool {
    tracing::info!("{} run starting", trigger);
    let analyzer = analyzer.clone();
    match tokio::spawn(async move { analyzer.run_daily_analysis().await }).await {
        Ok(summary) => {
            tracing::info!("{} run finished: {} alerts sent", trigger, summary.alerts_sent);
            true
        }
        Err(e) => {
            tracing::error!("{} run aborted: {}", trigger, e);
            false
        }
    }
}
