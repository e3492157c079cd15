use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{Config, ScanPolicy};
use crate::models::{Candidate, LeagueTier, RunSummary, Side};
use crate::services::alert::Alert;
use crate::services::api_football::FootballSource;
use crate::services::lookback::scoreless_last_match;
use crate::services::notifier::{Delivery, Notifier};
use crate::services::selector::{select_fixtures, PriorityLeagues};
use crate::services::stats::derive;
use crate::utils::resolve_season;

/// Scan settings taken from the config once at startup.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub policy: ScanPolicy,
    pub priority: PriorityLeagues,
    pub season_override: Option<i32>,
    pub timezone: String,
}

impl From<&Config> for ScanSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            policy: cfg.scan_policy,
            priority: PriorityLeagues::new(&cfg.priority_leagues),
            season_override: cfg.season_override,
            timezone: cfg.timezone.clone(),
        }
    }
}

/// Runs the daily scan. Runs are serialized: a manual trigger that lands
/// during a scheduled run waits for it to finish.
pub struct Analyzer {
    source: Arc<dyn FootballSource>,
    notifier: Arc<dyn Notifier>,
    settings: ScanSettings,
    run_lock: Mutex<()>,
}

impl Analyzer {
    pub fn new(source: Arc<dyn FootballSource>, notifier: Arc<dyn Notifier>, settings: ScanSettings) -> Self {
        Self {
            source,
            notifier,
            settings,
            run_lock: Mutex::new(()),
        }
    }

    pub fn source(&self) -> &dyn FootballSource {
        self.source.as_ref()
    }

    pub async fn run_daily_analysis(&self) -> RunSummary {
        self.run_for(Local::now().date_naive()).await
    }

    pub async fn run_for(&self, date: NaiveDate) -> RunSummary {
        let _guard = self.run_lock.lock().await;
        let span = tracing::info_span!("run", id = %Uuid::new_v4(), %date);
        self.scan(date).instrument(span).await
    }

    async fn scan(&self, date: NaiveDate) -> RunSummary {
        let settings = &self.settings;
        let season = resolve_season(settings.season_override, date);
        tracing::info!("Starting scan for {} (season fallback {})", date, season);

        let selection = select_fixtures(
            self.source.as_ref(),
            settings.policy,
            &settings.priority,
            date,
            &settings.timezone,
            season,
        )
        .await;

        let mut summary = RunSummary {
            date: date.format("%Y-%m-%d").to_string(),
            fixtures_total: selection.fixtures_total,
            exploratory_checked: selection.exploratory_checked,
            ..RunSummary::default()
        };

        if selection.fixtures_total == 0 {
            tracing::warn!("No fixtures returned for {}", date);
            return summary;
        }
        tracing::info!(
            "{} fixtures today, {} to examine ({} started, {} over cap, {} without season)",
            selection.fixtures_total,
            selection.candidates.len(),
            selection.skipped_started,
            selection.skipped_over_cap,
            selection.skipped_no_season,
        );

        for candidate in &selection.candidates {
            if summary.matches_checked % 10 == 0 {
                tracing::info!(
                    "Examining fixture {} (#{}): {} vs {} ({})",
                    summary.matches_checked,
                    candidate.fixture.id,
                    candidate.fixture.home.name,
                    candidate.fixture.away.name,
                    candidate.fixture.league.name,
                );
            }
            summary.matches_checked += 1;

            for side in [Side::Home, Side::Away] {
                self.check_side(candidate, side, &mut summary).await;
            }
        }

        tracing::info!(
            "Scan finished: {} examined, {} exploratory, {} alerts sent, {} off-list hits",
            summary.matches_checked,
            summary.exploratory_checked,
            summary.alerts_sent,
            summary.other_hits,
        );
        summary
    }

    async fn check_side(&self, candidate: &Candidate, side: Side, summary: &mut RunSummary) {
        let fixture = &candidate.fixture;
        let team = fixture.team(side);

        let Some(last_match) = scoreless_last_match(self.source.as_ref(), team.id).await else {
            return;
        };
        tracing::debug!("Team {} last match {} ended 0-0", team.id, last_match.fixture_id);

        if candidate.tier == LeagueTier::Other {
            summary.other_hits += 1;
            tracing::warn!(
                "0-0 outside priority list: {} in {}. Add league {} to LEAGUE_IDS to get alerts",
                team.name,
                fixture.league.name,
                fixture.league.id,
            );
            return;
        }
        summary.priority_hits += 1;

        let stats = match self
            .source
            .team_statistics(team.id, fixture.league.id, candidate.season)
            .await
        {
            Ok(stats) => stats,
            Err(e) => {
                tracing::debug!("Statistics for team {} unavailable: {}", team.id, e);
                None
            }
        };

        let alert = Alert {
            fixture,
            side,
            last_match: &last_match,
            season: candidate.season,
            stats: derive(stats.as_ref()),
        };
        let text = alert.render(&Local);

        match self.notifier.send(&text).await {
            Ok(Delivery::Sent) => {
                summary.alerts_sent += 1;
                tracing::info!("Alert sent: {} ({}) in {}", team.name, side.label(), fixture.league.name);
            }
            Ok(Delivery::Skipped) => summary.alerts_skipped += 1,
            Err(e) => {
                summary.alerts_failed += 1;
                tracing::error!("Alert for {} not delivered: {}", team.name, e);
            }
        }
    }
}
