use chrono::NaiveDate;

use crate::config::ScanPolicy;
use crate::models::{Candidate, Fixture, LeagueTier};
use crate::services::api_football::{FootballSource, LeagueScope};

/// Priority league ids, sorted so membership is a binary search.
#[derive(Debug, Clone)]
pub struct PriorityLeagues(Vec<u32>);

impl PriorityLeagues {
    pub fn new(ids: &[u32]) -> Self {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn tier(&self, league_id: u32) -> LeagueTier {
        if self.0.binary_search(&league_id).is_ok() {
            LeagueTier::Priority
        } else {
            LeagueTier::Other
        }
    }

    pub fn ids(&self) -> &[u32] {
        &self.0
    }
}

#[derive(Debug, Default)]
pub struct Selection {
    pub fixtures_total: usize,
    pub candidates: Vec<Candidate>,
    /// Off-list fixtures that counted against the cap.
    pub exploratory_checked: usize,
    pub skipped_started: usize,
    pub skipped_over_cap: usize,
    pub skipped_no_season: usize,
}

/// Picks today's candidates using the configured policy.
pub async fn select_fixtures(
    source: &dyn FootballSource,
    policy: ScanPolicy,
    priority: &PriorityLeagues,
    date: NaiveDate,
    timezone: &str,
    resolved_season: i32,
) -> Selection {
    match policy {
        ScanPolicy::Global { exploratory_cap } => {
            let fixtures = match source.fixtures_on(date, timezone, None).await {
                Ok(f) => f,
                Err(e) => {
                    tracing::error!("Global fixtures query failed: {}", e);
                    Vec::new()
                }
            };
            select_global(fixtures, priority, exploratory_cap)
        }
        ScanPolicy::PerLeague => {
            let mut by_league = Vec::new();
            for &league_id in priority.ids() {
                let scope = LeagueScope { league_id, season: resolved_season };
                match source.fixtures_on(date, timezone, Some(scope)).await {
                    Ok(fixtures) => {
                        tracing::debug!("League {}: {} fixtures", league_id, fixtures.len());
                        by_league.extend(fixtures);
                    }
                    Err(e) => tracing::error!("Fixtures query for league {} failed: {}", league_id, e),
                }
            }
            select_per_league(by_league, priority, resolved_season)
        }
    }
}

/// Global scan: every pending fixture in a priority league, plus at most
/// `exploratory_cap` pending fixtures from other leagues, in source order.
pub fn select_global(fixtures: Vec<Fixture>, priority: &PriorityLeagues, exploratory_cap: usize) -> Selection {
    let mut selection = Selection {
        fixtures_total: fixtures.len(),
        ..Selection::default()
    };

    for fixture in fixtures {
        if !fixture.status.is_pending() {
            selection.skipped_started += 1;
            continue;
        }

        let tier = priority.tier(fixture.league.id);
        if tier == LeagueTier::Other {
            if selection.exploratory_checked >= exploratory_cap {
                selection.skipped_over_cap += 1;
                continue;
            }
            selection.exploratory_checked += 1;
        }

        // Statistics are scoped by season; without one the fixture is useless.
        let Some(season) = fixture.season else {
            selection.skipped_no_season += 1;
            continue;
        };

        selection.candidates.push(Candidate { fixture, tier, season });
    }

    selection
}

/// Per-league scan: fixtures were already fetched league by league.
pub fn select_per_league(fixtures: Vec<Fixture>, priority: &PriorityLeagues, resolved_season: i32) -> Selection {
    let mut selection = Selection {
        fixtures_total: fixtures.len(),
        ..Selection::default()
    };

    for fixture in fixtures {
        if !fixture.status.is_pending() {
            selection.skipped_started += 1;
            continue;
        }
        let season = fixture.season.unwrap_or(resolved_season);
        let tier = priority.tier(fixture.league.id);
        selection.candidates.push(Candidate { fixture, tier, season });
    }

    selection
}
