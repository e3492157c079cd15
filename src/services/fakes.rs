//! In-memory source and sink for pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde_json::json;

use crate::models::{Fixture, FixtureStatus, LastMatch, LeagueRef, TeamRef, TeamStatistics};
use crate::services::api_football::{FootballSource, GatewayError, LeagueScope};
use crate::services::notifier::{Delivery, NotifyError, Notifier};

pub fn fixture(
    id: u64,
    league_id: u32,
    status: &str,
    season: Option<i32>,
    home: (u32, &str),
    away: (u32, &str),
) -> Fixture {
    Fixture {
        id,
        timestamp: 1_710_099_900,
        status: FixtureStatus::from_short(status),
        league: LeagueRef { id: league_id, name: format!("League {league_id}") },
        season,
        home: TeamRef { id: home.0, name: home.1.to_string() },
        away: TeamRef { id: away.0, name: away.1.to_string() },
    }
}

/// A 0-0 played at home by `team_id` against `opponent`.
pub fn scoreless_match(team_id: u32, opponent: (u32, &str), date: &str) -> LastMatch {
    LastMatch {
        fixture_id: 900 + team_id as u64,
        date: DateTime::parse_from_rfc3339(date).expect("valid test date"),
        home: TeamRef { id: team_id, name: format!("Team {team_id}") },
        away: TeamRef { id: opponent.0, name: opponent.1.to_string() },
        home_goals: Some(0),
        away_goals: Some(0),
    }
}

#[derive(Default)]
pub struct FakeSource {
    fixtures: Vec<Fixture>,
    last_matches: HashMap<u32, LastMatch>,
    stats: HashMap<u32, TeamStatistics>,
    fail_last_match: bool,
    calls: Mutex<Vec<&'static str>>,
    scopes: Mutex<Vec<Option<(u32, i32)>>>,
    stats_requests: Mutex<Vec<(u32, u32, i32)>>,
}

impl FakeSource {
    pub fn with_fixtures(mut self, fixtures: Vec<Fixture>) -> Self {
        self.fixtures = fixtures;
        self
    }

    pub fn with_last_match(mut self, team_id: u32, last: LastMatch) -> Self {
        self.last_matches.insert(team_id, last);
        self
    }

    pub fn with_stats(mut self, team_id: u32, stats: TeamStatistics) -> Self {
        self.stats.insert(team_id, stats);
        self
    }

    pub fn failing_last_match(mut self) -> Self {
        self.fail_last_match = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fixture_scopes(&self) -> Vec<Option<(u32, i32)>> {
        self.scopes.lock().unwrap().clone()
    }

    pub fn stats_requests(&self) -> Vec<(u32, u32, i32)> {
        self.stats_requests.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl FootballSource for FakeSource {
    async fn fixtures_on(
        &self,
        _date: NaiveDate,
        _timezone: &str,
        scope: Option<LeagueScope>,
    ) -> Result<Vec<Fixture>, GatewayError> {
        self.record("fixtures");
        self.scopes.lock().unwrap().push(scope.map(|s| (s.league_id, s.season)));
        tokio::task::yield_now().await;
        Ok(self
            .fixtures
            .iter()
            .filter(|f| scope.map_or(true, |s| s.league_id == f.league.id))
            .cloned()
            .collect())
    }

    async fn last_finished(&self, team_id: u32) -> Result<Option<LastMatch>, GatewayError> {
        self.record("last");
        tokio::task::yield_now().await;
        if self.fail_last_match {
            return Err(GatewayError::Upstream {
                endpoint: "fixtures".to_string(),
                errors: json!({ "requests": "You have reached the request limit for the day" }),
            });
        }
        Ok(self.last_matches.get(&team_id).cloned())
    }

    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> Result<Option<TeamStatistics>, GatewayError> {
        self.record("stats");
        self.stats_requests.lock().unwrap().push((team_id, league_id, season));
        tokio::task::yield_now().await;
        Ok(self.stats.get(&team_id).copied())
    }
}

/// Panics on the first fixtures query, like an unexpected payload would.
pub struct PanickingSource;

#[async_trait]
impl FootballSource for PanickingSource {
    async fn fixtures_on(&self, _: NaiveDate, _: &str, _: Option<LeagueScope>) -> Result<Vec<Fixture>, GatewayError> {
        panic!("unexpected payload shape");
    }

    async fn last_finished(&self, _: u32) -> Result<Option<LastMatch>, GatewayError> {
        Ok(None)
    }

    async fn team_statistics(&self, _: u32, _: u32, _: i32) -> Result<Option<TeamStatistics>, GatewayError> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<String>>,
}

impl FakeNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, text: &str) -> Result<Delivery, NotifyError> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(Delivery::Sent)
    }
}
