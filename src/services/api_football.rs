use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Fixture, FixtureStatus, LastMatch, LeagueRef, TeamRef, TeamStatistics};

const DATA_TIMEOUT: Duration = Duration::from_secs(15);

/// Statuses that count as a completed match for the lookback query.
const FINISHED_STATUSES: &str = "FT-AET-PEN";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: StatusCode },
    #[error("{endpoint} reported errors: {errors}")]
    Upstream { endpoint: String, errors: Value },
    #[error("{endpoint} payload could not be decoded: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Restricts a fixtures query to one league and season.
#[derive(Debug, Clone, Copy)]
pub struct LeagueScope {
    pub league_id: u32,
    pub season: i32,
}

/// Everything the pipeline needs from the sports-data provider.
#[async_trait]
pub trait FootballSource: Send + Sync {
    async fn fixtures_on(
        &self,
        date: NaiveDate,
        timezone: &str,
        scope: Option<LeagueScope>,
    ) -> Result<Vec<Fixture>, GatewayError>;

    async fn last_finished(&self, team_id: u32) -> Result<Option<LastMatch>, GatewayError>;

    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> Result<Option<TeamStatistics>, GatewayError>;
}

// ── API-Football v3 structures ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Value,
}

#[derive(Debug, Deserialize)]
struct ApiFixture {
    fixture: ApiFixtureInfo,
    league: ApiLeague,
    teams: ApiTeams,
    #[serde(default)]
    goals: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiFixtureInfo {
    id: u64,
    date: String,
    timestamp: i64,
    status: ApiStatus,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    short: String,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    id: u32,
    name: String,
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ApiTeams {
    home: ApiTeam,
    away: ApiTeam,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u32,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiGoals {
    home: Option<u32>,
    away: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiTeamStatistics {
    fixtures: ApiFixtureCounts,
    clean_sheet: ApiTotal,
    failed_to_score: ApiTotal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiFixtureCounts {
    played: ApiTotal,
    draws: ApiTotal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiTotal {
    total: Option<i64>,
}

impl From<ApiTeam> for TeamRef {
    fn from(t: ApiTeam) -> Self {
        TeamRef { id: t.id, name: t.name }
    }
}

impl From<ApiFixture> for Fixture {
    fn from(f: ApiFixture) -> Self {
        Fixture {
            id: f.fixture.id,
            timestamp: f.fixture.timestamp,
            status: FixtureStatus::from_short(&f.fixture.status.short),
            league: LeagueRef { id: f.league.id, name: f.league.name },
            season: f.league.season,
            home: f.teams.home.into(),
            away: f.teams.away.into(),
        }
    }
}

impl From<ApiTeamStatistics> for TeamStatistics {
    fn from(s: ApiTeamStatistics) -> Self {
        TeamStatistics {
            played: s.fixtures.played.total.unwrap_or(0),
            draws: s.fixtures.draws.total.unwrap_or(0),
            clean_sheets: s.clean_sheet.total.unwrap_or(0),
            failed_to_score: s.failed_to_score.total.unwrap_or(0),
        }
    }
}

fn last_match_from(f: ApiFixture) -> Option<LastMatch> {
    let date = match DateTime::<FixedOffset>::parse_from_rfc3339(&f.fixture.date) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!("Bad fixture date '{}' on fixture {}: {}", f.fixture.date, f.fixture.id, e);
            return None;
        }
    };
    Some(LastMatch {
        fixture_id: f.fixture.id,
        date,
        home: f.teams.home.into(),
        away: f.teams.away.into(),
        home_goals: f.goals.home,
        away_goals: f.goals.away,
    })
}

/// `errors` comes back as `[]` when fine, or as a non-empty list/object otherwise.
/// Falsy scalars (`false`, `0`, `""`) also mean no error.
fn has_errors(errors: &Value) -> bool {
    match errors {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |v| v != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::String(s) => !s.is_empty(),
    }
}

/// Decode list entries one by one so a single odd record does not sink the batch.
fn decode_records<T: DeserializeOwned>(endpoint: &str, response: Value) -> Vec<T> {
    let items = match response {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => vec![other],
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} record: {}", endpoint, e);
                None
            }
        })
        .collect()
}

// ── ApiFootball ─────────────────────────────────────────────────────────────

pub struct ApiFootball {
    client: Client,
    base_url: String,
    host: String,
    api_key: String,
}

impl ApiFootball {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, GatewayError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let host = base_url
            .split("://")
            .nth(1)
            .unwrap_or(base_url.as_str())
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();

        let client = Client::builder()
            .timeout(DATA_TIMEOUT)
            .build()
            .map_err(|source| GatewayError::Transport { endpoint: "client".to_string(), source })?;

        Ok(Self {
            client,
            base_url,
            host,
            api_key: api_key.to_string(),
        })
    }

    /// One GET against the provider. Returns the `response` payload.
    pub async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, GatewayError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {} {:?}", url, params);

        let result = self.send(endpoint, &url, params).await;
        match &result {
            Err(e @ GatewayError::Upstream { .. }) => tracing::warn!("API warning: {}", e),
            Err(e) => tracing::error!("API error: {}", e),
            Ok(_) => {}
        }
        result
    }

    async fn send(&self, endpoint: &str, url: &str, params: &[(&str, String)]) -> Result<Value, GatewayError> {
        let transport = |source| GatewayError::Transport { endpoint: endpoint.to_string(), source };

        let response = self.client
            .get(url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .query(params)
            .send().await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { endpoint: endpoint.to_string(), status });
        }

        let body = response.text().await.map_err(transport)?;
        let envelope: Envelope = serde_json::from_str(&body)
            .map_err(|source| GatewayError::Decode { endpoint: endpoint.to_string(), source })?;

        if has_errors(&envelope.errors) {
            return Err(GatewayError::Upstream { endpoint: endpoint.to_string(), errors: envelope.errors });
        }
        Ok(envelope.response)
    }
}

#[async_trait]
impl FootballSource for ApiFootball {
    async fn fixtures_on(
        &self,
        date: NaiveDate,
        timezone: &str,
        scope: Option<LeagueScope>,
    ) -> Result<Vec<Fixture>, GatewayError> {
        let mut params = vec![
            ("date", date.format("%Y-%m-%d").to_string()),
            ("timezone", timezone.to_string()),
        ];
        if let Some(scope) = scope {
            params.push(("league", scope.league_id.to_string()));
            params.push(("season", scope.season.to_string()));
        }

        let response = self.fetch("fixtures", &params).await?;
        Ok(decode_records::<ApiFixture>("fixtures", response)
            .into_iter()
            .map(Fixture::from)
            .collect())
    }

    async fn last_finished(&self, team_id: u32) -> Result<Option<LastMatch>, GatewayError> {
        let params = [
            ("team", team_id.to_string()),
            ("last", "1".to_string()),
            ("status", FINISHED_STATUSES.to_string()),
        ];
        let response = self.fetch("fixtures", &params).await?;
        Ok(decode_records::<ApiFixture>("fixtures", response)
            .into_iter()
            .next()
            .and_then(last_match_from))
    }

    async fn team_statistics(
        &self,
        team_id: u32,
        league_id: u32,
        season: i32,
    ) -> Result<Option<TeamStatistics>, GatewayError> {
        let params = [
            ("team", team_id.to_string()),
            ("league", league_id.to_string()),
            ("season", season.to_string()),
        ];
        let response = self.fetch("teams/statistics", &params).await?;
        if is_empty_payload(&response) {
            return Ok(None);
        }
        serde_json::from_value::<ApiTeamStatistics>(response)
            .map(|s| Some(s.into()))
            .map_err(|source| GatewayError::Decode { endpoint: "teams/statistics".to_string(), source })
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}
