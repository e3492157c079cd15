use chrono::{DateTime, FixedOffset};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueRef {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeagueTier {
    Priority,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "Home",
            Side::Away => "Away",
        }
    }
}

/// Short status code as reported by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FixtureStatus {
    NotStarted,
    ToBeDefined,
    InProgress(String),
    Finished(String),
    Other(String),
}

impl FixtureStatus {
    pub fn from_short(code: &str) -> Self {
        match code {
            "NS" => FixtureStatus::NotStarted,
            "TBD" => FixtureStatus::ToBeDefined,
            "FT" | "AET" | "PEN" => FixtureStatus::Finished(code.to_string()),
            "1H" | "HT" | "2H" | "ET" | "BT" | "P" | "LIVE" | "INT" | "SUSP" => {
                FixtureStatus::InProgress(code.to_string())
            }
            other => FixtureStatus::Other(other.to_string()),
        }
    }

    /// Only fixtures that have not kicked off yet are worth scanning.
    pub fn is_pending(&self) -> bool {
        matches!(self, FixtureStatus::NotStarted | FixtureStatus::ToBeDefined)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Fixture {
    pub id: u64,
    pub timestamp: i64,
    pub status: FixtureStatus,
    pub league: LeagueRef,
    /// Season as reported inline by the source; some payloads omit it.
    pub season: Option<i32>,
    pub home: TeamRef,
    pub away: TeamRef,
}

impl Fixture {
    pub fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

/// A finished fixture looked up for one team.
#[derive(Debug, Clone, Serialize)]
pub struct LastMatch {
    pub fixture_id: u64,
    pub date: DateTime<FixedOffset>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl LastMatch {
    /// Both goal counts must be present and zero. A missing count is not a 0.
    pub fn is_scoreless(&self) -> bool {
        self.home_goals == Some(0) && self.away_goals == Some(0)
    }

    pub fn side_of(&self, team_id: u32) -> Side {
        if self.home.id == team_id {
            Side::Home
        } else {
            Side::Away
        }
    }

    pub fn opponent_of(&self, team_id: u32) -> &TeamRef {
        match self.side_of(team_id) {
            Side::Home => &self.away,
            Side::Away => &self.home,
        }
    }
}

/// Season aggregate for one team in one league. Counters are passed through as reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamStatistics {
    pub played: i64,
    pub draws: i64,
    pub clean_sheets: i64,
    pub failed_to_score: i64,
}

/// A fixture that survived selection, with the season its statistics are scoped to.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub fixture: Fixture,
    pub tier: LeagueTier,
    pub season: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub date: String,
    pub fixtures_total: usize,
    pub matches_checked: usize,
    pub exploratory_checked: usize,
    pub priority_hits: usize,
    pub other_hits: usize,
    pub alerts_sent: usize,
    pub alerts_skipped: usize,
    pub alerts_failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub status: &'static str,
    pub message: &'static str,
}

impl Ack {
    pub fn ok(message: &'static str) -> Self {
        Self { status: "ok", message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn last_match(home_goals: Option<u32>, away_goals: Option<u32>) -> LastMatch {
        LastMatch {
            fixture_id: 1,
            date: DateTime::parse_from_rfc3339("2024-03-02T15:00:00+00:00").unwrap(),
            home: TeamRef { id: 10, name: "Home FC".to_string() },
            away: TeamRef { id: 20, name: "Away FC".to_string() },
            home_goals,
            away_goals,
        }
    }

    #[test]
    fn test_scoreless_requires_both_zero() {
        assert!(last_match(Some(0), Some(0)).is_scoreless());
        assert!(!last_match(Some(1), Some(0)).is_scoreless());
        assert!(!last_match(Some(0), Some(2)).is_scoreless());
        assert!(!last_match(None, Some(0)).is_scoreless());
        assert!(!last_match(Some(0), None).is_scoreless());
        assert!(!last_match(None, None).is_scoreless());
    }

    #[test]
    fn test_opponent_depends_on_side() {
        let m = last_match(Some(0), Some(0));
        assert_eq!(m.opponent_of(10).name, "Away FC");
        assert_eq!(m.opponent_of(20).name, "Home FC");
        assert_eq!(m.side_of(20), Side::Away);
    }

    #[test]
    fn test_status_codes() {
        assert!(FixtureStatus::from_short("NS").is_pending());
        assert!(FixtureStatus::from_short("TBD").is_pending());
        for code in ["1H", "HT", "FT", "AET", "PEN", "PST", "CANC"] {
            assert!(!FixtureStatus::from_short(code).is_pending(), "{code}");
        }
        assert_eq!(
            FixtureStatus::from_short("PEN"),
            FixtureStatus::Finished("PEN".to_string())
        );
    }
}
