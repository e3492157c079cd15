use std::fmt;

use crate::models::TeamStatistics;

/// Defensive trend, or the reason it could not be computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trend {
    Percent(f64),
    /// No statistics were returned.
    NotAvailable,
    /// Statistics exist but the team has not played yet.
    NoMatches,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Percent(p) => write!(f, "{:.1}%", p),
            Trend::NotAvailable => f.write_str("N/A"),
            Trend::NoMatches => f.write_str("0/0"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub draw_rate: f64,
    pub trend: Trend,
}

/// Draw rate and defensive trend, both as percentages of matches played.
///
/// The trend averages clean sheets and failed-to-score games, so a team that
/// neither concedes nor scores in every match sits at 100%.
pub fn derive(stats: Option<&TeamStatistics>) -> DerivedStats {
    let Some(stats) = stats else {
        return DerivedStats { draw_rate: 0.0, trend: Trend::NotAvailable };
    };
    if stats.played == 0 {
        return DerivedStats { draw_rate: 0.0, trend: Trend::NoMatches };
    }

    let played = stats.played as f64;
    let draw_rate = stats.draws as f64 / played * 100.0;
    let trend = ((stats.clean_sheets + stats.failed_to_score) as f64 / 2.0) / played * 100.0;

    DerivedStats { draw_rate, trend: Trend::Percent(trend) }
}
