use chrono::TimeZone;

use crate::models::{Fixture, LastMatch, Side};
use crate::services::stats::DerivedStats;
use crate::utils::{day_month, escape_html, kickoff_time};

/// One scoreless-streak hit, ready to be rendered.
pub struct Alert<'a> {
    pub fixture: &'a Fixture,
    pub side: Side,
    pub last_match: &'a LastMatch,
    pub season: i32,
    pub stats: DerivedStats,
}

impl Alert<'_> {
    /// Telegram HTML body. Kickoff is rendered in `tz`.
    pub fn render<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let team = self.fixture.team(self.side);
        let opponent = self.last_match.opponent_of(team.id);

        format!(
            "🚨 <b>0-0 ALERT</b>\n\n\
             🏆 <b>{league}</b>\n\
             ⚽ {home} vs {away}\n\
             🕒 {kickoff}\n\n\
             ⚠️ <b>{team} ({side})</b> is coming off a 0-0!\n\
             🆚 vs {opponent} ({played_on})\n\n\
             📊 <b>Stats (Season {season}):</b>\n\
             • Draw rate: {draw_rate:.1}%\n\
             • Under trend: {trend}\n",
            league = escape_html(&self.fixture.league.name),
            home = escape_html(&self.fixture.home.name),
            away = escape_html(&self.fixture.away.name),
            kickoff = kickoff_time(self.fixture.timestamp, tz),
            team = escape_html(&team.name),
            side = self.side.label(),
            opponent = escape_html(&opponent.name),
            played_on = day_month(&self.last_match.date),
            season = self.season,
            draw_rate = self.stats.draw_rate,
            trend = self.stats.trend,
        )
    }
}
