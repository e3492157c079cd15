use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Football seasons start mid-year: before August we are still in last year's season.
pub fn resolve_season(season_override: Option<i32>, today: NaiveDate) -> i32 {
    if let Some(season) = season_override {
        return season;
    }
    if today.month() < 8 {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Next occurrence of `hour`:00 strictly after `now`. If `now` is exactly on
/// the hour, the run is pushed to tomorrow.
pub fn next_daily_run<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();
    let mut day = now.date_naive();
    loop {
        if let Some(target) = at_local(&now.timezone(), day.and_time(time)) {
            if target > *now {
                return target;
            }
        }
        day += Duration::days(1);
    }
}

// A wall-clock time swallowed by a DST gap has no instant; skip that day.
fn at_local<Tz: TimeZone>(tz: &Tz, naive: chrono::NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

/// Kickoff time as HH:MM in the given zone.
pub fn kickoff_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_opt(timestamp, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.format("%H:%M").to_string(),
        LocalResult::None => "--:--".to_string(),
    }
}

pub fn day_month<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d/%m").to_string()
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
