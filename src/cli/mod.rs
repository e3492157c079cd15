use anyhow::Result;

use crate::services::lookback::last_finished_match;
use crate::services::Analyzer;
use crate::utils::day_month;

pub async fn run_once(analyzer: &Analyzer) -> Result<()> {
    println!("🌍 Running the daily scan now...");

    let summary = analyzer.run_daily_analysis().await;

    if summary.fixtures_total == 0 {
        println!("📭 No fixtures found for {}.", summary.date);
        return Ok(());
    }

    println!("📅 Date: {}", summary.date);
    println!("   Fixtures returned:    {}", summary.fixtures_total);
    println!("   Fixtures examined:    {}", summary.matches_checked);
    println!("   Off-list examined:    {}", summary.exploratory_checked);
    println!("   0-0 hits (priority):  {}", summary.priority_hits);
    println!("   0-0 hits (other):     {}", summary.other_hits);
    println!("   Alerts sent:          {}", summary.alerts_sent);
    if summary.alerts_skipped > 0 {
        println!("⚠️  {} alerts skipped: Telegram is not configured.", summary.alerts_skipped);
    }
    if summary.alerts_failed > 0 {
        println!("❌ {} alerts failed to send, see the log.", summary.alerts_failed);
    }

    Ok(())
}

pub async fn query_team(analyzer: &Analyzer, team_id: u32) -> Result<()> {
    println!("🔍 Looking up the last finished match of team {}", team_id);

    let Some(last) = last_finished_match(analyzer.source(), team_id).await else {
        println!("❌ No finished match found (or the API call failed).");
        return Ok(());
    };

    let score = match (last.home_goals, last.away_goals) {
        (Some(h), Some(a)) => format!("{}-{}", h, a),
        _ => "?-?".to_string(),
    };
    let side = last.side_of(team_id);

    println!("📊 {} {} {} ({})", last.home.name, score, last.away.name, day_month(&last.date));
    println!("   Played as: {}", side.label());
    println!("   Opponent:  {}", last.opponent_of(team_id).name);

    if last.is_scoreless() {
        println!("🚨 Coming off a 0-0.");
    } else {
        println!("✅ Not a 0-0.");
    }

    Ok(())
}
