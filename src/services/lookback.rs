use crate::models::LastMatch;
use crate::services::api_football::FootballSource;

/// The team's most recent finished match, or `None` when the lookup fails or finds nothing.
pub async fn last_finished_match(source: &dyn FootballSource, team_id: u32) -> Option<LastMatch> {
    match source.last_finished(team_id).await {
        Ok(found) => found,
        Err(e) => {
            tracing::debug!("Last match lookup for team {} failed: {}", team_id, e);
            None
        }
    }
}

/// The team's last finished match, only if it ended 0-0.
pub async fn scoreless_last_match(source: &dyn FootballSource, team_id: u32) -> Option<LastMatch> {
    last_finished_match(source, team_id)
        .await
        .filter(LastMatch::is_scoreless)
}
