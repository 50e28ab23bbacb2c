use std::fmt::Write;

use crate::grouping::{Rotation, TeamRotation};
use crate::loader::PlayerLookup;
use crate::models::BoxScore;
use crate::timeline::TimeAxis;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub name: String,
    pub sessions: usize,
    pub minutes: f64,
    pub points: f64,
    pub plus_minus: f64,
}

pub fn summarize_team(team: &TeamRotation, players: &dyn PlayerLookup) -> Vec<PlayerSummary> {
    let mut summaries: Vec<PlayerSummary> = team
        .players
        .iter()
        .map(|player| PlayerSummary {
            name: players
                .player_name(player.player_id)
                .map(str::to_string)
                .unwrap_or_else(|| player.player_id.to_string()),
            sessions: player.sessions.len(),
            minutes: player.sessions.iter().map(|s| s.minutes()).sum(),
            points: player.sessions.iter().map(|s| s.player_pts).sum(),
            plus_minus: player.sessions.iter().map(|s| s.pt_diff).sum(),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.minutes
            .partial_cmp(&a.minutes)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

pub fn build_summary(
    box_score: &BoxScore,
    rotation: &Rotation,
    axis: &TimeAxis,
    players: &dyn PlayerLookup,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Rotation Summary");
    match box_score.game_date {
        Some(date) => {
            let _ = writeln!(output, "Game {} on {}", box_score.game_id, date.format("%B %-d, %Y"));
        }
        None => {
            let _ = writeln!(output, "Game {}", box_score.game_id);
        }
    }
    let overtimes = axis.period_count().saturating_sub(crate::timeline::REGULATION_PERIODS);
    let _ = writeln!(
        output,
        "{} periods ({} overtime), {} players, {} sessions",
        axis.period_count(),
        overtimes,
        rotation.player_count(),
        rotation.session_count()
    );

    if rotation.teams().is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "No rotation rows recorded for this game.");
        return output;
    }

    for team in rotation.teams() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", team.display_name());
        for summary in summarize_team(team, players) {
            let _ = writeln!(
                output,
                "- {}: {:.1} min across {} stints, {} pts, {:+} net",
                summary.name, summary.minutes, summary.sessions, summary.points, summary.plus_minus
            );
        }
    }

    output
}
