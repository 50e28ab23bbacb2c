use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};
use crate::models::{BoxScore, PlayerId, PlayerInfo, RotationFeed, Session, TeamDescriptor, TeamId};

pub const BOX_SCORE_FILE: &str = "boxscore.json";
pub const ROTATION_FILE: &str = "gamerotation.json";
pub const PLAYERS_FILE: &str = "players.json";
pub const TEAMS_DIR: &str = "teams";

pub type TeamTable = HashMap<TeamId, TeamDescriptor>;

/// Resolves a player id to a display name.
pub trait PlayerLookup {
    fn player_name(&self, id: PlayerId) -> Option<&str>;
}

#[derive(Debug, Clone, Default)]
pub struct PlayerDirectory {
    names: HashMap<PlayerId, String>,
}

impl PlayerDirectory {
    pub fn new(players: Vec<PlayerInfo>) -> Self {
        let names = players
            .into_iter()
            .map(|player| (player.id, player.name))
            .collect();
        Self { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl PlayerLookup for PlayerDirectory {
    fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Everything read from a game data directory.
#[derive(Debug, Clone)]
pub struct GameData {
    pub box_score: BoxScore,
    pub sessions: Vec<Session>,
    pub teams: TeamTable,
    pub players: PlayerDirectory,
}

pub fn load_game(dir: &Path) -> ChartResult<GameData> {
    let box_score: BoxScore = read_json(&dir.join(BOX_SCORE_FILE))?;
    validate_box_score(&box_score)?;

    let feed: RotationFeed = read_json(&dir.join(ROTATION_FILE))?;
    let players: Vec<PlayerInfo> = read_json(&dir.join(PLAYERS_FILE))?;
    let teams = load_teams(&dir.join(TEAMS_DIR))?;

    debug!(
        game_id = %box_score.game_id,
        periods = box_score.periods.len(),
        sessions = feed.rows.len(),
        teams = teams.len(),
        players = players.len(),
        "loaded game data"
    );

    let players = PlayerDirectory::new(players);
    if players.is_empty() {
        warn!("player directory is empty, rows will be labelled by id");
    }

    Ok(GameData {
        box_score,
        sessions: feed.rows,
        teams,
        players,
    })
}

pub fn load_teams(dir: &Path) -> ChartResult<TeamTable> {
    let entries = std::fs::read_dir(dir).map_err(|err| ChartError::io(dir, err))?;
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| ChartError::io(dir, err))?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut teams = TeamTable::new();
    for path in paths {
        let team: TeamDescriptor = read_json(&path)?;
        teams.insert(team.id, team);
    }
    Ok(teams)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> ChartResult<T> {
    let bytes = std::fs::read(path).map_err(|err| ChartError::io(path, err))?;
    serde_json::from_slice(&bytes).map_err(|err| ChartError::parse(path, err))
}

pub fn validate_box_score(box_score: &BoxScore) -> ChartResult<()> {
    let first = box_score
        .periods
        .first()
        .ok_or_else(|| ChartError::invalid("box score has no periods"))?;
    if !(first.length() > 0.0) {
        return Err(ChartError::invalid(format!(
            "first period must have endTime > startTime (got {} to {})",
            first.start_time, first.end_time
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodSpan;

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn loads_fixture_directory() {
        let game = load_game(&fixtures_dir()).unwrap();
        assert_eq!(game.teams.len(), 2);
        assert!(!game.sessions.is_empty());
        assert!(!game.players.is_empty());
        assert_eq!(game.box_score.periods.len(), 4);
    }

    #[test]
    fn directory_resolves_known_names_only() {
        let directory = PlayerDirectory::new(vec![PlayerInfo {
            id: PlayerId(202695),
            name: "Kawhi Leonard".to_string(),
        }]);
        assert_eq!(directory.player_name(PlayerId(202695)), Some("Kawhi Leonard"));
        assert_eq!(directory.player_name(PlayerId(1)), None);
    }

    #[test]
    fn rejects_box_score_without_periods() {
        let score = BoxScore {
            game_id: "g".to_string(),
            game_date: None,
            periods: vec![],
        };
        assert!(matches!(
            validate_box_score(&score),
            Err(ChartError::InvalidData(_))
        ));
    }

    #[test]
    fn rejects_zero_length_first_period() {
        let score = BoxScore {
            game_id: "g".to_string(),
            game_date: None,
            periods: vec![PeriodSpan {
                period: 1,
                start_time: 7200.0,
                end_time: 7200.0,
                text: None,
            }],
        };
        assert!(validate_box_score(&score).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_json::<BoxScore>(Path::new("does/not/exist.json")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
