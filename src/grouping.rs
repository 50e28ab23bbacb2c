use std::collections::HashMap;

use tracing::{debug, warn};

use crate::loader::TeamTable;
use crate::models::{PlayerId, Session, TeamDescriptor, TeamId};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRotation {
    pub player_id: PlayerId,
    /// Feed order, not sorted by time.
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRotation {
    pub team_id: TeamId,
    pub descriptor: Option<TeamDescriptor>,
    pub players: Vec<PlayerRotation>,
}

impl TeamRotation {
    pub fn display_name(&self) -> String {
        match &self.descriptor {
            Some(descriptor) => descriptor.full_name(),
            None => format!("Team {}", self.team_id),
        }
    }

    pub fn primary_color(&self) -> Option<&str> {
        self.descriptor
            .as_ref()
            .and_then(|descriptor| descriptor.primary_color.as_deref())
    }
}

/// One chart row: a player and the team they played for.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    pub team: &'a TeamRotation,
    pub player: &'a PlayerRotation,
}

/// Sessions grouped by team, then by player.
///
/// Teams are ordered by first appearance in the feed, players within a team
/// likewise. Players are keyed by `(team, player)`: a player id that shows up
/// under two team ids gets a separate entry, and so a separate chart row, for
/// each team.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rotation {
    teams: Vec<TeamRotation>,
}

impl Rotation {
    pub fn from_sessions<'a>(
        sessions: impl IntoIterator<Item = &'a Session>,
        team_table: &TeamTable,
    ) -> Self {
        let mut builder = RotationBuilder::new(team_table);
        for session in sessions {
            builder.push(session.clone());
        }
        builder.finish()
    }

    pub fn teams(&self) -> &[TeamRotation] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&TeamRotation> {
        self.teams.iter().find(|team| team.team_id == id)
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(|team| team.players.len()).sum()
    }

    pub fn session_count(&self) -> usize {
        self.sessions().count()
    }

    pub fn max_period(&self) -> Option<u32> {
        self.sessions().map(|session| session.period).max()
    }

    pub fn rows(&self) -> Vec<RowRef<'_>> {
        self.teams
            .iter()
            .flat_map(|team| {
                team.players
                    .iter()
                    .map(move |player| RowRef { team, player })
            })
            .collect()
    }

    fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.teams
            .iter()
            .flat_map(|team| team.players.iter())
            .flat_map(|player| player.sessions.iter())
    }
}

pub struct RotationBuilder<'a> {
    team_table: &'a TeamTable,
    teams: Vec<TeamRotation>,
    team_index: HashMap<TeamId, usize>,
    player_index: HashMap<(TeamId, PlayerId), usize>,
}

impl<'a> RotationBuilder<'a> {
    pub fn new(team_table: &'a TeamTable) -> Self {
        Self {
            team_table,
            teams: Vec::new(),
            team_index: HashMap::new(),
            player_index: HashMap::new(),
        }
    }

    pub fn push(&mut self, session: Session) {
        let team_slot = self.team_slot(session.team_id);
        let team = &mut self.teams[team_slot];

        let key = (session.team_id, session.player_id);
        let player_slot = *self.player_index.entry(key).or_insert_with(|| {
            team.players.push(PlayerRotation {
                player_id: session.player_id,
                sessions: Vec::new(),
            });
            team.players.len() - 1
        });

        team.players[player_slot].sessions.push(session);
    }

    pub fn finish(self) -> Rotation {
        let rotation = Rotation { teams: self.teams };
        debug!(
            teams = rotation.teams.len(),
            players = rotation.player_count(),
            "grouped rotation"
        );
        rotation
    }

    fn team_slot(&mut self, team_id: TeamId) -> usize {
        if let Some(slot) = self.team_index.get(&team_id) {
            return *slot;
        }

        let descriptor = self.team_table.get(&team_id).cloned();
        if descriptor.is_none() {
            warn!(%team_id, "no team descriptor for team id");
        }
        self.teams.push(TeamRotation {
            team_id,
            descriptor,
            players: Vec::new(),
        });
        let slot = self.teams.len() - 1;
        self.team_index.insert(team_id, slot);
        slot
    }
}
