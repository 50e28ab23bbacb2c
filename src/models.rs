use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Game-clock ticks are tenths of a second.
pub const TICKS_PER_MINUTE: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TeamId(pub u64);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One contiguous on-court interval, as it appears in the rotation feed.
///
/// `in_time` and `out_time` count down within the period, so `in_time >= out_time`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Session {
    pub team_id: TeamId,
    #[serde(rename = "PERSON_ID")]
    pub player_id: PlayerId,
    pub period: u32,
    pub in_time: f64,
    pub out_time: f64,
    pub pt_diff: f64,
    pub player_pts: f64,
    pub usg_pct: f64,
}

impl Session {
    pub fn duration_ticks(&self) -> f64 {
        self.in_time - self.out_time
    }

    pub fn minutes(&self) -> f64 {
        self.duration_ticks() / TICKS_PER_MINUTE
    }

    pub fn stat(&self, stat: Stat) -> f64 {
        match stat {
            Stat::PlayerPts => self.player_pts,
            Stat::PtDiff => self.pt_diff,
            Stat::UsgPct => self.usg_pct,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotationFeed {
    pub rows: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSpan {
    pub period: u32,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub text: Option<String>,
}

impl PeriodSpan {
    pub fn length(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxScore {
    pub game_id: String,
    #[serde(default)]
    pub game_date: Option<NaiveDate>,
    pub periods: Vec<PeriodSpan>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDescriptor {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub tricode: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
}

impl TeamDescriptor {
    pub fn full_name(&self) -> String {
        match &self.city {
            Some(city) => format!("{} {}", city, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
}

/// Statistic that drives bar color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Stat {
    #[default]
    PlayerPts,
    PtDiff,
    UsgPct,
}

impl Stat {
    pub fn domain(self) -> (f64, f64) {
        match self {
            Stat::PlayerPts | Stat::PtDiff => (0.0, 20.0),
            Stat::UsgPct => (0.0, 1.0),
        }
    }

    pub fn feed_key(self) -> &'static str {
        match self {
            Stat::PlayerPts => "PLAYER_PTS",
            Stat::PtDiff => "PT_DIFF",
            Stat::UsgPct => "USG_PCT",
        }
    }
}
