//! Player, PlayerStats and the options used when adding a player.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches, rounds and history lookups).
pub type PlayerId = String;

/// Rating every player starts from.
pub const DEFAULT_ELO: i32 = 1200;

fn default_elo() -> i32 {
    DEFAULT_ELO
}

fn default_active() -> bool {
    true
}

fn default_last_played_round() -> i64 {
    -1
}

/// A player on the roster.
///
/// `games_played` only moves when a result is recorded, never when a round is generated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub games_played: u32,
    /// Round counter value when this player last had a result recorded; -1 if never.
    #[serde(default = "default_last_played_round")]
    pub last_played_round: i64,
    /// Rounds since last played, refreshed before every selection.
    #[serde(default)]
    pub rest_rounds: u32,
    #[serde(default = "default_elo")]
    pub elo: i32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    /// Present today. Inactive players keep their history but are never selected.
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Player {
    /// Create a new player with a generated id. Counters start at zero, rating at [`DEFAULT_ELO`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(generate_player_id(), name)
    }

    /// Create a new player with a caller-chosen id (e.g. an external profile id).
    pub fn with_id(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            games_played: 0,
            last_played_round: -1,
            rest_rounds: 0,
            elo: DEFAULT_ELO,
            wins: 0,
            losses: 0,
            active: true,
        }
    }

    /// Fairness key used by the scheduler: fewer games, then longer rest, then longer idle.
    pub fn priority(&self) -> (u32, std::cmp::Reverse<u32>, i64) {
        (
            self.games_played,
            std::cmp::Reverse(self.rest_rounds),
            self.last_played_round,
        )
    }

    /// Recompute `rest_rounds` against the session's round counter.
    pub fn refresh_rest_rounds(&mut self, current_round: u32) {
        let gap = i64::from(current_round) - self.last_played_round - 1;
        self.rest_rounds = if gap > 0 { gap as u32 } else { 0 };
    }

    /// Record that this player finished a match during `round`.
    pub fn record_played(&mut self, round: u32) {
        self.games_played += 1;
        self.last_played_round = i64::from(round);
        self.rest_rounds = 0;
    }

    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    /// Zero the session counters (games, last played, rest).
    pub fn clear_session_counters(&mut self) {
        self.games_played = 0;
        self.last_played_round = -1;
        self.rest_rounds = 0;
    }

    /// Zero the season stats (rating back to default, no wins or losses).
    pub fn clear_season_stats(&mut self) {
        self.elo = DEFAULT_ELO;
        self.wins = 0;
        self.losses = 0;
    }
}

/// Optional identity and imported stats for [`crate::Session::add_player`].
///
/// A player with no imported stats inherits the roster's average `games_played`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub id: Option<PlayerId>,
    pub elo: Option<i32>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}

impl NewPlayer {
    pub fn has_imported_stats(&self) -> bool {
        self.elo.is_some() || self.wins.is_some() || self.losses.is_some()
    }
}

/// Statistics view of a player (games plus who they have partnered and faced).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub elo: i32,
    /// Sorted ids of everyone this player has teamed with.
    pub partners: Vec<PlayerId>,
    /// Sorted ids of everyone this player has faced.
    pub opponents: Vec<PlayerId>,
}

/// Fresh unique player id.
pub fn generate_player_id() -> PlayerId {
    format!("player_{}", Uuid::new_v4().simple())
}
