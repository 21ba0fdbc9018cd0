//! Session: the roster, histories, configuration and rounds of one matchmaking group.

use crate::models::game::MatchId;
use crate::models::history::RelationHistory;
use crate::models::player::{NewPlayer, Player, PlayerId, PlayerStats};
use crate::models::round::Round;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors that can occur during matchmaking operations.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionError {
    /// Fewer than 4 eligible players to form a match.
    InsufficientPlayers { available: usize },
    /// Optimizer was handed a pool that is not a multiple of 4. Internal invariant violation.
    InvalidPoolSize(usize),
    /// No match on this court in the current round.
    CourtNotFound(u32),
    /// No round has been generated yet.
    NoCurrentRound,
    /// The match on this court has no declared winner yet.
    MatchNotRecorded(u32),
    /// No match with this id in any round.
    MatchNotFound(MatchId),
    /// A result was already recorded for this match.
    MatchAlreadyRecorded(MatchId),
    /// Player not on the roster.
    PlayerNotFound(PlayerId),
    /// A player with this id already exists.
    DuplicatePlayerId(PlayerId),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InsufficientPlayers { available } => write!(
                f,
                "Not enough active players to form a match: need at least 4, have {}",
                available
            ),
            SessionError::InvalidPoolSize(n) => {
                write!(f, "Number of players must be divisible by 4 (got {})", n)
            }
            SessionError::CourtNotFound(court) => {
                write!(f, "Court {} not found in current round", court)
            }
            SessionError::NoCurrentRound => write!(f, "No current round"),
            SessionError::MatchNotRecorded(court) => write!(
                f,
                "Match on court {} has not been recorded yet",
                court
            ),
            SessionError::MatchNotFound(id) => write!(f, "Match with id {} not found", id),
            SessionError::MatchAlreadyRecorded(id) => {
                write!(f, "Match {} already has a result", id)
            }
            SessionError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
            SessionError::DuplicatePlayerId(id) => {
                write!(f, "A player with id {} already exists", id)
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Courts and search randomness for a session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Number of parallel courts. Not clamped; callers keep it >= 1.
    pub courts: u32,
    /// 0 = deterministic-ish search, 1 = maximum variety. Always within [0, 1].
    pub randomness_level: f64,
}

impl Configuration {
    pub fn new(courts: u32, randomness_level: f64) -> Self {
        Self {
            courts,
            randomness_level: clamp_randomness(randomness_level),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            courts: 1,
            randomness_level: 0.5,
        }
    }
}

pub(crate) fn clamp_randomness(level: f64) -> f64 {
    if level.is_nan() {
        return Configuration::default().randomness_level;
    }
    level.clamp(0.0, 1.0)
}

/// Full matchmaking state for one group: players, histories, configuration and rounds.
///
/// Every operation takes `&mut self`, so one session has exactly one writer at a time.
/// Share it across threads through [`crate::SessionRegistry`].
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub(crate) players: Vec<Player>,
    pub(crate) current_round: u32,
    pub(crate) configuration: Configuration,
    pub(crate) partnerships: RelationHistory,
    pub(crate) oppositions: RelationHistory,
    pub(crate) rounds: Vec<Round>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl Session {
    /// Create an empty session.
    pub fn new(configuration: Configuration) -> Self {
        Self {
            players: Vec::new(),
            current_round: 0,
            configuration: Configuration::new(
                configuration.courts,
                configuration.randomness_level,
            ),
            partnerships: RelationHistory::new(),
            oppositions: RelationHistory::new(),
            rounds: Vec::new(),
        }
    }

    /// Add a player and return its id.
    ///
    /// Without imported stats the player starts at the roster's (rounded) average
    /// `games_played`, so late arrivals do not jump the fairness queue.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        options: NewPlayer,
    ) -> Result<PlayerId, SessionError> {
        let mut player = match &options.id {
            Some(id) => {
                if self.player(id).is_some() {
                    return Err(SessionError::DuplicatePlayerId(id.clone()));
                }
                Player::with_id(id.clone(), name)
            }
            None => Player::new(name),
        };

        if options.has_imported_stats() {
            player.elo = options.elo.unwrap_or(player.elo);
            player.wins = options.wins.unwrap_or(0);
            player.losses = options.losses.unwrap_or(0);
        } else {
            player.games_played = self.average_games_played();
        }

        let id = player.id.clone();
        self.partnerships.ensure_player(&id);
        self.oppositions.ensure_player(&id);
        log::debug!(
            "added player {} ({}) starting at {} games",
            player.name,
            id,
            player.games_played
        );
        self.players.push(player);
        Ok(id)
    }

    fn average_games_played(&self) -> u32 {
        if self.players.is_empty() {
            return 0;
        }
        let total: u64 = self.players.iter().map(|p| u64::from(p.games_played)).sum();
        (total as f64 / self.players.len() as f64).round() as u32
    }

    /// Remove a player and scrub it from both histories. Returns false if unknown.
    pub fn remove_player(&mut self, player_id: &str) -> bool {
        let Some(idx) = self.players.iter().position(|p| p.id == player_id) else {
            return false;
        };
        self.players.remove(idx);
        self.partnerships.forget_player(player_id);
        self.oppositions.forget_player(player_id);
        true
    }

    /// Remove every player along with all history.
    pub fn clear_players(&mut self) {
        self.players.clear();
        self.partnerships.clear();
        self.oppositions.clear();
    }

    /// Flip the present-today flag. Returns false if unknown.
    pub fn toggle_active(&mut self, player_id: &str) -> bool {
        match self.player_mut(player_id) {
            Some(p) => {
                p.active = !p.active;
                true
            }
            None => false,
        }
    }

    /// All players in roster (insertion) order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.active)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Set the court count and, optionally, the randomness level (clamped to [0, 1]).
    pub fn update_configuration(&mut self, courts: u32, randomness_level: Option<f64>) {
        self.configuration.courts = courts;
        if let Some(level) = randomness_level {
            self.configuration.randomness_level = clamp_randomness(level);
        }
    }

    pub fn configuration(&self) -> Configuration {
        self.configuration
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Number of rounds generated so far.
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// The open (last) round, if any.
    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn partnerships(&self) -> &RelationHistory {
        &self.partnerships
    }

    pub fn oppositions(&self) -> &RelationHistory {
        &self.oppositions
    }

    /// Per-player games, record, rating, partners and opponents.
    pub fn player_stats(&self) -> BTreeMap<PlayerId, PlayerStats> {
        self.players
            .iter()
            .map(|p| {
                let stats = PlayerStats {
                    games_played: p.games_played,
                    wins: p.wins,
                    losses: p.losses,
                    elo: p.elo,
                    partners: self.partnerships.related(&p.id),
                    opponents: self.oppositions.related(&p.id),
                };
                (p.id.clone(), stats)
            })
            .collect()
    }
}
