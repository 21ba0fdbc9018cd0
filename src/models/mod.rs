//! Data structures for doubles matchmaking: players, matches, rounds, history and session state.

mod compat;
mod game;
mod history;
mod player;
mod round;
mod session;
mod snapshot;

pub use game::{generate_match_id, Match, MatchId, Team};
pub use history::RelationHistory;
pub use player::{generate_player_id, NewPlayer, Player, PlayerId, PlayerStats, DEFAULT_ELO};
pub use round::Round;
pub use session::{Configuration, Session, SessionError};
pub use snapshot::SessionSnapshot;
