//! Doubles matchmaking engine: library with models, matchmaking logic, reports and a session
//! registry.

pub mod logic;
pub mod models;
pub mod registry;
pub mod report;
pub mod roster;

pub use logic::{
    finish_court_and_generate_new, generate_next_round, record_match_result, reset, reset_game,
};
pub use models::{
    Configuration, Match, MatchId, NewPlayer, Player, PlayerId, PlayerStats, RelationHistory,
    Round, Session, SessionError, SessionSnapshot, Team, DEFAULT_ELO,
};
pub use registry::{RegistryError, SessionId, SessionRegistry};
pub use report::{export_session, GameShare, LeaderboardEntry, SessionSummary};
pub use roster::{import_roster, read_roster, RosterEntry, RosterError};
