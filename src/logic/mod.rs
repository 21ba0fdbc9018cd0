//! Matchmaking logic: scheduling, matchup search, results and the round lifecycle.

mod lifecycle;
pub mod optimizer;
mod rating;
pub mod scheduler;

pub use lifecycle::{finish_court_and_generate_new, generate_next_round, reset, reset_game};
pub use optimizer::{attempt_count, best_single_match, find_best_matches, matchup_score};
pub use rating::{expected_score, rating_delta, record_match_result, K_FACTOR};
pub use scheduler::{
    players_per_round, refresh_rest_rounds, round_capacity, select_players_for_round, Selection,
};
