//! Round: one synchronized generation of matches across the courts.

use crate::models::compat;
use crate::models::game::Match;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    /// 1-based, increases by one per generated round.
    pub round_number: u32,
    /// Live matches, ordered by court.
    pub matches: Vec<Match>,
    #[serde(deserialize_with = "compat::player_list")]
    pub players_playing: Vec<PlayerId>,
    #[serde(deserialize_with = "compat::player_list")]
    pub players_sitting_out: Vec<PlayerId>,
    /// Matches taken off their court once finished, in finishing order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed_matches: Vec<Match>,
}

impl Round {
    pub fn match_on_court(&self, court: u32) -> Option<&Match> {
        self.matches.iter().find(|m| m.court == court)
    }

    /// Live or completed match by id.
    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.matches
            .iter()
            .chain(self.completed_matches.iter())
            .find(|m| m.id == match_id)
    }

    pub fn find_match_mut(&mut self, match_id: &str) -> Option<&mut Match> {
        self.matches
            .iter_mut()
            .chain(self.completed_matches.iter_mut())
            .find(|m| m.id == match_id)
    }

    /// Put a replacement match on court and move its players from sitting to playing.
    /// `matches` stays ordered by court.
    pub fn add_replacement(&mut self, replacement: Match) {
        for id in replacement.players() {
            self.players_sitting_out.retain(|p| p != id);
            if !self.players_playing.contains(id) {
                self.players_playing.push(id.clone());
            }
        }
        let pos = self
            .matches
            .partition_point(|m| m.court <= replacement.court);
        self.matches.insert(pos, replacement);
    }

    /// True if the player is on a live match of this round.
    pub fn is_on_court(&self, player_id: &str) -> bool {
        self.matches.iter().any(|m| m.involves(player_id))
    }
}
