//! Match (game) and Team for 2v2 court assignments.

use crate::models::compat;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = String;

/// Generate a fresh match id.
pub fn generate_match_id() -> MatchId {
    format!("match_{}", Uuid::new_v4().simple())
}

/// Which team won the match. Serialized as 1 or 2.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    pub fn number(self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

impl Serialize for Team {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Team {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Numbers are the stored form; names are still accepted on input.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u8),
            Name(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Number(1) => Ok(Team::One),
            Repr::Number(2) => Ok(Team::Two),
            Repr::Name(name) if name == "one" => Ok(Team::One),
            Repr::Name(name) if name == "two" => Ok(Team::Two),
            _ => Err(D::Error::custom("team must be 1 or 2")),
        }
    }
}

/// One court assignment: two teams of two distinct players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    /// 1-based court number.
    pub court: u32,
    #[serde(rename = "team1", deserialize_with = "compat::team")]
    pub team_1: [PlayerId; 2],
    #[serde(rename = "team2", deserialize_with = "compat::team")]
    pub team_2: [PlayerId; 2],
    /// None while the match is still scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// Set when the result is recorded. Stored as epoch milliseconds.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Match {
    pub fn new(court: u32, team_1: [PlayerId; 2], team_2: [PlayerId; 2]) -> Self {
        Self {
            id: generate_match_id(),
            court,
            team_1,
            team_2,
            winner: None,
            score: None,
            timestamp: None,
        }
    }

    /// All four players, team 1 first.
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.team_1.iter().chain(self.team_2.iter())
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.players().any(|p| p == player_id)
    }

    pub fn is_recorded(&self) -> bool {
        self.winner.is_some()
    }
}
