//! Persistable snapshot of a session and the backfilling loader for older snapshots.

use crate::models::history::RelationHistory;
use crate::models::player::{Player, PlayerId};
use crate::models::round::Round;
use crate::models::session::{clamp_randomness, Configuration, Session};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_courts() -> u32 {
    Configuration::default().courts
}

fn default_randomness_level() -> f64 {
    Configuration::default().randomness_level
}

/// Everything needed to restore a session. Field names are camelCase.
///
/// Every field is optional on input: missing player stats fall back to their defaults
/// (see [`Player`]) and missing history entries load as empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default)]
    pub players: Vec<(PlayerId, Player)>,
    #[serde(default)]
    pub current_round: u32,
    #[serde(default = "default_courts")]
    pub courts: u32,
    #[serde(default = "default_randomness_level")]
    pub randomness_level: f64,
    #[serde(default)]
    pub partnership_history: BTreeMap<PlayerId, Vec<PlayerId>>,
    #[serde(default)]
    pub opposition_history: BTreeMap<PlayerId, Vec<PlayerId>>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

impl Session {
    /// Capture the full state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            players: self
                .players
                .iter()
                .map(|p| (p.id.clone(), p.clone()))
                .collect(),
            current_round: self.current_round,
            courts: self.configuration.courts,
            randomness_level: self.configuration.randomness_level,
            partnership_history: self.partnerships.to_lists(),
            opposition_history: self.oppositions.to_lists(),
            rounds: self.rounds.clone(),
        }
    }

    /// Rebuild a session, giving every player a history entry.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let mut partnerships = RelationHistory::from_lists(&snapshot.partnership_history);
        let mut oppositions = RelationHistory::from_lists(&snapshot.opposition_history);

        let players: Vec<Player> = snapshot
            .players
            .into_iter()
            .map(|(id, mut player)| {
                if player.id != id {
                    log::warn!(
                        "snapshot entry {} carries player id {}; using the entry key",
                        id,
                        player.id
                    );
                    player.id = id;
                }
                partnerships.ensure_player(&player.id);
                oppositions.ensure_player(&player.id);
                player
            })
            .collect();

        Self {
            players,
            current_round: snapshot.current_round,
            configuration: Configuration {
                courts: snapshot.courts,
                randomness_level: clamp_randomness(snapshot.randomness_level),
            },
            partnerships,
            oppositions,
            rounds: snapshot.rounds,
        }
    }

    /// Snapshot as JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    /// Restore from JSON text produced by [`Session::to_json`] or an older writer.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let snapshot: SessionSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }
}
