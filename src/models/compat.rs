//! Deserializers for player references in stored rounds.
//!
//! Older snapshots stored whole player objects in `team1`/`team2`, `playersPlaying` and
//! `playersSittingOut`. Only the `id` of such an object is kept.

use crate::models::player::PlayerId;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum PlayerRef {
    Id(PlayerId),
    Player { id: PlayerId },
}

impl PlayerRef {
    fn into_id(self) -> PlayerId {
        match self {
            PlayerRef::Id(id) | PlayerRef::Player { id } => id,
        }
    }
}

pub(crate) fn team<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[PlayerId; 2], D::Error> {
    let [a, b] = <[PlayerRef; 2]>::deserialize(deserializer)?;
    Ok([a.into_id(), b.into_id()])
}

pub(crate) fn player_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<PlayerId>, D::Error> {
    let refs = Vec::<PlayerRef>::deserialize(deserializer)?;
    Ok(refs.into_iter().map(PlayerRef::into_id).collect())
}
