//! CSV roster import: `name` plus optional `id`, `elo`, `wins`, `losses` columns.

use crate::models::{NewPlayer, PlayerId, Session, SessionError};
use serde::Deserialize;
use std::collections::HashSet;
use std::io;

/// One roster row.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub elo: Option<i32>,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
}

impl RosterEntry {
    pub fn options(&self) -> NewPlayer {
        NewPlayer {
            id: self.id.clone().filter(|id| !id.is_empty()),
            elo: self.elo,
            wins: self.wins,
            losses: self.losses,
        }
    }
}

#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    Session(SessionError),
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Invalid roster CSV: {}", e),
            RosterError::Session(e) => write!(f, "Could not add roster player: {}", e),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

impl From<SessionError> for RosterError {
    fn from(e: SessionError) -> Self {
        RosterError::Session(e)
    }
}

/// Parse roster rows (header required, fields trimmed).
pub fn read_roster<R: io::Read>(reader: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    rdr.deserialize().collect()
}

/// Add every roster row to the session. Rows with a blank name are skipped.
///
/// All explicit ids are checked first, so a duplicate (within the file or against the
/// session) fails the import before any player is added.
pub fn import_roster<R: io::Read>(
    session: &mut Session,
    reader: R,
) -> Result<Vec<PlayerId>, RosterError> {
    let entries: Vec<RosterEntry> = read_roster(reader)?
        .into_iter()
        .filter(|entry| {
            if entry.name.is_empty() {
                log::warn!("skipping roster row with no name");
            }
            !entry.name.is_empty()
        })
        .collect();

    let mut seen = HashSet::new();
    for id in entries.iter().filter_map(|e| e.options().id) {
        if session.player(&id).is_some() || !seen.insert(id.clone()) {
            return Err(SessionError::DuplicatePlayerId(id).into());
        }
    }

    let mut ids = Vec::with_capacity(entries.len());
    for entry in entries {
        let options = entry.options();
        ids.push(session.add_player(entry.name, options)?);
    }
    log::info!("imported {} player(s) from roster", ids.len());
    Ok(ids)
}
