//! Round scheduling: who plays this round and who sits out.

use crate::models::{PlayerId, Session, SessionError};
use rand::Rng;

/// Players chosen for a round, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub playing: Vec<PlayerId>,
    pub sitting: Vec<PlayerId>,
}

/// Players that fit on `courts` courts given `active` players: whole matches only.
pub fn players_per_round(courts: u32, active: usize) -> usize {
    let possible_matches = active / 4;
    (courts as usize).min(possible_matches) * 4
}

/// Players the next round will seat, or `InsufficientPlayers` if not even one match fits.
pub fn round_capacity(session: &Session) -> Result<usize, SessionError> {
    let active = session.active_players().count();
    if active < 4 {
        return Err(SessionError::InsufficientPlayers { available: active });
    }
    let capacity = players_per_round(session.configuration.courts, active);
    if capacity < 4 {
        return Err(SessionError::InsufficientPlayers {
            available: capacity,
        });
    }
    Ok(capacity)
}

/// Recompute `rest_rounds` for every active player against the current round counter.
pub fn refresh_rest_rounds(session: &mut Session) {
    let current = session.current_round;
    for p in session.players.iter_mut().filter(|p| p.active) {
        p.refresh_rest_rounds(current);
    }
}

/// Select the players for the next round.
///
/// 1. Capacity is `min(courts, active / 4) * 4`; if everyone fits, nobody sits.
/// 2. Otherwise sort by (games played asc, rest rounds desc, last played round asc).
/// 3. Exact ties get a random tiebreak, so order is shuffled within a tie group only.
/// 4. The first `capacity` play, the rest sit out.
///
/// Call [`refresh_rest_rounds`] first.
pub fn select_players_for_round<R: Rng + ?Sized>(
    session: &Session,
    rng: &mut R,
) -> Result<Selection, SessionError> {
    let capacity = round_capacity(session)?;
    let active: Vec<_> = session.active_players().collect();

    let mut with_tiebreak: Vec<_> = active
        .into_iter()
        .map(|p| (p, rng.gen::<u64>()))
        .collect();
    with_tiebreak.sort_by_key(|(p, t)| (p.priority(), *t));

    let mut ordered: Vec<PlayerId> = with_tiebreak
        .into_iter()
        .map(|(p, _)| p.id.clone())
        .collect();
    let sitting = ordered.split_off(capacity.min(ordered.len()));

    log::debug!(
        "selected {} players to play, {} sitting out",
        ordered.len(),
        sitting.len()
    );

    Ok(Selection {
        playing: ordered,
        sitting,
    })
}
