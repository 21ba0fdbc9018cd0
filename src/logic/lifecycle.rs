//! Round and court lifecycle: generate rounds, free finished courts, reset.

use crate::logic::optimizer::{best_single_match, find_best_matches};
use crate::logic::scheduler::{refresh_rest_rounds, round_capacity, select_players_for_round};
use crate::models::{PlayerId, Round, Session, SessionError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Generate and append the next round.
///
/// Fails without touching the session when fewer than four players can be seated.
///
/// 1. Refresh rest rounds for active players.
/// 2. Select who plays and who sits out.
/// 3. Build one match per court from the playing pool.
/// 4. Append the round and advance the round counter.
///
/// Player counters are not touched here; they move when results are recorded.
pub fn generate_next_round<'a, R: Rng + ?Sized>(
    session: &'a mut Session,
    rng: &mut R,
) -> Result<&'a Round, SessionError> {
    round_capacity(session)?;
    refresh_rest_rounds(session);
    let selection = select_players_for_round(session, rng)?;

    let matches = find_best_matches(session, &selection.playing, rng)?;

    let round = Round {
        round_number: session.current_round + 1,
        matches,
        players_playing: selection.playing,
        players_sitting_out: selection.sitting,
        completed_matches: Vec::new(),
    };
    log::info!(
        "round {}: {} match(es), {} sitting out",
        round.round_number,
        round.matches.len(),
        round.players_sitting_out.len()
    );
    session.rounds.push(round);
    session.current_round += 1;

    session
        .rounds
        .last()
        .ok_or(SessionError::NoCurrentRound)
}

/// Free `court` in the current round after its result has been recorded.
///
/// The finished match moves to the round's completed list. If that was the last live
/// match, a whole new round is generated; when that is impossible the call fails and the
/// match stays on court. Otherwise a replacement match for the same court is built from
/// the players who just finished (shuffled) followed by every other active player not on
/// a court (shuffled). With fewer than four such players the court stays empty for the
/// rest of the round.
pub fn finish_court_and_generate_new<'a, R: Rng + ?Sized>(
    session: &'a mut Session,
    court: u32,
    rng: &mut R,
) -> Result<&'a Round, SessionError> {
    let round = session.rounds.last().ok_or(SessionError::NoCurrentRound)?;
    let idx = round
        .matches
        .iter()
        .position(|m| m.court == court)
        .ok_or(SessionError::CourtNotFound(court))?;
    if !round.matches[idx].is_recorded() {
        return Err(SessionError::MatchNotRecorded(court));
    }
    if round.matches.len() == 1 {
        round_capacity(session)?;
    }

    let Some(round) = session.rounds.last_mut() else {
        return Err(SessionError::NoCurrentRound);
    };
    let finished = round.matches.remove(idx);
    let just_finished: Vec<PlayerId> = finished.players().cloned().collect();
    round.completed_matches.push(finished);

    if round.matches.is_empty() {
        log::info!("court {} was the last live match; generating next round", court);
        return generate_next_round(session, rng);
    }

    let candidates = replacement_candidates(session, just_finished, rng);
    let replacement = best_single_match(session, &candidates, court)?;

    let Some(round) = session.rounds.last_mut() else {
        return Err(SessionError::NoCurrentRound);
    };
    match replacement {
        Some(m) => {
            log::info!("court {}: replacement match {}", court, m.id);
            round.add_replacement(m);
        }
        None => log::warn!(
            "court {}: only {} player(s) free, leaving the court empty",
            court,
            candidates.len()
        ),
    }

    session
        .rounds
        .last()
        .ok_or(SessionError::NoCurrentRound)
}

/// Players who could take a freed court, in preference order: the four who just finished
/// first (if still active), then everyone else active and off court.
fn replacement_candidates<R: Rng + ?Sized>(
    session: &Session,
    mut just_finished: Vec<PlayerId>,
    rng: &mut R,
) -> Vec<PlayerId> {
    just_finished.retain(|id| session.player(id).is_some_and(|p| p.active));
    let finished: HashSet<PlayerId> = just_finished.iter().cloned().collect();

    let mut others: Vec<PlayerId> = session
        .active_players()
        .filter(|p| !finished.contains(&p.id))
        .filter(|p| !session.latest_round().is_some_and(|r| r.is_on_court(&p.id)))
        .map(|p| p.id.clone())
        .collect();

    just_finished.shuffle(rng);
    others.shuffle(rng);
    just_finished.extend(others);
    just_finished
}

/// Clear all rounds, history, session counters and season stats. Players and active flags stay.
pub fn reset(session: &mut Session) {
    session.current_round = 0;
    session.rounds.clear();
    for p in &mut session.players {
        p.clear_session_counters();
        p.clear_season_stats();
    }
    session.partnerships.clear_links();
    session.oppositions.clear_links();
    log::info!("session reset");
}

/// Clear rounds, history and session counters but keep elo, wins and losses.
pub fn reset_game(session: &mut Session) {
    session.current_round = 0;
    session.rounds.clear();
    for p in &mut session.players {
        p.clear_session_counters();
    }
    session.partnerships.clear_links();
    session.oppositions.clear_links();
    log::info!("game reset; ratings kept");
}
