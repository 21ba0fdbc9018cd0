//! Match results: Elo updates, win/loss counts, fairness counters and history.

use crate::models::{PlayerId, Session, SessionError, Team};
use chrono::{SubsecRound, Utc};

/// K-factor for Elo updates (higher = more volatile).
pub const K_FACTOR: f64 = 32.0;

/// Expected score of a side rated `rating` against a side rated `opponent` (logistic, 400 scale).
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Rounded rating change for a side that scored `actual` (1 win, 0 loss).
pub fn rating_delta(rating: f64, opponent: f64, actual: f64) -> i32 {
    (K_FACTOR * (actual - expected_score(rating, opponent))).round() as i32
}

fn team_average(session: &Session, team: &[PlayerId; 2]) -> Result<f64, SessionError> {
    let mut sum = 0.0;
    for id in team {
        let p = session
            .player(id)
            .ok_or_else(|| SessionError::PlayerNotFound(id.clone()))?;
        sum += f64::from(p.elo);
    }
    Ok(sum / 2.0)
}

/// Record the winner (and optional free-text score) of a generated match.
///
/// Ratings are read at recording time. Both players on a team get the same delta.
/// Every player gets +1 game, `last_played_round = current_round` and zero rest;
/// partnerships are linked within each team and oppositions across teams.
/// Nothing is changed if the match is unknown, already recorded, or involves a
/// player who has since been removed.
pub fn record_match_result(
    session: &mut Session,
    match_id: &str,
    winner: Team,
    score: Option<String>,
) -> Result<(), SessionError> {
    let m = session
        .rounds
        .iter()
        .find_map(|r| r.find_match(match_id))
        .ok_or_else(|| SessionError::MatchNotFound(match_id.to_string()))?;
    if m.is_recorded() {
        return Err(SessionError::MatchAlreadyRecorded(match_id.to_string()));
    }
    let team_1 = m.team_1.clone();
    let team_2 = m.team_2.clone();

    let elo_1 = team_average(session, &team_1)?;
    let elo_2 = team_average(session, &team_2)?;
    let (actual_1, actual_2) = match winner {
        Team::One => (1.0, 0.0),
        Team::Two => (0.0, 1.0),
    };
    let delta_1 = rating_delta(elo_1, elo_2, actual_1);
    let delta_2 = rating_delta(elo_2, elo_1, actual_2);

    let round = session.current_round;
    for (team, side, delta) in [(&team_1, Team::One, delta_1), (&team_2, Team::Two, delta_2)] {
        for id in team {
            let p = session
                .player_mut(id)
                .ok_or_else(|| SessionError::PlayerNotFound(id.clone()))?;
            p.elo += delta;
            if side == winner {
                p.add_win();
            } else {
                p.add_loss();
            }
            p.record_played(round);
        }
    }

    session.partnerships.link(&team_1[0], &team_1[1]);
    session.partnerships.link(&team_2[0], &team_2[1]);
    for a in &team_1 {
        for b in &team_2 {
            session.oppositions.link(a, b);
        }
    }

    if let Some(m) = session
        .rounds
        .iter_mut()
        .find_map(|r| r.find_match_mut(match_id))
    {
        m.winner = Some(winner);
        m.score = score;
        // Millisecond precision, matching the stored form.
        m.timestamp = Some(Utc::now().trunc_subsecs(3));
    }

    log::info!(
        "recorded match {}: team {:?} won ({:+} / {:+})",
        match_id,
        winner,
        delta_1,
        delta_2
    );
    Ok(())
}
