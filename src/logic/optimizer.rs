//! Matchup optimizer: split a pool of players into 2v2 matches with the lowest undesirability.
//!
//! Score of a candidate split (lower is better):
//! - +100 for each team whose two players have partnered before
//! - +20 for each cross-team pair that has faced each other before
//! - +10 x population variance of the four players' games played
//! - +0.1 x |average elo team 1 - average elo team 2|

use crate::models::{Match, Player, PlayerId, Session, SessionError};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

pub const PARTNER_REPEAT_PENALTY: f64 = 100.0;
pub const OPPONENT_REPEAT_PENALTY: f64 = 20.0;
pub const GAMES_VARIANCE_WEIGHT: f64 = 10.0;
pub const ELO_GAP_WEIGHT: f64 = 0.1;

/// Search attempts at randomness 0 and at randomness 1.
pub const MIN_ATTEMPTS: usize = 5;
pub const MAX_ATTEMPTS: usize = 20;

/// 4-player groups evaluated per court in one attempt.
pub const COMBINATIONS_PER_COURT: usize = 50;

/// Above this many 4-player groups we sample instead of enumerating.
const FULL_ENUMERATION_LIMIT: usize = 5_000;

/// The three ways to split four slots into two teams of two.
const TEAM_SPLITS: [([usize; 2], [usize; 2]); 3] = [
    ([0, 1], [2, 3]),
    ([0, 2], [1, 3]),
    ([0, 3], [1, 2]),
];

/// A scored 2v2 candidate, borrowing players from the session.
#[derive(Clone, Copy, Debug)]
struct Candidate<'a> {
    team_1: [&'a Player; 2],
    team_2: [&'a Player; 2],
    score: f64,
}

impl<'a> Candidate<'a> {
    fn into_match(self, court: u32) -> Match {
        Match::new(
            court,
            [self.team_1[0].id.clone(), self.team_1[1].id.clone()],
            [self.team_2[0].id.clone(), self.team_2[1].id.clone()],
        )
    }
}

/// Undesirability of putting `team_1` against `team_2` given the session's history.
pub fn matchup_score(session: &Session, team_1: [&Player; 2], team_2: [&Player; 2]) -> f64 {
    let mut score = 0.0;

    if session.partnerships.contains(&team_1[0].id, &team_1[1].id) {
        score += PARTNER_REPEAT_PENALTY;
    }
    if session.partnerships.contains(&team_2[0].id, &team_2[1].id) {
        score += PARTNER_REPEAT_PENALTY;
    }

    for a in team_1 {
        for b in team_2 {
            if session.oppositions.contains(&a.id, &b.id) {
                score += OPPONENT_REPEAT_PENALTY;
            }
        }
    }

    let games = [
        team_1[0].games_played,
        team_1[1].games_played,
        team_2[0].games_played,
        team_2[1].games_played,
    ];
    score += population_variance(&games) * GAMES_VARIANCE_WEIGHT;

    let elo_1 = f64::from(team_1[0].elo + team_1[1].elo) / 2.0;
    let elo_2 = f64::from(team_2[0].elo + team_2[1].elo) / 2.0;
    score += (elo_1 - elo_2).abs() * ELO_GAP_WEIGHT;

    score
}

fn population_variance(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    values
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n
}

/// Independent search attempts for a randomness level in [0, 1].
pub fn attempt_count(randomness_level: f64) -> usize {
    let span = (MAX_ATTEMPTS - MIN_ATTEMPTS) as f64;
    MIN_ATTEMPTS + (randomness_level.clamp(0.0, 1.0) * span).floor() as usize
}

/// Random perturbation added to a candidate's score during search.
fn jitter<R: Rng + ?Sized>(score: f64, randomness_level: f64, rng: &mut R) -> f64 {
    (rng.gen::<f64>() - 0.5) * (score * randomness_level + 1.0)
}

/// Number of 4-player groups in a pool of `n`; saturates at `usize::MAX`.
fn choose_four(n: usize) -> usize {
    if n < 4 {
        return 0;
    }
    n.checked_mul(n - 1)
        .and_then(|x| x.checked_mul(n - 2))
        .and_then(|x| x.checked_mul(n - 3))
        .map_or(usize::MAX, |x| x / 24)
}

/// Index quadruples into a pool of `n`, at most [`COMBINATIONS_PER_COURT`] of them, in random
/// order.
fn candidate_groups<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<[usize; 4]> {
    let total = choose_four(n);
    if total == 0 {
        return Vec::new();
    }

    if total > FULL_ENUMERATION_LIMIT {
        return (0..COMBINATIONS_PER_COURT)
            .map(|_| {
                let picked = index::sample(rng, n, 4).into_vec();
                [picked[0], picked[1], picked[2], picked[3]]
            })
            .collect();
    }

    let mut groups = Vec::with_capacity(total);
    for a in 0..n {
        for b in a + 1..n {
            for c in b + 1..n {
                for d in c + 1..n {
                    groups.push([a, b, c, d]);
                }
            }
        }
    }
    groups.shuffle(rng);
    groups.truncate(COMBINATIONS_PER_COURT);
    groups
}

fn all_distinct(players: [&Player; 4]) -> bool {
    (0..4).all(|i| (i + 1..4).all(|j| players[i].id != players[j].id))
}

/// Best split of four players by plain (unjittered) score. None if the four are not distinct.
fn best_split<'a>(session: &Session, four: [&'a Player; 4]) -> Option<Candidate<'a>> {
    if !all_distinct(four) {
        return None;
    }
    TEAM_SPLITS
        .iter()
        .map(|(t1, t2)| {
            let team_1 = [four[t1[0]], four[t1[1]]];
            let team_2 = [four[t2[0]], four[t2[1]]];
            Candidate {
                team_1,
                team_2,
                score: matchup_score(session, team_1, team_2),
            }
        })
        .min_by(|a, b| a.score.total_cmp(&b.score))
}

/// One greedy pass: fill courts in order, each from whatever is left in the pool.
fn run_attempt<'a, R: Rng + ?Sized>(
    session: &Session,
    pool: &[&'a Player],
    num_matches: usize,
    rng: &mut R,
) -> Vec<Candidate<'a>> {
    let level = session.configuration.randomness_level;
    let mut available: Vec<&Player> = pool.to_vec();
    let mut chosen = Vec::with_capacity(num_matches);

    for _ in 0..num_matches {
        let mut best: Option<(f64, Candidate<'a>, [usize; 4])> = None;

        for group in candidate_groups(available.len(), rng) {
            let four = group.map(|i| available[i]);
            if !all_distinct(four) {
                continue;
            }
            let mut splits = TEAM_SPLITS;
            splits.shuffle(rng);
            for (t1, t2) in splits {
                let team_1 = [four[t1[0]], four[t1[1]]];
                let team_2 = [four[t2[0]], four[t2[1]]];
                let score = matchup_score(session, team_1, team_2);
                let jittered = score + jitter(score, level, rng);
                if best.as_ref().map_or(true, |(b, _, _)| jittered < *b) {
                    best = Some((
                        jittered,
                        Candidate {
                            team_1,
                            team_2,
                            score,
                        },
                        group,
                    ));
                }
            }
        }

        let Some((_, candidate, mut group)) = best else {
            break;
        };
        chosen.push(candidate);
        group.sort_unstable_by(|a, b| b.cmp(a));
        for i in group {
            available.remove(i);
        }
    }

    chosen
}

fn resolve<'a>(session: &'a Session, ids: &[PlayerId]) -> Result<Vec<&'a Player>, SessionError> {
    ids.iter()
        .map(|id| {
            session
                .player(id)
                .ok_or_else(|| SessionError::PlayerNotFound(id.clone()))
        })
        .collect()
}

/// Build one match per court from `pool` (a multiple of 4), minimizing total undesirability.
///
/// Runs [`attempt_count`] independent randomized greedy passes and keeps the one with the
/// lowest sum of unjittered scores. Courts are numbered from 1 in fill order.
pub fn find_best_matches<R: Rng + ?Sized>(
    session: &Session,
    pool: &[PlayerId],
    rng: &mut R,
) -> Result<Vec<Match>, SessionError> {
    if pool.len() % 4 != 0 {
        return Err(SessionError::InvalidPoolSize(pool.len()));
    }
    let players = resolve(session, pool)?;
    let num_matches = (session.configuration.courts as usize).min(players.len() / 4);
    let attempts = attempt_count(session.configuration.randomness_level);

    let mut best: Option<(f64, Vec<Candidate<'_>>)> = None;
    for attempt in 0..attempts {
        let candidates = run_attempt(session, &players, num_matches, rng);
        let total: f64 = candidates.iter().map(|c| c.score).sum();
        log::debug!("attempt {}: total score {:.2}", attempt, total);
        if best.as_ref().map_or(true, |(b, _)| total < *b) {
            best = Some((total, candidates));
        }
    }

    let matches = best
        .map(|(_, candidates)| {
            candidates
                .into_iter()
                .zip(1u32..)
                .map(|(c, court)| c.into_match(court))
                .collect()
        })
        .unwrap_or_default();
    Ok(matches)
}

/// Pick a replacement match for `court` from `candidates` (preference order).
///
/// The four highest-priority candidates (fewer games, then longer rest; a stable sort keeps
/// the given order among ties) are split into the lowest-scoring pair of teams.
/// Returns `Ok(None)` when fewer than four candidates are available.
pub fn best_single_match(
    session: &Session,
    candidates: &[PlayerId],
    court: u32,
) -> Result<Option<Match>, SessionError> {
    let mut players = resolve(session, candidates)?;
    let mut seen = HashSet::new();
    players.retain(|p| seen.insert(p.id.clone()));
    if players.len() < 4 {
        return Ok(None);
    }
    players.sort_by_key(|p| (p.games_played, std::cmp::Reverse(p.rest_rounds)));

    let four = [players[0], players[1], players[2], players[3]];
    Ok(best_split(session, four).map(|c| c.into_match(court)))
}
