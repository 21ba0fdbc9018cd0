//! Session reports: summary statistics, the rating leaderboard and CSV export.

use crate::models::{Match, PlayerId, Session};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;

/// Games and rest for one player, in roster order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameShare {
    pub name: String,
    pub games_played: u32,
    pub rest_rounds: u32,
}

/// Aggregate statistics for a session.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_players: usize,
    pub total_rounds: usize,
    /// Every generated match, live or completed.
    pub total_games: usize,
    /// Rounded to two decimals.
    pub average_games_per_player: f64,
    pub game_distribution: Vec<GameShare>,
    /// Generated matches per partner pair, keyed `"a-b"` with the ids sorted.
    pub partnership_counts: BTreeMap<String, u32>,
    /// Generated matches per opposing pair, keyed like `partnership_counts`.
    pub opposition_counts: BTreeMap<String, u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based.
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub elo: i32,
    pub wins: u32,
    pub losses: u32,
    /// Whole percent; 0 before the first result.
    pub win_rate: u32,
}

fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}-{}", a, b)
    } else {
        format!("{}-{}", b, a)
    }
}

impl Session {
    fn all_matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds
            .iter()
            .flat_map(|r| r.completed_matches.iter().chain(r.matches.iter()))
    }

    /// Totals, game distribution and pair counts over every generated match.
    pub fn summary(&self) -> SessionSummary {
        let mut partnership_counts = BTreeMap::new();
        let mut opposition_counts = BTreeMap::new();
        for m in self.all_matches() {
            for team in [&m.team_1, &m.team_2] {
                *partnership_counts
                    .entry(pair_key(&team[0], &team[1]))
                    .or_insert(0) += 1;
            }
            for a in &m.team_1 {
                for b in &m.team_2 {
                    *opposition_counts.entry(pair_key(a, b)).or_insert(0) += 1;
                }
            }
        }

        let average_games_per_player = if self.players.is_empty() {
            0.0
        } else {
            let total: u64 = self.players.iter().map(|p| u64::from(p.games_played)).sum();
            (total as f64 / self.players.len() as f64 * 100.0).round() / 100.0
        };

        SessionSummary {
            total_players: self.players.len(),
            total_rounds: self.rounds.len(),
            total_games: self.all_matches().count(),
            average_games_per_player,
            game_distribution: self
                .players
                .iter()
                .map(|p| GameShare {
                    name: p.name.clone(),
                    games_played: p.games_played,
                    rest_rounds: p.rest_rounds,
                })
                .collect(),
            partnership_counts,
            opposition_counts,
        }
    }

    /// Players by rating, highest first. Equal ratings keep roster order.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut players: Vec<_> = self.players.iter().collect();
        players.sort_by(|a, b| b.elo.cmp(&a.elo));
        players
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let total = p.wins + p.losses;
                let win_rate = if total > 0 {
                    (f64::from(p.wins) / f64::from(total) * 100.0).round() as u32
                } else {
                    0
                };
                LeaderboardEntry {
                    rank: i + 1,
                    id: p.id.clone(),
                    name: p.name.clone(),
                    elo: p.elo,
                    wins: p.wins,
                    losses: p.losses,
                    win_rate,
                }
            })
            .collect()
    }

    fn team_names(&self, team: &[PlayerId; 2]) -> String {
        team.iter()
            .map(|id| self.player(id).map_or(id.as_str(), |p| p.name.as_str()))
            .collect::<Vec<_>>()
            .join(" & ")
    }
}

/// Write a session report as CSV: a short header, a players table and a matches table.
///
/// Matches are listed per round by court. Players who have left the roster are shown by id.
pub fn export_session<W: io::Write>(
    session: &Session,
    name: &str,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record([format!("Session: {}", name)])?;
    wtr.write_record([format!("Courts: {}", session.configuration.courts)])?;
    wtr.write_record([format!("Total Rounds: {}", session.current_round)])?;

    wtr.write_record(["Players"])?;
    wtr.write_record(["Name", "Games Played", "ELO", "Wins", "Losses"])?;
    for p in &session.players {
        wtr.write_record([
            p.name.clone(),
            p.games_played.to_string(),
            p.elo.to_string(),
            p.wins.to_string(),
            p.losses.to_string(),
        ])?;
    }

    wtr.write_record(["Matches"])?;
    wtr.write_record([
        "Round",
        "Court",
        "Team 1 Players",
        "Team 2 Players",
        "Winner",
        "Score",
    ])?;
    for round in &session.rounds {
        let mut matches: Vec<&Match> = round
            .completed_matches
            .iter()
            .chain(round.matches.iter())
            .collect();
        matches.sort_by_key(|m| m.court);
        for m in matches {
            let winner = m
                .winner
                .map_or_else(|| "Team -".to_string(), |t| format!("Team {}", t.number()));
            wtr.write_record([
                round.round_number.to_string(),
                m.court.to_string(),
                session.team_names(&m.team_1),
                session.team_names(&m.team_2),
                winner,
                m.score.clone().unwrap_or_else(|| "-".to_string()),
            ])?;
        }
    }

    wtr.flush()?;
    log::debug!("exported session {}", name);
    Ok(())
}
