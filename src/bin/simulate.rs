//! Club-night simulator: drives one session court by court with random results.
//! Run with: cargo run --bin simulate
//! Configure with env: COURTS, RANDOMNESS, ROUNDS (matches per court), PLAYERS,
//! ROSTER (CSV path), SEED, EXPORT_CSV (path for the session report),
//! PRINT_SNAPSHOT=1 (dump the final session snapshot as JSON).

use doubles_matchmaker::logic::expected_score;
use doubles_matchmaker::{
    export_session, finish_court_and_generate_new, generate_next_round, import_roster,
    record_match_result, Configuration, NewPlayer, Session, Team,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fs::File;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_courts() -> u32 {
    1
}

fn default_rounds() -> u32 {
    6
}

fn default_players() -> usize {
    10
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let courts = env_or("COURTS", default_courts());
    let randomness = env_or("RANDOMNESS", Configuration::default().randomness_level);
    let rounds = env_or("ROUNDS", default_rounds());
    let mut rng = match std::env::var("SEED").ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = Session::new(Configuration::new(courts, randomness));
    match std::env::var("ROSTER") {
        Ok(path) => {
            import_roster(&mut session, File::open(&path)?)?;
        }
        Err(_) => {
            for i in 1..=env_or("PLAYERS", default_players()) {
                session.add_player(format!("Player {}", i), NewPlayer::default())?;
            }
        }
    }
    log::info!(
        "Simulating {} match(es) per court on {} court(s) with {} players",
        rounds,
        courts,
        session.players().len()
    );

    generate_next_round(&mut session, &mut rng)?;

    // Each step finishes one court, so every court sees roughly `rounds` matches.
    for _ in 0..rounds * courts.max(1) {
        let Some(next) = session
            .latest_round()
            .and_then(|r| r.matches.first())
            .map(|m| (m.id.clone(), m.court, m.team_1.clone(), m.team_2.clone()))
        else {
            break;
        };
        let (match_id, court, team_1, team_2) = next;

        let avg = |team: &[String; 2]| {
            team.iter()
                .filter_map(|id| session.player(id))
                .map(|p| f64::from(p.elo))
                .sum::<f64>()
                / 2.0
        };
        let p_team_1 = expected_score(avg(&team_1), avg(&team_2));
        let winner = if rng.gen_bool(p_team_1) { Team::One } else { Team::Two };
        let score = if winner == Team::One { "21-17" } else { "17-21" };

        record_match_result(&mut session, &match_id, winner, Some(score.to_string()))?;
        finish_court_and_generate_new(&mut session, court, &mut rng)?;
    }

    println!(
        "{:>4} {:<20} {:>6} {:>5} {:>5} {:>5}",
        "rank", "player", "elo", "wins", "losses", "win%"
    );
    for e in session.leaderboard() {
        println!(
            "{:>4} {:<20} {:>6} {:>5} {:>5} {:>5}",
            e.rank, e.name, e.elo, e.wins, e.losses, e.win_rate
        );
    }
    let summary = session.summary();
    log::info!(
        "{} games over {} round(s), {:.2} games per player",
        summary.total_games,
        summary.total_rounds,
        summary.average_games_per_player
    );

    if let Ok(path) = std::env::var("EXPORT_CSV") {
        export_session(&session, "Simulated club night", File::create(&path)?)?;
        log::info!("Wrote session report to {}", path);
    }

    if env_or("PRINT_SNAPSHOT", 0u8) == 1 {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    }
    Ok(())
}
