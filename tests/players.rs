//! Integration tests for roster management and configuration.

use doubles_matchmaker::{
    generate_next_round, record_match_result, Configuration, NewPlayer, Session, SessionError,
    Team, DEFAULT_ELO,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn play_rounds(s: &mut Session, rounds: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..rounds {
        let ids: Vec<_> = generate_next_round(s, &mut rng)
            .unwrap()
            .matches
            .iter()
            .map(|m| m.id.clone())
            .collect();
        for id in ids {
            record_match_result(s, &id, Team::One, None).unwrap();
        }
    }
}

#[test]
fn add_player_defaults() {
    let mut s = Session::default();
    let id = s.add_player("Ann", NewPlayer::default()).unwrap();
    let p = s.player(&id).unwrap();
    assert_eq!(p.name, "Ann");
    assert_eq!(p.games_played, 0);
    assert_eq!(p.last_played_round, -1);
    assert_eq!(p.elo, DEFAULT_ELO);
    assert!(p.active);
    assert!(s.partnerships().has_player(&id));
    assert!(s.oppositions().has_player(&id));
}

#[test]
fn generated_ids_are_unique() {
    let mut s = Session::default();
    let a = s.add_player("Same", NewPlayer::default()).unwrap();
    let b = s.add_player("Same", NewPlayer::default()).unwrap();
    assert_ne!(a, b);
    assert_eq!(s.players().len(), 2);
}

#[test]
fn duplicate_explicit_id_is_rejected() {
    let mut s = Session::default();
    let opts = NewPlayer {
        id: Some("profile-1".to_string()),
        ..NewPlayer::default()
    };
    s.add_player("Ann", opts.clone()).unwrap();
    assert_eq!(
        s.add_player("Ann again", opts),
        Err(SessionError::DuplicatePlayerId("profile-1".to_string()))
    );
    assert_eq!(s.players().len(), 1);
}

#[test]
fn late_arrival_starts_at_average_games() {
    let mut s = Session::new(Configuration::new(1, 0.5));
    for i in 0..5 {
        s.add_player(format!("P{i}"), NewPlayer::default()).unwrap();
    }
    play_rounds(&mut s, 5, 1);
    // 5 rounds x 4 slots over 5 players = 4 games each.
    let late = s.add_player("Late", NewPlayer::default()).unwrap();
    assert_eq!(s.player(&late).unwrap().games_played, 4);
}

#[test]
fn imported_stats_skip_the_average() {
    let mut s = Session::default();
    for i in 0..4 {
        s.add_player(format!("P{i}"), NewPlayer::default()).unwrap();
    }
    play_rounds(&mut s, 2, 2);
    let opts = NewPlayer {
        id: Some("ext-7".to_string()),
        elo: Some(1350),
        wins: Some(12),
        losses: Some(3),
    };
    let id = s.add_player("Imported", opts).unwrap();
    assert_eq!(id, "ext-7");
    let p = s.player(&id).unwrap();
    assert_eq!((p.elo, p.wins, p.losses, p.games_played), (1350, 12, 3, 0));
}

#[test]
fn removed_player_is_scrubbed_from_history() {
    let mut s = Session::default();
    for i in 0..5 {
        s.add_player(format!("P{i}"), NewPlayer::default()).unwrap();
    }
    play_rounds(&mut s, 3, 3);
    let gone = s.players()[0].id.clone();
    assert!(!s.oppositions().related(&gone).is_empty());

    assert!(s.remove_player(&gone));
    assert!(!s.remove_player(&gone));
    assert!(s.player(&gone).is_none());
    assert!(s.players().iter().all(|p| p.id != gone));
    for p in s.players() {
        assert!(!s.partnerships().related(&p.id).contains(&gone));
        assert!(!s.oppositions().related(&p.id).contains(&gone));
    }
    assert!(!s.player_stats().contains_key(&gone));
}

#[test]
fn toggle_active_flips_and_reports_unknown() {
    let mut s = Session::default();
    let id = s.add_player("Ann", NewPlayer::default()).unwrap();
    assert!(s.toggle_active(&id));
    assert!(!s.player(&id).unwrap().active);
    assert_eq!(s.active_players().count(), 0);
    assert!(s.toggle_active(&id));
    assert!(s.player(&id).unwrap().active);
    assert!(!s.toggle_active("nobody"));
}

#[test]
fn clear_players_empties_roster_and_history() {
    let mut s = Session::default();
    for i in 0..4 {
        s.add_player(format!("P{i}"), NewPlayer::default()).unwrap();
    }
    play_rounds(&mut s, 1, 4);
    s.clear_players();
    assert!(s.players().is_empty());
    assert!(s.partnerships().to_lists().is_empty());
    assert!(s.oppositions().to_lists().is_empty());
}

#[test]
fn configuration_clamps_randomness_only() {
    let mut s = Session::new(Configuration::new(2, 3.0));
    assert_eq!(s.configuration().randomness_level, 1.0);

    s.update_configuration(4, Some(-0.5));
    assert_eq!(s.configuration(), Configuration::new(4, 0.0));

    s.update_configuration(3, None);
    assert_eq!(s.configuration().courts, 3);
    assert_eq!(s.configuration().randomness_level, 0.0);
}

#[test]
fn reads_are_idempotent() {
    let mut s = Session::default();
    for i in 0..6 {
        s.add_player(format!("P{i}"), NewPlayer::default()).unwrap();
    }
    play_rounds(&mut s, 2, 5);
    assert_eq!(s.configuration(), s.configuration());
    assert_eq!(s.players().to_vec(), s.players().to_vec());
    assert_eq!(s.player_stats(), s.player_stats());
}
