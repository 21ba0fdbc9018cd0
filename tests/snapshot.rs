//! Integration tests for snapshot save/restore and loading older snapshots.

use doubles_matchmaker::{
    finish_court_and_generate_new, generate_next_round, record_match_result, Configuration,
    NewPlayer, Session, SessionSnapshot, Team, DEFAULT_ELO,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn populated_session() -> Session {
    let mut s = Session::new(Configuration::new(2, 0.3));
    for i in 0..10 {
        s.add_player(format!("P{i}"), NewPlayer::default()).unwrap();
    }
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..2 {
        let ids: Vec<_> = generate_next_round(&mut s, &mut rng)
            .unwrap()
            .matches
            .iter()
            .map(|m| m.id.clone())
            .collect();
        for id in ids {
            record_match_result(&mut s, &id, Team::Two, Some("15-21".to_string())).unwrap();
        }
    }
    generate_next_round(&mut s, &mut rng).unwrap();
    let m = s.latest_round().unwrap().matches[0].clone();
    record_match_result(&mut s, &m.id, Team::One, None).unwrap();
    finish_court_and_generate_new(&mut s, m.court, &mut rng).unwrap();
    let inactive = s.players()[3].id.clone();
    s.toggle_active(&inactive);
    s
}

#[test]
fn json_round_trip_restores_identical_session() {
    let s = populated_session();
    let json = s.to_json().unwrap();
    let restored = Session::from_json(&json).unwrap();

    assert_eq!(restored.players(), s.players());
    assert_eq!(restored.rounds(), s.rounds());
    assert_eq!(restored.configuration(), s.configuration());
    assert_eq!(restored.current_round(), s.current_round());
    assert_eq!(restored.partnerships(), s.partnerships());
    assert_eq!(restored.oppositions(), s.oppositions());
    assert_eq!(restored, s);
}

#[test]
fn snapshot_uses_camel_case_fields() {
    let s = populated_session();
    let value = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(value["currentRound"], 3);
    assert_eq!(value["courts"], 2);
    assert!(value["partnershipHistory"].is_object());
    assert!(value["oppositionHistory"].is_object());
    let first = &value["players"][0];
    assert!(first[0].is_string());
    assert!(first[1]["gamesPlayed"].is_number());
    assert!(first[1]["lastPlayedRound"].is_number());
    assert!(value["rounds"][0]["playersSittingOut"].is_array());
    let stored = &value["rounds"][0]["matches"][0];
    assert!(stored["team1"][0].is_string());
    assert_eq!(stored["winner"], 2);
    assert!(stored["timestamp"].is_i64());
}

#[test]
fn snapshot_with_player_objects_in_rounds_loads() {
    let json = r#"{
        "players": [
            ["a", {"id": "a", "name": "Ann", "gamesPlayed": 1, "lastPlayedRound": 1, "restRounds": 0}],
            ["b", {"id": "b", "name": "Bo", "gamesPlayed": 1, "lastPlayedRound": 1, "restRounds": 0}],
            ["c", {"id": "c", "name": "Cy", "gamesPlayed": 1, "lastPlayedRound": 1, "restRounds": 0}],
            ["d", {"id": "d", "name": "Di", "gamesPlayed": 1, "lastPlayedRound": 1, "restRounds": 0}],
            ["e", {"id": "e", "name": "Ed", "gamesPlayed": 0, "lastPlayedRound": -1, "restRounds": 1}]
        ],
        "currentRound": 1,
        "courts": 1,
        "randomnessLevel": 0.5,
        "partnershipHistory": {"a": ["b"], "b": ["a"], "c": ["d"], "d": ["c"]},
        "oppositionHistory": {"a": ["c", "d"], "b": ["c", "d"], "c": ["a", "b"], "d": ["a", "b"]},
        "rounds": [{
            "roundNumber": 1,
            "matches": [{
                "id": "match_1717000000000_1",
                "court": 1,
                "team1": [{"id": "a", "name": "Ann", "gamesPlayed": 0}, {"id": "b", "name": "Bo"}],
                "team2": [{"id": "c", "name": "Cy"}, {"id": "d", "name": "Di"}],
                "winner": 2,
                "score": "18-21",
                "timestamp": 1717000123456
            }],
            "playersPlaying": [{"id": "a"}, {"id": "b"}, {"id": "c"}, {"id": "d"}],
            "playersSittingOut": [{"id": "e", "name": "Ed"}]
        }]
    }"#;
    let s = Session::from_json(json).unwrap();

    let round = &s.rounds()[0];
    let m = &round.matches[0];
    assert_eq!(m.id, "match_1717000000000_1");
    assert_eq!(m.team_1, ["a".to_string(), "b".to_string()]);
    assert_eq!(m.team_2, ["c".to_string(), "d".to_string()]);
    assert_eq!(m.winner, Some(Team::Two));
    assert_eq!(m.timestamp.map(|t| t.timestamp_millis()), Some(1717000123456));
    assert_eq!(round.players_playing, ["a", "b", "c", "d"]);
    assert_eq!(round.players_sitting_out, ["e"]);

    // The loaded court can be freed and play continues.
    let mut restored = s;
    let mut rng = StdRng::seed_from_u64(3);
    let next = finish_court_and_generate_new(&mut restored, 1, &mut rng).unwrap();
    assert_eq!(next.round_number, 2);
    assert!(next.match_on_court(1).unwrap().involves("e"));
}

#[test]
fn older_snapshot_is_backfilled() {
    let json = r#"{
        "players": [
            ["a", {"id": "a", "name": "Ann", "gamesPlayed": 2, "lastPlayedRound": 1, "restRounds": 0}],
            ["b", {"id": "b", "name": "Bo", "gamesPlayed": 1, "lastPlayedRound": 0, "restRounds": 1}],
            ["c", {"id": "c", "name": "Cy", "gamesPlayed": 0, "lastPlayedRound": -1, "restRounds": 0, "elo": 1310, "active": false}]
        ],
        "currentRound": 2,
        "courts": 1,
        "randomnessLevel": 0.25,
        "partnershipHistory": {"a": ["b"]},
        "rounds": []
    }"#;
    let s = Session::from_json(json).unwrap();

    let a = s.player("a").unwrap();
    assert_eq!((a.elo, a.wins, a.losses, a.active), (DEFAULT_ELO, 0, 0, true));
    let c = s.player("c").unwrap();
    assert_eq!(c.elo, 1310);
    assert!(!c.active);

    // One-sided history comes back symmetric; missing entries are empty.
    assert!(s.partnerships().contains("b", "a"));
    assert!(s.partnerships().has_player("c"));
    for id in ["a", "b", "c"] {
        assert!(s.oppositions().has_player(id));
        assert!(s.oppositions().related(id).is_empty());
    }
    assert_eq!(s.current_round(), 2);
    assert_eq!(s.configuration(), Configuration::new(1, 0.25));
}

#[test]
fn empty_snapshot_loads_defaults() {
    let s = Session::from_json("{}").unwrap();
    assert!(s.players().is_empty());
    assert!(s.rounds().is_empty());
    assert_eq!(s.current_round(), 0);
    assert_eq!(s.configuration(), Configuration::default());
}

#[test]
fn out_of_range_randomness_is_clamped_on_load() {
    let snapshot = SessionSnapshot {
        randomness_level: 4.0,
        ..Session::default().snapshot()
    };
    let s = Session::from_snapshot(snapshot);
    assert_eq!(s.configuration().randomness_level, 1.0);
}

#[test]
fn restored_session_keeps_generating() {
    let s = populated_session();
    let mut restored = Session::from_json(&s.to_json().unwrap()).unwrap();
    let mut rng = StdRng::seed_from_u64(2);
    let next = restored.current_round() + 1;
    let round = generate_next_round(&mut restored, &mut rng).unwrap();
    assert_eq!(round.round_number, next);
}
