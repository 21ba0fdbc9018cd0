//! Integration tests for CSV roster import.

use doubles_matchmaker::{
    import_roster, read_roster, NewPlayer, RosterError, Session, SessionError,
};

#[test]
fn reads_rows_with_optional_columns() {
    let csv = "name,id,elo,wins,losses\nAnn,,,,\nBo,ext-2,1320,4,1\n";
    let rows = read_roster(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Ann");
    assert_eq!(rows[0].elo, None);
    assert!(!rows[0].options().has_imported_stats());
    assert_eq!(rows[1].id.as_deref(), Some("ext-2"));
    assert_eq!(rows[1].elo, Some(1320));
}

#[test]
fn name_only_roster() {
    let csv = "name\nAnn\n Bo \n";
    let rows = read_roster(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "Bo");
    assert_eq!(rows[1].id, None);
}

#[test]
fn import_adds_players_with_imported_stats() {
    let csv = "name,id,elo,wins,losses\nAnn,,,,\nBo,ext-2,1320,4,1\n,,,,\nCy,,,,\n";
    let mut s = Session::default();
    let ids = import_roster(&mut s, csv.as_bytes()).unwrap();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[1], "ext-2");
    let bo = s.player("ext-2").unwrap();
    assert_eq!((bo.elo, bo.wins, bo.losses), (1320, 4, 1));
    assert!(s.players().iter().any(|p| p.name == "Cy"));
}

#[test]
fn import_reports_duplicate_ids() {
    let csv = "name,id\nAnn,x\nBo,x\n";
    let mut s = Session::default();
    match import_roster(&mut s, csv.as_bytes()) {
        Err(RosterError::Session(SessionError::DuplicatePlayerId(id))) => assert_eq!(id, "x"),
        other => panic!("expected duplicate id error, got {:?}", other),
    }
    assert!(s.players().is_empty());
}

#[test]
fn import_with_taken_id_adds_nobody() {
    let mut s = Session::default();
    let taken = NewPlayer {
        id: Some("p1".to_string()),
        ..NewPlayer::default()
    };
    s.add_player("Ann", taken).unwrap();
    let csv = "name,id\nBo,\nCy,p2\nDi,p1\n";
    assert!(matches!(
        import_roster(&mut s, csv.as_bytes()),
        Err(RosterError::Session(SessionError::DuplicatePlayerId(_)))
    ));
    assert_eq!(s.players().len(), 1);
}

#[test]
fn import_reports_bad_numbers() {
    let csv = "name,elo\nAnn,strong\n";
    let mut s = Session::default();
    assert!(matches!(
        import_roster(&mut s, csv.as_bytes()),
        Err(RosterError::Csv(_))
    ));
    assert!(s.players().is_empty());
}
