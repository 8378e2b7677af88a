//! Integration tests for participant import and tournament export.

use bracket_manager_web::{
    bracket_layout, create_tournament, export_csv, export_json, import_csv, import_json,
    import_text, record_match_result, render_layout_text, GameMatch, ImportError,
    InsertParticipant, InsertTournament, ResultType, Tournament,
};

fn tournament(names: &[&str]) -> Tournament {
    create_tournament(InsertTournament {
        name: "Spring Open".to_string(),
        sport: "judo".to_string(),
        participants: names
            .iter()
            .zip(1u32..)
            .map(|(name, seed)| InsertParticipant::new(*name).with_seed(seed))
            .collect(),
        ..InsertTournament::default()
    })
    .unwrap()
}

fn find(matches: &[GameMatch], round: u32, position: u32) -> GameMatch {
    matches
        .iter()
        .find(|m| m.round == round && m.position == position)
        .cloned()
        .unwrap()
}

#[test]
fn csv_headers_are_case_insensitive_and_bad_rows_are_skipped() {
    let csv = "Name, Country ,SEED,Category\n\
               Alice,NO,1,-60kg\n\
               Bob,,not-a-number,-60kg\n\
               ,SE,3,\n\
               Carol,DK,,\n";
    let participants = import_csv(csv).unwrap();
    assert_eq!(
        participants,
        vec![
            InsertParticipant {
                name: "Alice".to_string(),
                country: Some("NO".to_string()),
                seed: Some(1),
                category: Some("-60kg".to_string()),
                metadata: None,
            },
            InsertParticipant {
                name: "Carol".to_string(),
                country: Some("DK".to_string()),
                ..InsertParticipant::default()
            },
        ]
    );
}

#[test]
fn csv_with_only_a_name_column_works() {
    let participants = import_csv("name\nAlice\nBob\n").unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[1].name, "Bob");
    assert_eq!(participants[1].seed, None);
}

#[test]
fn csv_without_valid_rows_is_an_error() {
    assert!(matches!(
        import_csv("name,seed\n,1\n"),
        Err(ImportError::NoParticipants)
    ));
}

#[test]
fn json_import_reads_an_array() {
    let json = r#"[{"name": "Alice", "seed": 2}, {"name": "Bob", "country": "SE"}]"#;
    let participants = import_json(json).unwrap();
    assert_eq!(participants[0].seed, Some(2));
    assert_eq!(participants[1].country.as_deref(), Some("SE"));
}

#[test]
fn json_import_rejects_blank_names_and_garbage() {
    assert!(matches!(
        import_json(r#"[{"name": "Alice"}, {"name": "  "}]"#),
        Err(ImportError::EmptyName(1))
    ));
    assert!(matches!(import_json("{not json"), Err(ImportError::Json(_))));
}

#[test]
fn text_import_seeds_by_line_order() {
    let participants = import_text("  Alice \n\nBob\nCarol\n").unwrap();
    let seeds: Vec<_> = participants
        .iter()
        .map(|p| (p.name.as_str(), p.seed))
        .collect();
    assert_eq!(
        seeds,
        vec![("Alice", Some(1)), ("Bob", Some(2)), ("Carol", Some(3))]
    );
    assert!(matches!(import_text("\n \n"), Err(ImportError::NoParticipants)));
}

#[test]
fn csv_export_counts_matches_wins_and_losses() {
    let mut t = tournament(&["A", "B", "C", "D"]);
    // Semi 0 is (A, D).
    let mut semi = find(&t.matches, 1, 0);
    semi.winner_id = semi.red_competitor_id;
    semi.result_type = ResultType::Score;
    record_match_result(&mut t, semi).unwrap();

    let csv = export_csv(&t).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "seed,name,country,category,matches,wins,losses");
    assert_eq!(lines[1], "1,A,,,2,1,0");
    assert_eq!(lines[2], "2,B,,,1,0,0");
    assert_eq!(lines[4], "4,D,,,1,0,1");
}

#[test]
fn json_export_round_trips_the_record() {
    let t = tournament(&["A", "B", "C"]);
    let json = export_json(&t).unwrap();
    let back: Tournament = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, t.id);
    assert_eq!(back.matches, t.matches);
    assert!(json.contains("\"WALKOVER\""));
}

#[test]
fn layout_labels_rounds_and_marks_byes() {
    let t = tournament(&["A", "B", "C", "D", "E"]);
    let layout = bracket_layout(&t);
    let labels: Vec<&str> = layout.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Quarterfinals", "Semifinals", "Final"]);

    let opener = &layout[0].matches[0];
    assert_eq!(opener.red.name, "A");
    assert!(opener.red.winner);
    assert_eq!(opener.blue.name, "BYE");
    assert_eq!(opener.result_type, ResultType::Walkover);

    let text = render_layout_text(&t);
    assert!(text.contains("Quarterfinals"));
    assert!(text.contains("*A vs BYE"));
}

#[test]
fn large_brackets_number_their_early_rounds() {
    let names: Vec<String> = (1..=16).map(|i| format!("P{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let layout = bracket_layout(&tournament(&refs));
    let labels: Vec<&str> = layout.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Round 1", "Quarterfinals", "Semifinals", "Final"]);
    assert_eq!(layout[0].matches.len(), 8);
}
