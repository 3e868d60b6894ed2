//! Scoreboard and config persistence tests

use cubefall::core::{ConfigError, GameConfig, GameState, GameSummary, HighScoreTable};
use cubefall::types::PieceKind;

#[test]
fn test_table_stays_sorted_and_truncated() {
    let mut table = HighScoreTable::new(3);
    for (user, score) in [("a", 50), ("b", 10), ("c", 70), ("d", 30), ("e", 60)] {
        table.add(user, score);
    }
    let scores: Vec<u64> = table.entries().iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![70, 60, 50]);
}

#[test]
fn test_scores_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscores.txt");

    let mut table = HighScoreTable::load(&path, 5).unwrap();
    assert!(table.is_empty());
    table.add("Ada Lovelace", 4200);
    table.add("grace", 3100);
    table.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "Ada Lovelace 4200\ngrace 3100\n");

    let mut reloaded = HighScoreTable::load(&path, 5).unwrap();
    assert_eq!(reloaded, table);
    assert_eq!(reloaded.add("late", 3500), Some(1));
}

#[test]
fn test_hand_edited_file_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    std::fs::write(&path, "zed 5\n\n### header\nann 900\nbroken\n").unwrap();

    let table = HighScoreTable::load(&path, 10).unwrap();
    let users: Vec<&str> = table.entries().iter().map(|e| e.user.as_str()).collect();
    assert_eq!(users, vec!["ann", "zed"]);
}

#[test]
fn test_game_over_summary_feeds_table() {
    let config = GameConfig {
        width: 2,
        height: 4,
        depth: 1,
        piece_set: vec![PieceKind::I],
        ..GameConfig::default()
    };
    let table = std::rc::Rc::new(std::cell::RefCell::new(HighScoreTable::new(5)));
    let sink = std::rc::Rc::clone(&table);

    let mut state = GameState::new(config, 1);
    state.register_game_over_observer(move |s: &GameSummary| {
        sink.borrow_mut().add("bot", s.score);
    });
    state.start();
    for _ in 0..100 {
        state.tick(0.5, true);
    }

    assert!(state.is_game_over());
    assert_eq!(table.borrow().best().map(|e| e.score), Some(state.score()));
}

#[test]
fn test_config_file_loads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "width": 0, "initial_difficulty": 2.0, "piece_set": ["branch", "rightScrew"] }"#,
    )
    .unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.piece_set, vec![PieceKind::Branch, PieceKind::RightScrew]);

    let state = GameState::new(config, 1);
    assert_eq!(state.field().width(), 1);
    assert_eq!(state.difficulty(), 2.0);
}

#[test]
fn test_bad_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(GameConfig::load(&path), Err(ConfigError::Parse(_))));
}
