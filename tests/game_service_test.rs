//! Tests for the interactive game session

use std::path::{Path, PathBuf};
use std::sync::Arc;

use twentyq::application::services::{GameService, SessionOptions};
use twentyq::application::ApplicationError;
use twentyq::config::Settings;
use twentyq::domain::{DomainError, GameStats};
use twentyq::util::testing::{init_test_setup, InMemoryFileSystem, ScriptedConsole};

const ANIMALS: &str = "Q:Is it alive?\nA:dog\nA:rock\n";

fn service(settings: Settings, fs: &Arc<InMemoryFileSystem>) -> GameService {
    GameService::new(Arc::new(settings), fs.clone())
}

fn saved(service: &GameService) -> String {
    let mut buf = Vec::new();
    service.tree().save(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

// ============================================================
// Session flow
// ============================================================

#[test]
fn given_fresh_session_when_playing_one_round_then_prints_statistics() {
    init_test_setup();
    // Arrange
    let fs = Arc::new(InMemoryFileSystem::new());
    let mut game = service(Settings::default(), &fs);
    // recall? / computer? / again? / remember?
    let mut console = ScriptedConsole::new(&["n", "y", "n", "n"]);

    // Act
    let stats = game.run(&mut console, &SessionOptions::default()).unwrap();

    // Assert
    assert_eq!(stats, GameStats { played: 1, won: 1 });
    let output = console.output();
    assert!(output.starts_with("Welcome to the game of 20 Questions!\n"));
    assert!(output.contains("Think of an item, and I will guess it."));
    assert!(output.contains("Games played: 1\nI have won: 1\n"));
    assert_eq!(console.remaining(), 0);
}

#[test]
fn given_several_rounds_when_playing_again_then_statistics_accumulate() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let mut game = service(Settings::default(), &fs);
    let mut console = ScriptedConsole::new(&[
        "n", // recall?
        "n", "car", "Does it have wheels?", "y", // round 1: learn
        "y", // again?
        "y", "y", // round 2: wheels? car?
        "n", // again?
        "n", // remember?
    ]);

    let stats = game.run(&mut console, &SessionOptions::default()).unwrap();

    assert_eq!(stats, GameStats { played: 2, won: 1 });
    assert_eq!(saved(&game), "Q:Does it have wheels?\nA:car\nA:computer\n");
}

#[test]
fn given_configured_initial_guess_when_starting_then_tree_guesses_it() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let settings = Settings {
        initial_guess: "banana".into(),
        ..Default::default()
    };

    let game = service(settings, &fs);

    assert_eq!(saved(&game), "A:banana\n");
}

#[test]
fn given_console_closed_when_running_then_console_error() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let mut game = service(Settings::default(), &fs);
    let mut console = ScriptedConsole::new(&["n"]);

    let result = game.run(&mut console, &SessionOptions::default());

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Console(_)))
    ));
}

// ============================================================
// Loading
// ============================================================

#[test]
fn given_recall_answered_yes_when_starting_then_loads_named_file() {
    let fs = Arc::new(InMemoryFileSystem::new().with_file("/games/animals.txt", ANIMALS));
    let mut game = service(Settings::default(), &fs);
    let mut console = ScriptedConsole::new(&[
        "y", "/games/animals.txt", // recall? / file name
        "y", "y", // alive? dog?
        "n", "n", // again? / remember?
    ]);

    let stats = game.run(&mut console, &SessionOptions::default()).unwrap();

    assert_eq!(stats, GameStats { played: 1, won: 1 });
    assert!(console.output().contains("Would your object happen to be dog?"));
    assert_eq!(saved(&game), ANIMALS);
}

#[test]
fn given_load_option_when_starting_then_loads_without_asking() {
    let fs = Arc::new(InMemoryFileSystem::new().with_file("/animals.txt", ANIMALS));
    let mut game = service(Settings::default(), &fs);
    let options = SessionOptions {
        load: Some(PathBuf::from("/animals.txt")),
        save: None,
    };
    let mut console = ScriptedConsole::new(&["n", "y", "n", "n"]);

    game.run(&mut console, &options).unwrap();

    assert!(!console.output().contains("Shall I recall our previous games?"));
    assert!(console.output().contains("Would your object happen to be rock?"));
}

#[test]
fn given_missing_file_when_loading_then_reports_error_and_keeps_default_tree() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let mut game = service(Settings::default(), &fs);
    let options = SessionOptions {
        load: Some(PathBuf::from("/missing.txt")),
        save: None,
    };
    let mut console = ScriptedConsole::new(&["y", "n", "n"]);

    let stats = game.run(&mut console, &options).unwrap();

    assert!(console.output().contains("Error: operation failed: read tree file: /missing.txt"));
    assert_eq!(stats.won, 1);
    assert_eq!(saved(&game), "A:computer\n");
}

#[test]
fn given_malformed_file_when_loading_then_reports_error_and_keeps_tree() {
    let fs = Arc::new(InMemoryFileSystem::new().with_file("/bad.txt", "X:bad\n"));
    let mut game = service(Settings::default(), &fs);

    let err = game.load_file(Path::new("/bad.txt")).unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(ref d) if d.is_format_error()));
    assert_eq!(saved(&game), "A:computer\n");
}

// ============================================================
// Saving
// ============================================================

#[test]
fn given_save_option_when_session_ends_then_writes_transcript() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let mut game = service(Settings::default(), &fs);
    let options = SessionOptions {
        load: None,
        save: Some(PathBuf::from("/out.txt")),
    };
    let mut console =
        ScriptedConsole::new(&["n", "n", "car", "Does it have wheels?", "y", "n"]);

    game.run(&mut console, &options).unwrap();

    assert_eq!(
        fs.contents(Path::new("/out.txt")).as_deref(),
        Some("Q:Does it have wheels?\nA:car\nA:computer\n")
    );
    assert!(!console.output().contains("Shall I remember these games?"));
}

#[test]
fn given_tree_file_with_auto_save_when_running_then_loads_and_saves_silently() {
    let fs = Arc::new(InMemoryFileSystem::new().with_file("/home/me/tree.txt", "A:dog\n"));
    let settings = Settings {
        tree_file: Some(PathBuf::from("/home/me/tree.txt")),
        auto_save: true,
        ..Default::default()
    };
    let mut game = service(settings, &fs);
    let mut console = ScriptedConsole::new(&["n", "cat", "Does it meow?", "y", "n"]);

    game.run(&mut console, &SessionOptions::default()).unwrap();

    assert_eq!(
        fs.contents(Path::new("/home/me/tree.txt")).as_deref(),
        Some("Q:Does it meow?\nA:cat\nA:dog\n")
    );
    assert_eq!(console.remaining(), 0);
}

#[test]
fn given_empty_file_name_when_saving_then_uses_configured_tree_file() {
    let fs = Arc::new(InMemoryFileSystem::new());
    let settings = Settings {
        tree_file: Some(PathBuf::from("/default.txt")),
        ..Default::default()
    };
    let mut game = service(settings, &fs);
    // recall? / computer? / again? / remember? / file name
    let mut console = ScriptedConsole::new(&["n", "y", "n", "y", ""]);

    game.run(&mut console, &SessionOptions::default()).unwrap();

    assert!(console.output().contains("What is the file name? [/default.txt]"));
    assert_eq!(
        fs.contents(Path::new("/default.txt")).as_deref(),
        Some("A:computer\n")
    );
}

#[test]
fn given_unwritable_target_when_saving_then_reports_error_and_finishes() {
    let fs = Arc::new(InMemoryFileSystem::new().with_read_only("/ro.txt"));
    let mut game = service(Settings::default(), &fs);
    let options = SessionOptions {
        load: None,
        save: Some(PathBuf::from("/ro.txt")),
    };
    let mut console = ScriptedConsole::new(&["n", "y", "n"]);

    let stats = game.run(&mut console, &options).unwrap();

    assert_eq!(stats.played, 1);
    assert!(console.output().contains("Error: operation failed: write tree file: /ro.txt"));
    assert_eq!(fs.contents(Path::new("/ro.txt")), None);
}
