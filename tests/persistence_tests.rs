//! Save/load behaviour through the public API.

use std::fs;

use labyrinth::core::{Action, GameSession, ProfileId};
use labyrinth::level::LevelDefinition;
use labyrinth::persist::{delete_save, load_game, peek_save, save_game, PersistError, SAVE_MAGIC, SAVE_VERSION};
use labyrinth::rules::{TurnEngine, TurnPhase};

const LEVEL: &str = r#"
    name = "custom_levels/spiral"
    width = 5
    height = 5
    void = [{ x = 4, y = 4 }]

    [[players]]
    start = { x = 0, y = 0 }
    objective = { x = 3, y = 3 }

    [[players]]
    start = { x = 4, y = 0 }
    objective = { x = 0, y = 4 }

    [tiles.floor]
    straight = 8
    corner = 10
    t_shape = 8

    [tiles.action]
    fire = 3
    ice = 3
    double_move = 3
    backtrack = 3
"#;

fn new_engine(seed: u64) -> TurnEngine {
    let level = LevelDefinition::from_toml_str(LEVEL).unwrap();
    let session = GameSession::builder(level)
        .profile(0, ProfileId(11))
        .seed(seed)
        .build()
        .unwrap();
    TurnEngine::new(&session).unwrap()
}

/// Play `turns` turns: first legal shift, stay put, end the turn.
fn play_turns(engine: &mut TurnEngine, turns: usize) {
    for _ in 0..turns {
        match engine.legal_shifts().first() {
            Some(&shift) => engine.apply(Action::Shift(shift)).unwrap(),
            None => engine.apply(Action::Pass).unwrap(),
        };
        let here = engine.current_player().position;
        engine.apply(Action::Move { to: here }).unwrap();
        if engine.phase() == TurnPhase::AwaitingActionResolution {
            engine.apply(Action::EndTurn).unwrap();
        }
    }
}

#[test]
fn test_round_trip_mid_game() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot1.sav");

    let mut engine = new_engine(7);
    play_turns(&mut engine, 3);
    engine.tick(125);
    engine.apply(Action::RotateHeld { quarter_turns: 3 }).unwrap();

    save_game(&path, engine.state()).unwrap();
    let loaded = load_game(&path).unwrap();

    assert_eq!(&loaded, engine.state());
    assert_eq!(loaded.bag, engine.state().bag);
    assert_eq!(loaded.phase, TurnPhase::AwaitingTileInsertion);
    assert_eq!(loaded.elapsed, 125);
}

#[test]
fn test_resumed_game_continues_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot1.sav");

    let mut original = new_engine(99);
    play_turns(&mut original, 2);
    save_game(&path, original.state()).unwrap();

    let mut resumed = TurnEngine::from_state(load_game(&path).unwrap()).unwrap();
    play_turns(&mut original, 4);
    play_turns(&mut resumed, 4);

    assert_eq!(resumed.state(), original.state());
}

#[test]
fn test_peek_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slot2.sav");

    let mut engine = new_engine(3);
    play_turns(&mut engine, 1);
    engine.tick(30);
    save_game(&path, engine.state()).unwrap();

    let summary = peek_save(&path).unwrap();
    assert_eq!(summary.level_name, "custom_levels/spiral");
    assert_eq!(summary.elapsed, 30);
    assert_eq!(summary.player_count, 2);
    assert_eq!(summary.current_player, 1);

    delete_save(&path).unwrap();
    assert!(matches!(load_game(&path), Err(PersistError::MissingFile { .. })));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_game(&dir.path().join("nothing.sav")).unwrap_err();
    assert!(matches!(err, PersistError::MissingFile { .. }));
}

#[test]
fn test_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.sav");

    fs::write(&path, b"definitely not a save file").unwrap();
    assert!(matches!(load_game(&path), Err(PersistError::CorruptFile { .. })));

    // Right header, truncated body
    let engine = new_engine(1);
    save_game(&path, engine.state()).unwrap();
    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(load_game(&path), Err(PersistError::CorruptFile { .. })));
}

#[test]
fn test_version_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.sav");

    let engine = new_engine(1);
    save_game(&path, engine.state()).unwrap();
    let mut bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &SAVE_MAGIC);
    bytes[4..6].copy_from_slice(&(SAVE_VERSION + 1).to_le_bytes());
    fs::write(&path, &bytes).unwrap();

    match load_game(&path) {
        Err(PersistError::VersionMismatch { found, expected }) => {
            assert_eq!(found, SAVE_VERSION + 1);
            assert_eq!(expected, SAVE_VERSION);
        }
        other => panic!("expected version mismatch, got {other:?}"),
    }
}

#[test]
fn test_failed_load_leaves_game_playable() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = new_engine(5);
    let before = engine.state().clone();

    assert!(load_game(&dir.path().join("missing.sav")).is_err());
    assert_eq!(engine.state(), &before);
    play_turns(&mut engine, 1);
    assert_eq!(engine.state().current_player, 1);
}

#[test]
fn test_save_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("slot.sav");
    let engine = new_engine(2);
    save_game(&path, engine.state()).unwrap();
    assert!(path.exists());
}
