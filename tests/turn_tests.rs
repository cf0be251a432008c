//! Whole-turn scenarios through the public engine API.

use labyrinth::bag::SilkBag;
use labyrinth::core::{Action, GameRng, GameSession, GameState, Player, PlayerId, ProfileId, RulesConfig};
use labyrinth::level::LevelDefinition;
use labyrinth::persist::LeaderboardStore;
use labyrinth::rules::{GameEvent, RuleError, ShiftFault, TurnEngine, TurnPhase};
use labyrinth::{Board, Cell, Edge, FloorShape, FloorTile, Orientation, Pos, Shift, ShiftRejection};

fn straight(quarter_turns: i32) -> FloorTile {
    FloorTile::new(FloorShape::Straight, Orientation::from_quarter_turns(quarter_turns))
}

/// Build a 7x7 two-player game. `tile_at` chooses every grid tile.
fn seven_by_seven(
    tile_at: impl Fn(Pos) -> FloorTile,
    held: FloorTile,
    a: (Pos, Pos),
    b: (Pos, Pos),
    profile_a: Option<ProfileId>,
) -> TurnEngine {
    let mut cells = Vec::new();
    for y in 0..7 {
        for x in 0..7 {
            cells.push(Cell::Floor(tile_at(Pos::new(x, y))));
        }
    }
    let mut board = Board::new(7, 7, cells, held).unwrap();
    let players = vec![
        Player::new(PlayerId::new(0), a.0, a.1, profile_a),
        Player::new(PlayerId::new(1), b.0, b.1, None),
    ];
    for p in &players {
        board.place_player(p.id, p.position).unwrap();
    }
    let state = GameState::new("levels/scenario", RulesConfig::default(), players, board, SilkBag::new(), GameRng::new(0));
    TurnEngine::from_state(state).unwrap()
}

fn phase_changes(events: &[GameEvent]) -> Vec<(TurnPhase, TurnPhase)> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_shift_row_then_move_to_only_neighbour() {
    // Every grid tile runs north-south; the held tile runs east-west
    let mut engine = seven_by_seven(
        |_| straight(0),
        straight(1),
        (Pos::new(0, 0), Pos::new(6, 6)),
        (Pos::new(6, 6), Pos::new(0, 0)),
        None,
    );
    assert_eq!(engine.phase(), TurnPhase::AwaitingTileInsertion);

    let events = engine.apply(Action::Shift(Shift::row(0, Edge::East))).unwrap();
    assert_eq!(
        phase_changes(&events),
        vec![(TurnPhase::AwaitingTileInsertion, TurnPhase::AwaitingPlayerMove)]
    );
    assert_eq!(engine.phase(), TurnPhase::AwaitingPlayerMove);

    // A rode its tile one step east; the inserted tile does not connect west
    let a = engine.current_player().position;
    assert_eq!(a, Pos::new(1, 0));
    let neighbours: Vec<_> = engine.board().open_neighbours(a).collect();
    assert_eq!(neighbours, vec![Pos::new(1, 1)]);
    assert_eq!(engine.board().floor_tile_count(), 50);

    let events = engine.apply(Action::Move { to: Pos::new(1, 1) }).unwrap();
    assert_eq!(
        phase_changes(&events),
        vec![
            (TurnPhase::AwaitingPlayerMove, TurnPhase::AwaitingActionResolution),
            (TurnPhase::AwaitingActionResolution, TurnPhase::TurnComplete),
            (TurnPhase::TurnComplete, TurnPhase::AwaitingTileInsertion),
        ]
    );
    assert_eq!(engine.state().current_player, 1);
    assert_eq!(engine.current_player().id, PlayerId::new(1));
    assert_eq!(engine.state().players[0].position, Pos::new(1, 1));
    assert!(events.contains(&GameEvent::TurnStarted {
        player: PlayerId::new(1),
        turn: 2,
    }));
}

#[test]
fn test_reaching_objective_records_win() {
    // Row 6 runs east-west, everything else north-south
    let mut engine = seven_by_seven(
        |pos| if pos.y == 6 { straight(1) } else { straight(0) },
        straight(0),
        (Pos::new(5, 6), Pos::new(6, 6)),
        (Pos::new(0, 0), Pos::new(6, 0)),
        Some(ProfileId(42)),
    );
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(dir.path());
    assert_eq!(store.load("levels/scenario").unwrap().wins(ProfileId(42)), 0);

    engine.apply(Action::Shift(Shift::row(3, Edge::East))).unwrap();
    let events = engine.apply(Action::Move { to: Pos::new(6, 6) }).unwrap();

    assert_eq!(engine.phase(), TurnPhase::GameOver);
    assert_eq!(engine.winner(), Some(PlayerId::new(0)));
    assert!(events.contains(&GameEvent::GameWon {
        player: PlayerId::new(0),
        profile: Some(ProfileId(42)),
    }));

    let board = store.record_game(engine.state()).unwrap().unwrap();
    assert_eq!(board.wins(ProfileId(42)), 1);
    assert_eq!(store.load("levels/scenario").unwrap().wins(ProfileId(42)), 1);

    // Nothing more is accepted
    let err = engine.apply(Action::Shift(Shift::row(3, Edge::East))).unwrap_err();
    assert_eq!(err.wrong_phase(), Some(TurnPhase::GameOver));
}

#[test]
fn test_game_without_winner_records_nothing() {
    let engine = seven_by_seven(
        |_| straight(0),
        straight(0),
        (Pos::new(0, 0), Pos::new(6, 6)),
        (Pos::new(6, 6), Pos::new(0, 0)),
        Some(ProfileId(1)),
    );
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(dir.path());
    assert_eq!(store.record_game(engine.state()).unwrap(), None);
}

#[test]
fn test_fixed_row_cannot_shift() {
    let mut engine = seven_by_seven(
        |pos| {
            if pos == Pos::new(3, 0) {
                FloorTile::fixed(FloorShape::TShape, Orientation::Deg0)
            } else {
                straight(0)
            }
        },
        straight(1),
        (Pos::new(0, 0), Pos::new(6, 6)),
        (Pos::new(6, 6), Pos::new(0, 0)),
        None,
    );
    let before = engine.state().clone();

    let err = engine.apply(Action::Shift(Shift::row(0, Edge::East))).unwrap_err();
    assert_eq!(
        err,
        RuleError::InvalidShift {
            reason: ShiftFault::Line(ShiftRejection::Anchored)
        }
    );
    assert_eq!(engine.phase(), TurnPhase::AwaitingTileInsertion);
    assert_eq!(engine.state(), &before);

    // Column 3 is pinned too, but its neighbours are free
    assert!(!engine.legal_shifts().contains(&Shift::column(3, Edge::South)));
    assert!(engine.apply(Action::Shift(Shift::column(2, Edge::South))).is_ok());
}

#[test]
fn test_game_from_level_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crossroads.toml");
    std::fs::write(
        &path,
        r#"
        name = "levels/crossroads"
        width = 5
        height = 5

        [[players]]
        start = { x = 0, y = 0 }
        objective = { x = 4, y = 4 }

        [[players]]
        start = { x = 4, y = 0 }
        objective = { x = 0, y = 4 }

        [[players]]
        start = { x = 0, y = 4 }
        objective = { x = 4, y = 0 }

        [[fixed]]
        pos = { x = 2, y = 2 }
        shape = "goal"

        [tiles.floor]
        straight = 10
        corner = 10
        t_shape = 6

        [tiles.action]
        fire = 1
        ice = 1
        double_move = 2
        backtrack = 1
        "#,
    )
    .unwrap();

    let level = LevelDefinition::load(&path).unwrap();
    let session = GameSession::builder(level)
        .player_count(3)
        .profile(2, ProfileId(5))
        .seed(2024)
        .build()
        .unwrap();
    let engine = TurnEngine::new(&session).unwrap();

    let state = engine.state();
    assert_eq!(state.players.len(), 3);
    assert_eq!(state.floor_tiles, 25);
    assert_eq!(state.check_invariants(), Ok(()));
    // First player drew at turn start
    assert_eq!(engine.current_player().hand().len(), 1);
    // Row 2 and column 2 run through the fixed goal
    let shifts = engine.legal_shifts();
    assert_eq!(shifts.len(), 16);
    assert!(!shifts.contains(&Shift::row(2, Edge::East)));

    let same = TurnEngine::new(&session).unwrap();
    assert_eq!(same.state(), engine.state());
}
