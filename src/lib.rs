//! # labyrinth
//!
//! Engine for a turn-based maze board game. Players slide rows and columns
//! of floor tiles to open paths, play action tiles drawn from a shared bag,
//! and race to their objective cells.
//!
//! ## Design Principles
//!
//! 1. **One mutator**: `TurnEngine` owns the `GameState` and is the only
//!    code that changes it. Callers read through `&GameState`.
//!
//! 2. **Reject without side effects**: every action is validated in full
//!    before anything is touched.
//!
//! 3. **Reproducible**: all randomness comes from one seeded `GameRng`
//!    whose position is saved with the game.
//!
//! ## Modules
//!
//! - `tiles`: floor tiles, action tiles and tile kinds
//! - `board`: the grid, shifting and reachability
//! - `bag`: the silk bag draw pile
//! - `core`: players, state, actions, RNG, configuration
//! - `level`: level definitions read from TOML
//! - `rules`: setup, turn phases, effects and the turn engine
//! - `persist`: save files and leaderboards
//!
//! ## Example
//!
//! ```
//! use labyrinth::{Action, GameSession, LevelDefinition, TurnEngine, TurnPhase};
//!
//! let level = LevelDefinition::from_toml_str(r#"
//!     name = "levels/first"
//!     width = 3
//!     height = 3
//!     [[players]]
//!     start = { x = 0, y = 0 }
//!     objective = { x = 2, y = 2 }
//!     [[players]]
//!     start = { x = 2, y = 0 }
//!     objective = { x = 0, y = 2 }
//!     [tiles.floor]
//!     goal = 10
//!     [tiles.action]
//!     double_move = 2
//! "#).unwrap();
//!
//! let session = GameSession::builder(level).seed(9).build().unwrap();
//! let mut engine = TurnEngine::new(&session).unwrap();
//! assert_eq!(engine.current_player().hand().len(), 1);
//!
//! let shift = engine.legal_shifts()[0];
//! engine.apply(Action::Shift(shift)).unwrap();
//! let here = engine.current_player().position;
//! engine.apply(Action::Move { to: here }).unwrap();
//! assert_eq!(engine.phase(), TurnPhase::AwaitingActionResolution);
//! ```

pub mod bag;
pub mod board;
pub mod core;
pub mod level;
pub mod persist;
pub mod rules;
pub mod tiles;

pub use crate::core::{
    Action, ActionRecord, ActionTarget,
    GameRng, GameRngState,
    GameSession, GameSessionBuilder, RulesConfig,
    GameState, InvariantViolation,
    Player, PlayerId, ProfileId,
};

pub use crate::tiles::{ActionKind, ActionTile, Edge, FloorShape, FloorTile, Orientation, TileCategory, TileKind};

pub use crate::board::{Board, BoardError, Cell, Line, Pos, Shift, ShiftRejection};

pub use crate::bag::{BagError, SilkBag};

pub use crate::level::{LevelDefinition, LevelError};

pub use crate::rules::{GameEvent, RuleError, TurnEngine, TurnPhase};

pub use crate::persist::{
    delete_save, load_game, peek_save, save_game,
    Leaderboard, LeaderboardStore, PersistError, SaveSummary,
};
