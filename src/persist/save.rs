//! Save files.
//!
//! A save holds one `GameState` as an explicit ordered record:
//!
//! 1. elapsed seconds
//! 2. level name
//! 3. players, in turn order
//! 4. current player index
//! 5. board grid
//! 6. held tile
//! 7. turn phase
//! 8. silk bag contents
//! 9. rules, RNG position, effects, last shift, turn flags, turn number,
//!    winner, tile total and action history
//!
//! Fields 1-4 lead the record so `peek_save` can read them without decoding
//! the board. Any change to the record bumps `SAVE_VERSION`.

use std::io;
use std::path::Path;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::error::PersistError;
use super::format::{decode_prefix, Frame};
use crate::bag::SilkBag;
use crate::board::{Board, Cell, Shift};
use crate::core::action::ActionRecord;
use crate::core::config::RulesConfig;
use crate::core::player::{Player, PlayerId};
use crate::core::rng::{GameRng, GameRngState};
use crate::core::state::{GameState, TurnFlags};
use crate::rules::effects::ActiveEffects;
use crate::rules::phase::TurnPhase;
use crate::tiles::FloorTile;

pub const SAVE_MAGIC: [u8; 4] = *b"LBYR";
pub const SAVE_VERSION: u16 = 1;

const SAVE_FRAME: Frame = Frame {
    magic: SAVE_MAGIC,
    version: SAVE_VERSION,
};

#[derive(Serialize, Deserialize)]
struct GridRecord {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

#[derive(Serialize, Deserialize)]
struct SaveRecord {
    elapsed: u64,
    level_name: String,
    players: Vec<Player>,
    current_player: usize,
    grid: GridRecord,
    held: FloorTile,
    phase: TurnPhase,
    bag: SilkBag,

    rules: RulesConfig,
    rng: GameRngState,
    effects: ActiveEffects,
    last_shift: Option<Shift>,
    turn: TurnFlags,
    turn_number: u32,
    winner: Option<PlayerId>,
    floor_tiles: usize,
    history: Vector<ActionRecord>,
}

/// Leading fields of `SaveRecord`, for previews.
#[derive(Deserialize)]
struct SaveHeadline {
    elapsed: u64,
    level_name: String,
    players: Vec<Player>,
    current_player: usize,
}

/// What a save-selection screen shows for one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveSummary {
    pub level_name: String,
    pub elapsed: u64,
    pub player_count: usize,
    pub current_player: usize,
}

impl From<&GameState> for SaveRecord {
    fn from(state: &GameState) -> Self {
        let (width, height, cells, held) = state.board.clone().into_parts();
        Self {
            elapsed: state.elapsed,
            level_name: state.level_name.clone(),
            players: state.players.clone(),
            current_player: state.current_player,
            grid: GridRecord { width, height, cells },
            held,
            phase: state.phase,
            bag: state.bag.clone(),
            rules: state.rules.clone(),
            rng: state.rng.state(),
            effects: state.effects.clone(),
            last_shift: state.last_shift,
            turn: state.turn,
            turn_number: state.turn_number,
            winner: state.winner,
            floor_tiles: state.floor_tiles,
            history: state.history.clone(),
        }
    }
}

impl TryFrom<SaveRecord> for GameState {
    type Error = PersistError;

    fn try_from(record: SaveRecord) -> Result<Self, Self::Error> {
        let GridRecord { width, height, cells } = record.grid;
        let board = Board::new(width, height, cells, record.held).map_err(PersistError::corrupt)?;

        let state = GameState {
            elapsed: record.elapsed,
            level_name: record.level_name,
            rules: record.rules,
            players: record.players,
            current_player: record.current_player,
            board,
            phase: record.phase,
            bag: record.bag,
            rng: GameRng::from_state(&record.rng),
            effects: record.effects,
            last_shift: record.last_shift,
            turn: record.turn,
            turn_number: record.turn_number,
            winner: record.winner,
            floor_tiles: record.floor_tiles,
            history: record.history,
        };
        state.check_invariants().map_err(PersistError::corrupt)?;
        Ok(state)
    }
}

/// Write `state` to `path`, replacing any existing save atomically.
#[instrument(skip(path, state), fields(path = %path.display(), level = %state.level_name))]
pub fn save_game(path: &Path, state: &GameState) -> Result<(), PersistError> {
    SAVE_FRAME.write(path, &SaveRecord::from(state))?;
    info!(turn = state.turn_number, "game saved");
    Ok(())
}

/// Read a save back and check it describes a playable game.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_game(path: &Path) -> Result<GameState, PersistError> {
    let record: SaveRecord = SAVE_FRAME.read(path)?;
    let state = GameState::try_from(record)?;
    info!(level = %state.level_name, turn = state.turn_number, "game loaded");
    Ok(state)
}

/// Read only the leading fields of a save.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn peek_save(path: &Path) -> Result<SaveSummary, PersistError> {
    let body = SAVE_FRAME.read_body(path)?;
    let headline: SaveHeadline = decode_prefix(&body)?;
    Ok(SaveSummary {
        level_name: headline.level_name,
        elapsed: headline.elapsed,
        player_count: headline.players.len(),
        current_player: headline.current_player,
    })
}

/// Remove a save file.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn delete_save(path: &Path) -> Result<(), PersistError> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("save deleted");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(PersistError::MissingFile {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(err.into()),
    }
}
