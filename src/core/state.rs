//! Game state: the whole of one game in progress.
//!
//! ## GameState
//!
//! Everything the engine needs to continue a game, and exactly what a save
//! file holds:
//! - Elapsed time and level name
//! - Players in turn order and the index of the active one
//! - Board (grid and held tile) and turn phase
//! - Silk bag contents and RNG position
//! - Lingering effects, the last shift and per-turn flags
//! - Winner, if the game is over
//!
//! The state is owned by `TurnEngine`; callers get `&GameState` views.
//! `check_invariants` is run on every state read back from disk.

use derive_more::{Display, Error};
use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::config::RulesConfig;
use super::player::{Player, PlayerId, ProfileId};
use super::rng::GameRng;
use crate::bag::SilkBag;
use crate::board::{Board, Pos, Shift};
use crate::rules::effects::ActiveEffects;
use crate::rules::phase::TurnPhase;

/// Flags reset at the start of every turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFlags {
    /// An action tile has been played this turn.
    pub action_used: bool,
}

/// A broken structural rule in a game state.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum InvariantViolation {
    #[display("game has no players")]
    NoPlayers,

    #[display("current player index {index} is out of range for {count} players")]
    CurrentPlayer { index: usize, count: usize },

    #[display("expected {expected} floor tiles in play, found {found}")]
    TileCount { expected: usize, found: usize },

    #[display("{player} is recorded at {recorded} but stands at {actual:?}")]
    Position {
        player: PlayerId,
        recorded: Pos,
        actual: Option<Pos>,
    },

    #[display("{player} has seat {seat}")]
    SeatOrder { player: PlayerId, seat: usize },

    #[display("phase {phase} does not agree with winner {winner:?}")]
    Winner {
        phase: TurnPhase,
        winner: Option<PlayerId>,
    },

    #[display("phase {phase} cannot be resumed")]
    TransientPhase { phase: TurnPhase },
}

/// Complete state of one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    // === Identity ===
    /// Seconds of play so far.
    pub elapsed: u64,
    pub level_name: String,
    pub rules: RulesConfig,

    // === Table ===
    /// Turn order is sequence order.
    pub players: Vec<Player>,
    pub current_player: usize,
    pub board: Board,
    pub phase: TurnPhase,
    pub bag: SilkBag,
    pub rng: GameRng,

    // === Turn bookkeeping ===
    pub effects: ActiveEffects,
    /// The most recent accepted shift, for the reversal rule.
    pub last_shift: Option<Shift>,
    pub turn: TurnFlags,
    /// Starts at 1.
    pub turn_number: u32,
    pub winner: Option<PlayerId>,
    /// Floor tiles in play when the game was created; never changes.
    pub floor_tiles: usize,

    /// Accepted actions, oldest first.
    pub history: Vector<ActionRecord>,
}

impl GameState {
    /// Create a state at the very start of a game: first player, insertion
    /// phase, no effects.
    #[must_use]
    pub fn new(
        level_name: impl Into<String>,
        rules: RulesConfig,
        players: Vec<Player>,
        board: Board,
        bag: SilkBag,
        rng: GameRng,
    ) -> Self {
        let floor_tiles = board.floor_tile_count();
        Self {
            elapsed: 0,
            level_name: level_name.into(),
            rules,
            players,
            current_player: 0,
            board,
            phase: TurnPhase::AwaitingTileInsertion,
            bag,
            rng,
            effects: ActiveEffects::new(),
            last_shift: None,
            turn: TurnFlags::default(),
            turn_number: 1,
            winner: None,
            floor_tiles,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player whose turn it is.
    ///
    /// # Panics
    ///
    /// Panics if `current_player` is out of range, which `check_invariants`
    /// rules out for every state the engine accepts.
    #[must_use]
    pub fn active_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    pub(crate) fn active_player_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// The player standing at `pos`, if any.
    #[must_use]
    pub fn player_at(&self, pos: Pos) -> Option<&Player> {
        self.players.iter().find(|p| p.position == pos)
    }

    #[must_use]
    pub fn winner_profile(&self) -> Option<ProfileId> {
        self.winner.and_then(|id| self.player(id)).and_then(|p| p.profile)
    }

    /// Add seconds of play.
    pub fn tick(&mut self, seconds: u64) {
        self.elapsed = self.elapsed.saturating_add(seconds);
    }

    /// Re-read every player's position from the board's occupant sets.
    pub(crate) fn sync_positions(&mut self) {
        for player in &mut self.players {
            if let Some(pos) = self.board.find_player(player.id) {
                player.position = pos;
            }
        }
    }

    /// Check the structural rules every resumable state obeys.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let count = self.players.len();
        if count == 0 {
            return Err(InvariantViolation::NoPlayers);
        }
        if self.current_player >= count {
            return Err(InvariantViolation::CurrentPlayer {
                index: self.current_player,
                count,
            });
        }

        let found = self.board.floor_tile_count();
        if found != self.floor_tiles {
            return Err(InvariantViolation::TileCount {
                expected: self.floor_tiles,
                found,
            });
        }

        for (seat, player) in self.players.iter().enumerate() {
            if player.id.index() != seat {
                return Err(InvariantViolation::SeatOrder { player: player.id, seat });
            }
            let actual = self.board.find_player(player.id);
            if actual != Some(player.position) {
                return Err(InvariantViolation::Position {
                    player: player.id,
                    recorded: player.position,
                    actual,
                });
            }
        }

        let over = self.phase == TurnPhase::GameOver;
        let winner_known = self.winner.is_some_and(|w| w.index() < count);
        if over != winner_known || (!over && self.winner.is_some()) {
            return Err(InvariantViolation::Winner {
                phase: self.phase,
                winner: self.winner,
            });
        }
        if self.phase == TurnPhase::TurnComplete {
            return Err(InvariantViolation::TransientPhase { phase: self.phase });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::tiles::{FloorShape, FloorTile, Orientation};

    fn small_state() -> GameState {
        let cells = (0..9)
            .map(|_| Cell::Floor(FloorTile::new(FloorShape::Goal, Orientation::Deg0)))
            .collect();
        let held = FloorTile::new(FloorShape::Straight, Orientation::Deg0);
        let mut board = Board::new(3, 3, cells, held).unwrap();

        let players = vec![
            Player::new(PlayerId::new(0), Pos::new(0, 0), Pos::new(2, 2), Some(ProfileId(4))),
            Player::new(PlayerId::new(1), Pos::new(2, 0), Pos::new(0, 2), None),
        ];
        for p in &players {
            board.place_player(p.id, p.position).unwrap();
        }
        GameState::new("levels/test", RulesConfig::default(), players, board, SilkBag::new(), GameRng::new(1))
    }

    #[test]
    fn test_new_state_is_valid() {
        let state = small_state();
        assert_eq!(state.floor_tiles, 10);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.active_player().id, PlayerId::new(0));
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn test_bad_current_player() {
        let mut state = small_state();
        state.current_player = 2;
        assert_eq!(
            state.check_invariants(),
            Err(InvariantViolation::CurrentPlayer { index: 2, count: 2 })
        );
    }

    #[test]
    fn test_position_mismatch() {
        let mut state = small_state();
        state.players[1].position = Pos::new(1, 1);
        assert!(matches!(
            state.check_invariants(),
            Err(InvariantViolation::Position { .. })
        ));
    }

    #[test]
    fn test_winner_requires_game_over() {
        let mut state = small_state();
        state.winner = Some(PlayerId::new(0));
        assert!(matches!(state.check_invariants(), Err(InvariantViolation::Winner { .. })));

        state.phase = TurnPhase::GameOver;
        assert_eq!(state.check_invariants(), Ok(()));
        assert_eq!(state.winner_profile(), Some(ProfileId(4)));
    }

    #[test]
    fn test_sync_positions_after_shift() {
        let mut state = small_state();
        state.board.shift_row(0, crate::tiles::Edge::East).unwrap();
        state.sync_positions();
        assert_eq!(state.players[0].position, Pos::new(1, 0));
        // Player 1 was on the ejected tile and wraps to the near edge
        assert_eq!(state.players[1].position, Pos::new(0, 0));
        assert_eq!(state.check_invariants(), Ok(()));
    }

    #[test]
    fn test_tick_accumulates() {
        let mut state = small_state();
        state.tick(30);
        state.tick(12);
        assert_eq!(state.elapsed, 42);
        assert_eq!(state.player_at(Pos::new(2, 0)).map(|p| p.id), Some(PlayerId::new(1)));
    }
}
