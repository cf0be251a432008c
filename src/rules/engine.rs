//! The turn engine: validates and applies player actions.
//!
//! `TurnEngine` owns one `GameState` and is the only thing that mutates it.
//! Every call to `apply` either fails with a `RuleError` and leaves the
//! state untouched, or succeeds and returns the events it produced.
//!
//! ## Turn flow
//!
//! 1. Turn start: the active player draws an action tile (if any remain).
//! 2. `AwaitingTileInsertion`: rotate the held tile freely, then shift a
//!    line. `Pass` is accepted only when no line can move.
//! 3. `AwaitingPlayerMove`: move to a reachable, unburnt, unoccupied cell.
//!    Reaching the objective ends the game.
//! 4. `AwaitingActionResolution`: play one action tile or end the turn.
//!    When the player has nothing to play this step resolves on its own.
//! 5. `TurnComplete`: effects tick down and play passes on.
//!
//! ```
//! use labyrinth::core::{Action, GameSession};
//! use labyrinth::level::LevelDefinition;
//! use labyrinth::rules::{TurnEngine, TurnPhase};
//!
//! let level = LevelDefinition::from_toml_str(r#"
//!     name = "levels/open"
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
//! "#).unwrap();
//!
//! let session = GameSession::builder(level).seed(1).build().unwrap();
//! let mut engine = TurnEngine::new(&session).unwrap();
//!
//! let shift = engine.legal_shifts()[0];
//! engine.apply(Action::Shift(shift)).unwrap();
//! assert_eq!(engine.phase(), TurnPhase::AwaitingPlayerMove);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, instrument, warn};

use super::effects::{self, ActiveEffect, EffectKind};
use super::error::{ActionFault, MoveFault, RuleError, ShiftFault};
use super::event::GameEvent;
use super::phase::TurnPhase;
use super::setup::build_state;
use crate::board::{Board, Pos, Shift, ShiftRejection};
use crate::core::action::{Action, ActionRecord, ActionTarget};
use crate::core::config::GameSession;
use crate::core::player::{Player, PlayerId, ProfileId};
use crate::core::state::{GameState, InvariantViolation, TurnFlags};
use crate::level::LevelError;
use crate::tiles::{ActionKind, FloorTile, TileKind};

/// What a validated action tile will do once resolved.
enum Resolution {
    Area(EffectKind, Pos),
    ExtraMove,
    SendBack { player: PlayerId, to: Pos },
}

/// Runs one game.
#[derive(Clone, Debug)]
pub struct TurnEngine {
    state: GameState,
}

impl TurnEngine {
    /// Start a new game and begin the first player's turn.
    #[instrument(skip(session), fields(level = %session.level.name, seed = session.seed))]
    pub fn new(session: &GameSession) -> Result<Self, LevelError> {
        let state = build_state(session)?;
        let mut engine = Self { state };
        let mut events = Vec::new();
        engine.begin_turn(&mut events);
        Ok(engine)
    }

    /// Resume a game from a saved state.
    pub fn from_state(state: GameState) -> Result<Self, InvariantViolation> {
        state.check_invariants()?;
        Ok(Self { state })
    }

    // === Queries ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.state.board
    }

    #[must_use]
    pub fn held(&self) -> &FloorTile {
        self.state.board.held()
    }

    #[must_use]
    pub fn current_player(&self) -> &Player {
        self.state.active_player()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    /// Profile to credit on the leaderboard, once the game is won.
    #[must_use]
    pub fn winner_profile(&self) -> Option<ProfileId> {
        self.state.winner_profile()
    }

    /// Remaining bag count for every tile kind.
    #[must_use]
    pub fn remaining_counts(&self) -> BTreeMap<TileKind, usize> {
        self.state.bag.counts()
    }

    #[must_use]
    pub fn is_burning(&self, pos: Pos) -> bool {
        self.state.effects.is_burning(pos)
    }

    #[must_use]
    pub fn is_frozen(&self, pos: Pos) -> bool {
        self.state.effects.is_frozen(pos)
    }

    /// Shifts the active player may make right now.
    #[must_use]
    pub fn legal_shifts(&self) -> Vec<Shift> {
        let effects = &self.state.effects;
        self.state
            .board
            .legal_shifts(|pos| effects.is_frozen(pos))
            .into_iter()
            .filter(|&shift| !self.is_reversal(shift))
            .collect()
    }

    /// Cells the active player could walk to, ignoring occupancy.
    #[must_use]
    pub fn reachable_cells(&self) -> BTreeSet<Pos> {
        let effects = &self.state.effects;
        let start = self.state.active_player().position;
        self.state
            .board
            .reachable_avoiding(start, |pos| effects.is_burning(pos))
            .unwrap_or_default()
    }

    /// Whether the active player has an action tile they may still play.
    #[must_use]
    pub fn can_play_action(&self) -> bool {
        !self.state.turn.action_used && !self.state.active_player().hand().is_empty()
    }

    /// Add seconds of play to the game clock.
    pub fn tick(&mut self, seconds: u64) {
        self.state.tick(seconds);
    }

    // === Actions ===

    /// Validate and apply one action for the active player.
    #[instrument(level = "debug", skip(self), fields(player = self.state.current_player))]
    pub fn apply(&mut self, action: Action) -> Result<Vec<GameEvent>, RuleError> {
        let phase = self.state.phase;
        if phase != required_phase(&action) {
            debug!(%phase, action = action.name(), "action rejected: wrong phase");
            return Err(wrong_phase(&action, phase));
        }

        let player = self.state.active_player().id;
        let turn = self.state.turn_number;
        let mut events = Vec::new();

        match action {
            Action::RotateHeld { quarter_turns } => {
                self.state.board.rotate_held(quarter_turns);
                events.push(GameEvent::HeldRotated {
                    orientation: self.state.board.held().orientation(),
                });
            }
            Action::Shift(shift) => self.shift(shift, &mut events)?,
            Action::Pass => self.pass(&mut events)?,
            Action::Move { to } => self.move_to(to, &mut events)?,
            Action::PlayAction { kind, target } => self.play_action(kind, target, &mut events)?,
            Action::EndTurn => self.complete_turn(&mut events),
        }

        self.state.history.push_back(ActionRecord::new(player, action, turn));
        Ok(events)
    }

    fn shift(&mut self, shift: Shift, events: &mut Vec<GameEvent>) -> Result<(), RuleError> {
        if self.is_reversal(shift) {
            return Err(RuleError::InvalidShift {
                reason: ShiftFault::Line(ShiftRejection::Reversal),
            });
        }
        let effects = &self.state.effects;
        self.state.board.shift(shift, |pos| effects.is_frozen(pos))?;
        self.state.sync_positions();
        self.state.last_shift = Some(shift);

        events.push(GameEvent::Shifted { shift });
        self.enter(TurnPhase::AwaitingPlayerMove, events);
        Ok(())
    }

    fn pass(&mut self, events: &mut Vec<GameEvent>) -> Result<(), RuleError> {
        if !self.legal_shifts().is_empty() {
            return Err(RuleError::InvalidShift {
                reason: ShiftFault::PassNotAllowed,
            });
        }
        self.state.last_shift = None;
        events.push(GameEvent::Passed {
            player: self.state.active_player().id,
        });
        self.enter(TurnPhase::AwaitingPlayerMove, events);
        Ok(())
    }

    fn move_to(&mut self, to: Pos, events: &mut Vec<GameEvent>) -> Result<(), RuleError> {
        self.check_move(to)?;

        let player = self.state.active_player();
        let (id, from) = (player.id, player.position);
        self.state.board.relocate_player(id, from, to)?;
        self.state.active_player_mut().position = to;
        debug!(%id, %from, %to, "player moved");
        events.push(GameEvent::Moved { player: id, from, to });

        if self.state.active_player().has_won() {
            self.finish(id, events);
            return Ok(());
        }

        self.enter(TurnPhase::AwaitingActionResolution, events);
        if !self.can_play_action() {
            self.complete_turn(events);
        }
        Ok(())
    }

    fn check_move(&self, to: Pos) -> Result<(), RuleError> {
        let board = &self.state.board;
        let effects = &self.state.effects;
        let player = self.state.active_player();
        let reject = |reason| Err(RuleError::InvalidMove { to, reason });

        if !board.in_bounds(to) {
            return Err(RuleError::OutOfBounds { pos: to });
        }
        if to == player.position {
            return Ok(());
        }
        if board.floor_at(to).is_err() {
            return reject(MoveFault::Void);
        }
        if effects.is_burning(to) {
            return reject(MoveFault::Burning);
        }
        if let Some(other) = self.state.player_at(to) {
            return reject(MoveFault::Occupied(other.id));
        }
        let reachable = board.reachable_avoiding(player.position, |pos| effects.is_burning(pos))?;
        if !reachable.contains(&to) {
            return reject(MoveFault::Unreachable);
        }
        Ok(())
    }

    fn play_action(
        &mut self,
        kind: ActionKind,
        target: ActionTarget,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), RuleError> {
        let resolution = self.check_action(kind, target)?;

        let player = self.state.active_player().id;
        self.state.active_player_mut().take(kind);
        self.state.turn.action_used = true;
        debug!(%player, %kind, ?target, "action played");
        events.push(GameEvent::ActionPlayed { player, kind, target });

        match resolution {
            Resolution::Area(effect, center) => {
                let turns = self.effect_duration();
                self.state.effects.add(ActiveEffect::new(effect, center, turns));
            }
            Resolution::ExtraMove => {
                self.enter(TurnPhase::AwaitingPlayerMove, events);
                return Ok(());
            }
            Resolution::SendBack { player: target, to } => {
                let from = self.state.players[target.index()].position;
                self.state.board.relocate_player(target, from, to)?;
                let sent = &mut self.state.players[target.index()];
                sent.position = to;
                sent.mark_backtracked();
                events.push(GameEvent::Relocated { player: target, from, to });
            }
        }

        self.complete_turn(events);
        Ok(())
    }

    fn check_action(&self, kind: ActionKind, target: ActionTarget) -> Result<Resolution, RuleError> {
        let reject = |reason| Err(RuleError::InvalidActionUse { reason });
        let state = &self.state;

        if state.turn.action_used {
            return reject(ActionFault::AlreadyUsed);
        }
        if !state.active_player().holds(kind) {
            return reject(ActionFault::NotInHand(kind));
        }

        if !target.matches(kind.target_kind()) {
            return reject(ActionFault::WrongTarget(kind));
        }

        match target {
            ActionTarget::Cell(center) => {
                if !state.board.in_bounds(center) {
                    return Err(RuleError::OutOfBounds { pos: center });
                }
                let Some(effect) = EffectKind::from_action(kind) else {
                    return reject(ActionFault::WrongTarget(kind));
                };
                if effect == EffectKind::Fire {
                    let (w, h) = (state.board.width(), state.board.height());
                    if effects::area(center, w, h).any(|pos| state.player_at(pos).is_some()) {
                        return reject(ActionFault::OccupiedArea);
                    }
                }
                Ok(Resolution::Area(effect, center))
            }
            ActionTarget::None => Ok(Resolution::ExtraMove),
            ActionTarget::Player(id) => {
                let Some(target) = state.player(id) else {
                    return reject(ActionFault::UnknownPlayer(id));
                };
                if target.was_backtracked() {
                    return reject(ActionFault::AlreadyBacktracked(id));
                }
                let Some(&to) = target.history().first() else {
                    return reject(ActionFault::NoHistory(id));
                };
                if state.effects.is_burning(to) {
                    return reject(ActionFault::DestinationBurning(id));
                }
                if state.player_at(to).is_some_and(|other| other.id != id) {
                    return reject(ActionFault::DestinationOccupied(id));
                }
                Ok(Resolution::SendBack { player: id, to })
            }
        }
    }

    // === Turn bookkeeping ===

    /// Completed turns an area effect lasts: `effect_cycles` full rounds.
    fn effect_duration(&self) -> u32 {
        let players = self.state.player_count() as u32;
        self.state.rules.effect_cycles.saturating_mul(players).max(1)
    }

    fn is_reversal(&self, shift: Shift) -> bool {
        self.state.rules.forbid_reverse_shift && self.state.last_shift == Some(shift.reversed())
    }

    fn enter(&mut self, to: TurnPhase, events: &mut Vec<GameEvent>) {
        let from = self.state.phase;
        self.state.phase = to;
        events.push(GameEvent::PhaseChanged { from, to });
    }

    fn complete_turn(&mut self, events: &mut Vec<GameEvent>) {
        self.enter(TurnPhase::TurnComplete, events);
        self.state.active_player_mut().remember_position();

        for effect in self.state.effects.tick() {
            debug!(kind = %effect.kind, center = %effect.center, "effect lifted");
            events.push(GameEvent::EffectExpired { effect });
        }

        self.state.current_player = (self.state.current_player + 1) % self.state.player_count();
        self.state.turn_number += 1;
        self.state.turn = TurnFlags::default();

        self.enter(TurnPhase::AwaitingTileInsertion, events);
        self.begin_turn(events);
    }

    fn begin_turn(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.state.active_player().id;
        let turn = self.state.turn_number;
        debug!(%player, turn, "turn started");
        events.push(GameEvent::TurnStarted { player, turn });

        if !self.state.rules.draw_action_each_turn {
            return;
        }
        match self.state.bag.draw_action_tile(&mut self.state.rng) {
            Ok(tile) => {
                self.state.active_player_mut().give(tile.kind);
                events.push(GameEvent::ActionDrawn { player, kind: tile.kind });
            }
            Err(err) => warn!(%player, %err, "no action tile drawn"),
        }
    }

    fn finish(&mut self, winner: PlayerId, events: &mut Vec<GameEvent>) {
        self.state.winner = Some(winner);
        self.enter(TurnPhase::GameOver, events);
        let profile = self.state.winner_profile();
        info!(%winner, ?profile, turn = self.state.turn_number, "game over");
        events.push(GameEvent::GameWon { player: winner, profile });
    }
}

/// Phase in which `action` is accepted.
fn required_phase(action: &Action) -> TurnPhase {
    match action {
        Action::RotateHeld { .. } | Action::Shift(_) | Action::Pass => TurnPhase::AwaitingTileInsertion,
        Action::Move { .. } => TurnPhase::AwaitingPlayerMove,
        Action::PlayAction { .. } | Action::EndTurn => TurnPhase::AwaitingActionResolution,
    }
}

fn wrong_phase(action: &Action, phase: TurnPhase) -> RuleError {
    match action {
        Action::RotateHeld { .. } | Action::Shift(_) | Action::Pass => RuleError::InvalidShift {
            reason: ShiftFault::WrongPhase(phase),
        },
        Action::Move { to } => RuleError::InvalidMove {
            to: *to,
            reason: MoveFault::WrongPhase(phase),
        },
        Action::PlayAction { .. } | Action::EndTurn => RuleError::InvalidActionUse {
            reason: ActionFault::WrongPhase(phase),
        },
    }
}
