//! Rejected actions.
//!
//! A rejection never changes the game: the engine validates an action in
//! full before it touches any state.

use derive_more::{Display, Error};

use super::phase::TurnPhase;
use crate::board::{BoardError, Pos, ShiftRejection};
use crate::core::player::PlayerId;
use crate::tiles::ActionKind;

/// Why an insertion-phase action was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ShiftFault {
    #[display("{_0}")]
    Line(ShiftRejection),
    #[display("a line can still be shifted")]
    PassNotAllowed,
    #[display("not allowed while {_0}")]
    WrongPhase(TurnPhase),
}

/// Why a move was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum MoveFault {
    #[display("no open path from the current cell")]
    Unreachable,
    #[display("the cell is burning")]
    Burning,
    #[display("occupied by {_0}")]
    Occupied(PlayerId),
    #[display("the cell is void")]
    Void,
    #[display("not allowed while {_0}")]
    WrongPhase(TurnPhase),
}

/// Why an action tile could not be played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ActionFault {
    #[display("no {_0} tile in hand")]
    NotInHand(ActionKind),
    #[display("an action was already played this turn")]
    AlreadyUsed,
    #[display("{_0} needs a different target")]
    WrongTarget(ActionKind),
    #[display("a player stands in the area")]
    OccupiedArea,
    #[display("{_0} is not at the table")]
    UnknownPlayer(PlayerId),
    #[display("{_0} has already been sent back once")]
    AlreadyBacktracked(PlayerId),
    #[display("{_0} has no earlier position to return to")]
    NoHistory(PlayerId),
    #[display("the earlier position of {_0} is burning")]
    DestinationBurning(PlayerId),
    #[display("the earlier position of {_0} is occupied")]
    DestinationOccupied(PlayerId),
    #[display("not allowed while {_0}")]
    WrongPhase(TurnPhase),
}

/// Rule-level failures returned by `TurnEngine::apply`.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum RuleError {
    #[display("position {pos} is off the board")]
    OutOfBounds { pos: Pos },

    #[display("invalid shift: {reason}")]
    InvalidShift { reason: ShiftFault },

    #[display("invalid move to {to}: {reason}")]
    InvalidMove { to: Pos, reason: MoveFault },

    #[display("invalid action use: {reason}")]
    InvalidActionUse { reason: ActionFault },

    #[display("board rejected the update: {source}")]
    Board { source: BoardError },
}

impl RuleError {
    /// The phase the action was attempted in, if that was the problem.
    #[must_use]
    pub fn wrong_phase(&self) -> Option<TurnPhase> {
        match self {
            RuleError::InvalidShift { reason: ShiftFault::WrongPhase(phase) }
            | RuleError::InvalidMove { reason: MoveFault::WrongPhase(phase), .. }
            | RuleError::InvalidActionUse { reason: ActionFault::WrongPhase(phase) } => Some(*phase),
            _ => None,
        }
    }
}

impl From<BoardError> for RuleError {
    fn from(source: BoardError) -> Self {
        match source {
            BoardError::OutOfBounds { pos, .. } => RuleError::OutOfBounds { pos },
            BoardError::InvalidShift { reason, .. } => RuleError::InvalidShift {
                reason: ShiftFault::Line(reason),
            },
            other => RuleError::Board { source: other },
        }
    }
}
