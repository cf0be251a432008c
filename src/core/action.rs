//! Player actions.
//!
//! Every input the presentation layer can send to the engine is one
//! `Action`. Which actions are accepted depends on the turn phase:
//!
//! | Phase                      | Accepted                             |
//! |----------------------------|--------------------------------------|
//! | `AwaitingTileInsertion`    | `RotateHeld`, `Shift`, `Pass`        |
//! | `AwaitingPlayerMove`       | `Move`                               |
//! | `AwaitingActionResolution` | `PlayAction`, `EndTurn`              |
//! | `GameOver`                 | nothing                              |

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::board::{Pos, Shift};
use crate::tiles::{ActionKind, TargetKind};

/// What an action tile is aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTarget {
    None,
    /// Centre of a 3x3 area.
    Cell(Pos),
    Player(PlayerId),
}

impl ActionTarget {
    /// Whether this target has the shape `kind` asks for.
    #[must_use]
    pub const fn matches(self, kind: TargetKind) -> bool {
        matches!(
            (self, kind),
            (ActionTarget::None, TargetKind::None)
                | (ActionTarget::Cell(_), TargetKind::Cell)
                | (ActionTarget::Player(_), TargetKind::Player)
        )
    }
}

/// A single player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Turn the held tile before inserting it.
    RotateHeld { quarter_turns: i32 },
    /// Insert the held tile by sliding a line.
    Shift(Shift),
    /// Skip insertion; only legal when no line can move.
    Pass,
    /// Walk to a reachable cell. Moving to the current cell stays put.
    Move { to: Pos },
    PlayAction { kind: ActionKind, target: ActionTarget },
    EndTurn,
}

impl Action {
    /// Short name for logs and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::RotateHeld { .. } => "rotate_held",
            Action::Shift(_) => "shift",
            Action::Pass => "pass",
            Action::Move { .. } => "move",
            Action::PlayAction { .. } => "play_action",
            Action::EndTurn => "end_turn",
        }
    }
}

/// An accepted action with the player and turn it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    /// Turn number when the action was taken (starts at 1).
    pub turn: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self { player, action, turn }
    }
}
