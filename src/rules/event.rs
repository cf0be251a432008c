//! Events reported back to the caller for each accepted action.
//!
//! The presentation layer replays these to animate a turn; the engine does
//! not read them back.

use super::effects::ActiveEffect;
use super::phase::TurnPhase;
use crate::board::{Pos, Shift};
use crate::core::action::ActionTarget;
use crate::core::player::{PlayerId, ProfileId};
use crate::tiles::{ActionKind, Orientation};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    TurnStarted { player: PlayerId, turn: u32 },
    ActionDrawn { player: PlayerId, kind: ActionKind },
    PhaseChanged { from: TurnPhase, to: TurnPhase },
    HeldRotated { orientation: Orientation },
    Shifted { shift: Shift },
    Passed { player: PlayerId },
    Moved { player: PlayerId, from: Pos, to: Pos },
    ActionPlayed { player: PlayerId, kind: ActionKind, target: ActionTarget },
    /// A player was sent back by Backtrack.
    Relocated { player: PlayerId, from: Pos, to: Pos },
    EffectExpired { effect: ActiveEffect },
    GameWon { player: PlayerId, profile: Option<ProfileId> },
}
