//! Turn phases.
//!
//! ```text
//! AwaitingTileInsertion -> AwaitingPlayerMove -> AwaitingActionResolution -> TurnComplete
//!          ^                                                                      |
//!          +---------------------------- next player -----------------------------+
//! ```
//!
//! `GameOver` is terminal and entered from `AwaitingPlayerMove` when a
//! player reaches their objective.

use serde::{Deserialize, Serialize};

/// Step within the active player's turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    #[default]
    AwaitingTileInsertion,
    AwaitingPlayerMove,
    AwaitingActionResolution,
    TurnComplete,
    GameOver,
}

impl TurnPhase {
    /// The phase that normally follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            TurnPhase::AwaitingTileInsertion => TurnPhase::AwaitingPlayerMove,
            TurnPhase::AwaitingPlayerMove => TurnPhase::AwaitingActionResolution,
            TurnPhase::AwaitingActionResolution => TurnPhase::TurnComplete,
            TurnPhase::TurnComplete => TurnPhase::AwaitingTileInsertion,
            TurnPhase::GameOver => TurnPhase::GameOver,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::GameOver)
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TurnPhase::AwaitingTileInsertion => "awaiting tile insertion",
            TurnPhase::AwaitingPlayerMove => "awaiting player move",
            TurnPhase::AwaitingActionResolution => "awaiting action resolution",
            TurnPhase::TurnComplete => "turn complete",
            TurnPhase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_returns_to_insertion() {
        let mut phase = TurnPhase::default();
        for _ in 0..4 {
            phase = phase.next();
        }
        assert_eq!(phase, TurnPhase::AwaitingTileInsertion);
    }

    #[test]
    fn test_game_over_is_terminal() {
        assert!(TurnPhase::GameOver.is_terminal());
        assert_eq!(TurnPhase::GameOver.next(), TurnPhase::GameOver);
        assert!(!TurnPhase::TurnComplete.is_terminal());
    }
}
