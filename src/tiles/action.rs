//! Action tiles: one-shot rule-bending effects.
//!
//! An action tile carries nothing but its kind. The turn engine resolves
//! the effect; see `rules::effects`.

use serde::{Deserialize, Serialize};

/// Closed set of action effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Sets a 3×3 area alight; nobody may enter or cross it for a cycle.
    Fire,
    /// Freezes a 3×3 area; rows and columns through it cannot shift for a cycle.
    Ice,
    /// Grants the player a second move this turn.
    DoubleMove,
    /// Sends a player back to where they stood two turns ago.
    Backtrack,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Fire,
        ActionKind::Ice,
        ActionKind::DoubleMove,
        ActionKind::Backtrack,
    ];

    /// What the caller must supply when playing this kind.
    #[must_use]
    pub const fn target_kind(self) -> TargetKind {
        match self {
            ActionKind::Fire | ActionKind::Ice => TargetKind::Cell,
            ActionKind::DoubleMove => TargetKind::None,
            ActionKind::Backtrack => TargetKind::Player,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Fire => "fire",
            ActionKind::Ice => "ice",
            ActionKind::DoubleMove => "double_move",
            ActionKind::Backtrack => "backtrack",
        };
        f.write_str(name)
    }
}

/// Target category an action kind expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    None,
    Cell,
    Player,
}

/// A drawn action tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionTile {
    pub kind: ActionKind,
}

impl ActionTile {
    #[must_use]
    pub const fn new(kind: ActionKind) -> Self {
        Self { kind }
    }
}
