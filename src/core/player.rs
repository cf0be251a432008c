//! Player identification and per-player game data.
//!
//! ## PlayerId
//!
//! Seat identifier, stable for the whole game and independent of any display
//! name. Seats are numbered in turn order starting at 0.
//!
//! ## ProfileId
//!
//! Opaque key into the external profile store, used only for win tracking.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::Pos;
use crate::tiles::ActionKind;

/// Seat identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Number of distinct seat ids.
    pub const LIMIT: usize = u8::MAX as usize + 1;

    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use labyrinth::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(Self::LIMIT)).map_while(|i| u8::try_from(i).ok().map(PlayerId))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Key of a persisted player profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Profile {}", self.0)
    }
}

/// Number of past turn-end positions kept for Backtrack.
pub const HISTORY_DEPTH: usize = 2;

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Current cell; kept in sync with the board's occupant sets.
    pub position: Pos,
    /// Reaching this cell wins the game.
    pub objective: Pos,
    /// Profile credited with a win, if any.
    pub profile: Option<ProfileId>,
    /// Action tiles drawn but not yet played.
    hand: Vec<ActionKind>,
    /// Positions at the end of this player's most recent turns, oldest first.
    history: SmallVec<[Pos; HISTORY_DEPTH]>,
    /// Each player can be sent back only once per game.
    backtracked: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, position: Pos, objective: Pos, profile: Option<ProfileId>) -> Self {
        Self {
            id,
            position,
            objective,
            profile,
            hand: Vec::new(),
            history: SmallVec::new(),
            backtracked: false,
        }
    }

    #[must_use]
    pub fn has_won(&self) -> bool {
        self.position == self.objective
    }

    // === Hand ===

    #[must_use]
    pub fn hand(&self) -> &[ActionKind] {
        &self.hand
    }

    pub fn give(&mut self, kind: ActionKind) {
        self.hand.push(kind);
    }

    #[must_use]
    pub fn holds(&self, kind: ActionKind) -> bool {
        self.hand.contains(&kind)
    }

    /// Remove one tile of `kind` from the hand; false if none held.
    pub fn take(&mut self, kind: ActionKind) -> bool {
        match self.hand.iter().position(|&k| k == kind) {
            Some(idx) => {
                self.hand.remove(idx);
                true
            }
            None => false,
        }
    }

    // === Backtrack bookkeeping ===

    /// Record where the player ended a turn.
    pub fn remember_position(&mut self) {
        if self.history.len() == HISTORY_DEPTH {
            self.history.remove(0);
        }
        self.history.push(self.position);
    }

    /// Past positions, most distant first.
    #[must_use]
    pub fn history(&self) -> &[Pos] {
        &self.history
    }

    #[must_use]
    pub fn was_backtracked(&self) -> bool {
        self.backtracked
    }

    pub fn mark_backtracked(&mut self) {
        self.backtracked = true;
    }
}
