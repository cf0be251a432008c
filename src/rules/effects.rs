//! Lingering area effects left by action tiles.
//!
//! Fire and Ice mark a 3x3 block of board positions around a centre cell,
//! clipped to the board. Effects are tied to positions rather than tiles:
//! sliding a tile out of a burning cell does not carry the fire with it.
//!
//! Each effect lives for `effect_cycles` full rounds of play and is ticked
//! once per completed turn.

use serde::{Deserialize, Serialize};

use crate::board::Pos;
use crate::tiles::ActionKind;

/// Kinds of effect that persist on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Nobody may enter or cross the area.
    Fire,
    /// No line through the area may shift.
    Ice,
}

impl EffectKind {
    /// The lingering effect an action tile leaves, if any.
    #[must_use]
    pub const fn from_action(kind: ActionKind) -> Option<Self> {
        match kind {
            ActionKind::Fire => Some(EffectKind::Fire),
            ActionKind::Ice => Some(EffectKind::Ice),
            ActionKind::DoubleMove | ActionKind::Backtrack => None,
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::Fire => f.write_str("fire"),
            EffectKind::Ice => f.write_str("ice"),
        }
    }
}

/// One effect on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub center: Pos,
    /// Completed turns left before the effect lifts.
    pub remaining_turns: u32,
}

impl ActiveEffect {
    #[must_use]
    pub const fn new(kind: EffectKind, center: Pos, remaining_turns: u32) -> Self {
        Self { kind, center, remaining_turns }
    }

    /// Whether `pos` lies in the 3x3 block around the centre.
    #[must_use]
    pub fn covers(&self, pos: Pos) -> bool {
        pos.x.abs_diff(self.center.x) <= 1 && pos.y.abs_diff(self.center.y) <= 1
    }
}

/// Positions of the 3x3 block around `center`, clipped to the board.
pub fn area(center: Pos, width: usize, height: usize) -> impl Iterator<Item = Pos> {
    let xs = center.x.saturating_sub(1)..=(center.x + 1).min(width.saturating_sub(1));
    let ys = center.y.saturating_sub(1)..=(center.y + 1).min(height.saturating_sub(1));
    ys.flat_map(move |y| xs.clone().map(move |x| Pos::new(x, y)))
}

/// Every effect currently on the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, effect: ActiveEffect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.effects.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    fn any_covering(&self, kind: EffectKind, pos: Pos) -> bool {
        self.effects.iter().any(|e| e.kind == kind && e.covers(pos))
    }

    #[must_use]
    pub fn is_burning(&self, pos: Pos) -> bool {
        self.any_covering(EffectKind::Fire, pos)
    }

    #[must_use]
    pub fn is_frozen(&self, pos: Pos) -> bool {
        self.any_covering(EffectKind::Ice, pos)
    }

    /// Count down every effect by one turn and return the ones that lifted.
    pub fn tick(&mut self) -> Vec<ActiveEffect> {
        for effect in &mut self.effects {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }
        let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|e| e.remaining_turns == 0);
        self.effects = live;
        expired
    }
}

impl FromIterator<ActiveEffect> for ActiveEffects {
    fn from_iter<I: IntoIterator<Item = ActiveEffect>>(iter: I) -> Self {
        Self {
            effects: iter.into_iter().collect(),
        }
    }
}
