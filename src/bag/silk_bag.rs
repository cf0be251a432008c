//! The silk bag: the shared, finite draw pile.
//!
//! Contents are a sequence of tile kinds. Draws pick uniformly among the
//! remaining tiles of the requested category using the game RNG, so two
//! games with the same seed draw the same tiles in the same order.
//!
//! ```
//! use labyrinth::bag::SilkBag;
//! use labyrinth::core::GameRng;
//! use labyrinth::tiles::{ActionKind, FloorShape, TileKind};
//!
//! let mut bag = SilkBag::from_counts([
//!     (TileKind::Floor(FloorShape::Corner), 2),
//!     (TileKind::Action(ActionKind::Fire), 1),
//! ]);
//! let mut rng = GameRng::new(1);
//!
//! let tile = bag.draw_floor_tile(&mut rng).unwrap();
//! assert_eq!(tile.shape(), FloorShape::Corner);
//! assert_eq!(bag.remaining_count(TileKind::Floor(FloorShape::Corner)), 1);
//! ```

use std::collections::BTreeMap;

use derive_more::{Display, Error};
use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::GameRng;
use crate::tiles::{ActionTile, FloorTile, Orientation, TileCategory, TileKind};

/// Bag failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum BagError {
    #[display("no {category} tiles left in the bag")]
    BagEmpty { category: TileCategory },
}

/// Remaining tiles for a game.
///
/// Backed by `im::Vector` so snapshots handed to the presentation layer
/// share structure with the live bag.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SilkBag {
    contents: Vector<TileKind>,
}

impl SilkBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a bag from per-kind counts.
    pub fn from_counts(counts: impl IntoIterator<Item = (TileKind, usize)>) -> Self {
        let contents = counts
            .into_iter()
            .flat_map(|(kind, n)| std::iter::repeat(kind).take(n))
            .collect();
        Self { contents }
    }

    /// Build from an explicit sequence, as read back from a save.
    #[must_use]
    pub fn from_contents(contents: impl IntoIterator<Item = TileKind>) -> Self {
        Self {
            contents: contents.into_iter().collect(),
        }
    }

    /// Remaining tiles in bag order.
    pub fn contents(&self) -> impl Iterator<Item = TileKind> + '_ {
        self.contents.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// How many tiles of `kind` remain.
    #[must_use]
    pub fn remaining_count(&self, kind: TileKind) -> usize {
        self.contents.iter().filter(|&&k| k == kind).count()
    }

    /// How many tiles of a category remain.
    #[must_use]
    pub fn remaining_in(&self, category: TileCategory) -> usize {
        self.contents.iter().filter(|k| k.category() == category).count()
    }

    /// Remaining count for every tile kind, including zeros.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<TileKind, usize> {
        let mut counts: BTreeMap<TileKind, usize> = TileKind::all().map(|k| (k, 0)).collect();
        for kind in self.contents.iter() {
            *counts.entry(*kind).or_default() += 1;
        }
        counts
    }

    /// Draw a floor tile with a random orientation.
    pub fn draw_floor_tile(&mut self, rng: &mut GameRng) -> Result<FloorTile, BagError> {
        let shape = self.draw_matching(TileCategory::Floor, rng, |kind| match kind {
            TileKind::Floor(shape) => Some(shape),
            TileKind::Action(_) => None,
        })?;
        let orientation = Orientation::from_quarter_turns(rng.gen_range_usize(0..4) as i32);
        Ok(FloorTile::new(shape, orientation))
    }

    /// Draw an action tile.
    pub fn draw_action_tile(&mut self, rng: &mut GameRng) -> Result<ActionTile, BagError> {
        let kind = self.draw_matching(TileCategory::Action, rng, |kind| match kind {
            TileKind::Action(action) => Some(action),
            TileKind::Floor(_) => None,
        })?;
        Ok(ActionTile::new(kind))
    }

    /// Put a tile back. This is the only operation that raises a count.
    pub fn return_tile(&mut self, kind: TileKind) {
        self.contents.push_back(kind);
    }

    fn draw_matching<T>(
        &mut self,
        category: TileCategory,
        rng: &mut GameRng,
        extract: impl Fn(TileKind) -> Option<T>,
    ) -> Result<T, BagError> {
        let mut candidates: Vec<(usize, T)> = self
            .contents
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| extract(k).map(|v| (i, v)))
            .collect();

        if candidates.is_empty() {
            return Err(BagError::BagEmpty { category });
        }

        let pick = rng.gen_range_usize(0..candidates.len());
        let (index, value) = candidates.swap_remove(pick);
        let kind = self.contents.remove(index);
        debug!(%kind, remaining = self.contents.len(), "drew tile from silk bag");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{ActionKind, FloorShape};

    fn mixed_bag() -> SilkBag {
        SilkBag::from_counts([
            (TileKind::Floor(FloorShape::Straight), 3),
            (TileKind::Floor(FloorShape::TShape), 2),
            (TileKind::Action(ActionKind::Ice), 1),
        ])
    }

    #[test]
    fn test_from_counts() {
        let bag = mixed_bag();
        assert_eq!(bag.len(), 6);
        assert_eq!(bag.remaining_in(TileCategory::Floor), 5);
        assert_eq!(bag.remaining_in(TileCategory::Action), 1);
        assert_eq!(bag.remaining_count(TileKind::Floor(FloorShape::Corner)), 0);
    }

    #[test]
    fn test_draw_floor_never_returns_action() {
        let mut bag = mixed_bag();
        let mut rng = GameRng::new(3);
        for _ in 0..5 {
            let tile = bag.draw_floor_tile(&mut rng).unwrap();
            assert!(matches!(tile.shape(), FloorShape::Straight | FloorShape::TShape));
        }
        assert_eq!(
            bag.draw_floor_tile(&mut rng),
            Err(BagError::BagEmpty { category: TileCategory::Floor })
        );
        // The action tile is still there
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.draw_action_tile(&mut rng).unwrap().kind, ActionKind::Ice);
    }

    #[test]
    fn test_empty_bag_errors() {
        let mut bag = SilkBag::new();
        let mut rng = GameRng::new(0);
        assert!(matches!(bag.draw_action_tile(&mut rng), Err(BagError::BagEmpty { .. })));
        assert!(matches!(bag.draw_floor_tile(&mut rng), Err(BagError::BagEmpty { .. })));
    }

    #[test]
    fn test_counts_monotonic() {
        let mut bag = mixed_bag();
        let mut rng = GameRng::new(11);
        let mut previous = bag.counts();
        while bag.draw_floor_tile(&mut rng).is_ok() {
            let now = bag.counts();
            for (kind, count) in &now {
                assert!(count <= &previous[kind]);
            }
            previous = now;
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = mixed_bag();
        let mut b = mixed_bag();
        let mut rng_a = GameRng::new(99);
        let mut rng_b = GameRng::new(99);
        for _ in 0..5 {
            assert_eq!(a.draw_floor_tile(&mut rng_a), b.draw_floor_tile(&mut rng_b));
        }
    }

    #[test]
    fn test_return_tile() {
        let mut bag = SilkBag::new();
        bag.return_tile(TileKind::Action(ActionKind::Fire));
        assert_eq!(bag.remaining_count(TileKind::Action(ActionKind::Fire)), 1);
    }

    #[test]
    fn test_counts_lists_every_kind() {
        let counts = SilkBag::new().counts();
        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&c| c == 0));
    }
}
