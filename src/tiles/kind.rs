//! Tile type keys used by the silk bag and level definitions.

use serde::{Deserialize, Serialize};

use super::action::ActionKind;
use super::floor::FloorShape;

/// Which half of the bag a tile belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCategory {
    Floor,
    Action,
}

impl std::fmt::Display for TileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileCategory::Floor => f.write_str("floor"),
            TileCategory::Action => f.write_str("action"),
        }
    }
}

/// Type key of a tile sitting in the bag.
///
/// Floor tiles in the bag have no orientation yet; one is rolled when the
/// tile is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    Floor(FloorShape),
    Action(ActionKind),
}

impl TileKind {
    /// Every tile kind, floors first.
    pub fn all() -> impl Iterator<Item = TileKind> {
        FloorShape::ALL
            .into_iter()
            .map(TileKind::Floor)
            .chain(ActionKind::ALL.into_iter().map(TileKind::Action))
    }

    #[must_use]
    pub const fn category(self) -> TileCategory {
        match self {
            TileKind::Floor(_) => TileCategory::Floor,
            TileKind::Action(_) => TileCategory::Action,
        }
    }
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileKind::Floor(shape) => write!(f, "{shape}"),
            TileKind::Action(kind) => write!(f, "{kind}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds() {
        let kinds: Vec<_> = TileKind::all().collect();
        assert_eq!(kinds.len(), 8);
        assert_eq!(kinds[0], TileKind::Floor(FloorShape::Straight));
        assert_eq!(kinds[7], TileKind::Action(ActionKind::Backtrack));
    }

    #[test]
    fn test_category() {
        assert_eq!(TileKind::Floor(FloorShape::Goal).category(), TileCategory::Floor);
        assert_eq!(TileKind::Action(ActionKind::Ice).category(), TileCategory::Action);
    }
}
