//! Level definitions read from TOML.
//!
//! A level fixes the board size, any fixed tiles and void cells, the start
//! and objective of every seat, and how many tiles of each kind go into the
//! silk bag. It is read once when a game is created.
//!
//! ```toml
//! name = "levels/crossroads"
//! width = 7
//! height = 7
//!
//! [[players]]
//! start = { x = 0, y = 0 }
//! objective = { x = 6, y = 6 }
//!
//! [[fixed]]
//! pos = { x = 3, y = 3 }
//! shape = "goal"
//! orientation = "deg0"
//!
//! [tiles.floor]
//! straight = 20
//! corner = 20
//! t_shape = 12
//!
//! [tiles.action]
//! fire = 2
//! double_move = 3
//! ```

use std::path::Path;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::board::Pos;
use crate::core::player::PlayerId;
use crate::tiles::{ActionKind, FloorShape, Orientation, TileKind};

/// Level loading and validation failures.
#[derive(Debug, Display, Error)]
pub enum LevelError {
    #[display("could not read level file: {source}")]
    Io { source: std::io::Error },

    #[display("malformed level file: {source}")]
    Parse { source: toml::de::Error },

    #[display("invalid level: {reason}")]
    Invalid { reason: String },

    #[display("level needs {needed} floor tiles but the bag holds {available}")]
    NotEnoughFloorTiles { needed: usize, available: usize },

    #[display("{requested} players requested; allowed {min}..={max} and the level has {slots} seats")]
    PlayerCount {
        requested: usize,
        min: usize,
        max: usize,
        slots: usize,
    },
}

impl LevelError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid { reason: reason.into() }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<toml::de::Error> for LevelError {
    fn from(source: toml::de::Error) -> Self {
        Self::Parse { source }
    }
}

/// Start and objective for one seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub start: Pos,
    pub objective: Pos,
}

/// A tile the level pins in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTile {
    pub pos: Pos,
    pub shape: FloorShape,
    #[serde(default)]
    pub orientation: Orientation,
}

/// Floor tile counts per shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorCounts {
    pub straight: usize,
    pub corner: usize,
    pub t_shape: usize,
    pub goal: usize,
}

impl FloorCounts {
    #[must_use]
    pub fn get(&self, shape: FloorShape) -> usize {
        match shape {
            FloorShape::Straight => self.straight,
            FloorShape::Corner => self.corner,
            FloorShape::TShape => self.t_shape,
            FloorShape::Goal => self.goal,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        FloorShape::ALL
            .into_iter()
            .fold(0, |sum: usize, s| sum.saturating_add(self.get(s)))
    }
}

/// Action tile counts per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionCounts {
    pub fire: usize,
    pub ice: usize,
    pub double_move: usize,
    pub backtrack: usize,
}

impl ActionCounts {
    #[must_use]
    pub fn get(&self, kind: ActionKind) -> usize {
        match kind {
            ActionKind::Fire => self.fire,
            ActionKind::Ice => self.ice,
            ActionKind::DoubleMove => self.double_move,
            ActionKind::Backtrack => self.backtrack,
        }
    }
}

/// Initial silk bag contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileCounts {
    pub floor: FloorCounts,
    pub action: ActionCounts,
}

/// Everything needed to set up a game on one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Level name, possibly namespaced (`levels/x`, `custom_levels/x`).
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Seats in turn order. Games may use fewer seats than the level offers.
    pub players: Vec<PlayerSlot>,
    #[serde(default)]
    pub fixed: Vec<FixedTile>,
    #[serde(default)]
    pub void: Vec<Pos>,
    #[serde(default)]
    pub tiles: TileCounts,
}

impl LevelDefinition {
    /// Parse and validate a level from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, LevelError> {
        let level: Self = toml::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Read, parse and validate a level file.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path)?;
        let level = Self::from_toml_str(&text)?;
        debug!(name = %level.name, "loaded level definition");
        Ok(level)
    }

    /// Number of tiles of `kind` the bag starts with.
    #[must_use]
    pub fn amount(&self, kind: TileKind) -> usize {
        match kind {
            TileKind::Floor(shape) => self.tiles.floor.get(shape),
            TileKind::Action(action) => self.tiles.action.get(action),
        }
    }

    /// Initial bag counts for every tile kind.
    pub fn tile_counts(&self) -> impl Iterator<Item = (TileKind, usize)> + '_ {
        TileKind::all().map(|kind| (kind, self.amount(kind)))
    }

    /// Start positions of every seat, for previews.
    #[must_use]
    pub fn player_starts(&self) -> Vec<Pos> {
        self.players.iter().map(|slot| slot.start).collect()
    }

    fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    #[must_use]
    pub fn is_void(&self, pos: Pos) -> bool {
        self.void.contains(&pos)
    }

    #[must_use]
    pub fn fixed_at(&self, pos: Pos) -> Option<&FixedTile> {
        self.fixed.iter().find(|f| f.pos == pos)
    }

    /// Grid cells, or `None` when the dimensions overflow.
    #[must_use]
    pub fn cell_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Floor tiles the bag must supply: every free cell plus the held tile.
    #[must_use]
    pub fn floor_tiles_needed(&self) -> usize {
        let cells = self.width.saturating_mul(self.height);
        cells
            .saturating_sub(self.void.len() + self.fixed.len())
            .saturating_add(1)
    }

    /// Check the level is playable.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelError::invalid(format!(
                "board must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        if self.cell_count().is_none() {
            return Err(LevelError::invalid(format!(
                "a {}x{} board is too large",
                self.width, self.height
            )));
        }
        if self.players.is_empty() {
            return Err(LevelError::invalid("level defines no player seats"));
        }
        if self.players.len() > PlayerId::LIMIT {
            return Err(LevelError::invalid(format!(
                "level defines {} seats, at most {} are supported",
                self.players.len(),
                PlayerId::LIMIT
            )));
        }

        for (i, cell) in self.void.iter().enumerate() {
            if !self.in_bounds(*cell) {
                return Err(LevelError::invalid(format!("void cell {cell} is off the board")));
            }
            if self.void[..i].contains(cell) {
                return Err(LevelError::invalid(format!("void cell {cell} listed twice")));
            }
        }
        for (i, fixed) in self.fixed.iter().enumerate() {
            if !self.in_bounds(fixed.pos) {
                return Err(LevelError::invalid(format!("fixed tile {} is off the board", fixed.pos)));
            }
            if self.is_void(fixed.pos) || self.fixed[..i].iter().any(|f| f.pos == fixed.pos) {
                return Err(LevelError::invalid(format!("cell {} is defined twice", fixed.pos)));
            }
        }
        for (seat, slot) in self.players.iter().enumerate() {
            for pos in [slot.start, slot.objective] {
                if !self.in_bounds(pos) || self.is_void(pos) {
                    return Err(LevelError::invalid(format!(
                        "seat {seat} uses {pos}, which is not a floor cell"
                    )));
                }
            }
            if let Some(other) = self.players[..seat].iter().position(|s| s.start == slot.start) {
                return Err(LevelError::invalid(format!(
                    "seats {other} and {seat} both start on {}",
                    slot.start
                )));
            }
        }

        let needed = self.floor_tiles_needed();
        let available = self.tiles.floor.total();
        if available < needed {
            return Err(LevelError::NotEnoughFloorTiles { needed, available });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"
        name = "levels/small"
        width = 3
        height = 3
        void = [{ x = 1, y = 1 }]

        [[players]]
        start = { x = 0, y = 0 }
        objective = { x = 2, y = 2 }

        [[players]]
        start = { x = 2, y = 0 }
        objective = { x = 0, y = 2 }

        [[fixed]]
        pos = { x = 2, y = 2 }
        shape = "goal"

        [tiles.floor]
        straight = 4
        corner = 4

        [tiles.action]
        fire = 1
        backtrack = 2
    "#;

    #[test]
    fn test_parse_level() {
        let level = LevelDefinition::from_toml_str(SMALL).unwrap();
        assert_eq!(level.name, "levels/small");
        assert_eq!(level.players.len(), 2);
        assert_eq!(level.fixed[0].orientation, Orientation::Deg0);
        assert_eq!(level.amount(TileKind::Floor(FloorShape::Corner)), 4);
        assert_eq!(level.amount(TileKind::Action(ActionKind::Backtrack)), 2);
        assert_eq!(level.amount(TileKind::Action(ActionKind::Ice)), 0);
        // 9 cells - 1 void - 1 fixed + held
        assert_eq!(level.floor_tiles_needed(), 8);
    }

    #[test]
    fn test_tile_counts_cover_every_kind() {
        let level = LevelDefinition::from_toml_str(SMALL).unwrap();
        let counts: Vec<_> = level.tile_counts().collect();
        assert_eq!(counts.len(), 8);
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 11);
    }

    #[test]
    fn test_not_enough_floor_tiles() {
        let text = SMALL.replace("corner = 4", "corner = 3");
        assert!(matches!(
            LevelDefinition::from_toml_str(&text),
            Err(LevelError::NotEnoughFloorTiles { needed: 8, available: 7 })
        ));
    }

    #[test]
    fn test_start_on_void_rejected() {
        let text = SMALL.replace("start = { x = 2, y = 0 }", "start = { x = 1, y = 1 }");
        assert!(matches!(
            LevelDefinition::from_toml_str(&text),
            Err(LevelError::Invalid { .. })
        ));
    }

    #[test]
    fn test_shared_start_rejected() {
        let text = SMALL.replace("start = { x = 2, y = 0 }", "start = { x = 0, y = 0 }");
        let err = LevelDefinition::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("both start on"), "{err}");
    }

    #[test]
    fn test_huge_dimensions_rejected() {
        let text = SMALL
            .replace("width = 3", "width = 9000000000")
            .replace("height = 3", "height = 9000000000");
        let err = LevelDefinition::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");

        let level: LevelDefinition = toml::from_str(&text).unwrap();
        assert_eq!(level.cell_count(), None);
        assert_eq!(level.floor_tiles_needed(), usize::MAX - 1);
    }

    #[test]
    fn test_huge_tile_counts_saturate() {
        let text = SMALL.replace(
            "straight = 4\n        corner = 4",
            "straight = 9223372036854775807\n        corner = 9223372036854775807\n        t_shape = 9223372036854775807",
        );
        let level: LevelDefinition = toml::from_str(&text).unwrap();
        assert_eq!(level.tiles.floor.total(), usize::MAX);
    }

    #[test]
    fn test_seat_limit() {
        let seated = |seats: usize| {
            let mut text = format!("name = \"levels/crowd\"\nwidth = {seats}\nheight = 2\n");
            for x in 0..seats {
                text.push_str(&format!(
                    "[[players]]\nstart = {{ x = {x}, y = 0 }}\nobjective = {{ x = {x}, y = 1 }}\n"
                ));
            }
            text.push_str(&format!("[tiles.floor]\nstraight = {}\n", 2 * seats + 1));
            LevelDefinition::from_toml_str(&text)
        };
        assert!(seated(PlayerId::LIMIT).is_ok());
        assert!(matches!(seated(PlayerId::LIMIT + 1), Err(LevelError::Invalid { .. })));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            LevelDefinition::from_toml_str("width = \"seven\""),
            Err(LevelError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LevelDefinition::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
    }

    #[test]
    fn test_player_starts() {
        let level = LevelDefinition::from_toml_str(SMALL).unwrap();
        assert_eq!(level.player_starts(), vec![Pos::new(0, 0), Pos::new(2, 0)]);
    }
}
