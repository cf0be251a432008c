//! Level definitions: the one-shot input a game is built from.

pub mod definition;

pub use definition::{
    ActionCounts, FixedTile, FloorCounts, LevelDefinition, LevelError, PlayerSlot, TileCounts,
};
