//! Tile model: floor tiles with connectivity and action tiles with effects.
//!
//! Both are closed enums. The engine matches on them exhaustively, so a new
//! shape or effect is a compile-time change everywhere it matters.

pub mod action;
pub mod floor;
pub mod kind;

pub use action::{ActionKind, ActionTile, TargetKind};
pub use floor::{Edge, EdgeSet, FloorShape, FloorTile, Orientation};
pub use kind::{TileCategory, TileKind};
