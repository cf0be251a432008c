//! Floor tiles: shape, orientation and derived connectivity.
//!
//! A floor tile's open edges are a pure function of its shape and
//! orientation. Rotation only ever changes the orientation, so the set of
//! shapes in play is fixed for the lifetime of a game.
//!
//! ## Orientation
//!
//! Orientations are clockwise quarter turns from the shape's base layout:
//!
//! ```
//! use labyrinth::tiles::{Edge, FloorShape, FloorTile, Orientation};
//!
//! // A corner opens north and east in its base orientation.
//! let mut corner = FloorTile::new(FloorShape::Corner, Orientation::Deg0);
//! assert!(corner.is_open(Edge::North) && corner.is_open(Edge::East));
//!
//! // One clockwise quarter turn: east and south.
//! corner.rotate(1);
//! assert!(corner.is_open(Edge::East) && corner.is_open(Edge::South));
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::player::PlayerId;

/// One side of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    North,
    East,
    South,
    West,
}

impl Edge {
    /// All edges in clockwise order starting from north.
    pub const ALL: [Edge; 4] = [Edge::North, Edge::East, Edge::South, Edge::West];

    /// The edge facing this one across a shared border.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Edge::North => Edge::South,
            Edge::East => Edge::West,
            Edge::South => Edge::North,
            Edge::West => Edge::East,
        }
    }

    /// Rotate clockwise by the given number of quarter turns.
    #[must_use]
    pub const fn rotated(self, quarter_turns: u8) -> Self {
        Self::ALL[(self.index() + quarter_turns as usize) % 4]
    }

    const fn index(self) -> usize {
        match self {
            Edge::North => 0,
            Edge::East => 1,
            Edge::South => 2,
            Edge::West => 3,
        }
    }

    const fn bit(self) -> u8 {
        1 << self.index()
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Edge::North => "north",
            Edge::East => "east",
            Edge::South => "south",
            Edge::West => "west",
        };
        f.write_str(name)
    }
}

/// Compact set of open edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EdgeSet(u8);

impl EdgeSet {
    /// Build a set from a list of edges.
    #[must_use]
    pub fn of(edges: &[Edge]) -> Self {
        Self(edges.iter().fold(0, |acc, e| acc | e.bit()))
    }

    /// Check whether an edge is in the set.
    #[must_use]
    pub const fn contains(self, edge: Edge) -> bool {
        self.0 & edge.bit() != 0
    }

    /// Rotate every edge clockwise by `quarter_turns`.
    #[must_use]
    pub fn rotated(self, quarter_turns: u8) -> Self {
        let edges: SmallVec<[Edge; 4]> = Edge::ALL
            .into_iter()
            .filter(|&e| self.contains(e))
            .map(|e| e.rotated(quarter_turns))
            .collect();
        Self::of(&edges)
    }

    /// Number of open edges.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the contained edges in clockwise order.
    pub fn iter(self) -> impl Iterator<Item = Edge> {
        Edge::ALL.into_iter().filter(move |&e| self.contains(e))
    }
}

/// Closed set of connectivity patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorShape {
    /// Open on two opposite edges.
    Straight,
    /// Open on two adjacent edges.
    Corner,
    /// Open on three edges.
    TShape,
    /// Open on every edge.
    Goal,
}

impl FloorShape {
    pub const ALL: [FloorShape; 4] = [
        FloorShape::Straight,
        FloorShape::Corner,
        FloorShape::TShape,
        FloorShape::Goal,
    ];

    /// Open edges at `Orientation::Deg0`.
    #[must_use]
    pub fn base_edges(self) -> EdgeSet {
        match self {
            FloorShape::Straight => EdgeSet::of(&[Edge::North, Edge::South]),
            FloorShape::Corner => EdgeSet::of(&[Edge::North, Edge::East]),
            FloorShape::TShape => EdgeSet::of(&[Edge::East, Edge::South, Edge::West]),
            FloorShape::Goal => EdgeSet::of(&Edge::ALL),
        }
    }
}

impl std::fmt::Display for FloorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FloorShape::Straight => "straight",
            FloorShape::Corner => "corner",
            FloorShape::TShape => "t_shape",
            FloorShape::Goal => "goal",
        };
        f.write_str(name)
    }
}

/// Clockwise rotation from a shape's base layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    /// Build from a quarter-turn count; any integer is reduced mod 4.
    #[must_use]
    pub fn from_quarter_turns(quarter_turns: i32) -> Self {
        Self::ALL[quarter_turns.rem_euclid(4) as usize]
    }

    /// Clockwise quarter turns from `Deg0` (0-3).
    #[must_use]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 1,
            Orientation::Deg180 => 2,
            Orientation::Deg270 => 3,
        }
    }

    /// Rotate by a signed number of quarter turns (negative = anticlockwise).
    #[must_use]
    pub fn rotated(self, quarter_turns: i32) -> Self {
        Self::from_quarter_turns(i32::from(self.quarter_turns()) + quarter_turns.rem_euclid(4))
    }
}

/// A piece of the maze.
///
/// `occupants` lists the players standing on the tile. They travel with the
/// tile when a row or column shifts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorTile {
    shape: FloorShape,
    orientation: Orientation,
    /// Fixed tiles are placed by the level and never move.
    fixed: bool,
    occupants: SmallVec<[PlayerId; 4]>,
}

impl FloorTile {
    /// Create a free (shiftable) tile with no occupants.
    #[must_use]
    pub fn new(shape: FloorShape, orientation: Orientation) -> Self {
        Self {
            shape,
            orientation,
            fixed: false,
            occupants: SmallVec::new(),
        }
    }

    /// Create a tile that pins its row and column in place.
    #[must_use]
    pub fn fixed(shape: FloorShape, orientation: Orientation) -> Self {
        Self {
            fixed: true,
            ..Self::new(shape, orientation)
        }
    }

    #[must_use]
    pub fn shape(&self) -> FloorShape {
        self.shape
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Edges a player may cross to leave or enter this tile.
    #[must_use]
    pub fn open_edges(&self) -> EdgeSet {
        self.shape.base_edges().rotated(self.orientation.quarter_turns())
    }

    #[must_use]
    pub fn is_open(&self, edge: Edge) -> bool {
        self.open_edges().contains(edge)
    }

    /// Whether a player can step from this tile to `neighbour` across `edge`.
    #[must_use]
    pub fn connects_to(&self, edge: Edge, neighbour: &FloorTile) -> bool {
        self.is_open(edge) && neighbour.is_open(edge.opposite())
    }

    /// Rotate clockwise by `quarter_turns` (negative for anticlockwise).
    pub fn rotate(&mut self, quarter_turns: i32) {
        self.orientation = self.orientation.rotated(quarter_turns);
    }

    // === Occupants ===

    #[must_use]
    pub fn occupants(&self) -> &[PlayerId] {
        &self.occupants
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    #[must_use]
    pub fn has_occupant(&self, player: PlayerId) -> bool {
        self.occupants.contains(&player)
    }

    /// Add a player. Adding a player already present is a no-op.
    pub fn add_occupant(&mut self, player: PlayerId) {
        if !self.has_occupant(player) {
            self.occupants.push(player);
        }
    }

    /// Remove a player; returns true if they were on this tile.
    pub fn remove_occupant(&mut self, player: PlayerId) -> bool {
        match self.occupants.iter().position(|&p| p == player) {
            Some(idx) => {
                self.occupants.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove and return every occupant.
    pub fn take_occupants(&mut self) -> SmallVec<[PlayerId; 4]> {
        std::mem::take(&mut self.occupants)
    }
}
