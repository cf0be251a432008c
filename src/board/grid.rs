//! The board: a grid of cells plus the held tile.
//!
//! Cells are stored row-major. Every cell is either a floor tile or a
//! permanent void. Exactly one floor tile sits outside the grid as the held
//! tile; shifting a line pushes one tile out into the held slot and the old
//! held tile in at the opposite end, so the number of floor tiles in play
//! never changes.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::player::PlayerId;
use crate::tiles::{Edge, FloorTile};

/// Board coordinate. `x` is the column, `y` the row; `(0, 0)` is the
/// north-west corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A row or column of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    Row(usize),
    Column(usize),
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Row(y) => write!(f, "row {y}"),
            Line::Column(x) => write!(f, "column {x}"),
        }
    }
}

/// A one-step slide of a line toward one edge of the board.
///
/// Rows travel east or west, columns north or south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shift {
    pub line: Line,
    pub toward: Edge,
}

impl Shift {
    #[must_use]
    pub const fn row(y: usize, toward: Edge) -> Self {
        Self { line: Line::Row(y), toward }
    }

    #[must_use]
    pub const fn column(x: usize, toward: Edge) -> Self {
        Self { line: Line::Column(x), toward }
    }

    /// The shift that undoes this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            line: self.line,
            toward: self.toward.opposite(),
        }
    }

    /// Whether the direction is along the line.
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        matches!(
            (self.line, self.toward),
            (Line::Row(_), Edge::East | Edge::West) | (Line::Column(_), Edge::North | Edge::South)
        )
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} toward {}", self.line, self.toward)
    }
}

/// Contents of a grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Floor(FloorTile),
    /// A hole in the board; never holds a tile, never moves.
    Void,
}

impl Cell {
    #[must_use]
    pub fn as_floor(&self) -> Option<&FloorTile> {
        match self {
            Cell::Floor(tile) => Some(tile),
            Cell::Void => None,
        }
    }

    pub fn as_floor_mut(&mut self) -> Option<&mut FloorTile> {
        match self {
            Cell::Floor(tile) => Some(tile),
            Cell::Void => None,
        }
    }

    /// Whether this cell pins its row and column.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        match self {
            Cell::Floor(tile) => tile.is_fixed(),
            Cell::Void => true,
        }
    }
}

/// Why a shift was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum ShiftRejection {
    #[display("direction does not run along the line")]
    WrongDirection,
    #[display("line index is off the board")]
    OffBoard,
    #[display("line contains a fixed tile or void cell")]
    Anchored,
    #[display("line crosses a frozen cell")]
    Frozen,
    #[display("line reverses the previous shift")]
    Reversal,
}

/// Board-level failures.
#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    #[display("position {pos} is outside the {width}x{height} board")]
    OutOfBounds { pos: Pos, width: usize, height: usize },

    #[display("cannot shift {shift}: {reason}")]
    InvalidShift { shift: Shift, reason: ShiftRejection },

    #[display("cell {pos} holds no floor tile")]
    NotFloor { pos: Pos },

    #[display("expected {expected} cells for the board, got {found}")]
    CellCount { expected: usize, found: usize },

    #[display("board dimensions must be positive, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[display("a {width}x{height} board is too large")]
    Oversized { width: usize, height: usize },
}

/// Mutable grid of floor tiles plus the held tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    held: FloorTile,
}

impl Board {
    /// Build a board from row-major cells.
    pub fn new(width: usize, height: usize, cells: Vec<Cell>, held: FloorTile) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyBoard { width, height });
        }
        let expected = width
            .checked_mul(height)
            .ok_or(BoardError::Oversized { width, height })?;
        if cells.len() != expected {
            return Err(BoardError::CellCount {
                expected,
                found: cells.len(),
            });
        }
        Ok(Self { width, height, cells, held })
    }

    /// Split into `(width, height, cells, held)`.
    #[must_use]
    pub fn into_parts(self) -> (usize, usize, Vec<Cell>, FloorTile) {
        (self.width, self.height, self.cells, self.held)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Pos) -> Result<usize, BoardError> {
        if self.in_bounds(pos) {
            Ok(pos.y * self.width + pos.x)
        } else {
            Err(BoardError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Iterate over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Pos::new(x, y)))
    }

    /// The cell at `pos`.
    pub fn tile_at(&self, pos: Pos) -> Result<&Cell, BoardError> {
        let idx = self.index(pos)?;
        Ok(&self.cells[idx])
    }

    /// The floor tile at `pos`, failing on void cells.
    pub fn floor_at(&self, pos: Pos) -> Result<&FloorTile, BoardError> {
        self.tile_at(pos)?.as_floor().ok_or(BoardError::NotFloor { pos })
    }

    fn floor_at_mut(&mut self, pos: Pos) -> Result<&mut FloorTile, BoardError> {
        let idx = self.index(pos)?;
        self.cells[idx].as_floor_mut().ok_or(BoardError::NotFloor { pos })
    }

    /// The neighbouring position across `edge`, if it is on the board.
    #[must_use]
    pub fn neighbour(&self, pos: Pos, edge: Edge) -> Option<Pos> {
        let next = match edge {
            Edge::North => Pos::new(pos.x, pos.y.checked_sub(1)?),
            Edge::South => Pos::new(pos.x, pos.y + 1),
            Edge::West => Pos::new(pos.x.checked_sub(1)?, pos.y),
            Edge::East => Pos::new(pos.x + 1, pos.y),
        };
        self.in_bounds(next).then_some(next)
    }

    // === Held tile ===

    #[must_use]
    pub fn held(&self) -> &FloorTile {
        &self.held
    }

    /// Rotate the held tile; the grid is untouched.
    pub fn rotate_held(&mut self, quarter_turns: i32) {
        self.held.rotate(quarter_turns);
    }

    /// Floor tiles in play: grid plus held.
    #[must_use]
    pub fn floor_tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.as_floor().is_some()).count() + 1
    }

    // === Occupants ===

    /// Where a player currently stands, by scanning occupant sets.
    #[must_use]
    pub fn find_player(&self, player: PlayerId) -> Option<Pos> {
        self.positions().find(|&pos| {
            self.floor_at(pos)
                .map(|tile| tile.has_occupant(player))
                .unwrap_or(false)
        })
    }

    /// Place a player on the tile at `pos`.
    pub fn place_player(&mut self, player: PlayerId, pos: Pos) -> Result<(), BoardError> {
        self.floor_at_mut(pos)?.add_occupant(player);
        Ok(())
    }

    /// Move a player's token between tiles. Nothing changes on failure.
    pub fn relocate_player(&mut self, player: PlayerId, from: Pos, to: Pos) -> Result<(), BoardError> {
        self.floor_at(to)?;
        self.floor_at_mut(from)?.remove_occupant(player);
        self.floor_at_mut(to)?.add_occupant(player);
        Ok(())
    }

    // === Shifting ===

    /// Positions of a line, ordered from the edge tiles enter at to the
    /// edge they leave from.
    fn travel_order(&self, shift: Shift) -> Vec<Pos> {
        let mut positions: Vec<Pos> = match shift.line {
            Line::Row(y) => (0..self.width).map(|x| Pos::new(x, y)).collect(),
            Line::Column(x) => (0..self.height).map(|y| Pos::new(x, y)).collect(),
        };
        if matches!(shift.toward, Edge::West | Edge::North) {
            positions.reverse();
        }
        positions
    }

    fn line_in_range(&self, line: Line) -> bool {
        match line {
            Line::Row(y) => y < self.height,
            Line::Column(x) => x < self.width,
        }
    }

    /// Check a shift without performing it. `frozen` marks cells that may
    /// not move this turn.
    pub fn check_shift(&self, shift: Shift, frozen: impl Fn(Pos) -> bool) -> Result<(), BoardError> {
        let reject = |reason| Err(BoardError::InvalidShift { shift, reason });

        if !shift.is_well_formed() {
            return reject(ShiftRejection::WrongDirection);
        }
        if !self.line_in_range(shift.line) {
            return reject(ShiftRejection::OffBoard);
        }

        let positions = self.travel_order(shift);
        if positions.iter().any(|&pos| self.cells[pos.y * self.width + pos.x].is_anchored()) {
            return reject(ShiftRejection::Anchored);
        }
        if positions.iter().any(|&pos| frozen(pos)) {
            return reject(ShiftRejection::Frozen);
        }
        Ok(())
    }

    /// Slide a line one step, swapping the far-edge tile with the held tile.
    ///
    /// Players on the ejected tile land on the tile pushed in at the near
    /// edge. Either the whole shift happens or nothing changes.
    pub fn shift(&mut self, shift: Shift, frozen: impl Fn(Pos) -> bool) -> Result<(), BoardError> {
        self.check_shift(shift, frozen)?;

        let indices: Vec<usize> = self
            .travel_order(shift)
            .into_iter()
            .map(|pos| pos.y * self.width + pos.x)
            .collect();

        // Walk the far-edge tile back to the near edge, moving every other
        // tile one step forward.
        for pair in indices.windows(2).rev() {
            self.cells.swap(pair[0], pair[1]);
        }
        if let Some(Cell::Floor(near)) = self.cells.get_mut(indices[0]) {
            std::mem::swap(near, &mut self.held);
            for player in self.held.take_occupants() {
                near.add_occupant(player);
            }
        }

        debug!(%shift, "shifted line");
        Ok(())
    }

    /// Shift a row east or west.
    pub fn shift_row(&mut self, row: usize, toward: Edge) -> Result<(), BoardError> {
        self.shift(Shift::row(row, toward), |_| false)
    }

    /// Shift a column north or south.
    pub fn shift_column(&mut self, column: usize, toward: Edge) -> Result<(), BoardError> {
        self.shift(Shift::column(column, toward), |_| false)
    }

    /// Rows with no fixed tile, void or frozen cell.
    pub fn shiftable_rows(&self, frozen: impl Fn(Pos) -> bool) -> Vec<usize> {
        (0..self.height)
            .filter(|&y| self.check_shift(Shift::row(y, Edge::East), &frozen).is_ok())
            .collect()
    }

    /// Columns with no fixed tile, void or frozen cell.
    pub fn shiftable_columns(&self, frozen: impl Fn(Pos) -> bool) -> Vec<usize> {
        (0..self.width)
            .filter(|&x| self.check_shift(Shift::column(x, Edge::South), &frozen).is_ok())
            .collect()
    }

    /// Every shift that `check_shift` would accept.
    pub fn legal_shifts(&self, frozen: impl Fn(Pos) -> bool) -> Vec<Shift> {
        let rows = (0..self.height).flat_map(|y| [Shift::row(y, Edge::East), Shift::row(y, Edge::West)]);
        let columns = (0..self.width).flat_map(|x| [Shift::column(x, Edge::South), Shift::column(x, Edge::North)]);
        rows.chain(columns)
            .filter(|&shift| self.check_shift(shift, &frozen).is_ok())
            .collect()
    }
}
