//! Board: the mutable tile grid, shifting, and reachability.

pub mod grid;
pub mod reach;

pub use grid::{Board, BoardError, Cell, Line, Pos, Shift, ShiftRejection};
