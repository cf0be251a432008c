//! The silk bag: shared inventory of undrawn floor and action tiles.

pub mod silk_bag;

pub use silk_bag::{BagError, SilkBag};
