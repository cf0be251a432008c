//! Game rules: the turn state machine and everything it resolves.
//!
//! - `setup`: opening position from a `GameSession`
//! - `phase`: turn phases
//! - `engine`: `TurnEngine`, the only mutator of a `GameState`
//! - `effects`: lingering Fire and Ice areas
//! - `event`: what happened, reported back to the caller
//! - `error`: why an action was refused

pub mod effects;
pub mod engine;
pub mod error;
pub mod event;
pub mod phase;
pub mod setup;

pub use effects::{ActiveEffect, ActiveEffects, EffectKind};
pub use engine::TurnEngine;
pub use error::{ActionFault, MoveFault, RuleError, ShiftFault};
pub use event::GameEvent;
pub use phase::TurnPhase;
pub use setup::build_state;
