//! Core engine types: players, state, actions, RNG, configuration.
//!
//! Nothing here knows how a turn unfolds; that lives in `rules`. These are
//! the values the rules operate on and the persistence layer stores.

pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use player::{Player, PlayerId, ProfileId, HISTORY_DEPTH};
pub use rng::{GameRng, GameRngState};
pub use config::{GameSession, GameSessionBuilder, RulesConfig};
pub use action::{Action, ActionRecord, ActionTarget};
pub use state::{GameState, InvariantViolation, TurnFlags};
