//! Persistence: save files and per-level leaderboards.
//!
//! Both file kinds share one framing (magic, version, bincode body) and are
//! written atomically through a temporary sibling file.

pub mod error;
pub mod format;
pub mod leaderboard;
pub mod save;

pub use error::PersistError;
pub use leaderboard::{Leaderboard, LeaderboardStore};
pub use save::{delete_save, load_game, peek_save, save_game, SaveSummary, SAVE_MAGIC, SAVE_VERSION};
