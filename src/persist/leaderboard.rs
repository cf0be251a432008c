//! Per-level win counts.
//!
//! Each level has its own file in the store directory, named after the
//! level. Lowercase ASCII letters, digits and `-` are kept; every other
//! byte becomes `_` plus two uppercase hex digits (`levels/maze` becomes
//! `levels_2Fmaze.leaderboard`). Distinct level names never share a file,
//! even on case-insensitive file systems.
//! A level nobody has won yet has no file and an empty leaderboard.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::error::PersistError;
use super::format::Frame;
use crate::core::player::ProfileId;
use crate::core::state::GameState;
use crate::rules::phase::TurnPhase;

pub const LEADERBOARD_MAGIC: [u8; 4] = *b"LBWN";
pub const LEADERBOARD_VERSION: u16 = 1;

const LEADERBOARD_FRAME: Frame = Frame {
    magic: LEADERBOARD_MAGIC,
    version: LEADERBOARD_VERSION,
};

/// Wins per profile on one level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    level: String,
    wins: BTreeMap<ProfileId, u32>,
}

impl Leaderboard {
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            wins: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Wins recorded for `profile`; zero if never seen.
    #[must_use]
    pub fn wins(&self, profile: ProfileId) -> u32 {
        self.wins.get(&profile).copied().unwrap_or(0)
    }

    /// Add one win and return the new total.
    pub fn increment(&mut self, profile: ProfileId) -> u32 {
        let wins = self.wins.entry(profile).or_insert(0);
        *wins = wins.saturating_add(1);
        *wins
    }

    /// Entries sorted by wins, most first; ties by profile id.
    #[must_use]
    pub fn ranked(&self) -> Vec<(ProfileId, u32)> {
        let mut entries: Vec<_> = self.wins.iter().map(|(&p, &w)| (p, w)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }
}

/// Directory of leaderboard files.
#[derive(Clone, Debug)]
pub struct LeaderboardStore {
    dir: PathBuf,
}

impl LeaderboardStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the leaderboard for `level`.
    #[must_use]
    pub fn path_for(&self, level: &str) -> PathBuf {
        let mut stem = String::with_capacity(level.len());
        for byte in level.bytes() {
            if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
                stem.push(char::from(byte));
            } else {
                stem.push_str(&format!("_{byte:02X}"));
            }
        }
        self.dir.join(format!("{stem}.leaderboard"))
    }

    /// Read the leaderboard for `level`; a missing file is an empty board.
    #[instrument(skip(self))]
    pub fn load(&self, level: &str) -> Result<Leaderboard, PersistError> {
        let path = self.path_for(level);
        match LEADERBOARD_FRAME.read::<Leaderboard>(&path) {
            Ok(board) if board.level == level => Ok(board),
            Ok(board) => Err(PersistError::corrupt(format!(
                "{} holds the leaderboard for {}",
                path.display(),
                board.level
            ))),
            Err(PersistError::MissingFile { .. }) => {
                debug!("no leaderboard yet");
                Ok(Leaderboard::new(level))
            }
            Err(err) => Err(err),
        }
    }

    /// Credit `profile` with a win on `level` and write the result back.
    #[instrument(skip(self))]
    pub fn record_win(&self, level: &str, profile: ProfileId) -> Result<Leaderboard, PersistError> {
        let mut board = self.load(level)?;
        let wins = board.increment(profile);
        LEADERBOARD_FRAME.write(&self.path_for(level), &board)?;
        info!(%profile, wins, "win recorded");
        Ok(board)
    }

    /// Record the winner of a finished game, if the winner has a profile.
    pub fn record_game(&self, state: &GameState) -> Result<Option<Leaderboard>, PersistError> {
        if state.phase != TurnPhase::GameOver {
            return Ok(None);
        }
        match state.winner_profile() {
            Some(profile) => self.record_win(&state.level_name, profile).map(Some),
            None => Ok(None),
        }
    }
}
