//! Persistence failures.
//!
//! A failed save or load never touches the in-memory game; the caller can
//! retry with another path.

use std::path::PathBuf;

use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum PersistError {
    #[display("i/o failure: {source}")]
    Io { source: std::io::Error },

    #[display("no file at {}", path.display())]
    MissingFile { path: PathBuf },

    #[display("file is corrupt: {reason}")]
    CorruptFile { reason: String },

    #[display("file format version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u16, expected: u16 },
}

impl PersistError {
    pub(crate) fn corrupt(reason: impl std::fmt::Display) -> Self {
        Self::CorruptFile {
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<bincode::Error> for PersistError {
    fn from(err: bincode::Error) -> Self {
        match *err {
            bincode::ErrorKind::Io(source) => Self::Io { source },
            other => Self::corrupt(other),
        }
    }
}
