//! Framed binary files: a 4-byte magic, a little-endian `u16` format
//! version, then a bincode body.
//!
//! Writes go to a temporary file beside the target which is then renamed
//! over it, so a crash mid-write leaves the previous file intact.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use super::error::PersistError;

const HEADER_LEN: usize = 6;

/// Magic bytes and current version of one file kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub magic: [u8; 4],
    pub version: u16,
}

impl Frame {
    /// Serialize `body` and atomically replace `path` with it.
    pub fn write<T: Serialize>(&self, path: &Path, body: &T) -> Result<(), PersistError> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&self.magic)?;
        file.write_all(&self.version.to_le_bytes())?;
        bincode::serialize_into(&mut file, body)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    /// Read the whole file and check its header. Returns the body bytes.
    pub fn read_body(&self, path: &Path) -> Result<Vec<u8>, PersistError> {
        let mut bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(PersistError::MissingFile {
                    path: path.to_path_buf(),
                })
            }
            Err(err) => return Err(err.into()),
        };

        if bytes.len() < HEADER_LEN || bytes[..4] != self.magic {
            return Err(PersistError::corrupt("unrecognised file header"));
        }
        let found = u16::from_le_bytes([bytes[4], bytes[5]]);
        if found != self.version {
            return Err(PersistError::VersionMismatch {
                found,
                expected: self.version,
            });
        }
        bytes.drain(..HEADER_LEN);
        Ok(bytes)
    }

    /// Read and decode the full body. Bytes left over after the value make
    /// the file corrupt.
    pub fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T, PersistError> {
        let body = self.read_body(path)?;
        decode(&body)
    }
}

/// Decode a value that spans all of `body`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, PersistError> {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .deserialize(body)
        .map_err(PersistError::corrupt)
}

/// Decode a value from the front of `body`, ignoring whatever follows.
/// Used to read a leading prefix of a larger record.
pub fn decode_prefix<T: DeserializeOwned>(body: &[u8]) -> Result<T, PersistError> {
    bincode::deserialize(body).map_err(PersistError::corrupt)
}
