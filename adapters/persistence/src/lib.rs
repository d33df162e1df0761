#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! File-backed high-score storage.
//!
//! The record lives in a small TOML document:
//!
//! ```toml
//! high_score = 120
//! ```
//!
//! A missing file means no game has been recorded yet. Writes go through a
//! sibling temporary file followed by a rename so a crash never leaves a
//! truncated record behind.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use snake_core::Score;
use snake_system_session::HighScoreStore;
use thiserror::Error;

/// File name used when no explicit location is configured.
pub const DEFAULT_HIGH_SCORE_FILE: &str = "snake-high-score.toml";

/// Failures raised while reading or writing the high-score file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file could not be read or written.
    #[error("high score file {} is not accessible", .path.display())]
    Io {
        /// Location of the high-score file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file exists but does not hold a valid record.
    #[error("high score file {} is malformed", .path.display())]
    Parse {
        /// Location of the high-score file.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// The record could not be encoded.
    #[error("failed to encode high score for {}", .path.display())]
    Serialize {
        /// Location of the high-score file.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::ser::Error,
    },
}

#[derive(Debug, Deserialize, Serialize)]
struct Record {
    high_score: Score,
}

/// High-score store persisted as a TOML file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    /// Creates a store backed by the file at `path`. The file is not touched until used.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_HIGH_SCORE_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for FileHighScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_HIGH_SCORE_FILE)
    }
}

impl HighScoreStore for FileHighScoreStore {
    type Error = PersistenceError;

    fn read(&self) -> Result<Score, Self::Error> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::debug!("no high score recorded at {}", self.path.display());
                return Ok(Score::ZERO);
            }
            Err(error) => return Err(self.io_error(error)),
        };

        let record: Record =
            toml::from_str(&contents).map_err(|source| PersistenceError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(record.high_score)
    }

    fn write(&mut self, score: Score) -> Result<(), Self::Error> {
        let contents = toml::to_string(&Record { high_score: score }).map_err(|source| {
            PersistenceError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }

        let staging = self.staging_path();
        fs::write(&staging, contents).map_err(|error| self.io_error(error))?;
        fs::rename(&staging, &self.path).map_err(|error| self.io_error(error))?;
        log::debug!("high score {} saved to {}", score.get(), self.path.display());
        Ok(())
    }
}
