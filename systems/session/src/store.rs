//! High-score persistence contract.

use std::convert::Infallible;

use snake_core::Score;

/// Durable storage for the best score across sessions.
///
/// A store with nothing recorded yet reports [`Score::ZERO`].
pub trait HighScoreStore {
    /// Failure reported by the backing storage.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads the recorded high score.
    fn read(&self) -> Result<Score, Self::Error>;

    /// Replaces the recorded high score.
    fn write(&mut self, score: Score) -> Result<(), Self::Error>;
}

/// Volatile store that keeps the high score for the lifetime of the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryHighScoreStore {
    score: Score,
    writes: usize,
}

impl MemoryHighScoreStore {
    /// Creates a store pre-populated with `score`.
    #[must_use]
    pub const fn with_score(score: Score) -> Self {
        Self { score, writes: 0 }
    }

    /// Number of successful writes.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    type Error = Infallible;

    fn read(&self) -> Result<Score, Self::Error> {
        Ok(self.score)
    }

    fn write(&mut self, score: Score) -> Result<(), Self::Error> {
        self.score = score;
        self.writes += 1;
        Ok(())
    }
}
