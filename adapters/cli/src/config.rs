//! Layered game configuration: built-in defaults, an optional TOML file, then flags.
//!
//! ```toml
//! [grid]
//! tile_count = 20
//! cell_size = 20.0
//!
//! [difficulty]
//! points_per_item = 10
//! points_per_level = 50
//! base_interval_ms = 100
//! interval_step_ms = 10
//! minimum_interval_ms = 50
//!
//! [storage]
//! high_score_file = "snake-high-score.toml"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use snake_core::{Difficulty, TileCount, MAX_TILE_COUNT, MIN_TILE_COUNT};
use snake_persistence::DEFAULT_HIGH_SCORE_FILE;
use thiserror::Error;

/// Failures raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read configuration file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration file {} is malformed", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(
        "tile count {tile_count} is outside {min}..={max}",
        min = MIN_TILE_COUNT,
        max = MAX_TILE_COUNT
    )]
    TileCount { tile_count: u32 },
    #[error("cell size must be a positive number of pixels (received {cell_size})")]
    CellSize { cell_size: f32 },
    #[error("base tick interval must be at least one millisecond")]
    BaseInterval,
}

/// Complete game configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SnakeConfig {
    pub(crate) grid: GridConfig,
    pub(crate) difficulty: DifficultyConfig,
    pub(crate) storage: StorageConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GridConfig {
    pub(crate) tile_count: u32,
    pub(crate) cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            tile_count: snake_core::DEFAULT_TILE_COUNT.get(),
            cell_size: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DifficultyConfig {
    pub(crate) points_per_item: u32,
    pub(crate) points_per_level: u32,
    pub(crate) base_interval_ms: u64,
    pub(crate) interval_step_ms: u64,
    pub(crate) minimum_interval_ms: u64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        let difficulty = Difficulty::default();
        Self {
            points_per_item: difficulty.points_per_item(),
            points_per_level: difficulty.points_per_level(),
            base_interval_ms: millis(difficulty.base_interval()),
            interval_step_ms: millis(difficulty.interval_step()),
            minimum_interval_ms: millis(difficulty.minimum_interval()),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StorageConfig {
    pub(crate) high_score_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
        }
    }
}

/// Values supplied on the command line, which win over the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) tile_count: Option<u32>,
    pub(crate) cell_size: Option<f32>,
    pub(crate) high_score_file: Option<PathBuf>,
}

impl SnakeConfig {
    /// Reads the file at `path`, or the defaults when no path is given, then
    /// applies `overrides` and validates the result.
    pub(crate) fn resolve(
        path: Option<&Path>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(tile_count) = overrides.tile_count {
            self.grid.tile_count = tile_count;
        }
        if let Some(cell_size) = overrides.cell_size {
            self.grid.cell_size = cell_size;
        }
        if let Some(path) = overrides.high_score_file {
            self.storage.high_score_file = path;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let tile_count = self.grid.tile_count;
        if !(MIN_TILE_COUNT..=MAX_TILE_COUNT).contains(&tile_count) {
            return Err(ConfigError::TileCount { tile_count });
        }

        let cell_size = self.grid.cell_size;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::CellSize { cell_size });
        }

        if self.difficulty.base_interval_ms == 0 {
            return Err(ConfigError::BaseInterval);
        }
        Ok(())
    }

    pub(crate) fn tile_count(&self) -> TileCount {
        TileCount::new(self.grid.tile_count)
    }

    pub(crate) fn difficulty(&self) -> Difficulty {
        let section = self.difficulty;
        Difficulty::new(
            section.points_per_item,
            section.points_per_level,
            Duration::from_millis(section.base_interval_ms),
            Duration::from_millis(section.interval_step_ms),
            Duration::from_millis(section.minimum_interval_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_board() {
        let config =
            SnakeConfig::resolve(None, Overrides::default()).expect("defaults are valid");

        assert_eq!(config.tile_count(), TileCount::new(20));
        assert_eq!(config.grid.cell_size, 20.0);
        assert_eq!(config.difficulty(), Difficulty::default());
        assert_eq!(
            config.storage.high_score_file,
            PathBuf::from("snake-high-score.toml")
        );
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: SnakeConfig = toml::from_str(
            r#"
            [difficulty]
            base_interval_ms = 150
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(
            config.difficulty().base_interval(),
            Duration::from_millis(150)
        );
        assert_eq!(config.difficulty().points_per_item(), 10);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = toml::from_str::<SnakeConfig>("[grid]\ntiles = 12\n");

        assert!(result.is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("snake.toml");
        fs::write(
            &path,
            "[grid]\ntile_count = 30\ncell_size = 16.0\n[storage]\nhigh_score_file = \"a.toml\"\n",
        )
        .expect("write config");

        let config = SnakeConfig::resolve(
            Some(&path),
            Overrides {
                tile_count: Some(12),
                high_score_file: Some(PathBuf::from("b.toml")),
                ..Overrides::default()
            },
        )
        .expect("valid config");

        assert_eq!(config.grid.tile_count, 12);
        assert_eq!(config.grid.cell_size, 16.0);
        assert_eq!(config.storage.high_score_file, PathBuf::from("b.toml"));
    }

    #[test]
    fn out_of_range_tile_count_is_rejected() {
        let error = SnakeConfig::resolve(
            None,
            Overrides {
                tile_count: Some(1),
                ..Overrides::default()
            },
        )
        .expect_err("one cell cannot host a game");

        assert!(matches!(error, ConfigError::TileCount { tile_count: 1 }));
    }

    #[test]
    fn non_positive_cell_size_is_rejected() {
        let error = SnakeConfig::resolve(
            None,
            Overrides {
                cell_size: Some(-4.0),
                ..Overrides::default()
            },
        )
        .expect_err("negative cells cannot be drawn");

        assert!(matches!(error, ConfigError::CellSize { .. }));
    }

    #[test]
    fn zero_base_interval_is_rejected() {
        let mut config = SnakeConfig::default();
        config.difficulty.base_interval_ms = 0;

        assert!(matches!(config.validate(), Err(ConfigError::BaseInterval)));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = Path::new("/nonexistent/snake.toml");
        let error =
            SnakeConfig::resolve(Some(path), Overrides::default()).expect_err("file is missing");

        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("/nonexistent/snake.toml"));
    }
}
