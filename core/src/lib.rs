#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the session controller. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that the session and presentation layers react to. Nothing in this crate
//! holds mutable state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Title shown by adapters when the game boots.
pub const GAME_TITLE: &str = "Snake";

/// Side length of the board when none is configured.
pub const DEFAULT_TILE_COUNT: TileCount = TileCount::new(20);

/// Smallest board that can host both the snake and an item.
pub const MIN_TILE_COUNT: u32 = 2;

/// Largest board the world agrees to allocate.
pub const MAX_TILE_COUNT: u32 = 1_024;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resizes the square board and resets the world to its start-of-game values.
    ConfigureGrid {
        /// Number of cells along each edge of the board.
        tile_count: TileCount,
    },
    /// Replaces the scoring and pacing rules applied from the next start or reset.
    ConfigureDifficulty {
        /// Rules to install.
        difficulty: Difficulty,
    },
    /// Begins a game from the not-running status.
    Start,
    /// Pauses or resumes a running game.
    SetPaused {
        /// Whether the simulation should stop advancing.
        paused: bool,
    },
    /// Discards the current game and restores start-of-game values.
    Reset,
    /// Buffers the direction committed at the start of the next tick.
    SetPendingDirection {
        /// Requested direction of travel.
        direction: Direction,
    },
    /// Advances the simulation by exactly one grid step.
    Tick,
}

/// Events broadcast by the world and the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the board was resized.
    GridConfigured {
        /// Number of cells along each edge of the board.
        tile_count: TileCount,
    },
    /// Reports that a board size was refused because it cannot host a game.
    GridRejected {
        /// Size that failed validation.
        tile_count: TileCount,
    },
    /// Announces that the session entered a new status.
    StatusChanged {
        /// Status that became active.
        status: SessionStatus,
    },
    /// Reports that a lifecycle transition was not valid from the current status.
    TransitionRejected {
        /// Transition that was requested.
        requested: Transition,
        /// Status the world was in when the request arrived.
        status: SessionStatus,
    },
    /// Confirms that a direction was buffered for the next tick.
    PendingDirectionChanged {
        /// Direction that will be committed on the next tick.
        direction: Direction,
    },
    /// Reports that a direction change was refused.
    DirectionRejected {
        /// Direction that was requested.
        requested: Direction,
        /// Reason the request failed.
        reason: DirectionRejection,
    },
    /// Confirms that the snake moved one cell.
    SnakeAdvanced {
        /// Cell now occupied by the head.
        head: CellCoord,
        /// Whether the body grew instead of translating.
        grew: bool,
    },
    /// Reports that the snake hit a wall, itself, or filled the board.
    SnakeCollided {
        /// Terminal condition that ended the game.
        reason: EndReason,
        /// Score held when the game ended.
        score: Score,
    },
    /// Confirms that the head reached the item.
    ItemConsumed {
        /// Cell the item occupied.
        cell: CellCoord,
    },
    /// Announces that a new item was placed on the board.
    ItemSpawned {
        /// Cell holding the new item.
        cell: CellCoord,
    },
    /// Reports the score and level after an item was consumed.
    ScoreChanged {
        /// Updated score.
        score: Score,
        /// Level derived from the updated score.
        level: Level,
    },
    /// Announces that the level increased.
    LevelChanged {
        /// Level that became active.
        level: Level,
    },
    /// Announces that the scheduler should fire at a new cadence.
    TickIntervalChanged {
        /// Interval between successive ticks.
        interval: Duration,
    },
    /// Terminal summary emitted by the session once a game ends.
    GameOver {
        /// Score achieved in the finished game.
        final_score: Score,
        /// Best score known after the game was recorded.
        high_score: Score,
        /// Whether the finished game set a new record.
        new_record: bool,
        /// Terminal condition that ended the game.
        reason: EndReason,
    },
}

/// Lifecycle status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    /// The board is laid out but the game has not started.
    #[default]
    NotRunning,
    /// Ticks advance the snake.
    Running,
    /// Ticks are ignored until the game resumes.
    Paused,
    /// The game finished and only a reset can leave this status.
    Ended,
}

/// Lifecycle transitions that may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Start a new game.
    Start,
    /// Pause a running game.
    Pause,
    /// Resume a paused game.
    Resume,
}

/// Terminal conditions that end a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// The head left the board.
    WallCollision,
    /// The head entered a cell occupied by the body.
    SelfCollision,
    /// The body covers every cell, so no item can be placed.
    BoardFull,
}

/// Reasons a direction change may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirectionRejection {
    /// The game is not running, so input is ignored.
    Inactive,
    /// The request lies on the axis of the committed direction: either a
    /// reversal or the direction already being travelled.
    SameAxis,
}

/// Axis along which a direction moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Column axis.
    Horizontal,
    /// Row axis.
    Vertical,
}

/// Cardinal movement directions available to the snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::East | Self::West => Axis::Horizontal,
            Self::North | Self::South => Axis::Vertical,
        }
    }

    /// Unit offset expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Number of cells along each edge of the square board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCount(u32);

impl TileCount {
    /// Creates a new board size.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the number of cells along one edge.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Total number of cells on the board.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.0 as u64 * self.0 as u64
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.0 && cell.row() < self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell reached by stepping once in `direction`.
    ///
    /// Returns `None` when the step leaves the board, which the world treats
    /// as a wall collision.
    #[must_use]
    pub fn step(self, direction: Direction, tile_count: TileCount) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.delta();
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        let next = CellCoord::new(column, row);
        tile_count.contains(next).then_some(next)
    }
}

/// Points accumulated during a game.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Score(u32);

impl Score {
    /// Score held at the start of every game.
    pub const ZERO: Score = Score(0);

    /// Creates a score from raw points.
    #[must_use]
    pub const fn new(points: u32) -> Self {
        Self(points)
    }

    /// Retrieves the raw points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds points, saturating at the numeric limit.
    #[must_use]
    pub const fn saturating_add(self, points: u32) -> Self {
        Self(self.0.saturating_add(points))
    }
}

/// Difficulty tier derived from the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u32);

impl Level {
    /// Level active at the start of every game.
    pub const FIRST: Level = Level(1);

    /// Creates a level from its ordinal.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the ordinal of the level.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Scoring and pacing rules.
///
/// The defaults award ten points per item and start a new level every fifty
/// points. The tick interval starts at 100 ms and shrinks by 10 ms per level
/// down to 50 ms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Difficulty {
    points_per_item: u32,
    points_per_level: u32,
    base_interval: Duration,
    interval_step: Duration,
    minimum_interval: Duration,
}

impl Difficulty {
    /// Creates a custom rule set.
    ///
    /// A `minimum_interval` larger than `base_interval` is lowered to the
    /// base so the interval never grows with the level.
    #[must_use]
    pub fn new(
        points_per_item: u32,
        points_per_level: u32,
        base_interval: Duration,
        interval_step: Duration,
        minimum_interval: Duration,
    ) -> Self {
        Self {
            points_per_item,
            points_per_level,
            base_interval,
            interval_step,
            minimum_interval: minimum_interval.min(base_interval),
        }
    }

    /// Points awarded for each consumed item.
    #[must_use]
    pub const fn points_per_item(&self) -> u32 {
        self.points_per_item
    }

    /// Points required to advance one level.
    #[must_use]
    pub const fn points_per_level(&self) -> u32 {
        self.points_per_level
    }

    /// Tick interval at the first level.
    #[must_use]
    pub const fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Reduction applied to the interval for every level above the first.
    #[must_use]
    pub const fn interval_step(&self) -> Duration {
        self.interval_step
    }

    /// Floor below which the interval never drops.
    #[must_use]
    pub const fn minimum_interval(&self) -> Duration {
        self.minimum_interval
    }

    /// Level reached with the provided score: `floor(score / points_per_level) + 1`.
    ///
    /// A zero `points_per_level` keeps every score at the first level. The
    /// level saturates at `u32::MAX`.
    #[must_use]
    pub const fn level_for(&self, score: Score) -> Level {
        if self.points_per_level == 0 {
            return Level::FIRST;
        }
        Level((score.get() / self.points_per_level).saturating_add(1))
    }

    /// Tick interval used at the provided level.
    #[must_use]
    pub fn tick_interval_for(&self, level: Level) -> Duration {
        let steps = level.get().saturating_sub(1);
        let reduction = self.interval_step.saturating_mul(steps);
        self.base_interval
            .saturating_sub(reduction)
            .max(self.minimum_interval)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new(
            10,
            50,
            Duration::from_millis(100),
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
    }
}
