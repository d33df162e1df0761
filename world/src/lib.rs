#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snake.
//!
//! The world owns the board, the snake's body, the item, both committed and
//! pending directions, the score and the pacing derived from it. Adapters and
//! the session mutate it exclusively through [`apply`] and observe it through
//! the [`query`] module.

#[cfg(any(test, feature = "scaffolding"))]
pub mod scaffolding;

use std::{collections::VecDeque, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snake_core::{
    CellCoord, Command, Difficulty, Direction, DirectionRejection, EndReason, Event, Level,
    Score, SessionStatus, TileCount, Transition, DEFAULT_TILE_COUNT, MAX_TILE_COUNT,
    MIN_TILE_COUNT,
};

const ITEM_GENERATION_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Random draws attempted before falling back to enumerating free cells.
const ITEM_SAMPLE_ATTEMPTS: usize = 64;

/// Direction committed when a game starts.
const INITIAL_DIRECTION: Direction = Direction::East;

/// Represents the authoritative Snake world state.
#[derive(Debug)]
pub struct World {
    tile_count: TileCount,
    difficulty: Difficulty,
    configured_difficulty: Difficulty,
    body: VecDeque<CellCoord>,
    occupancy: OccupancyGrid,
    item: Option<CellCoord>,
    direction: Option<Direction>,
    pending_direction: Option<Direction>,
    score: Score,
    level: Level,
    tick_interval: Duration,
    status: SessionStatus,
    end_reason: Option<EndReason>,
    rng: ChaCha8Rng,
    tick_index: u64,
}

impl World {
    /// Creates a new world on the default board, ready to start.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(ITEM_GENERATION_SEED)
    }

    /// Creates a new world whose item placement derives from `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let difficulty = Difficulty::default();
        let mut world = Self {
            tile_count: DEFAULT_TILE_COUNT,
            difficulty,
            configured_difficulty: difficulty,
            body: VecDeque::new(),
            occupancy: OccupancyGrid::new(DEFAULT_TILE_COUNT),
            item: None,
            direction: None,
            pending_direction: None,
            score: Score::ZERO,
            level: Level::FIRST,
            tick_interval: difficulty.tick_interval_for(Level::FIRST),
            status: SessionStatus::NotRunning,
            end_reason: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_index: 0,
        };
        world.reset_state();
        world
    }

    fn reset_state(&mut self) {
        self.difficulty = self.configured_difficulty;
        let center = self.tile_count.get() / 2;
        let head = CellCoord::new(center, center);
        self.body.clear();
        self.body.push_back(head);
        self.occupancy = OccupancyGrid::new(self.tile_count);
        self.occupancy.occupy(head);
        self.direction = None;
        self.pending_direction = None;
        self.score = Score::ZERO;
        self.level = Level::FIRST;
        self.tick_interval = self.difficulty.tick_interval_for(Level::FIRST);
        self.status = SessionStatus::NotRunning;
        self.end_reason = None;
        self.tick_index = 0;
        self.item = self.initial_item();
    }

    fn initial_item(&mut self) -> Option<CellCoord> {
        let offset = self.tile_count.get().saturating_mul(3) / 4;
        let preferred = CellCoord::new(offset, offset);
        if self.tile_count.contains(preferred) && !self.occupancy.is_occupied(preferred) {
            Some(preferred)
        } else {
            self.sample_free_cell()
        }
    }

    fn sample_free_cell(&mut self) -> Option<CellCoord> {
        if self.occupancy.free_count() == 0 {
            return None;
        }

        let bound = self.tile_count.get();
        for _ in 0..ITEM_SAMPLE_ATTEMPTS {
            let column = self.rng.gen_range(0..bound);
            let row = self.rng.gen_range(0..bound);
            let candidate = CellCoord::new(column, row);
            if !self.occupancy.is_occupied(candidate) {
                return Some(candidate);
            }
        }

        let free: Vec<CellCoord> = self.occupancy.free_cells().collect();
        let index = self.rng.gen_range(0..free.len());
        free.get(index).copied()
    }

    fn set_status(&mut self, status: SessionStatus, out_events: &mut Vec<Event>) {
        if self.status != status {
            self.status = status;
            out_events.push(Event::StatusChanged { status });
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let previous_status = self.status;
        let previous_interval = self.tick_interval;
        self.reset_state();

        if previous_status != SessionStatus::NotRunning {
            out_events.push(Event::StatusChanged {
                status: SessionStatus::NotRunning,
            });
        }
        out_events.push(Event::ScoreChanged {
            score: self.score,
            level: self.level,
        });
        if previous_interval != self.tick_interval {
            out_events.push(Event::TickIntervalChanged {
                interval: self.tick_interval,
            });
        }
        if let Some(cell) = self.item {
            out_events.push(Event::ItemSpawned { cell });
        }
    }

    fn end(&mut self, reason: EndReason, out_events: &mut Vec<Event>) {
        self.end_reason = Some(reason);
        log::info!(
            "game ended ({reason:?}) with score {} at level {}",
            self.score.get(),
            self.level.get()
        );
        out_events.push(Event::SnakeCollided {
            reason,
            score: self.score,
        });
        self.set_status(SessionStatus::Ended, out_events);
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.status != SessionStatus::Running {
            return;
        }
        self.tick_index = self.tick_index.saturating_add(1);

        self.direction = self.pending_direction;
        let Some(direction) = self.direction else {
            return;
        };

        let Some(&head) = self.body.front() else {
            return;
        };

        let Some(next_head) = head.step(direction, self.tile_count) else {
            self.end(EndReason::WallCollision, out_events);
            return;
        };

        if self.occupancy.is_occupied(next_head) {
            self.end(EndReason::SelfCollision, out_events);
            return;
        }

        self.body.push_front(next_head);
        self.occupancy.occupy(next_head);

        if self.item == Some(next_head) {
            out_events.push(Event::SnakeAdvanced {
                head: next_head,
                grew: true,
            });
            self.consume_item(next_head, out_events);
        } else {
            if let Some(tail) = self.body.pop_back() {
                self.occupancy.vacate(tail);
            }
            out_events.push(Event::SnakeAdvanced {
                head: next_head,
                grew: false,
            });
        }
    }

    fn consume_item(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        self.score = self
            .score
            .saturating_add(self.difficulty.points_per_item());
        out_events.push(Event::ItemConsumed { cell });

        let level = self.difficulty.level_for(self.score);
        out_events.push(Event::ScoreChanged {
            score: self.score,
            level,
        });

        if level > self.level {
            self.level = level;
            out_events.push(Event::LevelChanged { level });

            let interval = self.difficulty.tick_interval_for(level);
            if interval != self.tick_interval {
                self.tick_interval = interval;
                log::debug!(
                    "level {} reached, tick interval now {} ms",
                    level.get(),
                    interval.as_millis()
                );
                out_events.push(Event::TickIntervalChanged { interval });
            }
        }

        self.item = self.sample_free_cell();
        match self.item {
            Some(cell) => {
                log::trace!("item spawned at ({}, {})", cell.column(), cell.row());
                out_events.push(Event::ItemSpawned { cell });
            }
            None => self.end(EndReason::BoardFull, out_events),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { tile_count } => {
            let size = tile_count.get();
            if !(MIN_TILE_COUNT..=MAX_TILE_COUNT).contains(&size) {
                out_events.push(Event::GridRejected { tile_count });
                return;
            }

            world.tile_count = tile_count;
            out_events.push(Event::GridConfigured { tile_count });
            world.reset(out_events);
        }
        Command::ConfigureDifficulty { difficulty } => {
            world.configured_difficulty = difficulty;
            if world.status == SessionStatus::NotRunning {
                world.reset(out_events);
            }
        }
        Command::Start => {
            if world.status != SessionStatus::NotRunning {
                out_events.push(Event::TransitionRejected {
                    requested: Transition::Start,
                    status: world.status,
                });
                return;
            }

            world.direction = Some(INITIAL_DIRECTION);
            world.set_status(SessionStatus::Running, out_events);
        }
        Command::SetPaused { paused } => match (paused, world.status) {
            (true, SessionStatus::Running) => {
                world.set_status(SessionStatus::Paused, out_events);
            }
            (false, SessionStatus::Paused) => {
                world.set_status(SessionStatus::Running, out_events);
            }
            (true, status) => out_events.push(Event::TransitionRejected {
                requested: Transition::Pause,
                status,
            }),
            (false, status) => out_events.push(Event::TransitionRejected {
                requested: Transition::Resume,
                status,
            }),
        },
        Command::Reset => world.reset(out_events),
        Command::SetPendingDirection { direction } => {
            if world.status != SessionStatus::Running {
                out_events.push(Event::DirectionRejected {
                    requested: direction,
                    reason: DirectionRejection::Inactive,
                });
                return;
            }

            if world
                .direction
                .is_some_and(|current| current.axis() == direction.axis())
            {
                out_events.push(Event::DirectionRejected {
                    requested: direction,
                    reason: DirectionRejection::SameAxis,
                });
                return;
            }

            world.pending_direction = Some(direction);
            out_events.push(Event::PendingDirectionChanged { direction });
        }
        Command::Tick => world.tick(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::VecDeque, time::Duration};

    use super::World;
    use snake_core::{
        CellCoord, Difficulty, Direction, EndReason, Level, Score, SessionStatus, TileCount,
    };

    /// Side length of the board.
    #[must_use]
    pub fn tile_count(world: &World) -> TileCount {
        world.tile_count
    }

    /// Captures a read-only view of the snake's body, head first.
    #[must_use]
    pub fn body(world: &World) -> BodyView<'_> {
        BodyView {
            segments: &world.body,
        }
    }

    /// Cell currently holding the item, absent once the board is full.
    #[must_use]
    pub fn item(world: &World) -> Option<CellCoord> {
        world.item
    }

    /// Direction committed by the most recent tick, `None` while stationary.
    #[must_use]
    pub fn direction(world: &World) -> Option<Direction> {
        world.direction
    }

    /// Direction that the next tick will commit.
    #[must_use]
    pub fn pending_direction(world: &World) -> Option<Direction> {
        world.pending_direction
    }

    /// Points accumulated in the current game.
    #[must_use]
    pub fn score(world: &World) -> Score {
        world.score
    }

    /// Level derived from the current score.
    #[must_use]
    pub fn level(world: &World) -> Level {
        world.level
    }

    /// Interval the scheduler should use between ticks.
    #[must_use]
    pub fn tick_interval(world: &World) -> Duration {
        world.tick_interval
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// Terminal condition of the last game, if it ended.
    #[must_use]
    pub fn end_reason(world: &World) -> Option<EndReason> {
        world.end_reason
    }

    /// Rules currently governing scoring and pacing.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Number of ticks processed while running since the last reset.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only view of the snake's body segments.
    #[derive(Clone, Copy, Debug)]
    pub struct BodyView<'a> {
        segments: &'a VecDeque<CellCoord>,
    }

    impl<'a> BodyView<'a> {
        /// Cell occupied by the head.
        #[must_use]
        pub fn head(&self) -> Option<CellCoord> {
            self.segments.front().copied()
        }

        /// Number of segments, head included.
        #[must_use]
        pub fn len(&self) -> usize {
            self.segments.len()
        }

        /// Reports whether the body has no segments.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.segments.is_empty()
        }

        /// Reports whether any segment occupies `cell`.
        #[must_use]
        pub fn contains(&self, cell: CellCoord) -> bool {
            self.segments.contains(&cell)
        }

        /// Iterator over the segments from head to tail.
        pub fn iter(&self) -> impl Iterator<Item = CellCoord> + 'a {
            self.segments.iter().copied()
        }

        /// Copies the segments into a vector, head first.
        #[must_use]
        pub fn to_vec(&self) -> Vec<CellCoord> {
            self.segments.iter().copied().collect()
        }
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    tile_count: TileCount,
    cells: Vec<bool>,
    occupied: usize,
}

impl OccupancyGrid {
    fn new(tile_count: TileCount) -> Self {
        let capacity = usize::try_from(tile_count.area()).unwrap_or(0);
        Self {
            tile_count,
            cells: vec![false; capacity],
            occupied: 0,
        }
    }

    fn is_occupied(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    fn occupy(&mut self, cell: CellCoord) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            if !*slot {
                *slot = true;
                self.occupied += 1;
            }
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            if *slot {
                *slot = false;
                self.occupied -= 1;
            }
        }
    }

    fn free_count(&self) -> usize {
        self.cells.len() - self.occupied
    }

    fn free_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let width = self.tile_count.get();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| !**occupied)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % width, index / width))
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.tile_count.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.tile_count.get()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
