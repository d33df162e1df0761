#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session controller that drives the Snake world from a repeating timer.
//!
//! The session owns the [`World`], the timer registration and the high-score
//! collaborator. Every lifecycle request is translated into a world command;
//! the resulting events are inspected so the timer follows the world's pacing
//! and finished games are recorded exactly once.

mod scheduler;
mod store;

use std::time::Duration;

pub use scheduler::{FixedIntervalScheduler, Scheduler, TimerHandle};
pub use store::{HighScoreStore, MemoryHighScoreStore};

use snake_core::{
    Command, Difficulty, Direction, EndReason, Event, Score, SessionStatus, TileCount,
};
use snake_world::{self as world, query, World};

/// Summary of the most recently finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    /// Score achieved in the finished game.
    pub final_score: Score,
    /// Best score known after the game was recorded.
    pub high_score: Score,
    /// Whether the finished game set a new record.
    pub new_record: bool,
    /// Terminal condition that ended the game.
    pub reason: EndReason,
}

/// Orchestrates the world, the tick timer and the high-score store.
#[derive(Debug)]
pub struct Session<S, H> {
    world: World,
    scheduler: S,
    store: H,
    timer: Option<TimerHandle>,
    high_score: Score,
    last_outcome: Option<GameOutcome>,
}

impl<S: Scheduler, H: HighScoreStore> Session<S, H> {
    /// Creates a session around `world`, loading the recorded high score from `store`.
    ///
    /// An unreadable store is treated as holding no record.
    pub fn new(world: World, scheduler: S, store: H) -> Self {
        let high_score = match store.read() {
            Ok(score) => score,
            Err(error) => {
                log::warn!("failed to read high score, starting from zero: {error}");
                Score::ZERO
            }
        };

        Self {
            world,
            scheduler,
            store,
            timer: None,
            high_score,
            last_outcome: None,
        }
    }

    /// Read-only view of the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Best score known to the session.
    #[must_use]
    pub fn high_score(&self) -> Score {
        self.high_score
    }

    /// Summary of the last finished game.
    ///
    /// Cleared whenever the world lays out a fresh board, whether through
    /// [`Session::reset`] or a configuration change.
    #[must_use]
    pub fn last_outcome(&self) -> Option<GameOutcome> {
        self.last_outcome
    }

    /// Handle of the live timer registration, if the game is running or paused.
    #[must_use]
    pub fn timer(&self) -> Option<TimerHandle> {
        self.timer
    }

    /// Read-only view of the scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Read-only view of the high-score store.
    #[must_use]
    pub fn store(&self) -> &H {
        &self.store
    }

    /// Resizes the board; the world resets and any running game is abandoned.
    pub fn configure_grid(&mut self, tile_count: TileCount, out: &mut Vec<Event>) {
        self.submit(Command::ConfigureGrid { tile_count }, out);
    }

    /// Replaces the pacing and scoring rules used from the next reset onward.
    pub fn configure_difficulty(&mut self, difficulty: Difficulty, out: &mut Vec<Event>) {
        self.submit(Command::ConfigureDifficulty { difficulty }, out);
    }

    /// Starts a game from the not-running state and registers the tick timer.
    pub fn start(&mut self, out: &mut Vec<Event>) {
        self.submit(Command::Start, out);
    }

    /// Pauses a running game. The timer keeps firing; ticks are ignored.
    pub fn pause(&mut self, out: &mut Vec<Event>) {
        self.submit(Command::SetPaused { paused: true }, out);
    }

    /// Resumes a paused game.
    pub fn resume(&mut self, out: &mut Vec<Event>) {
        self.submit(Command::SetPaused { paused: false }, out);
    }

    /// Pauses a running game or resumes a paused one.
    ///
    /// Any other status is forwarded as a pause request so the rejection is reported.
    pub fn toggle_pause(&mut self, out: &mut Vec<Event>) {
        let paused = query::status(&self.world) != SessionStatus::Paused;
        self.submit(Command::SetPaused { paused }, out);
    }

    /// Abandons the current game, cancels the timer and lays out a fresh board.
    pub fn reset(&mut self, out: &mut Vec<Event>) {
        self.cancel_timer();
        self.last_outcome = None;
        self.submit(Command::Reset, out);
    }

    /// Buffers a direction for the next tick.
    pub fn steer(&mut self, direction: Direction, out: &mut Vec<Event>) {
        self.submit(Command::SetPendingDirection { direction }, out);
    }

    /// Scheduler callback. Firings of cancelled registrations are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle, out: &mut Vec<Event>) {
        if self.timer != Some(handle) {
            log::trace!("ignoring stale timer {}", handle.get());
            return;
        }
        self.submit(Command::Tick, out);
    }

    fn submit(&mut self, command: Command, out: &mut Vec<Event>) {
        let first_new = out.len();
        world::apply(&mut self.world, command, out);

        let emitted: Vec<Event> = out[first_new..].to_vec();
        for event in emitted {
            match event {
                Event::StatusChanged {
                    status: SessionStatus::Running,
                } if self.timer.is_none() => {
                    let interval = query::tick_interval(&self.world);
                    log::info!("game started, ticking every {} ms", interval.as_millis());
                    self.schedule(interval);
                }
                Event::StatusChanged {
                    status: SessionStatus::NotRunning,
                } => {
                    self.cancel_timer();
                    self.last_outcome = None;
                }
                Event::TickIntervalChanged { interval } if self.timer.is_some() => {
                    self.cancel_timer();
                    self.schedule(interval);
                }
                Event::SnakeCollided { reason, score } => self.end(reason, score, out),
                _ => {}
            }
        }
    }

    fn end(&mut self, reason: EndReason, final_score: Score, out: &mut Vec<Event>) {
        self.cancel_timer();

        let new_record = final_score > self.high_score;
        if new_record {
            self.high_score = final_score;
            log::info!("new high score {}", final_score.get());
            if let Err(error) = self.store.write(final_score) {
                log::warn!("failed to persist high score {}: {error}", final_score.get());
            }
        }

        let outcome = GameOutcome {
            final_score,
            high_score: self.high_score,
            new_record,
            reason,
        };
        self.last_outcome = Some(outcome);
        out.push(Event::GameOver {
            final_score: outcome.final_score,
            high_score: outcome.high_score,
            new_record: outcome.new_record,
            reason: outcome.reason,
        });
    }

    fn schedule(&mut self, interval: Duration) {
        self.timer = Some(self.scheduler.schedule_repeating(interval));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl<H: HighScoreStore> Session<FixedIntervalScheduler, H> {
    /// Advances the built-in scheduler by `dt` and delivers every firing.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Event>) {
        for handle in self.scheduler.advance(dt) {
            self.on_timer(handle, out);
        }
    }
}
