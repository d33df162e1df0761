//! Helpers that place the world into arbitrary running positions.
//!
//! Only compiled for tests or with the `scaffolding` feature. The layouts
//! bypass the normal start sequence, so callers can stage collisions and
//! level transitions directly.

use std::collections::HashSet;

use snake_core::{CellCoord, Direction, Score, SessionStatus};
use thiserror::Error;

use crate::{OccupancyGrid, World};

/// Snake position staged by [`arrange`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Body segments, head first.
    pub body: Vec<CellCoord>,
    /// Direction committed and buffered for the next tick.
    pub direction: Option<Direction>,
    /// Cell holding the item.
    pub item: Option<CellCoord>,
    /// Score carried into the staged game.
    pub score: Score,
}

/// Reasons a layout cannot be staged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The body contains no segments.
    #[error("layout body must contain at least one segment")]
    EmptyBody,
    /// A segment or the item lies outside the board.
    #[error("cell ({column}, {row}) lies outside the board")]
    OutOfBounds {
        /// Column of the offending cell.
        column: u32,
        /// Row of the offending cell.
        row: u32,
    },
    /// Two segments share a cell.
    #[error("body overlaps itself at ({column}, {row})")]
    Overlap {
        /// Column of the repeated cell.
        column: u32,
        /// Row of the repeated cell.
        row: u32,
    },
    /// The item sits on the body.
    #[error("item overlaps the body")]
    ItemOnBody,
}

/// Replaces the world's game state with `layout` and marks it running.
///
/// The tick counter restarts from zero.
pub fn arrange(world: &mut World, layout: Layout) -> Result<(), LayoutError> {
    if layout.body.is_empty() {
        return Err(LayoutError::EmptyBody);
    }

    let mut seen = HashSet::with_capacity(layout.body.len());
    for cell in layout.body.iter().chain(layout.item.iter()) {
        if !world.tile_count.contains(*cell) {
            return Err(LayoutError::OutOfBounds {
                column: cell.column(),
                row: cell.row(),
            });
        }
    }
    for cell in &layout.body {
        if !seen.insert(*cell) {
            return Err(LayoutError::Overlap {
                column: cell.column(),
                row: cell.row(),
            });
        }
    }
    if layout.item.is_some_and(|item| seen.contains(&item)) {
        return Err(LayoutError::ItemOnBody);
    }

    world.occupancy = OccupancyGrid::new(world.tile_count);
    for cell in &layout.body {
        world.occupancy.occupy(*cell);
    }
    world.body = layout.body.into();
    world.item = layout.item;
    world.direction = layout.direction;
    world.pending_direction = layout.direction;
    world.score = layout.score;
    world.level = world.difficulty.level_for(layout.score);
    world.tick_interval = world.difficulty.tick_interval_for(world.level);
    world.status = SessionStatus::Running;
    world.end_reason = None;
    world.tick_index = 0;
    Ok(())
}
