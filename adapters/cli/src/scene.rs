//! Translates between the session and the rendering contracts.

use snake_core::{Event, SessionStatus};
use snake_rendering::{
    FrameInput, GameOverPresentation, HudPresentation, ItemPresentation, Scene, SnakePresentation,
};
use snake_system_session::{HighScoreStore, Scheduler, Session};
use snake_world::query;

/// Forwards one frame of input to the session.
///
/// Starting after a finished game lays out a fresh board first.
pub(crate) fn apply_input<S, H>(
    session: &mut Session<S, H>,
    input: FrameInput,
    out: &mut Vec<Event>,
) where
    S: Scheduler,
    H: HighScoreStore,
{
    if input.reset {
        session.reset(out);
    }
    if input.start {
        if query::status(session.world()) == SessionStatus::Ended {
            session.reset(out);
        }
        session.start(out);
    }
    if input.toggle_pause {
        session.toggle_pause(out);
    }
    if let Some(direction) = input.steer {
        session.steer(direction, out);
    }
}

/// Refreshes every scene element from the session's current state.
pub(crate) fn populate_scene<S, H>(session: &Session<S, H>, scene: &mut Scene)
where
    S: Scheduler,
    H: HighScoreStore,
{
    let world = session.world();

    scene.grid.tile_count = query::tile_count(world).get();
    scene.snake = SnakePresentation::new(query::body(world).to_vec(), query::direction(world));
    scene.item = query::item(world).map(ItemPresentation::new);
    scene.hud = HudPresentation {
        score: query::score(world),
        level: query::level(world),
        high_score: session.high_score(),
        status: query::status(world),
    };
    scene.game_over = session.last_outcome().map(|outcome| GameOverPresentation {
        final_score: outcome.final_score,
        new_record: outcome.new_record,
        reason: outcome.reason,
    });
}
