#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Snake game.

mod config;
mod scene;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use snake_core::GAME_TITLE;
use snake_persistence::FileHighScoreStore;
use snake_rendering::{GridPresentation, Palette, Presentation, RenderingBackend, Scene};
use snake_rendering_macroquad::MacroquadBackend;
use snake_system_session::{FixedIntervalScheduler, Session};
use snake_world::World;

use crate::config::{Overrides, SnakeConfig};

/// Command-line arguments accepted by the `snake` binary.
#[derive(Debug, Parser)]
#[command(name = "snake", version, about = "Steer the snake and grow without crashing")]
struct CliArgs {
    /// Number of cells along each edge of the board.
    #[arg(long, value_name = "CELLS")]
    tile_count: Option<u32>,

    /// Edge length of a cell in pixels.
    #[arg(long, value_name = "PIXELS")]
    cell_size: Option<f32>,

    /// Seed for item placement. A random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// File that keeps the high score between runs.
    #[arg(long, value_name = "PATH")]
    high_score_file: Option<PathBuf>,

    /// TOML configuration file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
}

/// Entry point for the Snake command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let config = SnakeConfig::resolve(
        args.config.as_deref(),
        Overrides {
            tile_count: args.tile_count,
            cell_size: args.cell_size,
            high_score_file: args.high_score_file,
        },
    )
    .context("invalid configuration")?;

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    log::info!(
        "starting {}x{} board with seed {seed}, high score file {}",
        config.grid.tile_count,
        config.grid.tile_count,
        config.storage.high_score_file.display()
    );

    let store = FileHighScoreStore::new(config.storage.high_score_file.clone());
    let mut session = Session::new(World::with_seed(seed), FixedIntervalScheduler::new(), store);
    let mut events = Vec::new();
    session.configure_grid(config.tile_count(), &mut events);
    session.configure_difficulty(config.difficulty(), &mut events);

    let palette = Palette::default();
    let grid = GridPresentation::new(
        config.grid.tile_count,
        config.grid.cell_size,
        palette.grid_line,
    )
    .context("failed to describe the board")?;
    let mut initial_scene = Scene::new(grid, palette);
    scene::populate_scene(&session, &mut initial_scene);
    let presentation = Presentation::new(GAME_TITLE, palette.background, initial_scene);

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .run(presentation, move |dt, input, frame_scene| {
            events.clear();
            scene::apply_input(&mut session, input, &mut events);
            session.advance(dt, &mut events);
            for event in &events {
                log::trace!("{event:?}");
            }
            scene::populate_scene(&session, frame_scene);
        })
}
