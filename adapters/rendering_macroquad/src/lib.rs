#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Snake.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The control panel uses Macroquad's immediate-mode UI module. All UI-specific
//! calls live inside the local `ui` module to avoid leaking Macroquad UI types
//! throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use snake_core::Direction;
use snake_rendering::{
    FrameInput, GameOverPresentation, Presentation, RenderingBackend, Scene, SegmentRole,
};
use std::time::Duration;

/// Width of the control panel docked to the right of the board, in screen pixels.
const PANEL_WIDTH: f32 = 220.0;
/// Gap kept between the board and the window edges, in screen pixels.
const BOARD_MARGIN: f32 = 16.0;
const OVERLAY_HEADLINE_SIZE: u16 = 36;
const OVERLAY_TEXT_SIZE: u16 = 24;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    start_latched: bool,
    toggle_pause_latched: bool,
    reset_latched: bool,
    steer_latched: Option<Direction>,
}

impl ControlPanelInputState {
    /// Records that the start button was pressed this frame.
    pub fn register_start(&mut self) {
        self.start_latched = true;
    }

    /// Records that the pause/resume button was pressed this frame.
    pub fn register_toggle_pause(&mut self) {
        self.toggle_pause_latched = true;
    }

    /// Records that the reset button was pressed this frame.
    pub fn register_reset(&mut self) {
        self.reset_latched = true;
    }

    /// Records that a directional button was pressed this frame. Later presses win.
    pub fn register_steer(&mut self, direction: Direction) {
        self.steer_latched = Some(direction);
    }

    /// Returns every latched request and clears the latches so each fires once.
    pub fn take_frame_input(&mut self) -> FrameInput {
        let input = FrameInput {
            steer: self.steer_latched,
            start: self.start_latched,
            toggle_pause: self.toggle_pause_latched,
            reset: self.reset_latched,
        };
        *self = Self::default();
        input
    }

    fn register(&mut self, result: ControlPanelUiResult) {
        if result.start {
            self.register_start();
        }
        if result.toggle_pause {
            self.register_toggle_pause();
        }
        if result.reset {
            self.register_reset();
        }
        if let Some(direction) = result.steer {
            self.register_steer(direction);
        }
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// `Enter` starts a game.
    start: bool,
    /// `Space` or `P` pauses and resumes.
    toggle_pause: bool,
    /// `R` lays out a fresh board.
    reset: bool,
    /// Arrow keys or `WASD` steer.
    steer: Option<Direction>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self::from_pressed(is_key_pressed)
    }

    fn from_pressed(pressed: impl Fn(KeyCode) -> bool) -> Self {
        let steer = [
            (KeyCode::Up, KeyCode::W, Direction::North),
            (KeyCode::Down, KeyCode::S, Direction::South),
            (KeyCode::Left, KeyCode::A, Direction::West),
            (KeyCode::Right, KeyCode::D, Direction::East),
        ]
        .into_iter()
        .find(|(arrow, letter, _)| pressed(*arrow) || pressed(*letter))
        .map(|(_, _, direction)| direction);

        Self {
            quit_requested: pressed(KeyCode::Escape) || pressed(KeyCode::Q),
            start: pressed(KeyCode::Enter) || pressed(KeyCode::KpEnter),
            toggle_pause: pressed(KeyCode::Space) || pressed(KeyCode::P),
            reset: pressed(KeyCode::R),
            steer,
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            steer: self.steer,
            start: self.start,
            toggle_pause: self.toggle_pause,
            reset: self.reset,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let board_side = scene.grid.side() + 2.0 * BOARD_MARGIN;
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: (board_side + PANEL_WIDTH).ceil() as i32,
            window_height: board_side.ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    log::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = keyboard
                    .frame_input()
                    .merge(control_panel_input.take_frame_input());

                update_scene(frame_dt, frame_input, &mut scene);

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_board(&scene, &metrics);
                draw_item(&scene, &metrics);
                draw_snake(&scene, &metrics);
                if let Some(game_over) = scene.game_over {
                    draw_game_over(&scene, game_over, &metrics);
                }

                let panel_context = draw_control_panel(&scene, screen_width, screen_height);
                let mut control_panel_ui = macroquad::ui::root_ui();
                let result = draw_control_panel_ui(&mut control_panel_ui, panel_context);
                control_panel_input.register(result);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping from board world units to screen pixels for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    board_side_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let side = scene.grid.side();
        let available_width = (screen_width - PANEL_WIDTH - 2.0 * BOARD_MARGIN).max(0.0);
        let available_height = (screen_height - 2.0 * BOARD_MARGIN).max(0.0);
        let scale = if side <= f32::EPSILON {
            1.0
        } else {
            (available_width / side).min(available_height / side)
        };

        let board_side_scaled = side * scale;
        let offset_x = BOARD_MARGIN + ((available_width - board_side_scaled) * 0.5).max(0.0);
        let offset_y = BOARD_MARGIN + ((available_height - board_side_scaled) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            board_side_scaled,
        }
    }

    fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + world.x * self.scale,
            self.offset_y + world.y * self.scale,
        )
    }
}

fn draw_board(scene: &Scene, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.board_side_scaled,
        metrics.board_side_scaled,
        to_macroquad_color(scene.palette.background),
    );

    let grid = scene.grid;
    let line_color = to_macroquad_color(grid.line_color);
    let step = grid.cell_length * metrics.scale;
    for index in 0..=grid.tile_count {
        let offset = index as f32 * step;
        macroquad::shapes::draw_line(
            metrics.offset_x + offset,
            metrics.offset_y,
            metrics.offset_x + offset,
            metrics.offset_y + metrics.board_side_scaled,
            1.0,
            line_color,
        );
        macroquad::shapes::draw_line(
            metrics.offset_x,
            metrics.offset_y + offset,
            metrics.offset_x + metrics.board_side_scaled,
            metrics.offset_y + offset,
            1.0,
            line_color,
        );
    }
}

fn draw_snake(scene: &Scene, metrics: &SceneMetrics) {
    let grid = &scene.grid;
    for (cell, role) in scene.snake.segments_with_roles() {
        let color = match role {
            SegmentRole::Head => scene.palette.head,
            SegmentRole::Body => scene.palette.body,
        };
        let (origin, size) = grid.segment_rect(cell);
        let screen = metrics.to_screen(origin);
        let size = size * metrics.scale;
        macroquad::shapes::draw_rectangle(
            screen.x,
            screen.y,
            size,
            size,
            to_macroquad_color(color),
        );
    }

    if let Some((eyes, size)) = scene.snake.eyes(grid) {
        let size = size * metrics.scale;
        let color = to_macroquad_color(scene.palette.eye);
        for eye in eyes {
            let screen = metrics.to_screen(eye);
            macroquad::shapes::draw_rectangle(
                screen.x - size * 0.5,
                screen.y - size * 0.5,
                size,
                size,
                color,
            );
        }
    }
}

fn draw_item(scene: &Scene, metrics: &SceneMetrics) {
    let Some(item) = scene.item else {
        return;
    };

    let (center, radius) = item.circle(&scene.grid);
    let center = metrics.to_screen(center);
    macroquad::shapes::draw_circle(
        center.x,
        center.y,
        radius * metrics.scale,
        to_macroquad_color(scene.palette.item),
    );

    let (leaf, size) = item.leaf(&scene.grid);
    let leaf = metrics.to_screen(leaf);
    let size = size * metrics.scale;
    macroquad::shapes::draw_rectangle(
        leaf.x,
        leaf.y,
        size,
        size,
        to_macroquad_color(scene.palette.leaf),
    );
}

fn game_over_lines(game_over: GameOverPresentation) -> Vec<(String, u16)> {
    let mut lines = vec![
        (game_over.headline().to_string(), OVERLAY_HEADLINE_SIZE),
        (
            format!("Final score: {}", game_over.final_score.get()),
            OVERLAY_TEXT_SIZE,
        ),
    ];
    if game_over.new_record {
        lines.push(("New record!".to_string(), OVERLAY_TEXT_SIZE));
    }
    lines.push(("Press Enter to play again".to_string(), OVERLAY_TEXT_SIZE));
    lines
}

fn draw_game_over(scene: &Scene, game_over: GameOverPresentation, metrics: &SceneMetrics) {
    macroquad::shapes::draw_rectangle(
        metrics.offset_x,
        metrics.offset_y,
        metrics.board_side_scaled,
        metrics.board_side_scaled,
        to_macroquad_color(scene.palette.overlay),
    );

    let text_color = to_macroquad_color(scene.palette.overlay_text);
    let lines = game_over_lines(game_over);
    let line_height = f32::from(OVERLAY_HEADLINE_SIZE) * 1.4;
    let block_height = line_height * lines.len() as f32;
    let center_x = metrics.offset_x + metrics.board_side_scaled * 0.5;
    let mut baseline = metrics.offset_y + (metrics.board_side_scaled - block_height) * 0.5;

    for (text, size) in lines {
        baseline += line_height;
        let dimensions = macroquad::text::measure_text(&text, None, size, 1.0);
        macroquad::text::draw_text(
            &text,
            center_x - dimensions.width * 0.5,
            baseline,
            f32::from(size),
            text_color,
        );
    }
}

fn draw_control_panel(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
) -> ControlPanelUiContext {
    let left = (screen_width - PANEL_WIDTH).max(0.0);
    let background = to_macroquad_color(scene.palette.background.lighten(0.08));
    macroquad::shapes::draw_rectangle(left, 0.0, PANEL_WIDTH, screen_height, background);

    ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(PANEL_WIDTH, screen_height),
        background,
        hud: scene.hud,
        view: scene.control_panel(),
    }
}

fn to_macroquad_color(color: snake_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_core::{CellCoord, EndReason, Score};
    use snake_rendering::{GridPresentation, Palette};

    fn scene(tile_count: u32) -> Scene {
        let palette = Palette::default();
        let grid =
            GridPresentation::new(tile_count, 20.0, palette.grid_line).expect("valid grid");
        Scene::new(grid, palette)
    }

    #[test]
    fn metrics_fit_board_left_of_panel() {
        let scene = scene(20);
        let metrics = SceneMetrics::from_scene(&scene, 432.0 + PANEL_WIDTH, 432.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset_x, BOARD_MARGIN);
        assert_eq!(metrics.offset_y, BOARD_MARGIN);
        assert_eq!(metrics.board_side_scaled, 400.0);
    }

    #[test]
    fn metrics_centre_board_in_wide_windows() {
        let scene = scene(10);
        let screen_width = 1_000.0 + PANEL_WIDTH;
        let metrics = SceneMetrics::from_scene(&scene, screen_width, 232.0);

        assert_eq!(metrics.scale, 1.0);
        assert_eq!(metrics.offset_x, BOARD_MARGIN + 384.0);
        assert!(metrics.offset_x + metrics.board_side_scaled <= screen_width - PANEL_WIDTH);
    }

    #[test]
    fn metrics_map_cells_to_screen() {
        let scene = scene(20);
        let metrics = SceneMetrics::from_scene(&scene, 2.0 * 416.0 + PANEL_WIDTH, 832.0);
        let origin = scene.grid.cell_origin(CellCoord::new(1, 2));

        assert_eq!(metrics.scale, 2.0);
        assert_eq!(
            metrics.to_screen(origin),
            Vec2::new(BOARD_MARGIN + 40.0, BOARD_MARGIN + 80.0)
        );
    }

    #[test]
    fn keyboard_maps_arrows_and_letters() {
        let arrows = KeyboardShortcuts::from_pressed(|key| key == KeyCode::Left);
        let letters = KeyboardShortcuts::from_pressed(|key| key == KeyCode::S);

        assert_eq!(arrows.steer, Some(Direction::West));
        assert_eq!(letters.steer, Some(Direction::South));
        assert!(!arrows.quit_requested);
    }

    #[test]
    fn keyboard_maps_lifecycle_keys() {
        let shortcuts = KeyboardShortcuts::from_pressed(|key| {
            matches!(key, KeyCode::Enter | KeyCode::P | KeyCode::R)
        });

        let input = shortcuts.frame_input();
        assert!(input.start && input.toggle_pause && input.reset);
        assert_eq!(input.steer, None);
        assert!(KeyboardShortcuts::from_pressed(|key| key == KeyCode::Escape).quit_requested);
        assert!(KeyboardShortcuts::from_pressed(|key| key == KeyCode::Space).toggle_pause);
    }

    #[test]
    fn idle_keyboard_produces_idle_input() {
        let shortcuts = KeyboardShortcuts::from_pressed(|_| false);

        assert_eq!(shortcuts, KeyboardShortcuts::default());
        assert!(shortcuts.frame_input().is_idle());
    }

    #[test]
    fn panel_results_are_latched_until_taken() {
        let mut state = ControlPanelInputState::default();
        state.register(ControlPanelUiResult {
            reset: true,
            steer: Some(Direction::North),
            ..ControlPanelUiResult::default()
        });

        let input = state.take_frame_input();
        assert!(input.reset);
        assert_eq!(input.steer, Some(Direction::North));
        assert!(state.take_frame_input().is_idle());
    }

    #[test]
    fn game_over_lines_announce_records() {
        let record = game_over_lines(GameOverPresentation {
            final_score: Score::new(120),
            new_record: true,
            reason: EndReason::SelfCollision,
        });
        let texts: Vec<&str> = record.iter().map(|(text, _)| text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "You ran into yourself",
                "Final score: 120",
                "New record!",
                "Press Enter to play again",
            ]
        );

        let plain = game_over_lines(GameOverPresentation {
            final_score: Score::new(10),
            new_record: false,
            reason: EndReason::WallCollision,
        });
        assert!(plain.iter().all(|(text, _)| text != "New record!"));
    }

    #[test]
    fn colors_convert_channel_for_channel() {
        let color = to_macroquad_color(snake_rendering::Color::new(0.1, 0.2, 0.3, 0.4));

        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 0.4));
    }
}
