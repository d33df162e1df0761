//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};
use snake_core::Direction;
use snake_rendering::{ControlPanelView, HudPresentation};

/// Buttons pressed in the control panel during the current frame.
///
/// Presses on buttons that do not apply to the current status are dropped here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Start button.
    pub(crate) start: bool,
    /// Pause/resume button.
    pub(crate) toggle_pause: bool,
    /// Reset button.
    pub(crate) reset: bool,
    /// Directional pad.
    pub(crate) steer: Option<Direction>,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Score labels.
    pub(crate) hud: HudPresentation,
    /// Button enablement for the current status.
    pub(crate) view: ControlPanelView,
}

/// Renders the control panel's labels and buttons for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(8.0, 8.0, 6.0, 6.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let hud = context.hud;
    let view = context.view;
    let mut pressed = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        let score_text = format!("Score: {}", hud.score.get());
        let level_text = format!("Level: {}", hud.level.get());
        let high_score_text = format!("High score: {}", hud.high_score.get());
        ui.label(None, score_text.as_str());
        ui.label(None, level_text.as_str());
        ui.label(None, high_score_text.as_str());
        ui.label(None, hud.status_label());
        ui.separator();

        pressed.start = ui.button(None, "Start") && view.start_enabled();
        pressed.toggle_pause = ui.button(None, view.pause_label()) && view.pause_enabled();
        pressed.reset = ui.button(None, "Reset");
        ui.separator();

        let mut steer = None;
        if ui.button(None, "Up") {
            steer = Some(Direction::North);
        }
        if ui.button(None, "Left") {
            steer = Some(Direction::West);
        }
        ui.same_line(0.0);
        if ui.button(None, "Right") {
            steer = Some(Direction::East);
        }
        if ui.button(None, "Down") {
            steer = Some(Direction::South);
        }
        pressed.steer = steer.filter(|_| view.steering_enabled());

        ui.separator();
        ui.label(None, "Arrows/WASD steer");
        ui.label(None, "Enter start, Space pause");
        ui.label(None, "R reset, Esc quit");
    });

    ui.pop_skin();

    pressed
}
