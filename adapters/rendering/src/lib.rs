#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snake adapters.
//!
//! Backends receive a [`Presentation`] once and a mutable [`Scene`] every
//! frame. All geometry is expressed in world units where one cell spans
//! [`GridPresentation::cell_length`]; backends only translate these
//! descriptors into draw calls.

use anyhow::Result as AnyResult;
use glam::Vec2;
use snake_core::{CellCoord, Direction, EndReason, Level, Score, SessionStatus};
use std::time::Duration;
use thiserror::Error;

/// Fraction of a cell the eyes sit ahead of the head's centre.
const EYE_FORWARD_OFFSET: f32 = 0.22;
/// Fraction of a cell separating each eye from the head's centre line.
const EYE_LATERAL_OFFSET: f32 = 0.22;
/// Eye edge length as a fraction of a cell.
const EYE_SIZE: f32 = 0.15;
/// Gap left around each snake segment as a fraction of a cell.
const SEGMENT_INSET: f32 = 0.05;
/// Item radius as a fraction of a cell.
const ITEM_RADIUS: f32 = 0.4;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors used for every element of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Board background.
    pub background: Color,
    /// Lines separating cells.
    pub grid_line: Color,
    /// Head segment fill.
    pub head: Color,
    /// Fill of every segment behind the head.
    pub body: Color,
    /// Eyes drawn on the head.
    pub eye: Color,
    /// Item fill.
    pub item: Color,
    /// Leaf drawn on top of the item.
    pub leaf: Color,
    /// Veil drawn over the board once the game is over.
    pub overlay: Color,
    /// Text drawn on top of the overlay.
    pub overlay_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x00, 0x00, 0x00),
            grid_line: Color::from_rgb_u8(0x22, 0x22, 0x22),
            head: Color::from_rgb_u8(0x4a, 0xde, 0x80),
            body: Color::from_rgb_u8(16, 185, 129),
            eye: Color::from_rgb_u8(0x00, 0x00, 0x00),
            item: Color::from_rgb_u8(0xff, 0x6b, 0x6b),
            leaf: Color::from_rgb_u8(0x4a, 0xde, 0x80),
            overlay: Color::from_rgb_u8(0x00, 0x00, 0x00).with_alpha(0.7),
            overlay_text: Color::from_rgb_u8(0xff, 0xff, 0xff),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction requested on this frame, if any.
    pub steer: Option<Direction>,
    /// Whether a start request was detected on this frame.
    pub start: bool,
    /// Whether a pause toggle was detected on this frame.
    pub toggle_pause: bool,
    /// Whether a reset request was detected on this frame.
    pub reset: bool,
}

impl FrameInput {
    /// Folds another snapshot into this one; the later direction wins.
    #[must_use]
    pub fn merge(self, other: FrameInput) -> Self {
        Self {
            steer: other.steer.or(self.steer),
            start: self.start || other.start,
            toggle_pause: self.toggle_pause || other.toggle_pause,
            reset: self.reset || other.reset,
        }
    }

    /// Whether the snapshot carries no request at all.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Describes the square board that adapters render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of cells along each edge of the board.
    pub tile_count: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GridPresentation {
    /// Creates a new grid descriptor.
    ///
    /// Returns an error when the board has no cells or the cell length is not
    /// a positive finite number.
    pub fn new(
        tile_count: u32,
        cell_length: f32,
        line_color: Color,
    ) -> Result<Self, RenderingError> {
        if tile_count == 0 {
            return Err(RenderingError::EmptyGrid);
        }
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            tile_count,
            cell_length,
            line_color,
        })
    }

    /// Edge length of the whole board.
    #[must_use]
    pub fn side(&self) -> f32 {
        self.tile_count as f32 * self.cell_length
    }

    /// Top-left corner of a cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(cell.column() as f32, cell.row() as f32) * self.cell_length
    }

    /// Centre of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.cell_length * 0.5)
    }

    /// Top-left corner and edge length of the square drawn for a snake segment.
    #[must_use]
    pub fn segment_rect(&self, cell: CellCoord) -> (Vec2, f32) {
        let inset = self.cell_length * SEGMENT_INSET;
        (
            self.cell_origin(cell) + Vec2::splat(inset),
            self.cell_length - 2.0 * inset,
        )
    }
}

/// Role of a snake segment, which decides its fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentRole {
    /// Leading segment.
    Head,
    /// Any segment behind the head.
    Body,
}

/// Snake body snapshot, head first.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SnakePresentation {
    /// Occupied cells ordered from head to tail.
    pub segments: Vec<CellCoord>,
    /// Committed direction, `None` while stationary.
    pub heading: Option<Direction>,
}

impl SnakePresentation {
    /// Creates a new snake descriptor.
    #[must_use]
    pub fn new(segments: Vec<CellCoord>, heading: Option<Direction>) -> Self {
        Self { segments, heading }
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.segments.first().copied()
    }

    /// Segments paired with their role, tail last.
    pub fn segments_with_roles(&self) -> impl Iterator<Item = (CellCoord, SegmentRole)> + '_ {
        self.segments.iter().enumerate().map(|(index, cell)| {
            let role = if index == 0 {
                SegmentRole::Head
            } else {
                SegmentRole::Body
            };
            (*cell, role)
        })
    }

    /// Centres and edge length of the two eyes, facing the heading.
    ///
    /// A stationary snake looks east, the direction it starts in.
    #[must_use]
    pub fn eyes(&self, grid: &GridPresentation) -> Option<([Vec2; 2], f32)> {
        let head = self.head()?;
        let (dx, dy) = self.heading.unwrap_or(Direction::East).delta();
        let forward = Vec2::new(dx as f32, dy as f32);
        let lateral = forward.perp();
        let center = grid.cell_center(head) + forward * (grid.cell_length * EYE_FORWARD_OFFSET);
        let spread = lateral * (grid.cell_length * EYE_LATERAL_OFFSET);

        Some((
            [center + spread, center - spread],
            grid.cell_length * EYE_SIZE,
        ))
    }
}

/// Item waiting to be consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemPresentation {
    /// Cell holding the item.
    pub cell: CellCoord,
}

impl ItemPresentation {
    /// Creates a new item descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord) -> Self {
        Self { cell }
    }

    /// Centre and radius of the item's circle.
    #[must_use]
    pub fn circle(&self, grid: &GridPresentation) -> (Vec2, f32) {
        (grid.cell_center(self.cell), grid.cell_length * ITEM_RADIUS)
    }

    /// Top-left corner and edge length of the leaf square above the circle.
    #[must_use]
    pub fn leaf(&self, grid: &GridPresentation) -> (Vec2, f32) {
        let (center, radius) = self.circle(grid);
        let size = grid.cell_length * 0.2;
        (Vec2::new(center.x - size * 0.5, center.y - radius), size)
    }
}

/// Score labels shown next to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HudPresentation {
    /// Score of the current game.
    pub score: Score,
    /// Level derived from the score.
    pub level: Level,
    /// Best recorded score.
    pub high_score: Score,
    /// Lifecycle status of the current game.
    pub status: SessionStatus,
}

impl HudPresentation {
    /// Short description of the lifecycle status.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        match self.status {
            SessionStatus::NotRunning => "Press Enter to start",
            SessionStatus::Running => "Running",
            SessionStatus::Paused => "Paused",
            SessionStatus::Ended => "Game over",
        }
    }
}

/// Overlay shown once a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverPresentation {
    /// Score achieved in the finished game.
    pub final_score: Score,
    /// Whether the game set a new record.
    pub new_record: bool,
    /// Terminal condition that ended the game.
    pub reason: EndReason,
}

impl GameOverPresentation {
    /// Headline describing how the game ended.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self.reason {
            EndReason::WallCollision => "You hit the wall",
            EndReason::SelfCollision => "You ran into yourself",
            EndReason::BoardFull => "Board cleared!",
        }
    }
}

/// Enablement of the control panel buttons for a lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlPanelView {
    status: SessionStatus,
}

impl ControlPanelView {
    /// Creates the view for `status`.
    #[must_use]
    pub const fn new(status: SessionStatus) -> Self {
        Self { status }
    }

    /// Start applies to a fresh board, or to a finished game as "play again".
    #[must_use]
    pub const fn start_enabled(&self) -> bool {
        matches!(self.status, SessionStatus::NotRunning | SessionStatus::Ended)
    }

    /// Pause toggling applies while a game is in progress.
    #[must_use]
    pub const fn pause_enabled(&self) -> bool {
        matches!(self.status, SessionStatus::Running | SessionStatus::Paused)
    }

    /// Caption of the pause toggle.
    #[must_use]
    pub const fn pause_label(&self) -> &'static str {
        match self.status {
            SessionStatus::Paused => "Resume",
            _ => "Pause",
        }
    }

    /// Directional buttons only matter while the snake moves.
    #[must_use]
    pub const fn steering_enabled(&self) -> bool {
        matches!(self.status, SessionStatus::Running)
    }
}

/// Scene description combining the board, the snake, the item and the labels.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board geometry.
    pub grid: GridPresentation,
    /// Colors used for every element.
    pub palette: Palette,
    /// Snake body snapshot.
    pub snake: SnakePresentation,
    /// Item waiting to be consumed, absent once the board is full.
    pub item: Option<ItemPresentation>,
    /// Score labels.
    pub hud: HudPresentation,
    /// Overlay shown after the game ended.
    pub game_over: Option<GameOverPresentation>,
}

impl Scene {
    /// Creates an empty scene for the provided board.
    #[must_use]
    pub fn new(grid: GridPresentation, palette: Palette) -> Self {
        Self {
            grid,
            palette,
            snake: SnakePresentation::default(),
            item: None,
            hud: HudPresentation::default(),
            game_over: None,
        }
    }

    /// Button enablement derived from the current status.
    #[must_use]
    pub const fn control_panel(&self) -> ControlPanelView {
        ControlPanelView::new(self.hud.status)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Snake scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// The board must contain at least one cell.
    #[error("grid must contain at least one cell")]
    EmptyGrid,
    /// Cells must have a positive, finite edge length.
    #[error("cell length must be positive (received {cell_length})")]
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GridPresentation {
        GridPresentation::new(20, 20.0, Palette::default().grid_line).expect("valid grid")
    }

    #[test]
    fn grid_rejects_degenerate_dimensions() {
        assert_eq!(
            GridPresentation::new(0, 20.0, Color::new(0.0, 0.0, 0.0, 1.0)),
            Err(RenderingError::EmptyGrid)
        );
        assert!(matches!(
            GridPresentation::new(20, 0.0, Color::new(0.0, 0.0, 0.0, 1.0)),
            Err(RenderingError::InvalidCellLength { .. })
        ));
        assert!(GridPresentation::new(20, f32::NAN, Color::new(0.0, 0.0, 0.0, 1.0)).is_err());
    }

    #[test]
    fn cell_geometry_scales_with_cell_length() {
        let grid = grid();

        assert_eq!(grid.side(), 400.0);
        assert_eq!(grid.cell_origin(CellCoord::new(3, 4)), Vec2::new(60.0, 80.0));
        assert_eq!(grid.cell_center(CellCoord::new(3, 4)), Vec2::new(70.0, 90.0));

        let (origin, size) = grid.segment_rect(CellCoord::new(0, 0));
        assert_eq!(origin, Vec2::splat(1.0));
        assert_eq!(size, 18.0);
    }

    #[test]
    fn eyes_face_the_heading() {
        let grid = grid();
        let head = CellCoord::new(5, 5);
        let center = grid.cell_center(head);

        let east = SnakePresentation::new(vec![head], Some(Direction::East));
        let ([first, second], _) = east.eyes(&grid).expect("head present");
        assert!(first.x > center.x && second.x > center.x);
        assert_eq!(first.x, second.x);

        let north = SnakePresentation::new(vec![head], Some(Direction::North));
        let ([first, second], _) = north.eyes(&grid).expect("head present");
        assert!(first.y < center.y && second.y < center.y);
        assert_eq!(first.y, second.y);
    }

    #[test]
    fn stationary_snake_looks_east() {
        let grid = grid();
        let stationary = SnakePresentation::new(vec![CellCoord::new(2, 2)], None);
        let east = SnakePresentation::new(vec![CellCoord::new(2, 2)], Some(Direction::East));

        assert_eq!(stationary.eyes(&grid), east.eyes(&grid));
        assert!(SnakePresentation::default().eyes(&grid).is_none());
    }

    #[test]
    fn only_the_first_segment_is_the_head() {
        let snake = SnakePresentation::new(
            vec![CellCoord::new(3, 3), CellCoord::new(2, 3), CellCoord::new(1, 3)],
            Some(Direction::East),
        );

        let roles: Vec<SegmentRole> = snake.segments_with_roles().map(|(_, role)| role).collect();
        assert_eq!(
            roles,
            vec![SegmentRole::Head, SegmentRole::Body, SegmentRole::Body]
        );
    }

    #[test]
    fn leaf_sits_on_top_of_the_item() {
        let grid = grid();
        let item = ItemPresentation::new(CellCoord::new(15, 15));
        let (center, radius) = item.circle(&grid);
        let (leaf, size) = item.leaf(&grid);

        assert_eq!(radius, 8.0);
        assert_eq!(leaf.y, center.y - radius);
        assert_eq!(leaf.x + size * 0.5, center.x);
    }

    #[test]
    fn control_panel_follows_status() {
        let idle = ControlPanelView::new(SessionStatus::NotRunning);
        assert!(idle.start_enabled());
        assert!(!idle.pause_enabled());
        assert!(!idle.steering_enabled());

        let paused = ControlPanelView::new(SessionStatus::Paused);
        assert!(!paused.start_enabled());
        assert!(paused.pause_enabled());
        assert_eq!(paused.pause_label(), "Resume");

        let ended = ControlPanelView::new(SessionStatus::Ended);
        assert!(ended.start_enabled());
        assert!(!ended.pause_enabled());
    }

    #[test]
    fn merged_input_keeps_latest_direction_and_every_flag() {
        let first = FrameInput {
            steer: Some(Direction::North),
            start: true,
            ..FrameInput::default()
        };
        let second = FrameInput {
            steer: Some(Direction::West),
            reset: true,
            ..FrameInput::default()
        };

        let merged = first.merge(second);

        assert_eq!(merged.steer, Some(Direction::West));
        assert!(merged.start && merged.reset && !merged.toggle_pause);
        assert!(FrameInput::default().is_idle());
        assert!(!merged.is_idle());
    }

    #[test]
    fn palette_matches_board_colors() {
        let palette = Palette::default();

        assert_eq!(palette.head, Color::from_rgb_u8(74, 222, 128));
        assert_eq!(palette.item, Color::from_rgb_u8(255, 107, 107));
        assert_eq!(palette.grid_line, Color::from_rgb_u8(34, 34, 34));
    }
}
