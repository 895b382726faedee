pub mod camera;
pub mod error;
pub mod grid;
pub mod life;
pub mod state;

pub use error::{GridError, GridResult};
pub use grid::Grid;

pub mod prelude {
    use bevy::{color::Color, math::Vec2};

    pub const UPDATE_INTERVAL_MS: u64 = 500;
    /// `None` seeds the randomizer from entropy
    pub const RNG_SEED: Option<u64> = None;
    pub const BG_COLOR: Color = Color::srgb(0.83, 0.83, 0.83);

    pub const CANVAS_SIZE_PX: Vec2 = Vec2::new(1000.0, 650.0);
    pub const BOARD_POS: Vec2 = Vec2::ZERO;
    pub const BORDER_WIDTH_PX: f32 = 4.0;
    pub const BORDER_COLOR: Color = Color::srgb(0.4, 0.4, 0.4);

    pub const CELL_SIZE_PX: Vec2 = Vec2::splat(25.0);
    pub const CELL_SCALE: Vec2 = Vec2::splat(0.84);
    pub const CELL_ALIVE_COLOR: Color = Color::BLACK;
    pub const CELL_DEAD_COLOR: Color = Color::WHITE;
    pub const CELL_HOVERED_ALIVE_COLOR: Color = Color::srgb(0.2, 0.4, 1.0);
    pub const CELL_HOVERED_DEAD_COLOR: Color = Color::srgb(0.7, 0.8, 1.0);
}
