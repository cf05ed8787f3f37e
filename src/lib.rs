//! Dino Dash - a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, sprites, chunked terrain, collisions)
//! - `render`: Drawing-surface contract the simulation renders through
//! - `driver`: Frame-callback loop driver
//! - `settings`: Runtime gameplay toggles

pub mod driver;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Width of the visible window of the world, in world units
    pub const VIEWPORT_WIDTH: f32 = 600.0;
    /// Height of the visible window of the world
    pub const VIEWPORT_HEIGHT: f32 = 150.0;

    /// Target simulation rate (ticks per second)
    pub const TARGET_TICK_RATE: f64 = 60.0;

    /// Scroll speed of a fresh run, in world units per tick
    pub const SCROLL_START_SPEED: f32 = 10.0;
    /// Scroll speed gained with every generated chunk
    pub const SCROLL_ACCELERATION: f32 = 0.1;

    /// Upward launch speed at the start of a jump (units/s)
    pub const JUMP_SPEED: f32 = 100.0;
    /// Vertical acceleration during a jump (units/s², negative pulls toward the ground)
    pub const GRAVITY: f32 = -9.81 * 20.0;

    /// Scroll distance per score point
    pub const SCORE_DIVISOR: f32 = 10.0;
}
