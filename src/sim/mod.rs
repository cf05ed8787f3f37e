//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (sprite insertion order)
//! - No platform dependencies; drawing goes through the `Surface` trait

pub mod animation;
pub mod rect;
pub mod sprite;
pub mod state;
pub mod tick;

pub use animation::Animation;
pub use rect::Rect;
pub use sprite::{AnimId, RunnerState, Sprite, SpriteKind};
pub use state::{ConfigError, GameEvent, GamePhase, World, WorldConfig};
pub use tick::{Action, Key, TickInput, render_frame, tick};
