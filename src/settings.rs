//! Runtime gameplay toggles
//!
//! UI-bound flags modeled as explicit fields rather than ambient globals.
//! The host flips them at any time through the setters on `World`; the
//! simulation reads them once per tick.

use serde::{Deserialize, Serialize};

/// Gameplay toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Autonomous play: a per-tick coin flip decides jumps
    pub use_ai: bool,
    /// Draw hitbox outlines for collision debugging
    pub show_hitboxes: bool,
    /// Master switch for obstacle collision checks
    pub enable_collisions: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_ai: false,
            show_hitboxes: false,
            enable_collisions: true,
        }
    }
}
