//! World state and core simulation types
//!
//! Everything needed to reproduce a run lives here: the phase machine, the
//! insertion-ordered sprite collection, the obstacle subset, scroll state,
//! and the seeded RNG all spawn decisions draw from.

use std::fmt;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::sprite::Sprite;
use super::rect::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, first frame rendered, not advancing
    Idle,
    /// Loop active, simulation advancing
    Running,
    /// Loop active, simulation frozen
    Paused,
    /// Run ended; terminal
    GameOver,
}

/// Gameplay events emitted during a tick, drained by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The first meaningful input started the run
    Started,
    /// A new landscape chunk and its spawn batch were generated
    ChunkGenerated { index: u32 },
    /// The runner hit this obstacle (sprite id); fatal
    Collision { obstacle: u32 },
    /// The run is over; the host should stop the loop
    GameOver,
}

/// Configuration rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveViewport,
    NonPositiveScrollSpeed,
    NonPositiveAcceleration,
    NonPositiveTickRate,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveViewport => {
                write!(f, "viewport dimensions must be positive")
            }
            ConfigError::NonPositiveScrollSpeed => {
                write!(f, "scroll speed must be positive")
            }
            ConfigError::NonPositiveAcceleration => {
                write!(f, "scroll acceleration must be positive")
            }
            ConfigError::NonPositiveTickRate => {
                write!(f, "target tick rate must be positive")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tunable world parameters, validated by [`World::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Scroll advance per tick at the start of a run
    pub scroll_speed: f32,
    /// Scroll speed gained per generated chunk
    pub scroll_acceleration: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            scroll_speed: SCROLL_START_SPEED,
            scroll_acceleration: SCROLL_ACCELERATION,
        }
    }
}

impl WorldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_width > 0.0) || !(self.viewport_height > 0.0) {
            return Err(ConfigError::NonPositiveViewport);
        }
        if !(self.scroll_speed > 0.0) {
            return Err(ConfigError::NonPositiveScrollSpeed);
        }
        if !(self.scroll_acceleration > 0.0) {
            return Err(ConfigError::NonPositiveAcceleration);
        }
        Ok(())
    }
}

/// Complete game state for one run.
///
/// Invariants:
/// - `obstacles` ids always reference members of `sprites`
/// - the runner is `sprites[0]` and is never evicted
/// - `scroll_x` and `scroll_speed` never decrease while running; speed resets
///   only by constructing a fresh `World`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub config: WorldConfig,
    settings: Settings,
    pub phase: GamePhase,
    /// Camera offset into the world; defines what is on-screen
    pub scroll_x: f32,
    pub scroll_speed: f32,
    /// Chunks generated so far; the fresh world counts its seed segment
    pub chunks: u32,
    /// The y coordinate sprites rest on
    pub ground_level: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// All live sprites, insertion-ordered
    pub sprites: Vec<Sprite>,
    /// Ids of sprites that participate in collision checks, insertion-ordered
    pub obstacles: Vec<u32>,
    /// Events emitted since the last drain
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Create a fresh world: runner and seed landscape segment positioned on
    /// the ground, scroll at zero, phase [`GamePhase::Idle`].
    pub fn new(config: WorldConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut next_id = 1;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let mut runner = Sprite::runner(alloc(), 0.0, 0.0);
        let mut landscape = Sprite::landscape(alloc(), 0.0, 0.0);

        // Rest the runner on top of the terrain strip at the bottom edge
        let ground_level =
            config.viewport_height - (runner.height() + landscape.height()) + 18.0;
        runner.pos.y = ground_level;
        if let super::sprite::SpriteKind::Runner(state) = &mut runner.kind {
            state.ground_level = ground_level;
        }
        landscape.pos.y = config.viewport_height - landscape.height();

        log::info!("world created with seed {seed}, ground level {ground_level}");

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            config,
            settings: Settings::default(),
            phase: GamePhase::Idle,
            scroll_x: 0.0,
            scroll_speed: config.scroll_speed,
            chunks: 1,
            ground_level,
            time_ticks: 0,
            sprites: vec![runner, landscape],
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id,
        })
    }

    /// The player character. Always the first sprite; eviction exempts it.
    pub fn runner(&self) -> &Sprite {
        &self.sprites[0]
    }

    pub(crate) fn runner_mut(&mut self) -> &mut Sprite {
        &mut self.sprites[0]
    }

    /// Score derived deterministically from scroll distance.
    pub fn score(&self) -> u64 {
        (self.scroll_x / SCORE_DIVISOR).floor() as u64
    }

    /// The visible window of the world at the current scroll position.
    pub fn viewport(&self) -> Rect {
        Rect::new(
            self.scroll_x,
            0.0,
            self.config.viewport_width,
            self.config.viewport_height,
        )
    }

    pub fn is_obstacle(&self, id: u32) -> bool {
        self.obstacles.contains(&id)
    }

    pub(crate) fn next_sprite_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Autonomous play: a per-tick coin flip decides jumps.
    pub fn set_use_ai(&mut self, on: bool) {
        self.settings.use_ai = on;
    }

    /// Draw hitbox outlines for debugging.
    pub fn set_show_hitboxes(&mut self, on: bool) {
        self.settings.show_hitboxes = on;
    }

    /// Master switch for obstacle collision checks.
    pub fn set_enable_collisions(&mut self, on: bool) {
        self.settings.enable_collisions = on;
    }
}
