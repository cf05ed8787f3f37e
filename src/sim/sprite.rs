//! Game sprites: the runner, terrain segments, and obstacles
//!
//! Kinds are a tagged variant rather than a class hierarchy; kind-specific
//! behavior (jump physics, ducking) lives only on the Runner variant. Frame
//! coordinates index an opaque sprite atlas the render surface owns.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::Animation;
use super::rect::Rect;
use crate::consts::{GRAVITY, JUMP_SPEED};
use crate::render::Surface;

// Atlas frames. The landscape segment doubles as the chunk width unit.
const RUNNER_IDLE_FRAME: Rect = Rect::new(76.0, 6.0, 88.0, 90.0);
const RUNNER_RUN_FRAMES: [Rect; 3] = [
    Rect::new(1338.0, 2.0, 88.0, 90.0),
    Rect::new(1514.0, 2.0, 88.0, 90.0),
    Rect::new(1602.0, 2.0, 88.0, 90.0),
];
const RUNNER_DUCK_FRAMES: [Rect; 2] = [
    Rect::new(1866.0, 2.0, 118.0, 90.0),
    Rect::new(1984.0, 2.0, 118.0, 90.0),
];
const RUNNER_JUMP_FRAME: Rect = Rect::new(1338.0, 2.0, 88.0, 90.0);
const RUNNER_DEAD_FRAME: Rect = Rect::new(1694.0, 6.0, 80.0, 86.0);

pub(crate) const LANDSCAPE_FRAME: Rect = Rect::new(0.0, 104.0, 2400.0, 26.0);
const CLOUD_FRAME: Rect = Rect::new(166.0, 2.0, 92.0, 27.0);
const PTERODACTYL_FRAMES: [Rect; 2] = [
    Rect::new(264.0, 18.0, 84.0, 60.0),
    Rect::new(356.0, 6.0, 84.0, 52.0),
];

/// Cactus variants: six small, four tall, one wide cluster.
const CACTUS_FRAMES: [Rect; 11] = [
    Rect::new(448.0, 4.0, 30.0, 66.0),
    Rect::new(482.0, 4.0, 30.0, 66.0),
    Rect::new(516.0, 4.0, 30.0, 66.0),
    Rect::new(550.0, 4.0, 30.0, 66.0),
    Rect::new(584.0, 4.0, 30.0, 66.0),
    Rect::new(618.0, 4.0, 30.0, 66.0),
    Rect::new(654.0, 4.0, 46.0, 92.0),
    Rect::new(704.0, 4.0, 44.0, 92.0),
    Rect::new(754.0, 4.0, 46.0, 92.0),
    Rect::new(804.0, 4.0, 46.0, 92.0),
    Rect::new(852.0, 8.0, 98.0, 94.0),
];

const RUNNER_SCALE: f32 = 0.5;
const LANDSCAPE_SCALE: f32 = 1.0;
const PTERODACTYL_SCALE: f32 = 0.5;
const CACTUS_SCALE: f32 = 0.6;
const RUNNER_HITBOX_SCALE: f32 = 0.5;

/// Named animation slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimId {
    Idle,
    Running,
    Ducking,
    Jumping,
    Dead,
}

/// The animations one sprite instance owns.
///
/// Each instance carries its own copies; a shared per-kind table would leak
/// frame-counter phase between entities. Switching the active slot leaves the
/// previous animation's counter in place, so re-entering it resumes rather
/// than restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    entries: Vec<(AnimId, Animation)>,
}

impl AnimationSet {
    fn single(initial: Animation) -> Self {
        Self {
            entries: vec![(AnimId::Idle, initial)],
        }
    }

    fn get(&self, id: AnimId) -> Option<&Animation> {
        self.entries.iter().find(|(k, _)| *k == id).map(|(_, a)| a)
    }

    fn get_mut(&mut self, id: AnimId) -> Option<&mut Animation> {
        self.entries
            .iter_mut()
            .find(|(k, _)| *k == id)
            .map(|(_, a)| a)
    }
}

/// Kind-specific state. Only the runner carries behavior of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpriteKind {
    Runner(RunnerState),
    Landscape,
    Cloud,
    Pterodactyl,
    Cactus,
}

/// Jump bookkeeping for the player character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    /// Vertical launch speed of the jump in flight (units/s)
    pub vertical_speed: f32,
    /// Timestamp (ms) the current jump started at
    pub jump_started_at: f64,
    /// The y coordinate the runner rests on
    pub ground_level: f32,
    /// Last timestamp seen by `update`
    pub last_time: f64,
}

/// A positioned, scaled, animated game object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: u32,
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub scale: f32,
    animations: AnimationSet,
    active: AnimId,
    pub hidden: bool,
    pub hitbox_scale: f32,
}

impl Sprite {
    fn new(id: u32, kind: SpriteKind, pos: Vec2, scale: f32, animations: AnimationSet) -> Self {
        Self {
            id,
            kind,
            pos,
            scale,
            animations,
            active: AnimId::Idle,
            hidden: false,
            hitbox_scale: 1.0,
        }
    }

    /// The player character, resting at `y` until started.
    pub fn runner(id: u32, x: f32, y: f32) -> Self {
        let animations = AnimationSet {
            entries: vec![
                (AnimId::Idle, Animation::new(vec![RUNNER_IDLE_FRAME])),
                (AnimId::Running, Animation::new(RUNNER_RUN_FRAMES.to_vec())),
                (AnimId::Ducking, Animation::new(RUNNER_DUCK_FRAMES.to_vec())),
                (AnimId::Jumping, Animation::new(vec![RUNNER_JUMP_FRAME])),
                (AnimId::Dead, Animation::new(vec![RUNNER_DEAD_FRAME])),
            ],
        };
        let mut sprite = Self::new(
            id,
            SpriteKind::Runner(RunnerState {
                ground_level: y,
                ..RunnerState::default()
            }),
            Vec2::new(x, y),
            RUNNER_SCALE,
            animations,
        );
        sprite.hitbox_scale = RUNNER_HITBOX_SCALE;
        sprite
    }

    /// One tileable terrain segment.
    pub fn landscape(id: u32, x: f32, y: f32) -> Self {
        Self::new(
            id,
            SpriteKind::Landscape,
            Vec2::new(x, y),
            LANDSCAPE_SCALE,
            AnimationSet::single(Animation::new(vec![LANDSCAPE_FRAME])),
        )
    }

    /// A decorative cloud with a random scale.
    pub fn cloud(id: u32, x: f32, y: f32, rng: &mut Pcg32) -> Self {
        let scale = rng.random_range(0.6..1.2);
        Self::new(
            id,
            SpriteKind::Cloud,
            Vec2::new(x, y),
            scale,
            AnimationSet::single(Animation::new(vec![CLOUD_FRAME])),
        )
    }

    /// A flying obstacle with a two-pose flap cycle.
    pub fn pterodactyl(id: u32, x: f32, y: f32) -> Self {
        Self::new(
            id,
            SpriteKind::Pterodactyl,
            Vec2::new(x, y),
            PTERODACTYL_SCALE,
            AnimationSet::single(Animation::with_delay(PTERODACTYL_FRAMES.to_vec(), 3)),
        )
    }

    /// A cactus of a uniformly chosen variant. The caller aligns `y` to the
    /// ground.
    pub fn random_cactus(id: u32, x: f32, y: f32, rng: &mut Pcg32) -> Self {
        let variant = rng.random_range(0..CACTUS_FRAMES.len());
        Self::new(
            id,
            SpriteKind::Cactus,
            Vec2::new(x, y),
            CACTUS_SCALE,
            AnimationSet::single(Animation::new(vec![CACTUS_FRAMES[variant]])),
        )
    }

    /// Current atlas frame, `None` for a degenerate empty animation.
    pub fn current_frame(&self) -> Option<Rect> {
        self.animations
            .get(self.active)
            .and_then(|a| a.current_frame())
    }

    /// On-screen width: current frame width scaled. Zero without a frame.
    pub fn width(&self) -> f32 {
        self.current_frame().map_or(0.0, |f| f.width * self.scale)
    }

    /// On-screen height: current frame height scaled. Zero without a frame.
    pub fn height(&self) -> f32 {
        self.current_frame().map_or(0.0, |f| f.height * self.scale)
    }

    /// Collision rectangle: the visual bounds shrunk by the hitbox scale.
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width(), self.height()).scaled(self.hitbox_scale)
    }

    pub fn active_animation(&self) -> AnimId {
        self.active
    }

    /// Point at a different owned animation. Unknown slots are ignored.
    fn set_animation(&mut self, id: AnimId) {
        if self.animations.get(id).is_some() {
            self.active = id;
        }
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn is_jumping(&self) -> bool {
        self.active == AnimId::Jumping
    }

    pub fn is_ducking(&self) -> bool {
        self.active == AnimId::Ducking
    }

    /// Safe downcast to the runner's kind-specific state.
    pub fn as_runner(&self) -> Option<&RunnerState> {
        match &self.kind {
            SpriteKind::Runner(state) => Some(state),
            _ => None,
        }
    }

    /// Launch a jump. No-op while already airborne or for non-runners.
    pub fn jump(&mut self, now_ms: f64) {
        if self.is_jumping() {
            return;
        }
        let SpriteKind::Runner(runner) = &mut self.kind else {
            return;
        };
        runner.vertical_speed = JUMP_SPEED;
        runner.jump_started_at = now_ms;
        self.set_animation(AnimId::Jumping);
    }

    /// Switch to the running gait. No-op while airborne.
    pub fn run(&mut self) {
        if self.is_jumping() {
            return;
        }
        self.set_animation(AnimId::Running);
    }

    /// Duck under a flying obstacle. Suppressed mid-air.
    pub fn duck(&mut self) {
        if self.is_jumping() {
            return;
        }
        self.set_animation(AnimId::Ducking);
    }

    /// Stand back up, restoring the running or jumping animation depending
    /// on the current airborne state.
    pub fn unduck(&mut self) {
        if self.is_jumping() {
            self.set_animation(AnimId::Jumping);
        } else {
            self.set_animation(AnimId::Running);
        }
    }

    /// Terminal transition: there is no way back from the dead pose.
    pub fn die(&mut self) {
        self.set_animation(AnimId::Dead);
    }

    /// Advance internal state for this tick. Only the runner has physics:
    /// while airborne, vertical displacement follows `v·t + a·t²` from the
    /// jump start, and crossing the ground level lands the jump exactly on
    /// the ground with the running animation restored.
    pub fn update(&mut self, now_ms: f64) {
        let jumping = self.is_jumping();
        let SpriteKind::Runner(runner) = &mut self.kind else {
            return;
        };
        runner.last_time = now_ms;
        if !jumping {
            return;
        }
        let t = ((now_ms - runner.jump_started_at) / 1000.0) as f32;
        let dy = runner.vertical_speed * t + GRAVITY * t * t;
        let ground = runner.ground_level;
        if self.pos.y - dy > ground {
            self.pos.y = ground;
            self.set_animation(AnimId::Running);
        } else {
            self.pos.y -= dy;
        }
    }

    /// Draw the current frame at the sprite's position, advancing the active
    /// animation by one render tick. Hidden sprites draw nothing.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        if self.hidden {
            return;
        }
        if let Some(anim) = self.animations.get_mut(self.active) {
            anim.advance();
        }
        if let Some(frame) = self.current_frame() {
            let dest = Rect::new(self.pos.x, self.pos.y, self.width(), self.height());
            surface.draw_frame(frame, dest);
        }
    }

    /// Draw without advancing any animation (initial idle frame).
    pub fn render_static(&self, surface: &mut dyn Surface) {
        if self.hidden {
            return;
        }
        if let Some(frame) = self.current_frame() {
            let dest = Rect::new(self.pos.x, self.pos.y, self.width(), self.height());
            surface.draw_frame(frame, dest);
        }
    }
}
