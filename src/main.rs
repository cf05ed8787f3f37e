//! Dino Dash entry point
//!
//! Runs the simulation headless: a manual scheduler feeds synthetic 60 Hz
//! frame timestamps and the autonomous player runs until it hits an
//! obstacle. Prints a JSON summary of the finished run. An optional first
//! argument sets the run seed.

use dino_dash::consts::TARGET_TICK_RATE;
use dino_dash::driver::{GameLoop, ManualScheduler};
use dino_dash::render::NullSurface;
use dino_dash::sim::{GameEvent, Key, TickInput, World, WorldConfig, render_frame, tick};

/// Upper bound on demo frames so a lucky run still terminates.
const MAX_FRAMES: u32 = 120_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xD1905EED);
    log::info!("dino-dash headless demo, seed {seed}");

    let mut world =
        World::new(WorldConfig::default(), seed).expect("default config is valid");
    world.set_use_ai(true);

    let mut surface = NullSurface;
    render_frame(&world, &mut surface);

    let mut game_loop = GameLoop::new(TARGET_TICK_RATE).expect("default tick rate is valid");
    let mut scheduler = ManualScheduler::new();
    game_loop.start(&mut scheduler);

    // First meaningful input starts the run
    let mut input = TickInput::default();
    input.key_down(Key::W);

    let mut now = 0.0;
    for _ in 0..MAX_FRAMES {
        now += 1000.0 / TARGET_TICK_RATE;
        if let Some(t) = game_loop.on_frame(now, &mut scheduler) {
            tick(&mut world, &input, &mut surface, t);
            // One-shot inputs are consumed by the tick
            input.clear();
        }

        for event in world.drain_events() {
            match event {
                GameEvent::Started => log::info!("run started"),
                GameEvent::ChunkGenerated { index } => {
                    log::debug!("chunk {index} generated")
                }
                GameEvent::Collision { obstacle } => {
                    log::info!("collided with obstacle {obstacle}")
                }
                GameEvent::GameOver => game_loop.stop(&mut scheduler),
            }
        }
        if game_loop.is_stopped() {
            break;
        }
    }

    let summary = serde_json::json!({
        "seed": world.seed,
        "phase": world.phase,
        "score": world.score(),
        "chunks": world.chunks,
        "scroll_speed": world.scroll_speed,
        "ticks": world.time_ticks,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).expect("summary serializes")
    );
}
