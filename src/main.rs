//! Brick Breaker entry point
//!
//! Native builds run a headless autopilot session: the full simulation with
//! audio cues and frame drawing wired to null/recording backends. Interactive
//! hosts embed the library and drive `tick` from their own frame callback.

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Context;

#[cfg(not(target_arch = "wasm32"))]
use brick_breaker::{
    LevelSet, Settings,
    audio::{AudioManager, NullAudio},
    render::{HeadlessSurface, draw_frame},
    sim::{GamePhase, GameState, TickInput, tick},
};

/// Ten simulated minutes at 60 ticks per second
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICKS: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_PATH: &str = "brick-breaker.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Brick Breaker (native, headless) starting...");

    let settings = Settings::load_or_default(SETTINGS_PATH);
    let levels = match LevelSet::bundled() {
        Ok(levels) => levels,
        Err(e) => {
            log::error!("Level data failed to load: {}", e);
            return Err(e).context("loading bundled level table");
        }
    };

    let field = settings.field();
    let mut state = GameState::new(levels, field, settings.seed);
    let mut audio = AudioManager::new(NullAudio, settings.music_volume, settings.effects_volume);
    let mut surface = HeadlessSurface::new(field.width, field.height);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    audio.sync_music(state.run.phase, state.run.level);
    while state.time_ticks < DEMO_TICKS {
        tick(&mut state, &input);
        audio.handle_events(&state.events);
        audio.sync_music(state.run.phase, state.run.level);
        draw_frame(&state, &mut surface);

        if matches!(state.run.phase, GamePhase::GameOver | GamePhase::GameWon) {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: {:?} on level {}, score {}, {} attempt(s) left",
        state.time_ticks,
        state.run.phase,
        state.run.level,
        state.run.score,
        state.run.attempts
    );
    println!(
        "{:?} - level {}, score {}",
        state.run.phase, state.run.level, state.run.score
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly
}
