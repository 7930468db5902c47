//! Maze Chase entry point
//!
//! Runs a self-playing (attract mode) session at the configured frame rate
//! and logs what happens. Usage: `maze-chase [settings.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::thread;

    use maze_chase::Settings;
    use maze_chase::platform::FrameClock;
    use maze_chase::sim::{GameEvent, GamePhase, GameState, SeededChooser, TickInput, tick};

    env_logger::init();
    log::info!("Maze Chase (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let mut state = match GameState::new(&settings) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Cannot start session: {err}");
            std::process::exit(1);
        }
    };
    log::debug!("Maze:\n{}", state.grid);

    let mut chooser = SeededChooser::new(settings.seed);
    let mut clock = FrameClock::new(settings.fps);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let max_ticks = u64::from(settings.max_demo_seconds) * u64::from(settings.fps);

    'frames: while state.phase == GamePhase::Playing && state.time_ticks < max_ticks {
        for _ in 0..clock.tick() {
            for event in tick(&mut state, &input, &mut chooser) {
                match event {
                    GameEvent::PelletEaten { .. } => {}
                    GameEvent::PlayerCaught { ghost_id } => {
                        println!("Caught by ghost {ghost_id}!");
                    }
                    GameEvent::MazeCleared { score } => {
                        println!("Maze cleared! Score: {score}");
                    }
                    GameEvent::Restarted => {}
                }
            }
            if state.is_over() {
                break 'frames;
            }
        }
        thread::sleep(clock.until_next_step());
    }

    println!(
        "Final score: {} ({} pellets left, {} ticks, {:?})",
        state.score,
        state.pellets_left(),
        state.time_ticks,
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation runs headless only on native targets
}
