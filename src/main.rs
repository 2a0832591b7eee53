//! Couple Dodge headless runner
//!
//! Plays a full run natively under autopilot with synthetic 60 fps frame
//! timestamps and prints the result. The browser build uses `web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use couple_dodge::sim::{GameEvent, RunStatus, suggest_move};
    use couple_dodge::{RunController, Variant};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let variant = match args.next() {
        Some(name) => Variant::from_str(&name).unwrap_or_else(|| {
            log::warn!("Unknown variant '{}', using {}", name, Variant::default().as_str());
            Variant::default()
        }),
        None => Variant::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE);

    log::info!("Couple Dodge (native) starting: {} variant, seed {}", variant.as_str(), seed);

    let mut run = RunController::with_variant(variant, seed);
    run.dismiss_intro();

    // Ten simulated minutes is far longer than any run
    const FRAME_MS: f64 = 1000.0 / 60.0 + 0.1;
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    let mut collisions = 0u32;
    let mut frame = 0u32;
    while run.state().status == RunStatus::Playing && frame < MAX_FRAMES {
        let now = frame as f64 * FRAME_MS;
        if let Some(direction) = suggest_move(run.state(), run.config()) {
            run.move_player(direction);
        }
        run.tick(now);

        for event in run.drain_events() {
            match event {
                GameEvent::Collision { .. } => collisions += 1,
                GameEvent::StageStarted { index } => {
                    let title = run
                        .config()
                        .stage(index)
                        .map(|s| s.title.as_str())
                        .unwrap_or_default();
                    println!("  reached {}", title);
                }
                _ => {}
            }
        }
        frame += 1;
    }

    let state = run.state();
    println!(
        "{:?} after {} frames: score {}, anger {:.0}, stage {}/{}, {} collision(s)",
        state.status,
        frame,
        state.display_score(),
        state.anger,
        state.stage_index + 1,
        run.config().stages.len(),
        collisions
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}
