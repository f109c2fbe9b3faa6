//! Spiralburst headless demo driver
//!
//! Runs a seeded simulation at a fixed frame cadence, logs progress, and
//! dumps the final frame snapshot as JSON. Usage:
//!
//! ```text
//! spiralburst [seed] [frames]
//! ```

use spiralburst::sim::{FrameInput, MotionPhase, PointerState, SimState};
use spiralburst::{SimConfig, advance};

use glam::Vec2;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1200);

    let config = SimConfig::default();
    let mut state = match SimState::new(config, seed) {
        Ok(state) => state,
        Err(err) => {
            log::error!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    log::info!("seed {seed}, running {frames} frames");

    let mut input = FrameInput::default();
    let mut arrival_frame = None;
    for i in 0..frames {
        // Scripted pointer: sweeps across the lower half of the screen so
        // the repulsion force is exercised deterministically
        let t = i as f32 * 0.01;
        input.pointer = PointerState {
            pos: Vec2::new(
                state.config.screen_width * (0.5 + 0.4 * t.sin()),
                state.config.screen_height * 0.6,
            ),
            has_moved: i > 60,
        };

        if let Err(err) = advance(&mut state, &input) {
            log::error!("frame {} aborted: {err}", state.frame);
            std::process::exit(1);
        }

        if arrival_frame.is_none() && state.entity.phase == MotionPhase::Arrived {
            arrival_frame = Some(state.frame);
            log::info!("arrived at frame {} - shockwave fired", state.frame);
        }
        if state.frame % 120 == 0 {
            log::debug!(
                "frame {}: phase {:?}, pos {:.1},{:.1}, {} particles",
                state.frame,
                state.entity.phase,
                state.entity.render_pos.x,
                state.entity.render_pos.y,
                state.field.len()
            );
        }
    }

    log::info!(
        "done: {} particles live after {} frames",
        state.field.len(),
        state.frame
    );
    match serde_json::to_string_pretty(&state.render_frame()) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log::error!("snapshot serialization failed: {err}");
            std::process::exit(1);
        }
    }
}
