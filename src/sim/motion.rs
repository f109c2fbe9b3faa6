//! Guided-entity motion state machine
//!
//! Per-frame position through three motion regimes: two straight approach
//! segments, then a decaying spiral around the screen center. The lateral
//! wave offset is superimposed on the unperturbed path; the entity always
//! advances along the real path and only the rendered position is displaced.

use glam::Vec2;

use super::SimError;
use super::state::{GuidedEntity, MotionPhase, SimState};
use super::wave::WaveOffset;
use crate::consts::{MOVE_EPSILON, ORBIT_SPEED_FLOOR};
use crate::polar_to_cartesian;

/// Advance the entity by one frame
///
/// Phase transitions are monotonic; `Arrived` is terminal and fires the
/// shockwave exactly once.
pub(crate) fn advance_entity(state: &mut SimState) -> Result<(), SimError> {
    match state.entity.phase {
        MotionPhase::EnteringScreen => {
            let target = state.entry_target;
            if step_towards(state, target) {
                state.entity.phase = MotionPhase::ApproachingOrbitStart;
            }
        }
        MotionPhase::ApproachingOrbitStart => {
            let target = state.orbit_start_target;
            if step_towards(state, target) {
                state.entity.phase = MotionPhase::Orbiting;
                state.entity.orbit_radius = state.initial_orbit_radius;
                state.entity.orbit_angle = state.config.motion.orbit_start_angle;
            }
        }
        MotionPhase::Orbiting => advance_orbit(state)?,
        // Terminal: no further position updates
        MotionPhase::Arrived => return Ok(()),
    }

    if state.entity.phase != MotionPhase::Arrived
        && state.frame % state.config.trail.record_interval_frames == 0
    {
        let fade = state.config.trail.fade_ms;
        let now = state.time_ms;
        state.entity.record_trail(now, fade);
    }
    Ok(())
}

/// Straight-segment step toward `target` at the approach speed.
///
/// Returns true when the target is reached; the final step snaps to the
/// target instead of overshooting and carries no wave offset.
fn step_towards(state: &mut SimState, target: Vec2) -> bool {
    let speed = state.config.motion.approach_speed;
    let wave_enabled = state.config.wave.enabled;
    move_towards(
        &mut state.entity,
        &mut state.wave,
        target,
        speed,
        wave_enabled,
    )
}

fn move_towards(
    entity: &mut GuidedEntity,
    wave: &mut WaveOffset,
    target: Vec2,
    speed: f32,
    wave_enabled: bool,
) -> bool {
    let to_target = target - entity.path_pos;
    let distance = to_target.length();

    // Snap instead of overshooting on the last step
    let reached = distance <= speed;
    let next = if reached {
        target
    } else {
        entity.path_pos + to_target / distance * speed
    };

    let moved = next - entity.path_pos;
    let moved_mag = moved.length();
    entity.path_pos = next;
    entity.render_pos = next;

    if wave_enabled && !reached && moved_mag > MOVE_EPSILON {
        entity.render_pos = next + wave.offset(moved / moved_mag, moved_mag);
    }
    reached
}

/// One frame of the decaying spiral
fn advance_orbit(state: &mut SimState) -> Result<(), SimError> {
    let m = &state.config.motion;
    let shrink = m.orbit_shrink_speed;
    let threshold = m.arrival_threshold;
    let r0 = state.initial_orbit_radius;
    let e = &mut state.entity;

    // Guard against entering the spiral already inside the threshold
    if e.orbit_radius <= threshold {
        return arrive(state);
    }

    // Tangential speed ramps linearly with shrink progress
    let span = r0 - threshold;
    let progress = if span > 0.0 {
        ((r0 - e.orbit_radius) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let target_speed =
        m.orbit_speed_at_start + (m.orbit_speed_near_center - m.orbit_speed_at_start) * progress;

    // The shrink rate eats into the tangential budget; keep a floor so the
    // angle never stalls when the target speed barely covers the shrink
    let tangential = if target_speed <= shrink {
        ORBIT_SPEED_FLOOR
    } else {
        (target_speed * target_speed - shrink * shrink).sqrt()
    };

    e.orbit_radius = (e.orbit_radius - shrink).max(threshold);

    let angular_speed = if e.orbit_radius > 0.0 && tangential > 0.0 {
        tangential / e.orbit_radius
    } else {
        0.0
    };
    e.orbit_angle += angular_speed;

    let half = state.config.entity_size / 2.0;
    let center = Vec2::new(
        state.config.screen_width / 2.0,
        state.config.screen_height / 2.0,
    );
    let spiral_center = center + polar_to_cartesian(e.orbit_radius, e.orbit_angle);
    let top_left = spiral_center - Vec2::splat(half);
    e.path_pos = top_left;
    e.render_pos = top_left;

    if state.config.wave.enabled {
        // Instantaneous spiral velocity from the polar parametrization:
        // dr/dframe = -shrink, dθ/dframe = angular_speed
        let (sin_a, cos_a) = e.orbit_angle.sin_cos();
        let vel = Vec2::new(
            -shrink * cos_a - e.orbit_radius * angular_speed * sin_a,
            -shrink * sin_a + e.orbit_radius * angular_speed * cos_a,
        );
        let mag = vel.length();
        if mag > MOVE_EPSILON {
            e.render_pos = top_left + state.wave.offset(vel / mag, mag);
        }
    }

    if state.entity.orbit_radius <= threshold {
        return arrive(state);
    }
    Ok(())
}

/// Terminal transition: fade-out clock starts and the shockwave fires.
///
/// Firing twice would mean the state machine regressed out of `Arrived`;
/// that is a logic error, not a recoverable condition.
fn arrive(state: &mut SimState) -> Result<(), SimError> {
    if state.shockwaves_fired > 0 || state.shockwave.is_some() {
        log::error!("arrival side effect fired more than once");
        return Err(SimError::InvalidState("shockwave already triggered"));
    }
    state.entity.phase = MotionPhase::Arrived;
    state.entity.arrived_at_ms = Some(state.time_ms);
    state.shockwave = Some(super::shockwave::ShockwaveEmitter::trigger(
        state.center(),
        state.time_ms,
        &state.config.shockwave,
    ));
    state.shockwaves_fired += 1;
    log::debug!(
        "entity arrived at frame {} (t={:.1}ms), shockwave triggered",
        state.frame,
        state.time_ms
    );
    Ok(())
}

impl SimState {
    /// Externally force the arrival transition.
    ///
    /// Normally the motion state machine reaches `Arrived` on its own; a
    /// driver may call this to cut the approach short. The shockwave still
    /// fires exactly once.
    pub fn trigger_arrival(&mut self) -> Result<(), SimError> {
        arrive(self)
    }
}
