//! Spiralburst - guided-entity spiral animation with a shockwave particle field
//!
//! Core modules:
//! - `config`: Immutable simulation parameters with startup validation
//! - `sim`: Deterministic simulation (entity motion, shockwave schedule,
//!   particle physics)
//!
//! The crate is an embedded simulation library: it consumes numeric inputs
//! (pointer position, despawn signals) and emits numeric per-frame snapshots
//! for an external renderer. It never touches a rendering API.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use sim::{FrameInput, RenderFrame, SimError, SimState, advance};

use glam::Vec2;

/// Default tuning values, mirrored by [`config::SimConfig::default`]
pub mod consts {
    /// Frame interval for the fixed cadence the integration assumes (60 Hz)
    pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

    /// Displacements below this are treated as "not moving" (no wave advance,
    /// no direction normalization)
    pub const MOVE_EPSILON: f32 = 0.01;

    /// Entity bounding-box size
    pub const ENTITY_SIZE: f32 = 80.0;
    /// Straight-segment speed, pixels per frame
    pub const APPROACH_SPEED: f32 = 7.0;
    /// Initial off-screen offset from the bottom-left corner
    pub const OFFSCREEN_X_OFFSET: f32 = -150.0;
    pub const OFFSCREEN_Y_OFFSET: f32 = 100.0;
    /// Margin of the on-screen entry waypoint
    pub const ENTRY_MARGIN: f32 = 50.0;
    /// Starting orbit radius as a fraction of the smaller screen dimension
    pub const ORBIT_RADIUS_FACTOR: f32 = 0.35;
    /// Angle on the orbit circle where the spiral begins
    pub const ORBIT_START_ANGLE: f32 = std::f32::consts::PI * 1.5;
    /// Radius decrement per orbiting frame
    pub const ORBIT_SHRINK_SPEED: f32 = 0.7;
    /// Tangential speed at the starting radius
    pub const ORBIT_SPEED_AT_START: f32 = 8.0;
    /// Tangential speed near the arrival threshold
    pub const ORBIT_SPEED_NEAR_CENTER: f32 = 10.0;
    /// Orbit radius at which the entity counts as arrived
    pub const ORBIT_ARRIVAL_THRESHOLD: f32 = 10.0;
    /// Tangential speed floor when the shrink rate would dominate
    pub const ORBIT_SPEED_FLOOR: f32 = 0.1;
    /// Entity fade-out duration after arrival
    pub const ENTITY_FADE_MS: f64 = 500.0;

    /// Lateral wave amplitude (max deviation from the central path)
    pub const WAVE_AMPLITUDE: f32 = 2.0;
    /// Path distance for one full wave cycle
    pub const WAVE_WAVELENGTH: f32 = 360.0;

    /// Trail recording cadence in frames
    pub const TRAIL_INTERVAL_FRAMES: u64 = 1;
    pub const TRAIL_FADE_MS: f64 = 1500.0;
    pub const TRAIL_SIZE_FACTOR: f32 = 0.9;
    pub const TRAIL_INITIAL_OPACITY: f32 = 0.4;

    /// Shockwave ring count and schedule
    pub const RING_COUNT: u32 = 3;
    pub const RING_STAGGER_MS: f64 = 750.0;
    pub const RING_LIFETIME_MS: f64 = 2000.0;
    /// Unscaled ring diameter; current radius = base/2 * current scale
    pub const RING_BASE_SIZE: f32 = 20.0;
    pub const RING_MAX_SCALE: f32 = 50.0;
    pub const RING_INITIAL_OPACITY: f32 = 0.7;
    /// Spawn-sampling cadence while a ring is active
    pub const RING_SPAWN_INTERVAL_MS: f64 = 150.0;
    pub const PARTICLES_PER_SPAWN: u32 = 4;
    /// Rings below this scale or opacity do not emit particles
    pub const RING_MIN_VISIBLE_SCALE: f32 = 0.1;
    pub const RING_MIN_VISIBLE_OPACITY: f32 = 0.05;

    /// Particle tuning
    pub const PARTICLE_SIZE_MIN: f32 = 4.0;
    pub const PARTICLE_SIZE_MAX: f32 = 8.0;
    pub const PARTICLE_LAUNCH_SPEED: f32 = 1.5;
    pub const PARTICLE_MAX_SPEED: f32 = 5.0;
    /// 0 disables lifespan expiry (particles live until despawned)
    pub const PARTICLE_LIFESPAN_MS: f64 = 0.0;
    pub const PARTICLE_BASE_OPACITY: f32 = 0.8;
    pub const PARTICLE_DAMPING: f32 = 0.99;
    pub const PARTICLE_RANDOM_WALK_STRENGTH: f32 = 0.25;
    pub const PARTICLE_RESTITUTION: f32 = 0.7;
    pub const PARTICLE_COLOR_COUNT: u8 = 6;

    pub const REPULSION_RADIUS: f32 = 100.0;
    pub const REPULSION_STRENGTH: f32 = 4.0;

    pub const TWINKLE_CHANCE_PER_FRAME: f32 = 0.01;
    pub const TWINKLE_DURATION_MIN_MS: f64 = 200.0;
    pub const TWINKLE_DURATION_MAX_MS: f64 = 600.0;
    pub const TWINKLE_OPACITY_MIN: f32 = 0.2;
    pub const TWINKLE_OPACITY_MAX: f32 = 1.0;

    pub const SIZE_PULSE_SPEED: f32 = 0.05;
    pub const SIZE_PULSE_MAGNITUDE: f32 = 0.9;
}

/// Wrap a phase angle into [0, 2π)
#[inline]
pub fn wrap_phase(phase: f32) -> f32 {
    phase.rem_euclid(std::f32::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Left-hand perpendicular of a direction vector
#[inline]
pub fn perpendicular(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_wrap_phase_range() {
        assert!((wrap_phase(TAU) - 0.0).abs() < 1e-6);
        assert!(wrap_phase(-0.1) >= 0.0);
        assert!(wrap_phase(100.0) < TAU);
    }

    #[test]
    fn test_perpendicular_is_orthogonal() {
        let dir = Vec2::new(0.6, 0.8);
        assert!(perpendicular(dir).dot(dir).abs() < 1e-6);
        // Same winding as rotating +90 degrees
        assert_eq!(perpendicular(Vec2::X), Vec2::Y);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
    }
}
