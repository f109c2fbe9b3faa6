//! Simulation state and core types
//!
//! [`SimState`] is the explicit simulation context: everything a run mutates
//! lives in it, so multiple independent instances can coexist and tests can
//! drive exact trajectories from a seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticleField;
use super::shockwave::ShockwaveEmitter;
use super::wave::WaveOffset;
use crate::config::{ConfigError, SimConfig};
use crate::polar_to_cartesian;

/// Phase of the guided entity's scripted path
///
/// Transitions are monotonic in declaration order; `Arrived` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MotionPhase {
    /// Straight line from the off-screen start to the on-screen entry point
    EnteringScreen,
    /// Straight line from the entry point to the orbit's starting point
    ApproachingOrbitStart,
    /// Decaying spiral toward the screen center
    Orbiting,
    /// Terminal; the shockwave has fired and the entity is fading out
    Arrived,
}

/// A recorded trail point (rendered position plus record time)
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub recorded_ms: f64,
}

/// The single scripted-motion entity
#[derive(Debug, Clone)]
pub struct GuidedEntity {
    /// Top-left of the bounding box on the unperturbed path
    pub path_pos: Vec2,
    /// Top-left after the wave offset; what the renderer draws
    pub render_pos: Vec2,
    pub phase: MotionPhase,
    /// Valid only while `phase == Orbiting`; non-increasing, clamped at the
    /// arrival threshold
    pub orbit_radius: f32,
    /// Valid only while `phase == Orbiting` (radians, unwrapped)
    pub orbit_angle: f32,
    /// Sim time of arrival; drives the fade-out ramp
    pub arrived_at_ms: Option<f64>,
    /// Recent rendered positions, newest last; evicted by age
    pub trail: Vec<TrailPoint>,
}

impl GuidedEntity {
    fn new(start: Vec2) -> Self {
        Self {
            path_pos: start,
            render_pos: start,
            phase: MotionPhase::EnteringScreen,
            orbit_radius: 0.0,
            orbit_angle: 0.0,
            arrived_at_ms: None,
            trail: Vec::new(),
        }
    }

    /// Record the rendered position and evict points older than `fade_ms`
    pub fn record_trail(&mut self, now_ms: f64, fade_ms: f64) {
        self.trail.push(TrailPoint {
            pos: self.render_pos,
            recorded_ms: now_ms,
        });
        self.trail.retain(|p| now_ms - p.recorded_ms < fade_ms);
    }

    /// Rendered opacity: 1 until arrival, then a linear ramp to 0
    pub fn opacity(&self, now_ms: f64, fade_out_ms: f64) -> f32 {
        match self.arrived_at_ms {
            None => 1.0,
            Some(arrived) => {
                let t = ((now_ms - arrived) / fade_out_ms).clamp(0.0, 1.0);
                1.0 - t as f32
            }
        }
    }
}

/// Last known pointer position plus a "has moved at least once" flag
///
/// Written only by the external input collaborator; the field treats
/// `has_moved == false` as "no repulsion force anywhere".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointerState {
    pub pos: Vec2,
    pub has_moved: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        // Parked far off-screen until the first real movement
        Self {
            pos: Vec2::new(-1000.0, -1000.0),
            has_moved: false,
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct SimState {
    pub config: SimConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    /// Frame counter
    pub frame: u64,
    /// Sim clock in milliseconds, advanced by `frame_interval_ms` per frame
    pub time_ms: f64,
    pub entity: GuidedEntity,
    pub wave: WaveOffset,
    /// Present from arrival until the last ring finishes
    pub shockwave: Option<ShockwaveEmitter>,
    /// How many times the arrival side effect has fired; must end at 1
    pub shockwaves_fired: u32,
    pub field: ParticleField,
    pub(crate) rng: Pcg32,
    // Waypoints fixed at init from screen geometry
    pub(crate) entry_target: Vec2,
    pub(crate) orbit_start_target: Vec2,
    pub(crate) initial_orbit_radius: f32,
}

impl SimState {
    /// Create a run from a validated config and a seed
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let half = config.entity_size / 2.0;
        let start = Vec2::new(
            config.motion.offscreen_x_offset,
            config.screen_height + config.motion.offscreen_y_offset - half,
        );
        let entry_target = Vec2::new(
            config.motion.entry_margin,
            config.screen_height - config.motion.entry_margin - config.entity_size,
        );
        let initial_orbit_radius =
            config.screen_width.min(config.screen_height) * config.motion.orbit_radius_factor;
        let center = Vec2::new(config.screen_width / 2.0, config.screen_height / 2.0);
        let orbit_start_target = center
            + polar_to_cartesian(initial_orbit_radius, config.motion.orbit_start_angle)
            - Vec2::splat(half);

        Ok(Self {
            seed,
            frame: 0,
            time_ms: 0.0,
            entity: GuidedEntity::new(start),
            wave: WaveOffset::new(config.wave.amplitude, config.wave.wavelength),
            shockwave: None,
            shockwaves_fired: 0,
            field: ParticleField::new(),
            rng: Pcg32::seed_from_u64(seed),
            entry_target,
            orbit_start_target,
            initial_orbit_radius,
            config,
        })
    }

    /// Screen center, the spiral's focus and the shockwave origin
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.config.screen_width / 2.0, self.config.screen_height / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_geometry_matches_screen() {
        let cfg = SimConfig {
            screen_width: 800.0,
            screen_height: 600.0,
            ..SimConfig::default()
        };
        let state = SimState::new(cfg, 1).unwrap();

        // Off-screen start: (-150, 600 + 100 - 40)
        assert_eq!(state.entity.path_pos, Vec2::new(-150.0, 660.0));
        // Entry point: (50, 600 - 50 - 80)
        assert_eq!(state.entry_target, Vec2::new(50.0, 470.0));
        // R0 = min(800, 600) * 0.35
        assert!((state.initial_orbit_radius - 210.0).abs() < 1e-4);
        assert_eq!(state.entity.phase, MotionPhase::EnteringScreen);
    }

    #[test]
    fn test_invalid_config_refused() {
        let cfg = SimConfig {
            screen_width: 0.0,
            ..SimConfig::default()
        };
        assert!(SimState::new(cfg, 1).is_err());
    }

    #[test]
    fn test_trail_eviction_by_age() {
        let mut entity = GuidedEntity::new(Vec2::ZERO);
        entity.record_trail(0.0, 1500.0);
        entity.render_pos = Vec2::new(5.0, 5.0);
        entity.record_trail(1000.0, 1500.0);
        assert_eq!(entity.trail.len(), 2);
        entity.record_trail(1600.0, 1500.0);
        // The point recorded at t=0 is now older than the fade window
        assert_eq!(entity.trail.len(), 2);
        assert!(entity.trail.iter().all(|p| 1600.0 - p.recorded_ms < 1500.0));
    }

    #[test]
    fn test_entity_opacity_ramp() {
        let mut entity = GuidedEntity::new(Vec2::ZERO);
        assert_eq!(entity.opacity(123.0, 500.0), 1.0);
        entity.arrived_at_ms = Some(1000.0);
        assert!((entity.opacity(1250.0, 500.0) - 0.5).abs() < 1e-6);
        assert_eq!(entity.opacity(2000.0, 500.0), 0.0);
    }
}
