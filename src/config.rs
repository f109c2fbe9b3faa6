//! Simulation parameters
//!
//! Every named constant of the animation lives here, grouped by subsystem.
//! A config is validated once at startup and is immutable for the run's
//! lifetime; the frame loop never starts with nonsensical parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration, surfaced before the frame loop starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must lie within {min}..={max} (got {value})")]
    OutOfRange {
        name: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{lo_name} ({lo}) must not exceed {hi_name} ({hi})")]
    InvertedRange {
        lo_name: &'static str,
        lo: f64,
        hi_name: &'static str,
        hi: f64,
    },
}

/// Guided-entity motion tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionTuning {
    /// Straight-segment speed, pixels per frame
    pub approach_speed: f32,
    /// Starting offset from the bottom-left screen corner
    pub offscreen_x_offset: f32,
    pub offscreen_y_offset: f32,
    /// Margin of the on-screen entry waypoint
    pub entry_margin: f32,
    /// Starting orbit radius as a fraction of min(width, height)
    pub orbit_radius_factor: f32,
    /// Angle on the orbit circle where the spiral begins (radians)
    pub orbit_start_angle: f32,
    /// Radius decrement per orbiting frame
    pub orbit_shrink_speed: f32,
    /// Tangential speed at the starting radius
    pub orbit_speed_at_start: f32,
    /// Tangential speed near the arrival threshold
    pub orbit_speed_near_center: f32,
    /// Orbit radius at which the entity counts as arrived
    pub arrival_threshold: f32,
    /// Fade-out duration after arrival (milliseconds)
    pub fade_out_ms: f64,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            approach_speed: APPROACH_SPEED,
            offscreen_x_offset: OFFSCREEN_X_OFFSET,
            offscreen_y_offset: OFFSCREEN_Y_OFFSET,
            entry_margin: ENTRY_MARGIN,
            orbit_radius_factor: ORBIT_RADIUS_FACTOR,
            orbit_start_angle: ORBIT_START_ANGLE,
            orbit_shrink_speed: ORBIT_SHRINK_SPEED,
            orbit_speed_at_start: ORBIT_SPEED_AT_START,
            orbit_speed_near_center: ORBIT_SPEED_NEAR_CENTER,
            arrival_threshold: ORBIT_ARRIVAL_THRESHOLD,
            fade_out_ms: ENTITY_FADE_MS,
        }
    }
}

/// Lateral wave perturbation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveTuning {
    pub enabled: bool,
    /// Max deviation from the central path
    pub amplitude: f32,
    /// Path distance for one full sine cycle
    pub wavelength: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            amplitude: WAVE_AMPLITUDE,
            wavelength: WAVE_WAVELENGTH,
        }
    }
}

/// Trail recording tuning (points only; fading visuals are the renderer's)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailTuning {
    /// Record a point every N frames
    pub record_interval_frames: u64,
    /// Points older than this are evicted
    pub fade_ms: f64,
    pub size_factor: f32,
    pub initial_opacity: f32,
}

impl Default for TrailTuning {
    fn default() -> Self {
        Self {
            record_interval_frames: TRAIL_INTERVAL_FRAMES,
            fade_ms: TRAIL_FADE_MS,
            size_factor: TRAIL_SIZE_FACTOR,
            initial_opacity: TRAIL_INITIAL_OPACITY,
        }
    }
}

/// Shockwave ring schedule and spawn-sampling tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockwaveTuning {
    pub ring_count: u32,
    /// Delay between successive ring starts
    pub ring_stagger_ms: f64,
    /// Lifetime of each ring's radius animation
    pub ring_lifetime_ms: f64,
    /// Unscaled ring diameter; radius = base_size/2 * scale
    pub base_size: f32,
    pub max_scale: f32,
    pub initial_opacity: f32,
    /// Spawn-sampling cadence while a ring is active
    pub spawn_interval_ms: f64,
    /// Particles emitted per passed sample deadline
    pub spawns_per_sample: u32,
    /// Rings below this scale do not emit particles
    pub min_visible_scale: f32,
    /// Rings below this opacity do not emit particles
    pub min_visible_opacity: f32,
}

impl Default for ShockwaveTuning {
    fn default() -> Self {
        Self {
            ring_count: RING_COUNT,
            ring_stagger_ms: RING_STAGGER_MS,
            ring_lifetime_ms: RING_LIFETIME_MS,
            base_size: RING_BASE_SIZE,
            max_scale: RING_MAX_SCALE,
            initial_opacity: RING_INITIAL_OPACITY,
            spawn_interval_ms: RING_SPAWN_INTERVAL_MS,
            spawns_per_sample: PARTICLES_PER_SPAWN,
            min_visible_scale: RING_MIN_VISIBLE_SCALE,
            min_visible_opacity: RING_MIN_VISIBLE_OPACITY,
        }
    }
}

/// Floating-particle physics and intensity tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleTuning {
    pub size_min: f32,
    pub size_max: f32,
    /// Initial speed magnitude at spawn, pixels per frame
    pub launch_speed: f32,
    /// Speed clamp applied every step
    pub max_speed: f32,
    /// 0 disables lifespan expiry (particles live until despawned)
    pub lifespan_ms: f64,
    pub base_opacity: f32,
    /// Multiplicative velocity decay per frame
    pub damping: f32,
    /// Uniform noise impulse per axis per frame
    pub random_walk_strength: f32,
    /// Velocity retained after a boundary bounce
    pub restitution: f32,
    /// Number of opaque color tags to draw from at spawn
    pub color_count: u8,

    pub repulsion_radius: f32,
    pub repulsion_strength: f32,

    pub twinkle_chance: f32,
    pub twinkle_duration_min_ms: f64,
    pub twinkle_duration_max_ms: f64,
    pub twinkle_opacity_min: f32,
    pub twinkle_opacity_max: f32,

    pub pulse_enabled: bool,
    /// Pulse phase increment per frame (radians)
    pub pulse_speed: f32,
    /// Fraction of the original size the pulse can shrink away
    pub pulse_magnitude: f32,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            size_min: PARTICLE_SIZE_MIN,
            size_max: PARTICLE_SIZE_MAX,
            launch_speed: PARTICLE_LAUNCH_SPEED,
            max_speed: PARTICLE_MAX_SPEED,
            lifespan_ms: PARTICLE_LIFESPAN_MS,
            base_opacity: PARTICLE_BASE_OPACITY,
            damping: PARTICLE_DAMPING,
            random_walk_strength: PARTICLE_RANDOM_WALK_STRENGTH,
            restitution: PARTICLE_RESTITUTION,
            color_count: PARTICLE_COLOR_COUNT,
            repulsion_radius: REPULSION_RADIUS,
            repulsion_strength: REPULSION_STRENGTH,
            twinkle_chance: TWINKLE_CHANCE_PER_FRAME,
            twinkle_duration_min_ms: TWINKLE_DURATION_MIN_MS,
            twinkle_duration_max_ms: TWINKLE_DURATION_MAX_MS,
            twinkle_opacity_min: TWINKLE_OPACITY_MIN,
            twinkle_opacity_max: TWINKLE_OPACITY_MAX,
            pulse_enabled: true,
            pulse_speed: SIZE_PULSE_SPEED,
            pulse_magnitude: SIZE_PULSE_MAGNITUDE,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Entity bounding-box size
    pub entity_size: f32,
    /// Milliseconds the sim clock advances per frame (fixed cadence)
    pub frame_interval_ms: f64,
    pub motion: MotionTuning,
    pub wave: WaveTuning,
    pub trail: TrailTuning,
    pub shockwave: ShockwaveTuning,
    pub particles: ParticleTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            entity_size: ENTITY_SIZE,
            frame_interval_ms: FRAME_INTERVAL_MS,
            motion: MotionTuning::default(),
            wave: WaveTuning::default(),
            trail: TrailTuning::default(),
            shockwave: ShockwaveTuning::default(),
            particles: ParticleTuning::default(),
        }
    }
}

fn positive_f32(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            name,
            value: value as f64,
        })
    }
}

fn positive_f64(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn in_unit_range(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            min: 0.0,
            max: 1.0,
            value: value as f64,
        })
    }
}

fn ordered(
    lo_name: &'static str,
    lo: f64,
    hi_name: &'static str,
    hi: f64,
) -> Result<(), ConfigError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            lo_name,
            lo,
            hi_name,
            hi,
        })
    }
}

impl SimConfig {
    /// Check every parameter before the frame loop starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_f32("screen_width", self.screen_width)?;
        positive_f32("screen_height", self.screen_height)?;
        positive_f32("entity_size", self.entity_size)?;
        positive_f64("frame_interval_ms", self.frame_interval_ms)?;

        let m = &self.motion;
        positive_f32("motion.approach_speed", m.approach_speed)?;
        positive_f32("motion.orbit_shrink_speed", m.orbit_shrink_speed)?;
        positive_f32("motion.orbit_speed_at_start", m.orbit_speed_at_start)?;
        positive_f32("motion.orbit_speed_near_center", m.orbit_speed_near_center)?;
        positive_f32("motion.arrival_threshold", m.arrival_threshold)?;
        positive_f64("motion.fade_out_ms", m.fade_out_ms)?;
        in_unit_range("motion.orbit_radius_factor", m.orbit_radius_factor)?;
        positive_f32("motion.orbit_radius_factor", m.orbit_radius_factor)?;

        let w = &self.wave;
        positive_f32("wave.wavelength", w.wavelength)?;
        if w.amplitude < 0.0 || !w.amplitude.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "wave.amplitude",
                min: 0.0,
                max: f64::INFINITY,
                value: w.amplitude as f64,
            });
        }

        let t = &self.trail;
        if t.record_interval_frames == 0 {
            return Err(ConfigError::NonPositive {
                name: "trail.record_interval_frames",
                value: 0.0,
            });
        }
        positive_f64("trail.fade_ms", t.fade_ms)?;
        in_unit_range("trail.initial_opacity", t.initial_opacity)?;

        let s = &self.shockwave;
        if s.ring_count == 0 {
            return Err(ConfigError::NonPositive {
                name: "shockwave.ring_count",
                value: 0.0,
            });
        }
        positive_f64("shockwave.ring_lifetime_ms", s.ring_lifetime_ms)?;
        positive_f64("shockwave.spawn_interval_ms", s.spawn_interval_ms)?;
        positive_f32("shockwave.base_size", s.base_size)?;
        positive_f32("shockwave.max_scale", s.max_scale)?;
        in_unit_range("shockwave.initial_opacity", s.initial_opacity)?;
        if s.ring_stagger_ms < 0.0 || !s.ring_stagger_ms.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "shockwave.ring_stagger_ms",
                value: s.ring_stagger_ms,
            });
        }

        let p = &self.particles;
        positive_f32("particles.size_min", p.size_min)?;
        positive_f32("particles.size_max", p.size_max)?;
        ordered(
            "particles.size_min",
            p.size_min as f64,
            "particles.size_max",
            p.size_max as f64,
        )?;
        positive_f32("particles.launch_speed", p.launch_speed)?;
        positive_f32("particles.max_speed", p.max_speed)?;
        if p.lifespan_ms < 0.0 || !p.lifespan_ms.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "particles.lifespan_ms",
                value: p.lifespan_ms,
            });
        }
        in_unit_range("particles.base_opacity", p.base_opacity)?;
        in_unit_range("particles.damping", p.damping)?;
        positive_f32("particles.damping", p.damping)?;
        in_unit_range("particles.restitution", p.restitution)?;
        if p.random_walk_strength < 0.0 || !p.random_walk_strength.is_finite() {
            return Err(ConfigError::NonPositive {
                name: "particles.random_walk_strength",
                value: p.random_walk_strength as f64,
            });
        }
        if p.color_count == 0 {
            return Err(ConfigError::NonPositive {
                name: "particles.color_count",
                value: 0.0,
            });
        }
        positive_f32("particles.repulsion_radius", p.repulsion_radius)?;
        in_unit_range("particles.twinkle_chance", p.twinkle_chance)?;
        positive_f64("particles.twinkle_duration_min_ms", p.twinkle_duration_min_ms)?;
        ordered(
            "particles.twinkle_duration_min_ms",
            p.twinkle_duration_min_ms,
            "particles.twinkle_duration_max_ms",
            p.twinkle_duration_max_ms,
        )?;
        in_unit_range("particles.twinkle_opacity_min", p.twinkle_opacity_min)?;
        in_unit_range("particles.twinkle_opacity_max", p.twinkle_opacity_max)?;
        ordered(
            "particles.twinkle_opacity_min",
            p.twinkle_opacity_min as f64,
            "particles.twinkle_opacity_max",
            p.twinkle_opacity_max as f64,
        )?;
        in_unit_range("particles.pulse_magnitude", p.pulse_magnitude)?;
        positive_f32("particles.pulse_speed", p.pulse_speed)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_screen() {
        let mut cfg = SimConfig::default();
        cfg.screen_width = -10.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { name: "screen_width", .. })
        ));
    }

    #[test]
    fn test_rejects_zero_wavelength() {
        let mut cfg = SimConfig::default();
        cfg.wave.wavelength = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_size_range() {
        let mut cfg = SimConfig::default();
        cfg.particles.size_min = 9.0;
        cfg.particles.size_max = 4.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_restitution_above_one() {
        let mut cfg = SimConfig::default();
        cfg.particles.restitution = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_speed() {
        let mut cfg = SimConfig::default();
        cfg.motion.approach_speed = f32::NAN;
        assert!(cfg.validate().is_err());
    }
}
