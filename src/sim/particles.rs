//! Floating-particle population
//!
//! Particles spawn on shockwave ring circumferences and then live on their
//! own physics: pointer repulsion, frame-coupled integration, damping, a
//! random walk, a speed clamp and inelastic reflection off the viewport
//! edges. Intensity (twinkle, size pulse) is advanced in the same step but
//! never touches the position integration.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::SimError;
use super::intensity;
use super::state::PointerState;
use crate::config::{ParticleTuning, SimConfig};
use crate::polar_to_cartesian;

/// A free-floating particle
///
/// `pos` is the top-left anchor of the particle's box at `original_size`;
/// the pulsing `current_size` recenters only the rendered position.
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Fixed at spawn; the pulse's reference size
    pub original_size: f32,
    /// Derived each frame from the pulse oscillator
    pub current_size: f32,
    pub base_opacity: f32,
    /// Rendered opacity; equals `base_opacity` unless twinkling
    pub opacity: f32,
    pub is_twinkling: bool,
    /// Sim time at which the current twinkle reverts
    pub twinkle_end_ms: f64,
    /// Monotonically advancing, randomized at spawn to desynchronize pulses
    pub size_pulse_phase: f32,
    /// Opaque category tag carried through for the renderer
    pub color: u8,
    pub spawn_ms: f64,
}

/// The live particle population
///
/// No population cap is enforced here; bounding growth is the caller's
/// resource-management responsibility.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    next_id: u32,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleField {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Create a particle centered on `point` with randomized size, color,
    /// launch direction and pulse phase. Returns its handle.
    pub fn spawn(
        &mut self,
        point: Vec2,
        now_ms: f64,
        rng: &mut Pcg32,
        cfg: &ParticleTuning,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let size = rng.random_range(cfg.size_min..=cfg.size_max);
        let color = rng.random_range(0..cfg.color_count);
        let launch_angle = rng.random_range(0.0..TAU);
        let pulse_phase = rng.random_range(0.0..TAU);

        self.particles.push(Particle {
            id,
            pos: point - Vec2::splat(size / 2.0),
            vel: polar_to_cartesian(cfg.launch_speed, launch_angle),
            original_size: size,
            current_size: size,
            base_opacity: cfg.base_opacity,
            opacity: cfg.base_opacity,
            is_twinkling: false,
            twinkle_end_ms: 0.0,
            size_pulse_phase: pulse_phase,
            color,
            spawn_ms: now_ms,
        });
        id
    }

    /// External removal signal (e.g. the renderer detached this particle's
    /// backing object). A stale handle is an invalid-state error.
    pub fn despawn(&mut self, id: u32) -> Result<(), SimError> {
        match self.particles.iter().position(|p| p.id == id) {
            Some(idx) => {
                self.particles.remove(idx);
                Ok(())
            }
            None => {
                log::error!("despawn of unknown particle id {id}");
                Err(SimError::UnknownParticle(id))
            }
        }
    }

    /// Advance every particle by one frame
    pub fn step(
        &mut self,
        pointer: &PointerState,
        now_ms: f64,
        rng: &mut Pcg32,
        cfg: &SimConfig,
    ) {
        let p_cfg = &cfg.particles;
        for p in &mut self.particles {
            intensity::update_twinkle(p, now_ms, rng, p_cfg);

            if pointer.has_moved {
                apply_repulsion(p, pointer.pos, p_cfg);
            }

            // Frame-coupled by design: the sim assumes a fixed frame cadence
            p.pos += p.vel;

            intensity::update_size_pulse(p, p_cfg);

            p.vel *= p_cfg.damping;
            p.vel += Vec2::new(
                (rng.random::<f32>() - 0.5) * p_cfg.random_walk_strength,
                (rng.random::<f32>() - 0.5) * p_cfg.random_walk_strength,
            );

            let speed = p.vel.length();
            if speed > p_cfg.max_speed {
                p.vel = p.vel / speed * p_cfg.max_speed;
            }

            reflect_bounds(p, cfg.screen_width, cfg.screen_height, p_cfg.restitution);
        }

        if p_cfg.lifespan_ms > 0.0 {
            self.particles
                .retain(|p| now_ms - p.spawn_ms < p_cfg.lifespan_ms);
        }
    }
}

/// Push the particle away from the pointer with linear falloff inside the
/// repulsion radius. A particle exactly on the pointer has no defined
/// direction; that frame's force is skipped.
fn apply_repulsion(p: &mut Particle, pointer: Vec2, cfg: &ParticleTuning) {
    let center = p.pos + Vec2::splat(p.current_size / 2.0);
    let away = center - pointer;
    let distance = away.length();
    if distance > 0.0 && distance < cfg.repulsion_radius {
        let force = cfg.repulsion_strength * (1.0 - distance / cfg.repulsion_radius);
        p.vel += away / distance * force;
    }
}

/// Clamp to the viewport and invert the offending velocity component,
/// scaled by the restitution factor. Bounds use the pulsing current size.
fn reflect_bounds(p: &mut Particle, width: f32, height: f32, restitution: f32) {
    let size = p.current_size;
    if p.pos.x < 0.0 {
        p.pos.x = 0.0;
        p.vel.x *= -restitution;
    } else if p.pos.x > width - size {
        p.pos.x = width - size;
        p.vel.x *= -restitution;
    }
    if p.pos.y < 0.0 {
        p.pos.y = 0.0;
        p.vel.y *= -restitution;
    } else if p.pos.y > height - size {
        p.pos.y = height - size;
        p.vel.y *= -restitution;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn quiet_config() -> SimConfig {
        // No noise, no lifespan: forces are the only thing moving velocities
        let mut cfg = SimConfig {
            screen_width: 800.0,
            screen_height: 600.0,
            ..SimConfig::default()
        };
        cfg.particles.random_walk_strength = 0.0;
        cfg
    }

    fn spawn_one(field: &mut ParticleField, at: Vec2, cfg: &SimConfig, rng: &mut Pcg32) -> u32 {
        field.spawn(at, 0.0, rng, &cfg.particles)
    }

    #[test]
    fn test_spawn_randomizes_within_ranges() {
        let cfg = SimConfig::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut field = ParticleField::new();
        for _ in 0..100 {
            field.spawn(Vec2::new(100.0, 100.0), 0.0, &mut rng, &cfg.particles);
        }
        for p in field.iter() {
            assert!(p.original_size >= cfg.particles.size_min);
            assert!(p.original_size <= cfg.particles.size_max);
            assert!((p.vel.length() - cfg.particles.launch_speed).abs() < 1e-4);
            assert!(p.color < cfg.particles.color_count);
            assert_eq!(p.opacity, cfg.particles.base_opacity);
        }
    }

    #[test]
    fn test_pointer_at_rest_exerts_no_force() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        spawn_one(&mut field, Vec2::new(400.0, 300.0), &cfg, &mut rng);
        let before = field.iter().next().unwrap().vel;

        // Pointer parked directly on the particle, but it has never moved
        let pointer = PointerState {
            pos: Vec2::new(400.0, 300.0),
            has_moved: false,
        };
        field.step(&pointer, 16.0, &mut rng, &cfg);
        let after = field.iter().next().unwrap().vel;
        assert_eq!(after, before * cfg.particles.damping);
    }

    #[test]
    fn test_repulsion_pushes_outward() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        spawn_one(&mut field, Vec2::new(430.0, 300.0), &cfg, &mut rng);

        let pointer = PointerState {
            pos: Vec2::new(400.0, 300.0),
            has_moved: true,
        };
        let before = field.iter().next().unwrap().vel;
        field.step(&pointer, 16.0, &mut rng, &cfg);
        let after = field.iter().next().unwrap().vel;
        // Net impulse points away from the pointer (+x here)
        assert!(after.x > before.x * cfg.particles.damping);
    }

    #[test]
    fn test_particle_on_pointer_skips_force() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        let id = spawn_one(&mut field, Vec2::new(400.0, 300.0), &cfg, &mut rng);

        // Center the pointer exactly on the particle center
        let p = field.iter().find(|p| p.id == id).unwrap();
        let center = p.pos + Vec2::splat(p.current_size / 2.0);
        let before = p.vel;

        let pointer = PointerState {
            pos: center,
            has_moved: true,
        };
        field.step(&pointer, 16.0, &mut rng, &cfg);
        let after = field.iter().next().unwrap().vel;
        // Degenerate direction: the frame's repulsion is skipped, not NaN
        assert!(after.is_finite());
        assert_eq!(after, before * cfg.particles.damping);
    }

    #[test]
    fn test_damping_decays_speed_to_zero() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        spawn_one(&mut field, Vec2::new(400.0, 300.0), &cfg, &mut rng);
        assert!((field.iter().next().unwrap().vel.length() - 1.5).abs() < 1e-4);

        let pointer = PointerState::default();
        for i in 0..1000 {
            field.step(&pointer, i as f64 * 16.0, &mut rng, &cfg);
        }
        assert!(field.iter().next().unwrap().vel.length() < 1e-3);
    }

    #[test]
    fn test_reflection_keeps_particle_in_bounds() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut field = ParticleField::new();
        spawn_one(&mut field, Vec2::new(2.0, 2.0), &cfg, &mut rng);

        // Drive it hard toward the top-left corner
        {
            let p = &mut field.particles[0];
            p.vel = Vec2::new(-5.0, -5.0);
        }
        let pointer = PointerState::default();
        field.step(&pointer, 16.0, &mut rng, &cfg);

        let p = field.iter().next().unwrap();
        assert!(p.pos.x >= 0.0 && p.pos.x <= cfg.screen_width - p.current_size);
        assert!(p.pos.y >= 0.0 && p.pos.y <= cfg.screen_height - p.current_size);
        // Inelastic bounce: both components inverted and scaled
        assert!(p.vel.x > 0.0 && p.vel.y > 0.0);
    }

    #[test]
    fn test_despawn_then_stale_handle() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        let id = spawn_one(&mut field, Vec2::new(10.0, 10.0), &cfg, &mut rng);

        assert!(field.despawn(id).is_ok());
        assert!(field.is_empty());
        assert_eq!(field.despawn(id), Err(SimError::UnknownParticle(id)));
    }

    #[test]
    fn test_lifespan_expiry() {
        let mut cfg = quiet_config();
        cfg.particles.lifespan_ms = 1000.0;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        field.spawn(Vec2::new(10.0, 10.0), 0.0, &mut rng, &cfg.particles);

        let pointer = PointerState::default();
        field.step(&pointer, 999.0, &mut rng, &cfg);
        assert_eq!(field.len(), 1);
        field.step(&pointer, 1000.0, &mut rng, &cfg);
        assert!(field.is_empty());
    }

    #[test]
    fn test_zero_lifespan_means_immortal() {
        let cfg = quiet_config();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ParticleField::new();
        field.spawn(Vec2::new(10.0, 10.0), 0.0, &mut rng, &cfg.particles);

        let pointer = PointerState::default();
        field.step(&pointer, 1e9, &mut rng, &cfg);
        assert_eq!(field.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_speed_clamped_after_step(vx in -100.0f32..100.0, vy in -100.0f32..100.0) {
            let cfg = SimConfig::default();
            let mut rng = Pcg32::seed_from_u64(9);
            let mut field = ParticleField::new();
            field.spawn(Vec2::new(400.0, 300.0), 0.0, &mut rng, &cfg.particles);
            field.particles[0].vel = Vec2::new(vx, vy);

            let pointer = PointerState::default();
            field.step(&pointer, 16.0, &mut rng, &cfg);
            prop_assert!(field.iter().next().unwrap().vel.length() <= cfg.particles.max_speed + 1e-4);
        }

        #[test]
        fn prop_reflection_bounds_hold(x in -50.0f32..850.0, y in -50.0f32..650.0,
                                       vx in -5.0f32..5.0, vy in -5.0f32..5.0) {
            let cfg = quiet_config();
            let mut rng = Pcg32::seed_from_u64(9);
            let mut field = ParticleField::new();
            field.spawn(Vec2::new(400.0, 300.0), 0.0, &mut rng, &cfg.particles);
            field.particles[0].pos = Vec2::new(x, y);
            field.particles[0].vel = Vec2::new(vx, vy);

            let pointer = PointerState::default();
            field.step(&pointer, 16.0, &mut rng, &cfg);
            let p = field.iter().next().unwrap();
            prop_assert!(p.pos.x >= 0.0 && p.pos.x <= cfg.screen_width - p.current_size);
            prop_assert!(p.pos.y >= 0.0 && p.pos.y <= cfg.screen_height - p.current_size);
        }
    }
}
