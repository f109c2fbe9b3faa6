//! Per-frame advance and the renderer boundary
//!
//! One [`advance`] call per display refresh: the sim clock moves by the fixed
//! frame interval, then entity motion, shockwave sampling and the particle
//! field run in sequence. Every frame's computation is self-contained; the
//! driver may simply stop calling with nothing to unwind.
//!
//! [`SimState::render_frame`] is the entire output surface: numeric records
//! for the renderer, which owns all visual object lifecycle.

use glam::Vec2;
use serde::Serialize;

use super::SimError;
use super::state::{MotionPhase, PointerState, SimState};

/// External inputs for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Last known pointer state from the input collaborator
    pub pointer: PointerState,
    /// Particles whose backing renderer objects were detached
    pub despawn: Vec<u32>,
}

/// Advance the simulation by one frame
pub fn advance(state: &mut SimState, input: &FrameInput) -> Result<(), SimError> {
    state.frame += 1;
    state.time_ms += state.config.frame_interval_ms;
    let now = state.time_ms;

    for &id in &input.despawn {
        state.field.despawn(id)?;
    }

    super::motion::advance_entity(state)?;

    if let Some(shockwave) = state.shockwave.as_mut() {
        let mut spawns = Vec::new();
        shockwave.collect_spawns(now, &mut state.rng, &state.config.shockwave, &mut spawns);
        for point in spawns {
            state
                .field
                .spawn(point, now, &mut state.rng, &state.config.particles);
        }
    }

    state
        .field
        .step(&input.pointer, now, &mut state.rng, &state.config);
    Ok(())
}

/// Entity record for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct EntityRender {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub phase: MotionPhase,
}

/// Trail segment record; opacity already faded by age
#[derive(Debug, Clone, Serialize)]
pub struct TrailRender {
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// Shockwave ring record
#[derive(Debug, Clone, Serialize)]
pub struct RingRender {
    pub center: Vec2,
    pub radius: f32,
    pub opacity: f32,
}

/// Particle record; `pos` is recentered for the pulsing size
#[derive(Debug, Clone, Serialize)]
pub struct ParticleRender {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub color: u8,
}

/// Everything the renderer draws for one frame
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub frame: u64,
    pub time_ms: f64,
    pub entity: EntityRender,
    pub trail: Vec<TrailRender>,
    pub rings: Vec<RingRender>,
    pub particles: Vec<ParticleRender>,
}

impl SimState {
    /// Convenience wrapper over [`advance`]
    pub fn advance_frame(&mut self, input: &FrameInput) -> Result<(), SimError> {
        advance(self, input)
    }

    /// Snapshot the numeric state the renderer needs this frame
    pub fn render_frame(&self) -> RenderFrame {
        let now = self.time_ms;
        let cfg = &self.config;

        let entity = EntityRender {
            pos: self.entity.render_pos,
            size: cfg.entity_size,
            opacity: self.entity.opacity(now, cfg.motion.fade_out_ms),
            phase: self.entity.phase,
        };

        let trail_size = cfg.entity_size * cfg.trail.size_factor;
        let trail = self
            .entity
            .trail
            .iter()
            .map(|point| {
                let age = ((now - point.recorded_ms) / cfg.trail.fade_ms).clamp(0.0, 1.0) as f32;
                // Trail segments are centered on the entity's center
                let pos = point.pos + Vec2::splat((cfg.entity_size - trail_size) / 2.0);
                TrailRender {
                    pos,
                    size: trail_size,
                    opacity: cfg.trail.initial_opacity * (1.0 - age),
                }
            })
            .collect();

        let rings = match &self.shockwave {
            Some(shockwave) => shockwave
                .samples(now, &cfg.shockwave)
                .into_iter()
                .filter(|s| s.active)
                .map(|s| RingRender {
                    center: shockwave.center(),
                    radius: s.radius,
                    opacity: s.opacity,
                })
                .collect(),
            None => Vec::new(),
        };

        let particles = self
            .field
            .iter()
            .map(|p| ParticleRender {
                id: p.id,
                // Recentered so the pulse shrinks toward the visual center
                pos: p.pos + Vec2::splat((p.original_size - p.current_size) / 2.0),
                size: p.current_size,
                opacity: p.opacity,
                color: p.color,
            })
            .collect();

        RenderFrame {
            frame: self.frame,
            time_ms: now,
            entity,
            trail,
            rings,
            particles,
        }
    }
}
