//! Shockwave ring schedule and spawn sampling
//!
//! Fired once when the entity arrives: N rings start on a fixed stagger, each
//! growing from radius 0 to its maximum over a fixed lifetime while its
//! opacity fades out. Active rings emit particle spawn points on a fixed
//! interval, each at a uniform random angle on the ring's current radius, so
//! the spawns cluster along the expanding circumference.
//!
//! The original effect delegated growth to a renderer-side ease-out
//! animation; the core owns the curve here because it must know the radius at
//! every sample deadline. Ease-out cubic with a linear opacity fade keeps the
//! schedule deterministic.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use crate::config::ShockwaveTuning;
use crate::polar_to_cartesian;

/// One ring's timing state; radius and opacity are derived from elapsed time
#[derive(Debug, Clone)]
struct ShockwaveRing {
    start_ms: f64,
    /// Next spawn-sampling deadline on the sim clock
    next_sample_ms: f64,
}

/// A ring's derived state at some query time, for the renderer
#[derive(Debug, Clone, Copy)]
pub struct RingSample {
    pub radius: f32,
    pub opacity: f32,
    /// True while the ring's lifetime animation is running
    pub active: bool,
}

/// Ease-out cubic, the growth curve of the ring radius
#[inline]
fn ease_out(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

/// The triggered multi-ring shockwave
#[derive(Debug, Clone)]
pub struct ShockwaveEmitter {
    center: Vec2,
    rings: Vec<ShockwaveRing>,
}

impl ShockwaveEmitter {
    /// Schedule all rings, starting now
    pub fn trigger(center: Vec2, now_ms: f64, cfg: &ShockwaveTuning) -> Self {
        let rings = (0..cfg.ring_count)
            .map(|i| {
                let start_ms = now_ms + i as f64 * cfg.ring_stagger_ms;
                ShockwaveRing {
                    start_ms,
                    next_sample_ms: start_ms + cfg.spawn_interval_ms,
                }
            })
            .collect();
        Self { center, rings }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    fn sample_ring(ring: &ShockwaveRing, at_ms: f64, cfg: &ShockwaveTuning) -> RingSample {
        let elapsed = at_ms - ring.start_ms;
        if elapsed < 0.0 || elapsed >= cfg.ring_lifetime_ms {
            return RingSample {
                radius: 0.0,
                opacity: 0.0,
                active: false,
            };
        }
        let t = (elapsed / cfg.ring_lifetime_ms) as f32;
        let scale = cfg.max_scale * ease_out(t);
        RingSample {
            radius: cfg.base_size / 2.0 * scale,
            opacity: cfg.initial_opacity * (1.0 - t),
            active: true,
        }
    }

    /// Derived state of every ring at `now_ms` (renderer boundary)
    pub fn samples(&self, now_ms: f64, cfg: &ShockwaveTuning) -> Vec<RingSample> {
        self.rings
            .iter()
            .map(|r| Self::sample_ring(r, now_ms, cfg))
            .collect()
    }

    /// True once every ring's lifetime has elapsed
    pub fn finished(&self, now_ms: f64, cfg: &ShockwaveTuning) -> bool {
        self.rings
            .iter()
            .all(|r| now_ms - r.start_ms >= cfg.ring_lifetime_ms)
    }

    /// Collect spawn points for every sample deadline passed by `now_ms`.
    ///
    /// Each passed deadline on a sufficiently visible ring contributes
    /// `spawns_per_sample` points at the ring's radius as of that deadline.
    /// Deadlines keep their fixed cadence even when a frame spans several.
    pub fn collect_spawns(
        &mut self,
        now_ms: f64,
        rng: &mut Pcg32,
        cfg: &ShockwaveTuning,
        out: &mut Vec<Vec2>,
    ) {
        for ring in &mut self.rings {
            while ring.next_sample_ms <= now_ms
                && ring.next_sample_ms - ring.start_ms < cfg.ring_lifetime_ms
            {
                let sample = Self::sample_ring(ring, ring.next_sample_ms, cfg);
                let scale = sample.radius / (cfg.base_size / 2.0);
                if sample.active
                    && scale > cfg.min_visible_scale
                    && sample.opacity > cfg.min_visible_opacity
                {
                    for _ in 0..cfg.spawns_per_sample {
                        let angle = rng.random_range(0.0..TAU);
                        out.push(self.center + polar_to_cartesian(sample.radius, angle));
                    }
                }
                ring.next_sample_ms += cfg.spawn_interval_ms;
            }
        }
    }
}
