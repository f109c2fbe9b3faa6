//! Per-particle visual intensity oscillators
//!
//! Two independent oscillators, advanced once per step and deliberately
//! decoupled from the position integration: a Bernoulli-triggered opacity
//! twinkle held for a random duration, and a sine size pulse floored at one
//! unit.

use rand::Rng;
use rand_pcg::Pcg32;

use super::particles::Particle;
use crate::config::ParticleTuning;

/// Twinkle state machine: idle particles roll a per-frame trial; a hit picks
/// a random opacity and holds it until the deadline, then reverts to base.
pub(crate) fn update_twinkle(
    p: &mut Particle,
    now_ms: f64,
    rng: &mut Pcg32,
    cfg: &ParticleTuning,
) {
    if p.is_twinkling {
        if now_ms >= p.twinkle_end_ms {
            p.is_twinkling = false;
            p.opacity = p.base_opacity;
        }
    } else if rng.random::<f32>() < cfg.twinkle_chance {
        p.is_twinkling = true;
        p.twinkle_end_ms =
            now_ms + rng.random_range(cfg.twinkle_duration_min_ms..=cfg.twinkle_duration_max_ms);
        p.opacity = rng.random_range(cfg.twinkle_opacity_min..=cfg.twinkle_opacity_max);
    }
}

/// Advance the size pulse and derive the current size, floored at 1 unit.
///
/// The phase is monotonic (never wrapped); only its sine matters.
pub(crate) fn update_size_pulse(p: &mut Particle, cfg: &ParticleTuning) {
    if !cfg.pulse_enabled {
        p.current_size = p.original_size;
        return;
    }
    p.size_pulse_phase += cfg.pulse_speed;
    let shrink = cfg.pulse_magnitude * (p.size_pulse_phase.sin() + 1.0) / 2.0;
    p.current_size = (p.original_size * (1.0 - shrink)).max(1.0);
}
