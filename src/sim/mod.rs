//! Deterministic simulation module
//!
//! All animation logic lives here. This module must be pure and deterministic:
//! - Fixed frame cadence only (the integration is frame-coupled by design)
//! - Seeded RNG only
//! - No rendering or platform dependencies; output is numeric snapshots
//!
//! One [`advance`] call per display refresh drives the whole pipeline:
//! entity motion, shockwave sampling, particle physics and intensity.

pub mod intensity;
pub mod motion;
pub mod particles;
pub mod shockwave;
pub mod state;
pub mod tick;
pub mod wave;

pub use particles::{Particle, ParticleField};
pub use shockwave::{RingSample, ShockwaveEmitter};
pub use state::{GuidedEntity, MotionPhase, PointerState, SimState, TrailPoint};
pub use tick::{
    EntityRender, FrameInput, ParticleRender, RenderFrame, RingRender, TrailRender, advance,
};
pub use wave::WaveOffset;

use thiserror::Error;

/// Fatal simulation errors
///
/// Degenerate geometry (zero-length directions) is not represented here: it is
/// recovered locally by skipping the affected contribution for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// An internal invariant broke; the per-frame update was aborted rather
    /// than continuing with corrupt state
    #[error("simulation reached an invalid state: {0}")]
    InvalidState(&'static str),
    /// A particle handle was used after removal
    #[error("unknown particle id {0}")]
    UnknownParticle(u32),
}
