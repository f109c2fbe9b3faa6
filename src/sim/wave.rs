//! Lateral wave perturbation
//!
//! A stateful sine oscillator advanced by path distance, not time: the phase
//! moves 2π per `wavelength` pixels traveled, so the wiggle density along the
//! path is independent of speed.

use glam::Vec2;
use std::f32::consts::TAU;

use crate::consts::MOVE_EPSILON;
use crate::{perpendicular, wrap_phase};

/// Distance-driven sinusoidal offset generator
#[derive(Debug, Clone)]
pub struct WaveOffset {
    phase: f32,
    amplitude: f32,
    wavelength: f32,
}

impl WaveOffset {
    pub fn new(amplitude: f32, wavelength: f32) -> Self {
        Self {
            phase: 0.0,
            amplitude,
            wavelength,
        }
    }

    /// Current phase, always in [0, 2π)
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Offset perpendicular to `dir` for this frame, advancing the phase by
    /// the distance traveled.
    ///
    /// `dir` must be the unit direction of travel. If `distance` is
    /// numerically negligible no offset is produced and the phase does not
    /// advance, which also sidesteps NaN directions from zero displacements.
    pub fn offset(&mut self, dir: Vec2, distance: f32) -> Vec2 {
        if distance <= MOVE_EPSILON {
            return Vec2::ZERO;
        }
        let offset = perpendicular(dir) * (self.amplitude * self.phase.sin());
        self.phase = wrap_phase(self.phase + TAU / self.wavelength * distance);
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_negligible_distance_is_inert() {
        let mut wave = WaveOffset::new(2.0, 360.0);
        let before = wave.phase();
        assert_eq!(wave.offset(Vec2::X, 0.0), Vec2::ZERO);
        assert_eq!(wave.offset(Vec2::X, 0.005), Vec2::ZERO);
        assert_eq!(wave.phase(), before);
    }

    #[test]
    fn test_phase_advances_by_distance() {
        let mut wave = WaveOffset::new(2.0, 360.0);
        // Half a wavelength of travel = half a cycle of phase
        wave.offset(Vec2::X, 180.0);
        assert!((wave.phase() - std::f32::consts::PI).abs() < 1e-4);
    }

    #[test]
    fn test_offset_is_perpendicular_to_travel() {
        let mut wave = WaveOffset::new(2.0, 360.0);
        wave.offset(Vec2::X, 90.0); // move phase off zero so sin != 0
        let dir = Vec2::new(0.6, 0.8);
        let offset = wave.offset(dir, 5.0);
        assert!(offset.dot(dir).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_phase_stays_in_range(distances in proptest::collection::vec(0.0f32..500.0, 0..64)) {
            let mut wave = WaveOffset::new(2.0, 360.0);
            for d in distances {
                wave.offset(Vec2::Y, d);
                prop_assert!(wave.phase() >= 0.0);
                prop_assert!(wave.phase() < TAU);
            }
        }

        #[test]
        fn prop_offset_magnitude_bounded(distances in proptest::collection::vec(0.0f32..500.0, 1..64)) {
            let amplitude = 2.0;
            let mut wave = WaveOffset::new(amplitude, 360.0);
            for d in distances {
                let offset = wave.offset(Vec2::X, d);
                prop_assert!(offset.length() <= amplitude + 1e-4);
            }
        }
    }
}
