//! # Thick scatterer as two thin scatterers
//!
//! A slab of uniformly distributed material of length `L` deflects a track like two thin
//! scatterers, each carrying half of the material, placed at `L/2 ∓ L/√12` from the slab
//! start: this pair reproduces the first and second moments of the uniform distribution.
//!
//! The same construction is used twice by the telescope assembly:
//!
//! - the **ambient medium** between two planes is replaced by two thin scatterers, reached by
//!   propagation steps of `0.21 L`, `0.58 L` and a final `0.21 L` to the next plane;
//! - an **unknown scatterer** of size `s` is described by two kink parameters located at
//!   `a ∓ s/√12` around its center `a`.
use crate::constants::{Millimeter, FRAC_1_SQRT_12};

/// Fractions of a gap travelled before the first thin scatterer, between the two, and after
/// the second one (0.5 − 1/√12 ≈ 0.21).
pub const MEDIUM_STEP_FRACTIONS: [f64; 3] = [0.21, 0.58, 0.21];

/// Uniform slab of material along the beam axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThickScatterer {
    start: Millimeter,
    length: Millimeter,
}

impl ThickScatterer {
    /// Slab beginning at `start` and extending over `length`.
    pub fn new(start: Millimeter, length: Millimeter) -> Self {
        ThickScatterer { start, length }
    }

    /// Slab of `length` centered on `center`.
    pub fn centered(center: Millimeter, length: Millimeter) -> Self {
        ThickScatterer {
            start: center - 0.5 * length,
            length,
        }
    }

    pub fn start(&self) -> Millimeter {
        self.start
    }

    pub fn length(&self) -> Millimeter {
        self.length
    }

    pub fn center(&self) -> Millimeter {
        self.start + 0.5 * self.length
    }

    /// Propagation distances start → first thin scatterer → second thin scatterer → end.
    pub fn propagation_steps(&self) -> [Millimeter; 3] {
        MEDIUM_STEP_FRACTIONS.map(|fraction| fraction * self.length)
    }

    /// Positions of the two equivalent thin scatterers, upstream one first.
    pub fn thin_positions(&self) -> [Millimeter; 2] {
        let offset = self.length * FRAC_1_SQRT_12;
        [self.center() - offset, self.center() + offset]
    }
}

#[cfg(test)]
mod moment_matching_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_steps_cover_the_gap() {
        let slab = ThickScatterer::new(110.0, 55.0);
        let steps = slab.propagation_steps();
        assert_relative_eq!(steps.iter().sum::<f64>(), 55.0, epsilon = 1e-12);
        assert_relative_eq!(steps[0], 11.55, max_relative = 1e-12);
        assert_relative_eq!(steps[0], steps[2]);
    }

    #[test]
    fn test_steps_match_thin_positions() {
        let slab = ThickScatterer::new(0.0, 100.0);
        let [first, second] = slab.thin_positions();
        let steps = slab.propagation_steps();
        // rounded fractions agree with the exact moment-matched positions to 2e-3 L
        assert!((first - steps[0]).abs() < 0.2);
        assert!((second - (steps[0] + steps[1])).abs() < 0.2);
    }

    #[test]
    fn test_thin_positions_moments() {
        let slab = ThickScatterer::centered(360.0, 10.0);
        assert_relative_eq!(slab.start(), 355.0);
        let [a, b] = slab.thin_positions();
        // mean and variance of the pair equal those of the uniform slab
        assert_relative_eq!(0.5 * (a + b), 360.0);
        let variance = 0.5 * ((a - 360.0).powi(2) + (b - 360.0).powi(2));
        assert_relative_eq!(variance, 100.0 / 12.0, max_relative = 1e-12);
    }
}
