//! # Constants and type definitions for trackres
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! definitions** used throughout the `trackres` library.
//!
//! ## Overview
//!
//! - Highland multiple-scattering constants
//! - Layout of the 5-parameter local track state
//! - Unit conversions (mm → µm, rad → µrad)
//! - Unit type aliases used across the crate
//!
//! These definitions are shared by the propagation helpers, the telescope assembly and the
//! resolution queries.

// -------------------------------------------------------------------------------------------------
// Highland formula
// -------------------------------------------------------------------------------------------------

/// Scale of the Highland formula, in GeV (13.6 MeV)
pub const HIGHLAND_SCALE: f64 = 0.0136;

/// Coefficient of the logarithmic correction of the Highland formula
pub const HIGHLAND_LOG_COEFF: f64 = 0.038;

// -------------------------------------------------------------------------------------------------
// Track state layout
// -------------------------------------------------------------------------------------------------

/// Dimension of the local track state (q/p, x', y', x, y)
pub const TRACK_STATE_DIM: usize = 5;

/// Number of track parameters actually fitted in a field-free model (x', y', x, y)
pub const FITTED_TRACK_PARAMETERS: usize = 4;

/// Dimension of a plane measurement (x, y)
pub const MEASUREMENT_DIM: usize = 2;

/// Extra fit parameters introduced by one unknown scatterer (two kinks, two axes)
pub const UNKNOWN_SCATTERER_PARAMETERS: usize = 4;

/// Index of the curvature (q/p) in the track state
pub const CURVATURE: usize = 0;
/// Index of the x slope in the track state
pub const SLOPE_X: usize = 1;
/// Index of the y slope in the track state
pub const SLOPE_Y: usize = 2;
/// Index of the x offset in the track state
pub const POS_X: usize = 3;
/// Index of the y offset in the track state
pub const POS_Y: usize = 4;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Millimeter → micrometer
pub const MM_TO_UM: f64 = 1e3;

/// Radian → microradian
pub const RAD_TO_URAD: f64 = 1e6;

/// 1/√12, offset (in units of the slab length) of the two thin scatterers equivalent to a
/// uniform thick scatterer, measured from its center
pub const FRAC_1_SQRT_12: f64 = 0.288_675_134_594_812_9;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Length in millimeters (positions, distances, radiation lengths, resolutions)
pub type Millimeter = f64;
/// Length in micrometers (resolution results)
pub type Micrometer = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle in microradians (angular and kink resolution results)
pub type Microradian = f64;
/// Beam energy in GeV
pub type GeV = f64;
/// Material budget x/X0 (dimensionless)
pub type MaterialBudget = f64;

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_frac_1_sqrt_12() {
        assert!((FRAC_1_SQRT_12 - 1.0 / 12f64.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_state_layout() {
        let indices = [CURVATURE, SLOPE_X, SLOPE_Y, POS_X, POS_Y];
        assert!(indices.iter().all(|&i| i < TRACK_STATE_DIM));
        assert_eq!(POS_Y - POS_X + 1, MEASUREMENT_DIM);
        assert_eq!(FITTED_TRACK_PARAMETERS, TRACK_STATE_DIM - 1);
    }
}
