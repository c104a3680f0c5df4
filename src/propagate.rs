//! # Field-free propagation and multiple scattering
//!
//! Stateless building blocks of the telescope trajectory:
//!
//! * [`jacobian`] – transport of the local track state `(q/p, x', y', x, y)` over a
//!   straight-line distance,
//! * [`highland_theta`] / [`scattering_width`] – RMS multiple-scattering angle from the
//!   Highland formula and the matching kink precision,
//! * [`build_point`], [`build_measured_point`], [`build_marker`] – constructors of the
//!   [`BrokenLinePoint`]s consumed by the trajectory solver.
//!
//! ## Highland formula
//!
//! ```text
//! θ0 = 0.0136 GeV / E · √(x/X0) · (1 + 0.038 · ln(x/X0 total))
//! ```
//!
//! The logarithmic term uses the material budget of the **whole** particle path, so every
//! scatterer of a telescope is evaluated against the same total.
//!
//! See: PDG, *Passage of particles through matter*, Eq. 32.15.
use nalgebra::{Matrix2, Matrix5, Vector2};

use crate::{
    broken_lines::BrokenLinePoint,
    constants::{
        GeV, MaterialBudget, Millimeter, Radian, HIGHLAND_LOG_COEFF, HIGHLAND_SCALE, POS_X,
        POS_Y, SLOPE_X, SLOPE_Y,
    },
    plane::Resolution,
    trackres_errors::TrackResError,
};

/// Straight-line transport over `ds` mm, no magnetic field.
///
/// Identity, except `x += x' · ds` and `y += y' · ds`.
pub fn jacobian(ds: Millimeter) -> Matrix5<f64> {
    let mut jac = Matrix5::identity();
    jac[(POS_X, SLOPE_X)] = ds;
    jac[(POS_Y, SLOPE_Y)] = ds;
    jac
}

/// RMS projected multiple-scattering angle of a scatterer, from the Highland formula.
///
/// Arguments
/// -----------------
/// * `energy`: Beam energy in GeV, strictly positive.
/// * `radiation_length`: Material budget x/X0 of the scatterer, non-negative.
/// * `total_radiation_length`: Material budget x/X0 of the whole path, strictly positive.
///
/// Return
/// ----------
/// * `Ok(theta0)` in radians, finite and strictly positive.
/// * `Err(TrackResError::NonPositiveBeamEnergy)`, `Err(NegativeRadiationLength)` or
///   `Err(NonPositiveTotalMaterial)` when a precondition is violated.
/// * `Err(TrackResError::DegenerateScatteringAngle)` when θ0 is zero or not finite (e.g. a
///   scatterer without material), since its precision would be infinite.
pub fn highland_theta(
    energy: GeV,
    radiation_length: MaterialBudget,
    total_radiation_length: MaterialBudget,
) -> Result<Radian, TrackResError> {
    if !(energy.is_finite() && energy > 0.0) {
        return Err(TrackResError::NonPositiveBeamEnergy(energy));
    }
    if radiation_length.is_nan() || radiation_length < 0.0 {
        return Err(TrackResError::NegativeRadiationLength(radiation_length));
    }
    if !(total_radiation_length.is_finite() && total_radiation_length > 0.0) {
        return Err(TrackResError::NonPositiveTotalMaterial(
            total_radiation_length,
        ));
    }

    let theta = HIGHLAND_SCALE / energy
        * radiation_length.sqrt()
        * (1.0 + HIGHLAND_LOG_COEFF * total_radiation_length.ln());

    if !(theta.is_finite() && theta > 0.0) {
        return Err(TrackResError::DegenerateScatteringAngle(theta));
    }
    Ok(theta)
}

/// Kink precision `1/θ0²` of a scatterer, identical on both transverse axes.
///
/// See [`highland_theta`] for arguments and errors.
pub fn scattering_width(
    energy: GeV,
    radiation_length: MaterialBudget,
    total_radiation_length: MaterialBudget,
) -> Result<Vector2<f64>, TrackResError> {
    let theta = highland_theta(energy, radiation_length, total_radiation_length)?;
    let precision = 1.0 / (theta * theta);
    Ok(Vector2::new(precision, precision))
}

/// Point reached after `ds` mm carrying a zero-mean scatterer of precision `scatter_weight`.
pub fn build_point(ds: Millimeter, scatter_weight: Vector2<f64>) -> BrokenLinePoint {
    let mut point = BrokenLinePoint::new(jacobian(ds));
    point.add_scatterer(Vector2::zeros(), scatter_weight);
    point
}

/// Point reached after `ds` mm carrying an ideal (zero residual) 2D measurement of precision
/// `1/resolution²`, plus an optional zero-mean scatterer.
///
/// The measurement plane coincides with the propagation plane: the projection from local
/// offsets to measurement directions is the identity.
pub fn build_measured_point(
    ds: Millimeter,
    scatter_weight: Option<Vector2<f64>>,
    resolution: Resolution,
) -> BrokenLinePoint {
    let mut point = BrokenLinePoint::new(jacobian(ds));
    if let Some(weight) = scatter_weight {
        point.add_scatterer(Vector2::zeros(), weight);
    }
    let precision = Vector2::new(
        1.0 / (resolution.x * resolution.x),
        1.0 / (resolution.y * resolution.y),
    );
    point.add_measurement(Matrix2::identity(), Vector2::zeros(), precision);
    point
}

/// Bookkeeping point reached after `ds` mm, with neither scatterer nor measurement.
pub fn build_marker(ds: Millimeter) -> BrokenLinePoint {
    BrokenLinePoint::new(jacobian(ds))
}
