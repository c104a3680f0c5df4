//! # Dense broken-line fit
//!
//! Reference [`TrajectorySolver`] solving the broken-line least-squares problem with dense
//! normal equations.
//!
//! ## Parameterization
//!
//! ```text
//! p = [ x'0, y'0, x0, y0 | kink_1 (x, y) … kink_m (x, y) | local_1 … local_n ]
//! ```
//!
//! * the track offsets and slopes at the first point (the curvature is not fitted: the
//!   model is field-free, its row and column in the results are zero),
//! * two kink angles per **inner** scatterer point, each constrained by a Gaussian prior of
//!   mean `Scatterer::mean` and precision `Scatterer::precision`. Scatterers on the first
//!   and last point are ignored: a kink there changes no measurement and would only inflate
//!   the slope uncertainty at the ends of the trajectory,
//! * the local parameters declared by the caller.
//!
//! The linear dependence of the track state on `p` is carried from point to point through
//! the stored Jacobians. At a scatterer point the state is reported **after** the kink.
//!
//! ## Outputs
//!
//! * χ² of the weighted residuals at the minimum,
//! * ndf = measurement dimensions + kink priors − fitted parameters,
//! * lost weight = 0 (no outlier down-weighting is performed).
use nalgebra::{DMatrix, DVector, Matrix2, Matrix2xX, Matrix5xX};

use super::{BrokenLinePoint, FitSummary, FittedTrajectory, PointResult, TrajectorySolver};
use crate::{
    constants::{
        FITTED_TRACK_PARAMETERS, MEASUREMENT_DIM, POS_X, POS_Y, SLOPE_X, SLOPE_Y, TRACK_STATE_DIM,
    },
    trackres_errors::TrackResError,
};

/// Dense normal-equation solver for broken-line trajectories.
///
/// Fields
/// -----------------
/// * `pivot_tolerance` – smallest accepted ratio between a squared Cholesky pivot and the
///   matching diagonal element of the normal matrix. Below it the corresponding parameter
///   is considered unconstrained and the fit fails with
///   [`TrackResError::SingularFitMatrix`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseBrokenLineFit {
    pub pivot_tolerance: f64,
}

impl DenseBrokenLineFit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pivot_tolerance(pivot_tolerance: f64) -> Self {
        DenseBrokenLineFit { pivot_tolerance }
    }
}

impl Default for DenseBrokenLineFit {
    fn default() -> Self {
        DenseBrokenLineFit {
            pivot_tolerance: 1e-12,
        }
    }
}

/// Solution of a [`DenseBrokenLineFit`].
#[derive(Debug, Clone)]
pub struct DenseFittedTrajectory {
    /// d(state)/d(p) at each point, after its kink.
    states: Vec<Matrix5xX<f64>>,
    solution: DVector<f64>,
    covariance: DMatrix<f64>,
    n_local: usize,
    summary: FitSummary,
}

impl DenseFittedTrajectory {
    /// Number of fitted parameters (track, kinks and local parameters).
    pub fn parameter_count(&self) -> usize {
        self.solution.len()
    }

    /// Full covariance of all fitted parameters.
    pub fn parameter_covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }
}

fn all_finite<'a>(values: impl IntoIterator<Item = &'a f64>) -> bool {
    values.into_iter().all(|v| v.is_finite())
}

fn valid_precision(precision: &nalgebra::Vector2<f64>) -> bool {
    precision.iter().all(|p| p.is_finite() && *p >= 0.0)
}

/// Reject points the normal equations cannot digest.
fn validate_points(points: &[BrokenLinePoint], n_local: usize) -> Result<(), TrackResError> {
    let invalid = |index: usize, reason: &str| TrackResError::InvalidPoint {
        index,
        reason: reason.to_string(),
    };

    for (index, point) in points.iter().enumerate() {
        if !all_finite(point.jacobian().iter()) {
            return Err(invalid(index, "jacobian is not finite"));
        }
        if let Some(scatterer) = point.scatterer() {
            if !all_finite(scatterer.mean.iter()) || !valid_precision(&scatterer.precision) {
                return Err(invalid(
                    index,
                    "scatterer mean must be finite and precision finite and >= 0",
                ));
            }
        }
        if let Some(measurement) = point.measurement() {
            if !all_finite(measurement.projection.iter())
                || !all_finite(measurement.residual.iter())
                || !valid_precision(&measurement.precision)
            {
                return Err(invalid(
                    index,
                    "measurement must be finite with precision >= 0",
                ));
            }
        }
        if let Some(local) = point.local_derivatives() {
            if local.ncols() != n_local {
                return Err(TrackResError::LocalDerivativeMismatch {
                    index,
                    expected: n_local,
                    found: local.ncols(),
                });
            }
            if !all_finite(local.iter()) {
                return Err(invalid(index, "local derivatives are not finite"));
            }
        }
    }
    Ok(())
}

impl TrajectorySolver for DenseBrokenLineFit {
    type Fitted = DenseFittedTrajectory;

    fn fit(
        &self,
        points: &[BrokenLinePoint],
        n_local: usize,
    ) -> Result<DenseFittedTrajectory, TrackResError> {
        if points.is_empty() {
            return Err(TrackResError::EmptyTrajectory);
        }
        validate_points(points, n_local)?;

        let last = points.len() - 1;
        let is_inner = |index: usize| index > 0 && index < last;
        let n_kinks = MEASUREMENT_DIM
            * points
                .iter()
                .enumerate()
                .filter(|(index, point)| is_inner(*index) && point.has_scatterer())
                .count();
        let n_params = FITTED_TRACK_PARAMETERS + n_kinks + n_local;
        let local_offset = n_params - n_local;

        let mut derivative = Matrix5xX::<f64>::zeros(n_params);
        derivative[(SLOPE_X, 0)] = 1.0;
        derivative[(SLOPE_Y, 1)] = 1.0;
        derivative[(POS_X, 2)] = 1.0;
        derivative[(POS_Y, 3)] = 1.0;

        let mut normal = DMatrix::<f64>::zeros(n_params, n_params);
        let mut rhs = DVector::<f64>::zeros(n_params);
        let mut weighted_residuals = 0.0;
        let mut n_constraints: i64 = 0;
        let mut next_kink = FITTED_TRACK_PARAMETERS;
        let mut states = Vec::with_capacity(points.len());

        for (index, point) in points.iter().enumerate() {
            if index > 0 {
                derivative = point.jacobian() * &derivative;
            }

            if let Some(measurement) = point.measurement() {
                let mut design: Matrix2xX<f64> =
                    measurement.projection * derivative.fixed_rows::<MEASUREMENT_DIM>(POS_X);
                if let Some(local) = point.local_derivatives() {
                    let mut block = design.columns_mut(local_offset, n_local);
                    block += local;
                }

                let weight = Matrix2::from_diagonal(&measurement.precision);
                let weighted_design = weight * &design;
                normal += design.transpose() * &weighted_design;
                rhs += weighted_design.transpose() * measurement.residual;
                weighted_residuals += measurement.residual.dot(&(weight * measurement.residual));
                n_constraints += measurement.precision.iter().filter(|p| **p > 0.0).count() as i64;
            }

            if let Some(scatterer) = point.scatterer().filter(|_| is_inner(index)) {
                for axis in 0..MEASUREMENT_DIM {
                    let kink = next_kink + axis;
                    let precision = scatterer.precision[axis];
                    normal[(kink, kink)] += precision;
                    rhs[kink] += precision * scatterer.mean[axis];
                    weighted_residuals += precision * scatterer.mean[axis].powi(2);
                    if precision > 0.0 {
                        n_constraints += 1;
                    }
                }
                // the state reported at a scatterer is the one after the kink
                derivative[(SLOPE_X, next_kink)] += 1.0;
                derivative[(SLOPE_Y, next_kink + 1)] += 1.0;
                next_kink += MEASUREMENT_DIM;
            }

            states.push(derivative.clone());
        }

        let diagonal = normal.diagonal();
        let cholesky = normal.cholesky().ok_or(TrackResError::SingularFitMatrix)?;
        let unconstrained = cholesky
            .l_dirty()
            .diagonal()
            .iter()
            .zip(diagonal.iter())
            .any(|(pivot, diag)| pivot * pivot <= self.pivot_tolerance * diag);
        if unconstrained {
            return Err(TrackResError::SingularFitMatrix);
        }

        let solution = cholesky.solve(&rhs);
        let covariance = cholesky.inverse();
        if let Some(bad) = covariance
            .diagonal()
            .iter()
            .position(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(TrackResError::DegenerateCovariance(format!(
                "variance of fit parameter {bad} is {}",
                covariance[(bad, bad)]
            )));
        }

        let chi2 = (weighted_residuals - rhs.dot(&solution)).max(0.0);
        let summary = FitSummary {
            chi2,
            ndf: n_constraints - n_params as i64,
            lost_weight: 0.0,
        };

        Ok(DenseFittedTrajectory {
            states,
            solution,
            covariance,
            n_local,
            summary,
        })
    }
}

impl FittedTrajectory for DenseFittedTrajectory {
    fn summary(&self) -> FitSummary {
        self.summary
    }

    fn results(&self, point: usize) -> Result<PointResult, TrackResError> {
        let state = self
            .states
            .get(point)
            .ok_or(TrackResError::PointIndexOutOfRange {
                index: point,
                len: self.states.len(),
            })?;

        let n_params = self.solution.len();
        let local_offset = n_params - self.n_local;
        let mut transform = DMatrix::<f64>::zeros(TRACK_STATE_DIM + self.n_local, n_params);
        transform
            .view_mut((0, 0), (TRACK_STATE_DIM, n_params))
            .copy_from(state);
        for j in 0..self.n_local {
            transform[(TRACK_STATE_DIM + j, local_offset + j)] = 1.0;
        }

        let correction = &transform * &self.solution;
        let covariance = &transform * &self.covariance * transform.transpose();
        Ok(PointResult {
            correction,
            covariance,
        })
    }
}

#[cfg(test)]
mod dense_fit_test {
    use super::*;
    use crate::constants::CURVATURE;
    use crate::propagate::{build_marker, build_measured_point, build_point};
    use crate::plane::Resolution;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn three_plane_line(distance: f64, resolution: f64) -> Vec<BrokenLinePoint> {
        let resolution = Resolution::isotropic(resolution);
        vec![
            build_measured_point(0.0, None, resolution),
            build_measured_point(distance, None, resolution),
            build_measured_point(distance, None, resolution),
        ]
    }

    #[test]
    fn test_straight_line_covariance() {
        let points = three_plane_line(10.0, 1.0);
        let fitted = DenseBrokenLineFit::new().fit(&points, 0).unwrap();

        let summary = fitted.summary();
        assert_eq!(summary.ndf, 2);
        assert_eq!(summary.chi2, 0.0);
        assert_eq!(summary.lost_weight, 0.0);

        // center of three equidistant unit-resolution points
        let middle = fitted.results(1).unwrap();
        assert_eq!(middle.correction.len(), TRACK_STATE_DIM);
        assert_relative_eq!(middle.covariance[(POS_X, POS_X)], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(middle.covariance[(POS_Y, POS_Y)], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(middle.covariance[(SLOPE_X, SLOPE_X)], 1.0 / 200.0, epsilon = 1e-12);
        assert_eq!(middle.covariance[(CURVATURE, CURVATURE)], 0.0);

        // outer points: 1/3 + 10² / 200
        let first = fitted.results(0).unwrap();
        assert_relative_eq!(first.covariance[(POS_X, POS_X)], 5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_end_point_scatterers_are_ignored() {
        let plain = DenseBrokenLineFit::new().fit(&three_plane_line(10.0, 1.0), 0).unwrap();

        let mut points = three_plane_line(10.0, 1.0);
        for index in [0, 2] {
            points[index].add_scatterer(Vector2::zeros(), Vector2::new(1e6, 1e6));
        }
        let fitted = DenseBrokenLineFit::new().fit(&points, 0).unwrap();

        assert_eq!(fitted.parameter_count(), 4);
        assert_eq!(fitted.summary().ndf, 2);
        for index in [0, 2] {
            let covariance = fitted.results(index).unwrap().covariance;
            assert_relative_eq!(covariance[(SLOPE_X, SLOPE_X)], 1.0 / 200.0, epsilon = 1e-12);
            assert_relative_eq!(
                covariance,
                plain.results(index).unwrap().covariance,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_residuals_shift_the_track() {
        let mut points = three_plane_line(10.0, 1.0);
        for point in &mut points {
            point.add_measurement(
                Matrix2::identity(),
                Vector2::new(0.5, -0.2),
                Vector2::new(1.0, 1.0),
            );
        }
        let fitted = DenseBrokenLineFit::new().fit(&points, 0).unwrap();
        let result = fitted.results(2).unwrap();
        assert_relative_eq!(result.correction[POS_X], 0.5, epsilon = 1e-12);
        assert_relative_eq!(result.correction[POS_Y], -0.2, epsilon = 1e-12);
        assert_relative_eq!(result.correction[SLOPE_X], 0.0, epsilon = 1e-12);
        assert!(fitted.summary().chi2 < 1e-20);
    }

    #[test]
    fn test_chi2_of_inconsistent_measurements() {
        let mut points = three_plane_line(10.0, 1.0);
        // outer points at 0, middle point displaced by 3 on x: line fit leaves 1, -2, 1
        points[1].add_measurement(
            Matrix2::identity(),
            Vector2::new(3.0, 0.0),
            Vector2::new(1.0, 1.0),
        );
        let fitted = DenseBrokenLineFit::new().fit(&points, 0).unwrap();
        assert_relative_eq!(fitted.summary().chi2, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_kink_reported_after_scatterer() {
        let resolution = Resolution::isotropic(1.0);
        let points = vec![
            build_measured_point(0.0, None, resolution),
            build_measured_point(10.0, None, resolution),
            build_point(10.0, Vector2::new(4.0, 4.0)),
            build_measured_point(10.0, None, resolution),
            build_measured_point(10.0, None, resolution),
        ];
        let fitted = DenseBrokenLineFit::new().fit(&points, 0).unwrap();
        assert_eq!(fitted.parameter_count(), 6);
        assert_eq!(fitted.summary().ndf, 8 + 2 - 6);

        // slope variance after the kink includes the kink itself
        let upstream = fitted.results(1).unwrap();
        let downstream = fitted.results(3).unwrap();
        let at_kink = fitted.results(2).unwrap();
        assert_relative_eq!(
            at_kink.covariance[(SLOPE_X, SLOPE_X)],
            downstream.covariance[(SLOPE_X, SLOPE_X)],
            epsilon = 1e-12
        );
        assert!(upstream.covariance[(POS_X, POS_X)] < 1.0);
    }

    #[test]
    fn test_markers_do_not_change_the_fit() {
        let plain = three_plane_line(10.0, 1.0);
        let mut with_marker = plain.clone();
        with_marker.insert(2, build_marker(5.0));
        with_marker[3] = build_measured_point(5.0, None, Resolution::isotropic(1.0));

        let a = DenseBrokenLineFit::new().fit(&plain, 0).unwrap();
        let b = DenseBrokenLineFit::new().fit(&with_marker, 0).unwrap();
        assert_relative_eq!(
            a.results(2).unwrap().covariance,
            b.results(3).unwrap().covariance,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            b.results(2).unwrap().covariance[(POS_X, POS_X)],
            1.0 / 3.0 + 25.0 / 200.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_underconstrained_track_is_singular() {
        let points = vec![build_measured_point(0.0, None, Resolution::isotropic(1.0))];
        assert_eq!(
            DenseBrokenLineFit::new().fit(&points, 0).unwrap_err(),
            TrackResError::SingularFitMatrix
        );
        assert_eq!(
            DenseBrokenLineFit::new().fit(&[], 0).unwrap_err(),
            TrackResError::EmptyTrajectory
        );
    }

    #[test]
    fn test_invalid_points() {
        let mut points = three_plane_line(10.0, 1.0);
        points[1].set_local_derivatives(Matrix2xX::zeros(3));
        assert_eq!(
            DenseBrokenLineFit::new().fit(&points, 4).unwrap_err(),
            TrackResError::LocalDerivativeMismatch {
                index: 1,
                expected: 4,
                found: 3
            }
        );

        let mut points = three_plane_line(10.0, 1.0);
        points[0].add_scatterer(Vector2::zeros(), Vector2::new(f64::INFINITY, 1.0));
        assert!(matches!(
            DenseBrokenLineFit::new().fit(&points, 0),
            Err(TrackResError::InvalidPoint { index: 0, .. })
        ));
    }

    #[test]
    fn test_point_out_of_range() {
        let fitted = DenseBrokenLineFit::new()
            .fit(&three_plane_line(10.0, 1.0), 0)
            .unwrap();
        assert_eq!(
            fitted.results(3).unwrap_err(),
            TrackResError::PointIndexOutOfRange { index: 3, len: 3 }
        );
    }
}
