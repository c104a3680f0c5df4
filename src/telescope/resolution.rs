//! # Resolution queries
//!
//! Hands an assembled [`Telescope`] to a [`TrajectorySolver`] and turns the covariance at a
//! plane into physical uncertainties:
//!
//! | Query                                        | Covariance entries                           | Unit |
//! |----------------------------------------------|----------------------------------------------|------|
//! | [`ResolutionQuery::full_resolution`]         | `(x, x)`, `(y, y)`                           | µm   |
//! | [`ResolutionQuery::angular_resolution`]      | `(x', x')`, `(y', y')`                       | µrad |
//! | [`ResolutionQuery::kink_resolutions`]        | `var(k1) + var(k2) + 2 cov(k1, k2)` per axis | µrad |
//!
//! Every query re-runs the fit on the immutable point sequence; nothing is cached, so the
//! same query on the same telescope always returns the same value. Negative or non-finite
//! variances are reported as [`TrackResError::DegenerateCovariance`] instead of being turned
//! into a number.
use log::debug;

use super::Telescope;
use crate::{
    broken_lines::{
        DenseBrokenLineFit, FitSummary, FittedTrajectory, PointResult, TrajectorySolver,
    },
    constants::{
        Microradian, Micrometer, MM_TO_UM, POS_X, POS_Y, RAD_TO_URAD, SLOPE_X, SLOPE_Y,
        TRACK_STATE_DIM,
    },
    trackres_errors::TrackResError,
};

/// Square root of a variance, rejecting values that are not a valid variance.
fn checked_sigma(variance: f64, what: &str) -> Result<f64, TrackResError> {
    if variance.is_finite() && variance >= 0.0 {
        Ok(variance.sqrt())
    } else {
        Err(TrackResError::DegenerateCovariance(format!(
            "{what} variance is {variance}"
        )))
    }
}

/// Uncertainty queries on one telescope, with a given solver.
#[derive(Debug, Clone)]
pub struct ResolutionQuery<'a, S: TrajectorySolver = DenseBrokenLineFit> {
    telescope: &'a Telescope,
    solver: S,
}

impl<'a> ResolutionQuery<'a> {
    /// Query `telescope` with the [`DenseBrokenLineFit`] solver.
    pub fn new(telescope: &'a Telescope) -> Self {
        Self::with_solver(telescope, DenseBrokenLineFit::default())
    }
}

impl<'a, S: TrajectorySolver> ResolutionQuery<'a, S> {
    pub fn with_solver(telescope: &'a Telescope, solver: S) -> Self {
        ResolutionQuery { telescope, solver }
    }

    pub fn telescope(&self) -> &Telescope {
        self.telescope
    }

    fn fit(&self) -> Result<S::Fitted, TrackResError> {
        let fitted = self.solver.fit(
            self.telescope.points(),
            self.telescope.local_parameter_count(),
        )?;
        debug!("Fit results: {}", fitted.summary());
        Ok(fitted)
    }

    /// Fit and return the results at the point labelled by `plane`.
    fn plane_results(&self, plane: usize) -> Result<PointResult, TrackResError> {
        let label = self.telescope.label(plane)?;
        let result = self.fit()?.results(label)?;

        let expected = self.telescope.parameter_count();
        if result.covariance.shape() != (expected, expected) {
            return Err(TrackResError::DegenerateCovariance(format!(
                "expected a {expected}x{expected} covariance, got {:?}",
                result.covariance.shape()
            )));
        }
        Ok(result)
    }

    /// χ², degrees of freedom and lost weight of the fit.
    pub fn fit_summary(&self) -> Result<FitSummary, TrackResError> {
        Ok(self.fit()?.summary())
    }

    /// Position uncertainty at `plane` on both axes.
    ///
    /// Arguments
    /// -----------------
    /// * `plane`: Index of the plane in [`Telescope::planes`].
    ///
    /// Return
    /// ----------
    /// * `Ok((σx, σy))` in µm.
    /// * `Err(TrackResError::PlaneIndexOutOfRange)` if the plane has no label.
    /// * Solver errors, and `Err(TrackResError::DegenerateCovariance)` for invalid variances.
    pub fn full_resolution(&self, plane: usize) -> Result<(Micrometer, Micrometer), TrackResError> {
        let covariance = self.plane_results(plane)?.covariance;
        Ok((
            checked_sigma(covariance[(POS_X, POS_X)], "x")? * MM_TO_UM,
            checked_sigma(covariance[(POS_Y, POS_Y)], "y")? * MM_TO_UM,
        ))
    }

    /// Position uncertainty at `plane` along x, in µm.
    pub fn resolution(&self, plane: usize) -> Result<Micrometer, TrackResError> {
        Ok(self.full_resolution(plane)?.0)
    }

    /// Slope uncertainty at `plane` on both axes, in µrad.
    pub fn angular_resolution(
        &self,
        plane: usize,
    ) -> Result<(Microradian, Microradian), TrackResError> {
        let covariance = self.plane_results(plane)?.covariance;
        Ok((
            checked_sigma(covariance[(SLOPE_X, SLOPE_X)], "x'")? * RAD_TO_URAD,
            checked_sigma(covariance[(SLOPE_Y, SLOPE_Y)], "y'")? * RAD_TO_URAD,
        ))
    }

    /// Uncertainty on the net kink of the unknown scatterer, on both axes.
    ///
    /// The net kink is the sum of the two boundary kinks, so its variance is
    /// `var(k1) + var(k2) + 2 cov(k1, k2)`. The local parameters do not depend on the point,
    /// `plane` only selects where the results are read.
    ///
    /// The kinks are seen only by the measurements downstream of the scatterer, which is why
    /// assembly requires at least two measuring planes after it.
    ///
    /// Return
    /// ----------
    /// * `Ok((σx, σy))` in µrad.
    /// * `Err(TrackResError::NoUnknownScatterer)` if the telescope has no unknown scatterer.
    pub fn kink_resolutions(
        &self,
        plane: usize,
    ) -> Result<(Microradian, Microradian), TrackResError> {
        if self.telescope.unknown_scatterer().is_none() {
            return Err(TrackResError::NoUnknownScatterer);
        }
        let covariance = self.plane_results(plane)?.covariance;

        // local parameters: (kink1 x, kink1 y, kink2 x, kink2 y)
        let net_kink = |axis: usize, what: &str| {
            let (k1, k2) = (TRACK_STATE_DIM + axis, TRACK_STATE_DIM + 2 + axis);
            let variance =
                covariance[(k1, k1)] + covariance[(k2, k2)] + 2.0 * covariance[(k1, k2)];
            checked_sigma(variance, what).map(|sigma| sigma * RAD_TO_URAD)
        };
        Ok((net_kink(0, "x kink")?, net_kink(1, "y kink")?))
    }

    /// Uncertainty on the net x kink of the unknown scatterer, in µrad.
    pub fn kink_resolution(&self, plane: usize) -> Result<Microradian, TrackResError> {
        Ok(self.kink_resolutions(plane)?.0)
    }
}

impl Telescope {
    /// Position uncertainty along x at `plane` in µm, see [`ResolutionQuery::resolution`].
    pub fn resolution(&self, plane: usize) -> Result<Micrometer, TrackResError> {
        ResolutionQuery::new(self).resolution(plane)
    }

    pub fn full_resolution(&self, plane: usize) -> Result<(Micrometer, Micrometer), TrackResError> {
        ResolutionQuery::new(self).full_resolution(plane)
    }

    pub fn angular_resolution(
        &self,
        plane: usize,
    ) -> Result<(Microradian, Microradian), TrackResError> {
        ResolutionQuery::new(self).angular_resolution(plane)
    }

    /// Net x kink uncertainty of the unknown scatterer in µrad, see
    /// [`ResolutionQuery::kink_resolutions`].
    pub fn kink_resolution(&self, plane: usize) -> Result<Microradian, TrackResError> {
        ResolutionQuery::new(self).kink_resolution(plane)
    }
}
