//! # Broken-line trajectories
//!
//! The boundary between the telescope model and the least-squares trajectory solver.
//!
//! A trajectory is an ordered slice of [`BrokenLinePoint`]s. Each point carries the Jacobian
//! transporting the 5-parameter local track state `(q/p, x', y', x, y)` from the previous
//! point, and optionally a thin [`Scatterer`], a 2D [`Measurement`], and a block of local
//! derivatives tying the measurement to extra fit parameters.
//!
//! ## Solver contract
//!
//! A [`TrajectorySolver`] consumes the points plus the number of local (extra) parameters and
//! returns a [`FittedTrajectory`]:
//!
//! * [`FittedTrajectory::summary`] – χ², degrees of freedom and lost weight of the fit,
//! * [`FittedTrajectory::results`] – correction vector and covariance matrix at a point, of
//!   dimension `5 + n_local` (track state first, local parameters after).
//!
//! The solver is treated as a pure function of its input: fitting the same points twice
//! gives identical results.
//!
//! [`DenseBrokenLineFit`] is the reference implementation shipped with the crate.
use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::trackres_errors::TrackResError;

pub mod dense_fit;
pub mod point;

pub use dense_fit::{DenseBrokenLineFit, DenseFittedTrajectory};
pub use point::{BrokenLinePoint, Measurement, Scatterer};

/// Goodness-of-fit diagnostics of a trajectory fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub chi2: f64,
    pub ndf: i64,
    pub lost_weight: f64,
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chi2={}, Ndf={}, lostWeight={}",
            self.chi2, self.ndf, self.lost_weight
        )
    }
}

/// Fit result at one point of the trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct PointResult {
    /// Correction to the track state, followed by the local parameters.
    pub correction: DVector<f64>,
    /// Symmetric covariance of `correction`.
    pub covariance: DMatrix<f64>,
}

/// Least-squares fitter of broken-line trajectories.
pub trait TrajectorySolver {
    type Fitted: FittedTrajectory;

    /// Fit the trajectory made of `points`, declaring `n_local` extra parameters.
    fn fit(&self, points: &[BrokenLinePoint], n_local: usize)
        -> Result<Self::Fitted, TrackResError>;
}

/// Outcome of [`TrajectorySolver::fit`].
pub trait FittedTrajectory {
    fn summary(&self) -> FitSummary;

    /// Correction and covariance at the point with index `point`.
    fn results(&self, point: usize) -> Result<PointResult, TrackResError>;
}
