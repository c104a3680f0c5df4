use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackResError {
    #[error("Cannot assemble a telescope from an empty plane set")]
    EmptyPlaneSet,

    #[error("Plane index {index} is out of range (telescope has {len} labelled planes)")]
    PlaneIndexOutOfRange { index: usize, len: usize },

    #[error("Point index {index} is out of range (trajectory has {len} points)")]
    PointIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid plane: {0}")]
    InvalidPlane(String),

    #[error("Invalid telescope parameter: {0}")]
    InvalidTelescopeParameter(String),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("No unknown scatterer has been declared in this telescope")]
    NoUnknownScatterer,

    #[error("Unknown scatterer at {position} mm needs at least 2 measuring planes downstream, found {measured_downstream}")]
    UnconstrainedUnknownScatterer {
        position: f64,
        measured_downstream: usize,
    },

    #[error("Negative radiation length fraction: x/X0 = {0}")]
    NegativeRadiationLength(f64),

    #[error("Total material budget must be finite and strictly positive, got x/X0 = {0}")]
    NonPositiveTotalMaterial(f64),

    #[error("Beam energy must be finite and strictly positive, got {0} GeV")]
    NonPositiveBeamEnergy(f64),

    #[error("Scattering angle is not finite and strictly positive: theta0 = {0}")]
    DegenerateScatteringAngle(f64),

    #[error("Cannot fit an empty trajectory")]
    EmptyTrajectory,

    #[error("Invalid broken-line point {index}: {reason}")]
    InvalidPoint { index: usize, reason: String },

    #[error("Point {index} carries {found} local derivatives, trajectory declares {expected}")]
    LocalDerivativeMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Normal matrix of the trajectory fit is singular; the track is not constrained")]
    SingularFitMatrix,

    #[error("Degenerate covariance: {0}")]
    DegenerateCovariance(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to write CSV output: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for TrackResError {
    fn eq(&self, other: &Self) -> bool {
        use TrackResError::*;
        match (self, other) {
            (
                PlaneIndexOutOfRange { index: a, len: la },
                PlaneIndexOutOfRange { index: b, len: lb },
            ) => a == b && la == lb,
            (
                PointIndexOutOfRange { index: a, len: la },
                PointIndexOutOfRange { index: b, len: lb },
            ) => a == b && la == lb,
            (InvalidPlane(a), InvalidPlane(b)) => a == b,
            (InvalidTelescopeParameter(a), InvalidTelescopeParameter(b)) => a == b,
            (UnknownMaterial(a), UnknownMaterial(b)) => a == b,
            (NegativeRadiationLength(a), NegativeRadiationLength(b)) => a == b,
            (NonPositiveTotalMaterial(a), NonPositiveTotalMaterial(b)) => a == b,
            (NonPositiveBeamEnergy(a), NonPositiveBeamEnergy(b)) => a == b,
            (DegenerateScatteringAngle(a), DegenerateScatteringAngle(b)) => a == b,
            (
                InvalidPoint {
                    index: a,
                    reason: ra,
                },
                InvalidPoint {
                    index: b,
                    reason: rb,
                },
            ) => a == b && ra == rb,
            (
                LocalDerivativeMismatch {
                    index: a,
                    expected: ea,
                    found: fa,
                },
                LocalDerivativeMismatch {
                    index: b,
                    expected: eb,
                    found: fb,
                },
            ) => a == b && ea == eb && fa == fb,
            (
                UnconstrainedUnknownScatterer {
                    position: a,
                    measured_downstream: ma,
                },
                UnconstrainedUnknownScatterer {
                    position: b,
                    measured_downstream: mb,
                },
            ) => a == b && ma == mb,
            (DegenerateCovariance(a), DegenerateCovariance(b)) => a == b,

            // Foreign errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (EmptyPlaneSet, EmptyPlaneSet) => true,
            (NoUnknownScatterer, NoUnknownScatterer) => true,
            (EmptyTrajectory, EmptyTrajectory) => true,
            (SingularFitMatrix, SingularFitMatrix) => true,

            _ => false,
        }
    }
}
