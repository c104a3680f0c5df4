//! Points of a broken-line trajectory.
use nalgebra::{Matrix2, Matrix2xX, Matrix5, Vector2};

/// Thin scatterer attached to a point: the kink angles have mean `mean` and precision
/// (inverse variance) `precision`, per transverse axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatterer {
    pub mean: Vector2<f64>,
    pub precision: Vector2<f64>,
}

/// 2D measurement attached to a point.
///
/// `projection` maps the local offsets (x, y) of the track state onto the measurement
/// directions; `residual` is measured minus predicted position and `precision` the inverse
/// variance of each measurement direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub projection: Matrix2<f64>,
    pub residual: Vector2<f64>,
    pub precision: Vector2<f64>,
}

/// One discretized location along the trajectory.
///
/// `jacobian` transports the track state from the previous point to this one; it is ignored
/// for the first point of a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLinePoint {
    jacobian: Matrix5<f64>,
    scatterer: Option<Scatterer>,
    measurement: Option<Measurement>,
    local_derivatives: Option<Matrix2xX<f64>>,
}

impl BrokenLinePoint {
    /// Bare point reached through `jacobian`.
    pub fn new(jacobian: Matrix5<f64>) -> Self {
        BrokenLinePoint {
            jacobian,
            scatterer: None,
            measurement: None,
            local_derivatives: None,
        }
    }

    pub fn add_scatterer(&mut self, mean: Vector2<f64>, precision: Vector2<f64>) {
        self.scatterer = Some(Scatterer { mean, precision });
    }

    pub fn add_measurement(
        &mut self,
        projection: Matrix2<f64>,
        residual: Vector2<f64>,
        precision: Vector2<f64>,
    ) {
        self.measurement = Some(Measurement {
            projection,
            residual,
            precision,
        });
    }

    /// Attach the derivatives of the two measured coordinates w.r.t. the local parameters.
    pub fn set_local_derivatives(&mut self, derivatives: Matrix2xX<f64>) {
        self.local_derivatives = Some(derivatives);
    }

    pub fn jacobian(&self) -> &Matrix5<f64> {
        &self.jacobian
    }

    pub fn scatterer(&self) -> Option<&Scatterer> {
        self.scatterer.as_ref()
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    pub fn local_derivatives(&self) -> Option<&Matrix2xX<f64>> {
        self.local_derivatives.as_ref()
    }

    pub fn has_scatterer(&self) -> bool {
        self.scatterer.is_some()
    }

    pub fn has_measurement(&self) -> bool {
        self.measurement.is_some()
    }
}
