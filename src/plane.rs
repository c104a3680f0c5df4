//! # Telescope planes
//!
//! A [`Plane`] is one z-ordered surface crossed by the particle: a physical detector layer, a
//! passive scatterer, a bookkeeping marker, or a slab of material with an unknown budget.
//!
//! ## Plane kinds
//!
//! | kind        | scatterer        | measurement | created with          |
//! |-------------|------------------|-------------|-----------------------|
//! | `Reference` | no               | no          | [`Plane::reference`]  |
//! | `Inactive`  | x/X0 known       | no          | [`Plane::inactive`]   |
//! | `Active`    | x/X0 known       | 2D          | [`Plane::active`]     |
//! | `Unknown`   | fitted (4 pars)  | no          | [`Plane::unknown`]    |
//!
//! The kinds are mutually exclusive by construction: the fields of [`Plane`] are private and
//! the only way to build one is through the four factories.
//!
//! ## Units
//!
//! Positions, sizes and resolutions are in **mm**; the material budget is the dimensionless
//! fraction x/X0.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{MaterialBudget, Millimeter},
    trackres_errors::TrackResError,
};

/// Intrinsic position resolution of a measuring plane, per transverse axis (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub x: Millimeter,
    pub y: Millimeter,
}

impl Resolution {
    pub fn new(x: Millimeter, y: Millimeter) -> Self {
        Resolution { x, y }
    }

    /// Isotropic resolution, identical on both axes.
    pub fn isotropic(value: Millimeter) -> Self {
        Resolution { x: value, y: value }
    }
}

impl From<f64> for Resolution {
    fn from(value: f64) -> Self {
        Resolution::isotropic(value)
    }
}

impl From<(f64, f64)> for Resolution {
    fn from((x, y): (f64, f64)) -> Self {
        Resolution { x, y }
    }
}

/// What a plane does to the trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaneKind {
    /// Inert marker: neither scatters nor measures.
    Reference,
    /// Passive scatterer of known material budget.
    Inactive { material_budget: MaterialBudget },
    /// Measuring plane, also a scatterer of known material budget.
    Active {
        material_budget: MaterialBudget,
        resolution: Resolution,
    },
    /// Material of unknown budget spread over `size` mm around the plane position.
    Unknown { size: Millimeter },
}

/// One surface of the telescope, located at `position` along the beam axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    position: Millimeter,
    kind: PlaneKind,
}

impl Plane {
    /// Inert reference plane, used to query the track at an arbitrary position.
    pub fn reference(position: Millimeter) -> Self {
        Plane {
            position,
            kind: PlaneKind::Reference,
        }
    }

    /// Passive scatterer with material budget `material` (x/X0).
    pub fn inactive(position: Millimeter, material: MaterialBudget) -> Self {
        Plane {
            position,
            kind: PlaneKind::Inactive {
                material_budget: material,
            },
        }
    }

    /// Measuring plane with material budget `material` and intrinsic `resolution`.
    ///
    /// `resolution` is either one value used on both axes or an `(x, y)` pair, in mm.
    ///
    /// ```rust
    /// use trackres::plane::{Plane, Resolution};
    ///
    /// let symmetric = Plane::active(0.0, 7.5e-4, 4.5e-3);
    /// let strip = Plane::active(20.0, 7.5e-4, (4.5e-3, 25e-3));
    /// assert_eq!(symmetric.resolution(), Some(Resolution::isotropic(4.5e-3)));
    /// assert_eq!(strip.resolution().unwrap().y, 25e-3);
    /// ```
    pub fn active(
        position: Millimeter,
        material: MaterialBudget,
        resolution: impl Into<Resolution>,
    ) -> Self {
        Plane {
            position,
            kind: PlaneKind::Active {
                material_budget: material,
                resolution: resolution.into(),
            },
        }
    }

    /// Scatterer of unknown material budget, extending over `size` mm around `position`.
    ///
    /// Its net kink becomes part of the fit; at most one such plane is honoured per telescope.
    /// At least two measuring planes must follow it, otherwise the kinks are unconstrained and
    /// [`crate::telescope::Telescope::with_params`] rejects the layout.
    pub fn unknown(position: Millimeter, size: Millimeter) -> Self {
        Plane {
            position,
            kind: PlaneKind::Unknown { size },
        }
    }

    pub fn position(&self) -> Millimeter {
        self.position
    }

    pub fn kind(&self) -> &PlaneKind {
        &self.kind
    }

    /// Material budget x/X0, for planes that carry a known scatterer.
    pub fn material_budget(&self) -> Option<MaterialBudget> {
        match self.kind {
            PlaneKind::Inactive { material_budget } | PlaneKind::Active { material_budget, .. } => {
                Some(material_budget)
            }
            PlaneKind::Reference | PlaneKind::Unknown { .. } => None,
        }
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match self.kind {
            PlaneKind::Active { resolution, .. } => Some(resolution),
            _ => None,
        }
    }

    /// Extent of the unknown-material region, for [`PlaneKind::Unknown`] planes.
    pub fn size(&self) -> Option<Millimeter> {
        match self.kind {
            PlaneKind::Unknown { size } => Some(size),
            _ => None,
        }
    }

    pub fn has_scatterer(&self) -> bool {
        self.material_budget().is_some()
    }

    pub fn has_measurement(&self) -> bool {
        matches!(self.kind, PlaneKind::Active { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, PlaneKind::Unknown { .. })
    }

    /// Strict less-than on position.
    pub fn is_upstream_of(&self, other: &Plane) -> bool {
        self.position < other.position
    }

    /// Total order on position, suitable for a stable sort.
    pub fn cmp_position(&self, other: &Plane) -> Ordering {
        self.position.total_cmp(&other.position)
    }

    /// Check that the plane parameters are physically meaningful.
    ///
    /// Return
    /// ----------
    /// * `Err(TrackResError::InvalidPlane)` if the position is not finite, the material budget
    ///   is negative or not finite, a resolution is not strictly positive, or the size of an
    ///   unknown scatterer is not strictly positive.
    pub fn validate(&self) -> Result<(), TrackResError> {
        if !self.position.is_finite() {
            return Err(TrackResError::InvalidPlane(format!(
                "position must be finite, got {}",
                self.position
            )));
        }
        if let Some(budget) = self.material_budget() {
            if !(budget.is_finite() && budget >= 0.0) {
                return Err(TrackResError::InvalidPlane(format!(
                    "material budget at {} mm must be finite and >= 0, got {budget}",
                    self.position
                )));
            }
        }
        if let Some(resolution) = self.resolution() {
            let positive = |v: f64| v.is_finite() && v > 0.0;
            if !(positive(resolution.x) && positive(resolution.y)) {
                return Err(TrackResError::InvalidPlane(format!(
                    "resolution at {} mm must be > 0, got ({}, {})",
                    self.position, resolution.x, resolution.y
                )));
            }
        }
        if let Some(size) = self.size() {
            if !(size.is_finite() && size > 0.0) {
                return Err(TrackResError::InvalidPlane(format!(
                    "unknown scatterer size at {} mm must be > 0, got {size}",
                    self.position
                )));
            }
        }
        Ok(())
    }
}
