//! # Telescope trajectory assembly
//!
//! Turns an unordered set of [`Plane`]s into the ordered sequence of [`BrokenLinePoint`]s
//! consumed by the trajectory solver, and keeps the table mapping each plane to its point.
//!
//! ## Algorithm
//!
//! 1. **Sort** the planes by position (stable). Every distance and label below relies on it.
//! 2. **Total material budget**: sum of the plane budgets, plus `span / X0_ambient` when an
//!    ambient medium is present. It feeds the logarithmic term of the Highland formula of
//!    every scatterer.
//! 3. The **first plane** becomes the first point (no propagation).
//! 4. For each **following plane**:
//!    * with an ambient medium, the gap is split into steps of `0.21`, `0.58` and `0.21` of
//!      its length with two thin scatterers, each carrying half of the gap material
//!      (see [`crate::moment_matching`]); in vacuum the gap is a single step,
//!    * the plane point is emitted: measurement + scatterer, scatterer only, or a marker
//!      for reference planes and for the unknown scatterer,
//!    * the index of the emitted point is stored as the plane label.
//! 5. **Unknown scatterer**: once one has been crossed, every measuring plane gets a 2×4
//!    block of local derivatives w.r.t. the kinks at the two boundaries of the
//!    unknown-material region, and the parameter count grows from 5 to 9.
//!
//! At most one unknown scatterer is honoured. Later declarations (in position order) are
//! reported with a warning and removed from the assembly, so that labels and parameter
//! count are the same as without them.
//!
//! ## Example
//!
//! ```rust
//! use trackres::plane::Plane;
//! use trackres::telescope::{Telescope, TelescopeParams};
//!
//! let pixel = 70e-3 / 93.65;
//! let mut planes: Vec<Plane> = [0.0, 55.0, 110.0, 165.0, 220.0, 275.0]
//!     .into_iter()
//!     .map(|z| Plane::active(z, pixel, 4.512e-3))
//!     .collect();
//! planes.push(Plane::inactive(137.5, 700e-3 / 93.65));
//!
//! let params = TelescopeParams::builder().beam_energy(5.0).vacuum().build().unwrap();
//! let telescope = Telescope::with_params(planes, &params).unwrap();
//!
//! // the scatterer sorts between the third and fourth planes
//! let resolution = telescope.resolution(3).unwrap();
//! assert!(resolution > 1.0 && resolution < 4.512);
//! ```
use std::fmt;

use itertools::{Itertools, MinMaxResult};
use log::{debug, info, warn};
use nalgebra::{Matrix2xX, Vector2};

use crate::{
    broken_lines::BrokenLinePoint,
    constants::{GeV, MaterialBudget, Millimeter, TRACK_STATE_DIM, UNKNOWN_SCATTERER_PARAMETERS},
    moment_matching::ThickScatterer,
    plane::{Plane, PlaneKind},
    propagate::{build_marker, build_measured_point, build_point, scattering_width},
    trackres_errors::TrackResError,
};

pub mod params;
pub mod resolution;

pub use params::{TelescopeParams, TelescopeParamsBuilder};
pub use resolution::ResolutionQuery;

/// Scatterer of unknown material budget whose net kink is fitted.
///
/// The region of `size` mm centered on `position` is replaced by two kinks placed at its
/// moment-matched boundaries: kink 1 at `position + size/√12`, kink 2 at
/// `position - size/√12`. Their x and y amplitudes are the four local fit parameters, in the
/// order `(kink1 x, kink1 y, kink2 x, kink2 y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnknownScatterer {
    plane: usize,
    position: Millimeter,
    size: Millimeter,
}

impl UnknownScatterer {
    /// Index of the unknown plane in [`Telescope::planes`].
    pub fn plane(&self) -> usize {
        self.plane
    }

    pub fn position(&self) -> Millimeter {
        self.position
    }

    pub fn size(&self) -> Millimeter {
        self.size
    }

    /// Positions of kink 1 and kink 2.
    pub fn kink_positions(&self) -> [Millimeter; 2] {
        let [upstream, downstream] = ThickScatterer::centered(self.position, self.size).thin_positions();
        [downstream, upstream]
    }

    /// Derivatives of a measurement at `arc_length` w.r.t. the four kink parameters.
    ///
    /// ```text
    /// | ℓ - k1   0        ℓ - k2   0      |
    /// | 0        ℓ - k1   0        ℓ - k2 |
    /// ```
    pub fn local_derivatives(&self, arc_length: Millimeter) -> Matrix2xX<f64> {
        let [kink1, kink2] = self.kink_positions();
        let mut derivatives = Matrix2xX::zeros(UNKNOWN_SCATTERER_PARAMETERS);
        derivatives[(0, 0)] = arc_length - kink1;
        derivatives[(1, 1)] = arc_length - kink1;
        derivatives[(0, 2)] = arc_length - kink2;
        derivatives[(1, 3)] = arc_length - kink2;
        derivatives
    }
}

/// Total material budget x/X0 crossed along the planes.
///
/// Sum of the plane budgets, plus `(last - first) / ambient_material` when
/// `ambient_material > 0`. The planes do not need to be sorted.
pub fn total_material_budget(planes: &[Plane], ambient_material: Millimeter) -> MaterialBudget {
    let planes_budget: MaterialBudget = planes.iter().filter_map(Plane::material_budget).sum();
    if ambient_material <= 0.0 {
        return planes_budget;
    }

    let span = match planes.iter().map(Plane::position).minmax() {
        MinMaxResult::MinMax(first, last) => last - first,
        MinMaxResult::OneElement(_) | MinMaxResult::NoElements => 0.0,
    };
    debug!("Adding x/X0={} (ambient medium)", span / ambient_material);
    planes_budget + span / ambient_material
}

/// Keep only the most upstream unknown scatterer of sorted planes.
fn drop_extra_unknowns(planes: Vec<Plane>) -> Vec<Plane> {
    let mut accepted: Option<Millimeter> = None;
    planes
        .into_iter()
        .filter(|plane| {
            if !plane.is_unknown() {
                return true;
            }
            match accepted {
                None => {
                    accepted = Some(plane.position());
                    true
                }
                Some(first) => {
                    warn!(
                        "Ignoring unknown scatterer at {} mm: only one is supported, keeping the one at {first} mm",
                        plane.position()
                    );
                    false
                }
            }
        })
        .collect()
}

/// Reject an unknown scatterer followed by fewer than two measuring planes.
///
/// Its four kinks are only seen by the measurements downstream of it: with less than two
/// measured positions there, they cannot be separated from each other and the whole fit
/// would be singular, even at well measured upstream planes.
fn check_unknown_constraints(planes: &[Plane]) -> Result<(), TrackResError> {
    let Some(unknown) = planes.iter().position(Plane::is_unknown) else {
        return Ok(());
    };
    let measured_downstream = planes[unknown + 1..]
        .iter()
        .filter(|plane| plane.has_measurement())
        .count();
    if measured_downstream < 2 {
        return Err(TrackResError::UnconstrainedUnknownScatterer {
            position: planes[unknown].position(),
            measured_downstream,
        });
    }
    Ok(())
}

/// Mutable state of one assembly pass.
struct Assembly<'a> {
    params: &'a TelescopeParams,
    total_material: MaterialBudget,
    points: Vec<BrokenLinePoint>,
    labels: Vec<usize>,
    unknown: Option<UnknownScatterer>,
}

impl Assembly<'_> {
    /// Kink precision of a plane scatterer, `None` when it carries no material.
    fn scatterer_weight(
        &self,
        material: MaterialBudget,
    ) -> Result<Option<Vector2<f64>>, TrackResError> {
        if material == 0.0 {
            return Ok(None);
        }
        scattering_width(self.params.beam_energy, material, self.total_material).map(Some)
    }

    /// Emit the ambient-medium scatterers of `gap` and return the distance left to the plane.
    fn add_medium(&mut self, gap: ThickScatterer) -> Result<Millimeter, TrackResError> {
        if !self.params.has_ambient_medium() || gap.length() <= 0.0 {
            return Ok(gap.length());
        }

        // each thin scatterer carries half of the gap material
        let weight = scattering_width(
            self.params.beam_energy,
            0.5 * gap.length() / self.params.ambient_material,
            self.total_material,
        )?;
        let [to_first, to_second, to_plane] = gap.propagation_steps();
        let mut position = gap.start();
        for step in [to_first, to_second] {
            position += step;
            self.points.push(build_point(step, weight));
            debug!("Added medium scatterer at {position:.3} mm");
        }
        Ok(to_plane)
    }

    /// Emit the point of `plane`, reached after `ds`, and record its label.
    fn add_plane(&mut self, index: usize, plane: &Plane, ds: Millimeter) -> Result<(), TrackResError> {
        let point = match *plane.kind() {
            PlaneKind::Reference => {
                debug!("Added plane at {} mm (reference)", plane.position());
                build_marker(ds)
            }
            PlaneKind::Inactive { material_budget } => {
                debug!("Added plane at {} mm (scatterer)", plane.position());
                match self.scatterer_weight(material_budget)? {
                    Some(weight) => build_point(ds, weight),
                    None => build_marker(ds),
                }
            }
            PlaneKind::Active {
                material_budget,
                resolution,
            } => {
                debug!("Added plane at {} mm (scatterer + measurement)", plane.position());
                let weight = self.scatterer_weight(material_budget)?;
                let mut point = build_measured_point(ds, weight, resolution);
                if let Some(unknown) = &self.unknown {
                    point.set_local_derivatives(unknown.local_derivatives(plane.position()));
                }
                point
            }
            PlaneKind::Unknown { size } => {
                debug!(
                    "Added plane at {} mm (unknown scatterer, size {size} mm)",
                    plane.position()
                );
                self.unknown = Some(UnknownScatterer {
                    plane: index,
                    position: plane.position(),
                    size,
                });
                build_marker(ds)
            }
        };
        self.points.push(point);
        self.labels.push(self.points.len() - 1);
        Ok(())
    }
}

/// Broken-line model of a particle crossing a telescope.
///
/// Built once from a set of planes and immutable afterwards; a new `Telescope` is assembled
/// for every variation of the setup.
#[derive(Debug, Clone)]
pub struct Telescope {
    planes: Vec<Plane>,
    points: Vec<BrokenLinePoint>,
    labels: Vec<usize>,
    params: TelescopeParams,
    total_material: MaterialBudget,
    unknown: Option<UnknownScatterer>,
}

impl Telescope {
    /// Assemble `planes` for a beam of `beam_energy` GeV crossing dry air.
    pub fn new(
        planes: impl IntoIterator<Item = Plane>,
        beam_energy: GeV,
    ) -> Result<Self, TrackResError> {
        Self::with_params(planes, &TelescopeParams::new(beam_energy))
    }

    /// Assemble `planes` with explicit beam and medium parameters.
    ///
    /// Arguments
    /// -----------------
    /// * `planes`: The telescope planes, in any order.
    /// * `params`: Beam energy and ambient medium.
    ///
    /// Return
    /// ----------
    /// * `Ok(Telescope)` with one label per accepted plane.
    /// * `Err(TrackResError::EmptyPlaneSet)` if `planes` is empty.
    /// * `Err(TrackResError::InvalidPlane)` / `Err(InvalidTelescopeParameter)` for invalid
    ///   inputs.
    /// * `Err(TrackResError::UnconstrainedUnknownScatterer)` if the unknown scatterer is
    ///   followed by fewer than two measuring planes.
    /// * Highland precondition errors (see [`crate::propagate::highland_theta`]).
    pub fn with_params(
        planes: impl IntoIterator<Item = Plane>,
        params: &TelescopeParams,
    ) -> Result<Self, TrackResError> {
        params.validate()?;
        let mut planes: Vec<Plane> = planes.into_iter().collect();
        info!("Received {} planes.", planes.len());
        if planes.is_empty() {
            return Err(TrackResError::EmptyPlaneSet);
        }
        planes.iter().try_for_each(Plane::validate)?;

        planes.sort_by(Plane::cmp_position);
        let planes = drop_extra_unknowns(planes);
        check_unknown_constraints(&planes)?;

        let total_material = total_material_budget(&planes, params.ambient_material);
        debug!("Total track material budget x/X0={total_material}");

        let medium_points = if params.has_ambient_medium() {
            2 * (planes.len() - 1)
        } else {
            0
        };
        let mut assembly = Assembly {
            params,
            total_material,
            points: Vec::with_capacity(planes.len() + medium_points),
            labels: Vec::with_capacity(planes.len()),
            unknown: None,
        };

        assembly.add_plane(0, &planes[0], 0.0)?;
        for (index, (previous, plane)) in planes.iter().tuple_windows().enumerate() {
            let gap = plane.position() - previous.position();
            debug!("Distance to next plane: {gap}");
            let ds = assembly.add_medium(ThickScatterer::new(previous.position(), gap))?;
            assembly.add_plane(index + 1, plane, ds)?;
        }
        info!("Finished building trajectory.");

        let Assembly {
            points,
            labels,
            unknown,
            ..
        } = assembly;
        let telescope = Telescope {
            planes,
            points,
            labels,
            params: *params,
            total_material,
            unknown,
        };
        debug!("{telescope:#}");
        Ok(telescope)
    }

    /// Planes of the assembly, sorted by position, without rejected unknown scatterers.
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn points(&self) -> &[BrokenLinePoint] {
        &self.points
    }

    /// Point index of each plane, in the order of [`Telescope::planes`].
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Point index of plane `plane`.
    ///
    /// Return
    /// ----------
    /// * `Err(TrackResError::PlaneIndexOutOfRange)` if `plane` has no label.
    pub fn label(&self, plane: usize) -> Result<usize, TrackResError> {
        self.labels
            .get(plane)
            .copied()
            .ok_or(TrackResError::PlaneIndexOutOfRange {
                index: plane,
                len: self.labels.len(),
            })
    }

    /// Number of extra fit parameters (4 with an unknown scatterer, 0 otherwise).
    pub fn local_parameter_count(&self) -> usize {
        if self.unknown.is_some() {
            UNKNOWN_SCATTERER_PARAMETERS
        } else {
            0
        }
    }

    /// Dimension of the per-point fit results: 5, or 9 with an unknown scatterer.
    pub fn parameter_count(&self) -> usize {
        TRACK_STATE_DIM + self.local_parameter_count()
    }

    pub fn total_material_budget(&self) -> MaterialBudget {
        self.total_material
    }

    pub fn params(&self) -> &TelescopeParams {
        &self.params
    }

    pub fn beam_energy(&self) -> GeV {
        self.params.beam_energy
    }

    pub fn ambient_material(&self) -> Millimeter {
        self.params.ambient_material
    }

    pub fn unknown_scatterer(&self) -> Option<&UnknownScatterer> {
        self.unknown.as_ref()
    }
}

impl fmt::Display for Telescope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(
                f,
                "Telescope: {} planes, {} points, {} parameters, total x/X0 = {:.6}",
                self.planes.len(),
                self.points.len(),
                self.parameter_count(),
                self.total_material
            )?;
            for (index, (plane, label)) in self.planes.iter().zip(&self.labels).enumerate() {
                let kind = match plane.kind() {
                    PlaneKind::Reference => "reference",
                    PlaneKind::Inactive { .. } => "scatterer",
                    PlaneKind::Active { .. } => "scatterer + measurement",
                    PlaneKind::Unknown { .. } => "unknown scatterer",
                };
                writeln!(
                    f,
                    "  Plane {index} at {:.3} mm label {label} ({kind})",
                    plane.position()
                )?;
            }
            Ok(())
        } else {
            write!(
                f,
                "Telescope(planes={}, points={}, parameters={}, x/X0={:.6})",
                self.planes.len(),
                self.points.len(),
                self.parameter_count(),
                self.total_material
            )
        }
    }
}

#[cfg(test)]
mod telescope_test {
    use super::*;
    use crate::constants::{POS_X, SLOPE_X};
    use crate::materials::X0_AIR;
    use approx::assert_relative_eq;

    const PIXEL: f64 = 70e-3 / 93.65;
    const RES: f64 = 4.512e-3;

    fn vacuum(energy: f64) -> TelescopeParams {
        TelescopeParams::builder()
            .beam_energy(energy)
            .vacuum()
            .build()
            .unwrap()
    }

    fn six_planes() -> Vec<Plane> {
        [0.0, 55.0, 110.0, 165.0, 220.0, 275.0]
            .into_iter()
            .map(|z| Plane::active(z, PIXEL, RES))
            .collect()
    }

    fn step(point: &BrokenLinePoint) -> f64 {
        point.jacobian()[(POS_X, SLOPE_X)]
    }

    #[test]
    fn test_empty_plane_set() {
        assert_eq!(
            Telescope::new(Vec::new(), 5.0).unwrap_err(),
            TrackResError::EmptyPlaneSet
        );
    }

    #[test]
    fn test_vacuum_layout() {
        let mut planes = six_planes();
        planes.push(Plane::inactive(137.5, 10.0 * PIXEL));
        let telescope = Telescope::with_params(planes, &vacuum(5.0)).unwrap();

        assert_eq!(telescope.points().len(), 7);
        assert_eq!(telescope.labels(), &[0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(telescope.parameter_count(), 5);
        assert!(telescope.unknown_scatterer().is_none());

        let steps: Vec<f64> = telescope.points().iter().map(step).collect();
        assert_eq!(steps, vec![0.0, 55.0, 55.0, 27.5, 27.5, 55.0, 55.0]);

        let dut = &telescope.points()[3];
        assert!(dut.has_scatterer() && !dut.has_measurement());
        assert!(telescope.points()[4].has_measurement());
    }

    #[test]
    fn test_air_splitting() {
        let telescope = Telescope::new(six_planes(), 5.0).unwrap();
        assert_eq!(telescope.ambient_material(), X0_AIR);
        assert_eq!(telescope.points().len(), 6 + 2 * 5);
        assert_eq!(telescope.labels(), &[0, 3, 6, 9, 12, 15]);

        let steps: Vec<f64> = telescope.points()[..4].iter().map(step).collect();
        assert_relative_eq!(steps[1], 0.21 * 55.0, max_relative = 1e-12);
        assert_relative_eq!(steps[2], 0.58 * 55.0, max_relative = 1e-12);
        assert_relative_eq!(steps[3], 0.21 * 55.0, max_relative = 1e-12);

        // both medium scatterers carry half of the gap material
        let total = telescope.total_material_budget();
        let expected = scattering_width(5.0, 0.5 * 55.0 / X0_AIR, total).unwrap();
        for medium in &telescope.points()[1..3] {
            assert!(!medium.has_measurement());
            assert_relative_eq!(
                medium.scatterer().unwrap().precision,
                expected,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_sorting() {
        let mut planes = six_planes();
        planes.push(Plane::inactive(137.5, 10.0 * PIXEL));
        let sorted = Telescope::new(planes.clone(), 5.0).unwrap();
        planes.reverse();
        planes.swap(1, 4);
        let shuffled = Telescope::new(planes, 5.0).unwrap();

        assert_eq!(sorted.points(), shuffled.points());
        assert_eq!(sorted.labels(), shuffled.labels());
        assert_eq!(sorted.planes(), shuffled.planes());
        assert_eq!(sorted.planes()[3].position(), 137.5);
    }

    #[test]
    fn test_total_material_budget() {
        let mut planes = six_planes();
        planes.push(Plane::inactive(137.5, 0.01));
        planes.push(Plane::reference(300.0));
        let plane_sum = 6.0 * PIXEL + 0.01;

        assert_relative_eq!(total_material_budget(&planes, 0.0), plane_sum);
        assert_relative_eq!(
            total_material_budget(&planes, X0_AIR),
            plane_sum + 300.0 / X0_AIR,
            max_relative = 1e-14
        );
        assert_eq!(total_material_budget(&[Plane::reference(5.0)], X0_AIR), 0.0);

        let telescope = Telescope::new(planes, 5.0).unwrap();
        assert_relative_eq!(
            telescope.total_material_budget(),
            plane_sum + 300.0 / X0_AIR,
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_zero_material_planes() {
        let planes = vec![
            Plane::active(0.0, 0.0, RES),
            Plane::inactive(10.0, 0.0),
            Plane::active(20.0, PIXEL, RES),
            Plane::reference(30.0),
        ];
        let telescope = Telescope::with_params(planes, &vacuum(5.0)).unwrap();
        let points = telescope.points();
        assert!(points[0].has_measurement() && !points[0].has_scatterer());
        assert!(!points[1].has_scatterer() && !points[1].has_measurement());
        assert!(points[2].has_scatterer());
        assert!(!points[3].has_scatterer() && !points[3].has_measurement());
    }

    #[test]
    fn test_reference_planes_only() {
        let planes = vec![Plane::reference(0.0), Plane::reference(10.0)];
        let telescope = Telescope::with_params(planes, &vacuum(5.0)).unwrap();
        assert_eq!(telescope.total_material_budget(), 0.0);
        assert_eq!(telescope.points().len(), 2);
    }

    #[test]
    fn test_unknown_scatterer_derivatives() {
        let mut planes = six_planes();
        planes.push(Plane::unknown(137.5, 10.0));
        let telescope = Telescope::with_params(planes, &vacuum(5.0)).unwrap();

        assert_eq!(telescope.parameter_count(), 9);
        assert_eq!(telescope.local_parameter_count(), 4);
        assert_eq!(telescope.points().len(), 7);

        let unknown = telescope.unknown_scatterer().unwrap();
        assert_eq!(unknown.plane(), 3);
        let [kink1, kink2] = unknown.kink_positions();
        assert_relative_eq!(kink1, 137.5 + 10.0 / 12f64.sqrt(), max_relative = 1e-14);
        assert_relative_eq!(kink2, 137.5 - 10.0 / 12f64.sqrt(), max_relative = 1e-14);

        let marker = &telescope.points()[3];
        assert!(!marker.has_scatterer() && !marker.has_measurement());

        for point in &telescope.points()[..3] {
            assert!(point.local_derivatives().is_none());
        }
        let downstream = telescope.points()[4].local_derivatives().unwrap();
        assert_eq!(downstream.shape(), (2, 4));
        assert_relative_eq!(downstream[(0, 0)], 165.0 - kink1, max_relative = 1e-14);
        assert_relative_eq!(downstream[(1, 1)], 165.0 - kink1, max_relative = 1e-14);
        assert_relative_eq!(downstream[(0, 2)], 165.0 - kink2, max_relative = 1e-14);
        assert_relative_eq!(downstream[(1, 3)], 165.0 - kink2, max_relative = 1e-14);
        assert_eq!(downstream[(0, 1)], 0.0);
        assert_eq!(downstream[(1, 0)], 0.0);
    }

    #[test]
    fn test_single_unknown_rule() {
        let mut planes = six_planes();
        planes.push(Plane::unknown(137.5, 10.0));
        let single = Telescope::with_params(planes.clone(), &vacuum(5.0)).unwrap();

        planes.push(Plane::unknown(250.0, 20.0));
        let double = Telescope::with_params(planes, &vacuum(5.0)).unwrap();

        assert_eq!(single.parameter_count(), double.parameter_count());
        assert_eq!(single.labels(), double.labels());
        assert_eq!(single.points(), double.points());
        assert_eq!(double.unknown_scatterer().unwrap().position(), 137.5);
    }

    #[test]
    fn test_steps_and_derivatives_share_arc_length() {
        let mut planes = six_planes();
        planes.push(Plane::unknown(137.5, 10.0));
        let telescope = Telescope::new(planes, 5.0).unwrap();
        let [kink1, _] = telescope.unknown_scatterer().unwrap().kink_positions();

        for (plane, &label) in telescope.planes().iter().zip(telescope.labels()) {
            let travelled: f64 = telescope.points()[1..=label].iter().map(step).sum();
            assert_relative_eq!(travelled, plane.position(), epsilon = 1e-9);
            if let Some(derivatives) = telescope.points()[label].local_derivatives() {
                assert_relative_eq!(derivatives[(0, 0)], travelled - kink1, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_unknown_needs_two_measurements_downstream() {
        let planes = [0.0, 55.0, 110.0]
            .into_iter()
            .map(|z| Plane::active(z, PIXEL, RES))
            .chain([Plane::unknown(200.0, 10.0)]);
        assert_eq!(
            Telescope::with_params(planes, &vacuum(5.0)).unwrap_err(),
            TrackResError::UnconstrainedUnknownScatterer {
                position: 200.0,
                measured_downstream: 0,
            }
        );

        // an inactive plane downstream does not measure
        let planes = vec![
            Plane::active(0.0, PIXEL, RES),
            Plane::active(55.0, PIXEL, RES),
            Plane::unknown(80.0, 10.0),
            Plane::active(110.0, PIXEL, RES),
            Plane::inactive(165.0, PIXEL),
        ];
        assert_eq!(
            Telescope::with_params(planes.clone(), &vacuum(5.0)).unwrap_err(),
            TrackResError::UnconstrainedUnknownScatterer {
                position: 80.0,
                measured_downstream: 1,
            }
        );

        let mut planes = planes;
        planes.push(Plane::active(220.0, PIXEL, RES));
        assert!(Telescope::with_params(planes, &vacuum(5.0)).is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            Telescope::new(vec![Plane::inactive(0.0, -1.0)], 5.0),
            Err(TrackResError::InvalidPlane(_))
        ));
        assert!(matches!(
            Telescope::new(six_planes(), -5.0),
            Err(TrackResError::InvalidTelescopeParameter(_))
        ));
    }

    #[test]
    fn test_labels_and_display() {
        let telescope = Telescope::new(six_planes(), 5.0).unwrap();
        assert_eq!(telescope.label(5), Ok(15));
        assert_eq!(
            telescope.label(6),
            Err(TrackResError::PlaneIndexOutOfRange { index: 6, len: 6 })
        );
        assert!(telescope.to_string().starts_with("Telescope(planes=6, points=16"));
        let listing = format!("{telescope:#}");
        assert!(listing.contains("Plane 5 at 275.000 mm label 15 (scatterer + measurement)"));
    }
}
