//! # Parameter scans
//!
//! Helpers for resolution studies where one setup parameter (DUT material, plane distance,
//! intrinsic resolution, …) is varied. A fresh [`Telescope`] is assembled for each value
//! of the parameter, and the resulting points can be persisted as CSV.
//!
//! ```rust
//! use trackres::plane::Plane;
//! use trackres::scan::{linear_steps, scan_resolution};
//! use trackres::telescope::Telescope;
//!
//! let points = scan_resolution(linear_steps(20.0, 60.0, 20.0), 1, |distance| {
//!     let planes = [0.0, distance, 2.0 * distance]
//!         .into_iter()
//!         .map(|z| Plane::active(z, 1e-3, 5e-3));
//!     Telescope::new(planes, 5.0)
//! })
//! .unwrap();
//! assert_eq!(points.len(), 2);
//! ```
use std::{fs::File, io, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    telescope::{ResolutionQuery, Telescope},
    trackres_errors::TrackResError,
};

/// One point of a scan: the varied parameter and the resolution obtained on both axes.
///
/// The unit of the resolutions depends on the scan: µm for [`scan_resolution`], µrad for
/// [`scan_kink_resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    pub parameter: f64,
    pub resolution_x: f64,
    pub resolution_y: f64,
}

/// Values `start, start + step, …` strictly below `stop`.
///
/// Each value is computed as `start + i * step`, so rounding errors do not accumulate along
/// the range. Yields nothing if `step` is not finite and strictly positive.
pub fn linear_steps(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> {
    let valid = step.is_finite() && step > 0.0 && start.is_finite();
    (0_u64..)
        .map(move |i| start + i as f64 * step)
        .take_while(move |value| valid && *value < stop)
}

fn scan_with<B, Q>(
    values: impl IntoIterator<Item = f64>,
    plane: usize,
    mut build: B,
    query: Q,
) -> Result<Vec<ScanPoint>, TrackResError>
where
    B: FnMut(f64) -> Result<Telescope, TrackResError>,
    Q: Fn(&Telescope, usize) -> Result<(f64, f64), TrackResError>,
{
    values
        .into_iter()
        .map(|parameter| {
            let telescope = build(parameter)?;
            let (resolution_x, resolution_y) = query(&telescope, plane)?;
            debug!("Scan point {parameter}: ({resolution_x}, {resolution_y})");
            Ok(ScanPoint {
                parameter,
                resolution_x,
                resolution_y,
            })
        })
        .collect()
}

/// Position resolution (µm) at `plane` for each parameter value.
///
/// Arguments
/// -----------------
/// * `values`: The parameter values to scan.
/// * `plane`: Index of the queried plane in the sorted planes of each telescope.
/// * `build`: Assembles the telescope of one parameter value.
///
/// Return
/// ----------
/// * One [`ScanPoint`] per value, in the order of `values`.
/// * The first assembly or query error aborts the scan.
pub fn scan_resolution<B>(
    values: impl IntoIterator<Item = f64>,
    plane: usize,
    build: B,
) -> Result<Vec<ScanPoint>, TrackResError>
where
    B: FnMut(f64) -> Result<Telescope, TrackResError>,
{
    scan_with(values, plane, build, Telescope::full_resolution)
}

/// Net kink resolution (µrad) of the unknown scatterer for each parameter value.
///
/// Every built telescope must contain an unknown scatterer, see
/// [`ResolutionQuery::kink_resolutions`].
pub fn scan_kink_resolution<B>(
    values: impl IntoIterator<Item = f64>,
    plane: usize,
    build: B,
) -> Result<Vec<ScanPoint>, TrackResError>
where
    B: FnMut(f64) -> Result<Telescope, TrackResError>,
{
    scan_with(values, plane, build, |telescope, plane| {
        ResolutionQuery::new(telescope).kink_resolutions(plane)
    })
}

/// Write scan points as CSV, with a `parameter,resolution_x,resolution_y` header.
pub fn write_scan_csv<W: io::Write>(points: &[ScanPoint], writer: W) -> Result<(), TrackResError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in points {
        csv_writer.serialize(point)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write scan points to a CSV file, replacing it if it exists.
pub fn save_scan_csv(points: &[ScanPoint], path: impl AsRef<Path>) -> Result<(), TrackResError> {
    let file = File::create(path)?;
    write_scan_csv(points, file)
}

/// Read scan points written by [`write_scan_csv`].
pub fn read_scan_csv<R: io::Read>(reader: R) -> Result<Vec<ScanPoint>, TrackResError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let points = csv_reader
        .deserialize::<ScanPoint>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(points)
}

#[cfg(test)]
mod scan_test {
    use super::*;
    use crate::plane::Plane;

    fn three_planes(distance: f64) -> Result<Telescope, TrackResError> {
        let planes = [0.0, distance, 2.0 * distance]
            .into_iter()
            .map(|z| Plane::active(z, 1e-3, 5e-3));
        Telescope::new(planes, 5.0)
    }

    #[test]
    fn test_linear_steps() {
        let steps: Vec<f64> = linear_steps(0.0, 0.5, 0.1).collect();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[3], 0.1 * 3.0);

        assert_eq!(linear_steps(10.0, 30.0, 10.0).collect::<Vec<_>>(), vec![10.0, 20.0]);
        assert_eq!(linear_steps(0.0, 1.0, 0.0).count(), 0);
        assert_eq!(linear_steps(0.0, 1.0, -0.1).count(), 0);
        assert_eq!(linear_steps(1.0, 0.0, 0.1).count(), 0);
    }

    #[test]
    fn test_scan_resolution() {
        let points = scan_resolution([20.0, 40.0, 80.0], 1, three_planes).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].parameter, 40.0);
        for point in &points {
            assert!(point.resolution_x > 0.0 && point.resolution_x < 5.0);
        }
        // more air and lever arm between the planes degrades the middle plane
        assert!(points[2].resolution_x > points[0].resolution_x);
    }

    #[test]
    fn test_scan_aborts_on_error() {
        let result = scan_resolution([20.0, 40.0], 5, three_planes);
        assert_eq!(
            result,
            Err(TrackResError::PlaneIndexOutOfRange { index: 5, len: 3 })
        );
        assert_eq!(
            scan_kink_resolution([20.0], 1, three_planes),
            Err(TrackResError::NoUnknownScatterer)
        );
    }

    #[test]
    fn test_csv_output() {
        let points = vec![
            ScanPoint {
                parameter: 1.5,
                resolution_x: 3.25,
                resolution_y: 3.5,
            },
            ScanPoint {
                parameter: 2.0,
                resolution_x: 4.0,
                resolution_y: 4.25,
            },
        ];
        let mut buffer = Vec::new();
        write_scan_csv(&points, &mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(
            text,
            "parameter,resolution_x,resolution_y\n1.5,3.25,3.5\n2.0,4.0,4.25\n"
        );
        assert_eq!(read_scan_csv(buffer.as_slice()).unwrap(), points);
    }
}
