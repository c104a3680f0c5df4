//! Track resolution at the DUT of the DATURA telescope as a function of the distance
//! between the planes of each arm, for a thin (0.1 % X0) and a thick (1 % X0) DUT.
//!
//! Usage: `RUST_LOG=info cargo run --example datura_plane_distance`
use trackres::materials::{material_budget, Material};
use trackres::plane::Plane;
use trackres::scan::{linear_steps, save_scan_csv, scan_resolution, ScanPoint};
use trackres::telescope::Telescope;
use trackres::trackres_errors::TrackResError;

const DUT_DIST: f64 = 20.0;
const BEAM: f64 = 5.0;
const RESOLUTION: f64 = 3.25e-3;

/// DATURA with arms of three planes `dist` apart and a DUT of `dut_x0` in the middle.
fn datura(dist: f64, dut_x0: f64) -> Result<Telescope, TrackResError> {
    let mimosa26 = material_budget(&[(Material::Silicon, 50e-3), (Material::Kapton, 50e-3)]);

    let upstream = (0..3).map(|i| f64::from(i) * dist);
    let downstream = (0..3).map(|i| 2.0 * dist + 2.0 * DUT_DIST + f64::from(i) * dist);
    let mut planes: Vec<Plane> = upstream
        .chain(downstream)
        .map(|z| Plane::active(z, mimosa26, RESOLUTION))
        .collect();
    planes.push(Plane::inactive(2.0 * dist + DUT_DIST, dut_x0));

    Telescope::new(planes, BEAM)
}

fn report(points: &[ScanPoint], dut_x0: f64) {
    for point in points {
        println!(
            "Track resolution at DUT ({dut_x0} x/X0) with plane dist {} mm: {:.3} um",
            point.parameter, point.resolution_x
        );
    }
}

fn main() -> Result<(), TrackResError> {
    env_logger::init();

    for (dut_x0, output) in [
        (0.001, "datura-plane-distance-thin.csv"),
        (0.01, "datura-plane-distance-thick.csv"),
    ] {
        let points = scan_resolution(linear_steps(20.0, 151.0, 1.0), 3, |dist| {
            datura(dist, dut_x0)
        })?;
        report(&points, dut_x0);
        save_scan_csv(&points, output)?;
    }
    Ok(())
}
