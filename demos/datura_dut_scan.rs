//! Track resolution at the DUT of the DATURA telescope (DESY TB21) as a function of the DUT
//! material budget.
//!
//! Six MIMOSA26 planes in two arms of three, 20 mm apart, with the DUT 20 mm from each arm.
//! 5 GeV electrons, planes in air.
//!
//! ```text
//! M26  M26  M26      DUT      M26  M26  M26
//!  |    |    |        |        |    |    |
//!  |<-->|    |<------>|<------>|    |    |
//!   DIST      DUT_DIST DUT_DIST
//! ```
//!
//! Usage: `RUST_LOG=info cargo run --example datura_dut_scan`
use trackres::materials::{material_budget, Material};
use trackres::plane::Plane;
use trackres::scan::{linear_steps, save_scan_csv, scan_resolution};
use trackres::telescope::Telescope;
use trackres::trackres_errors::TrackResError;

/// MIMOSA26 sensor: 55 µm of silicon and two 25 µm Kapton foils.
fn mimosa26() -> f64 {
    material_budget(&[(Material::Silicon, 55e-3), (Material::Kapton, 50e-3)])
}

fn main() -> Result<(), TrackResError> {
    env_logger::init();

    // intrinsic resolution measured around 3.24 µm
    let resolution = 3.24e-3;
    let dist = 20.0;
    let dut_dist = 20.0;
    let beam = 5.0;

    let upstream = (0..3).map(|i| f64::from(i) * dist);
    let downstream = (0..3).map(|i| 2.0 * dist + 2.0 * dut_dist + f64::from(i) * dist);
    let datura: Vec<Plane> = upstream
        .chain(downstream)
        .map(|z| Plane::active(z, mimosa26(), resolution))
        .collect();

    let points = scan_resolution(linear_steps(0.001, 0.05, 0.0001), 3, |dut_x0| {
        let mut planes = datura.clone();
        planes.push(Plane::inactive(2.0 * dist + dut_dist, dut_x0));
        Telescope::new(planes, beam)
    })?;

    for point in &points {
        println!(
            "Track resolution at DUT with {:.4} x/X0: {:.3} um",
            point.parameter, point.resolution_x
        );
    }
    save_scan_csv(&points, "datura-resolution.csv")?;
    Ok(())
}
