//! Kink resolution of a target of unknown material placed in the DATURA telescope, as a
//! function of the spacing of the downstream arm.
//!
//! ```text
//!         M26  M26  M26        DUT      M26    M26  M26
//!  -----> |    |    |          |        |      |    |
//!         |<-->|    |<-------->|<------>|      |<-->|
//!        DIST_up   DUT_DIST_up  DUT_DIST_down  DIST_down
//! ```
//!
//! 2 GeV electrons (highest rate at DESY), 10 mm target at 360 mm.
//!
//! Usage: `RUST_LOG=info cargo run --example datura_kink_scan`
use trackres::materials::{material_budget, Material};
use trackres::plane::Plane;
use trackres::scan::{linear_steps, save_scan_csv, scan_kink_resolution, scan_resolution};
use trackres::telescope::Telescope;
use trackres::trackres_errors::TrackResError;

const DIST_UP: f64 = 150.0;
const DUT_DIST_UP: f64 = 60.0;
const DUT_DIST_DOWN: f64 = 40.0;
const BEAM: f64 = 2.0;
const RESOLUTION: f64 = 3.24e-3;

fn datura(dist_down: f64) -> Result<Telescope, TrackResError> {
    let mimosa26 = material_budget(&[(Material::Silicon, 55e-3), (Material::Kapton, 50e-3)]);
    let downstream_start = 2.0 * DIST_UP + DUT_DIST_UP + DUT_DIST_DOWN;

    let upstream = (0..3).map(|i| f64::from(i) * DIST_UP);
    let downstream = (0..3).map(|i| downstream_start + f64::from(i) * dist_down);
    let mut planes: Vec<Plane> = upstream
        .chain(downstream)
        .map(|z| Plane::active(z, mimosa26, RESOLUTION))
        .collect();
    planes.push(Plane::unknown(2.0 * DIST_UP + DUT_DIST_UP, 10.0));

    Telescope::new(planes, BEAM)
}

fn main() -> Result<(), TrackResError> {
    env_logger::init();

    let spacings: Vec<f64> = linear_steps(10.0, 155.0, 10.0).collect();
    let resolution = scan_resolution(spacings.iter().copied(), 3, datura)?;
    let kink = scan_kink_resolution(spacings.iter().copied(), 3, datura)?;

    for (position, angle) in resolution.iter().zip(&kink) {
        println!(
            "Downstream spacing {:>5.1} mm: track resolution at DUT {:.3} um, kink resolution {:.1} urad",
            position.parameter, position.resolution_x, angle.resolution_x
        );
    }
    save_scan_csv(&resolution, "datura-kink-track-resolution.csv")?;
    save_scan_csv(&kink, "datura-kink-resolution.csv")?;
    Ok(())
}
