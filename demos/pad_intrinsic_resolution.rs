//! Track resolution at two diamond pad detectors as a function of the intrinsic
//! resolution of the analog pixel planes around them.
//!
//! 250 MeV pions at PSI, four PSI46 analog planes and two diamond pads.
//!
//! Usage: `RUST_LOG=info cargo run --example pad_intrinsic_resolution`
use trackres::materials::{material_budget, Material};
use trackres::plane::Plane;
use trackres::scan::{linear_steps, save_scan_csv, scan_resolution};
use trackres::telescope::Telescope;
use trackres::trackres_errors::TrackResError;

const BEAM: f64 = 0.250;

fn main() -> Result<(), TrackResError> {
    env_logger::init();

    let analog_plane = material_budget(&[
        (Material::Silicon, 285e-3),
        (Material::Silicon, 500e-3),
        (Material::Pcb, 700e-3),
    ]);
    let diamond_pad = material_budget(&[
        (Material::Aluminium, 20e-3),
        (Material::Diamond, 500e-3),
        (Material::Aluminium, 20e-3),
    ]);

    // intrinsic resolution in µm
    let build = |intrinsic: f64| {
        let resolution = intrinsic * 1e-3;
        let planes = vec![
            Plane::active(0.0, analog_plane, resolution),
            Plane::active(20.32, analog_plane, resolution),
            Plane::inactive(32.0, diamond_pad),
            Plane::inactive(51.0, diamond_pad),
            Plane::active(81.28, analog_plane, resolution),
            Plane::active(101.6, analog_plane, resolution),
        ];
        Telescope::new(planes, BEAM)
    };

    let pad1 = scan_resolution(linear_steps(5.0, 55.0, 1.0), 2, build)?;
    let pad2 = scan_resolution(linear_steps(5.0, 55.0, 1.0), 3, build)?;
    for (first, second) in pad1.iter().zip(&pad2) {
        println!(
            "Intrinsic: {} um  Track PAD1: {:.3} um  Track PAD2: {:.3} um",
            first.parameter, first.resolution_x, second.resolution_x
        );
    }

    save_scan_csv(&pad1, "pad1-vs-intrinsic-resolution.csv")?;
    save_scan_csv(&pad2, "pad2-vs-intrinsic-resolution.csv")?;
    Ok(())
}
