//! Track resolution at two diamond pixel sensors inside a PSI46 telescope with a digital
//! silicon reference plane.
//!
//! Usage: `RUST_LOG=debug cargo run --example diamond_pixel`
use trackres::materials::{material_budget, Material};
use trackres::plane::Plane;
use trackres::telescope::{ResolutionQuery, Telescope};
use trackres::trackres_errors::TrackResError;

const BEAM: f64 = 0.250;
const RESOLUTION_ANALOG: f64 = 30e-3;
const RESOLUTION_DIGITAL: f64 = 30e-3;

fn main() -> Result<(), TrackResError> {
    env_logger::init();

    let analog_plane = material_budget(&[
        (Material::Silicon, 285e-3),
        (Material::Silicon, 500e-3),
        (Material::Pcb, 700e-3),
    ]);
    let diamond_plane = material_budget(&[
        (Material::Gold, 40e-3),
        (Material::Pcb, 1550e-3),
        (Material::Gold, 40e-3),
        (Material::Silicon, 700e-3),
        (Material::Diamond, 500e-3),
        (Material::Gold, 10e-3),
    ]);
    let digital_plane = material_budget(&[
        (Material::Pcb, 1550e-3),
        (Material::Silicon, 700e-3),
        (Material::Silicon, 285e-3),
    ]);

    let planes = vec![
        Plane::active(0.0, analog_plane, RESOLUTION_ANALOG),
        Plane::active(20.32, analog_plane, RESOLUTION_ANALOG),
        Plane::inactive(60.96, diamond_plane),
        Plane::inactive(81.28, diamond_plane),
        Plane::active(101.6, digital_plane, RESOLUTION_DIGITAL),
        Plane::active(142.24, analog_plane, RESOLUTION_ANALOG),
        Plane::active(162.56, analog_plane, RESOLUTION_ANALOG),
    ];

    let telescope = Telescope::new(planes, BEAM)?;
    println!("{telescope:#}");

    let query = ResolutionQuery::new(&telescope);
    println!("Fit: {}", query.fit_summary()?);
    for (name, plane) in [("Diamond 1", 2), ("Diamond 2", 3)] {
        let (x, y) = query.full_resolution(plane)?;
        let (slope_x, slope_y) = query.angular_resolution(plane)?;
        println!(
            "Track resolution at {name}: ({x:.3}, {y:.3}) um, angular ({slope_x:.1}, {slope_y:.1}) urad"
        );
    }
    Ok(())
}
