#![allow(dead_code)]

use trackres::plane::Plane;
use trackres::telescope::{Telescope, TelescopeParams};

/// 70 µm silicon pixel plane.
pub const PIXEL: f64 = 70e-3 / 93.65;
/// 700 µm silicon scatterer.
pub const SCATTERER: f64 = 700e-3 / 93.65;
/// Intrinsic pixel resolution, mm.
pub const RESOLUTION: f64 = 4.512e-3;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Six pixel planes 55 mm apart, plus `extra` planes, in this order.
pub fn six_pixel_planes(extra: impl IntoIterator<Item = Plane>) -> Vec<Plane> {
    let mut planes: Vec<Plane> = (0..6)
        .map(|i| Plane::active(55.0 * f64::from(i), PIXEL, RESOLUTION))
        .collect();
    planes.extend(extra);
    planes
}

pub fn vacuum(beam_energy: f64) -> TelescopeParams {
    TelescopeParams::builder()
        .beam_energy(beam_energy)
        .vacuum()
        .build()
        .unwrap()
}

/// Six pixel planes with the 700 µm scatterer in the middle, in vacuum.
pub fn hands_on_telescope(beam_energy: f64) -> Telescope {
    let planes = six_pixel_planes([Plane::inactive(137.5, SCATTERER)]);
    Telescope::with_params(planes, &vacuum(beam_energy)).unwrap()
}
