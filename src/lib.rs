//! # trackres
//!
//! Track resolution estimation for beam telescopes.
//!
//! A telescope is described as a set of [`plane::Plane`]s (measuring sensors, passive
//! scatterers, markers, and at most one scatterer of unknown material). [`telescope::Telescope`]
//! assembles them into a broken-line trajectory with Highland multiple scattering in the
//! planes and in the surrounding medium; [`telescope::ResolutionQuery`] fits it and returns
//! the expected position, angle or kink resolution at any plane.
//!
//! ```rust
//! use trackres::materials::Material;
//! use trackres::plane::Plane;
//! use trackres::telescope::Telescope;
//!
//! let sensor = Material::Silicon.budget(70e-3);
//! let planes = [0.0, 20.0, 40.0, 60.0].map(|z| Plane::active(z, sensor, 5e-3));
//!
//! let telescope = Telescope::new(planes, 120.0).unwrap();
//! let (x, y) = telescope.full_resolution(1).unwrap();
//! assert!(x < 5.0 && y < 5.0);
//! ```
pub mod broken_lines;
pub mod constants;
pub mod materials;
pub mod moment_matching;
pub mod plane;
pub mod propagate;
pub mod scan;
pub mod telescope;
pub mod trackres_errors;
