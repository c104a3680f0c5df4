//! # Telescope assembly parameters
//!
//! [`TelescopeParams`] gathers the beam and environment settings shared by every plane of a
//! telescope: the beam energy entering the Highland formula and the radiation length of the
//! medium filling the gaps between planes.
//!
//! ```rust
//! use trackres::telescope::TelescopeParams;
//!
//! // 120 GeV pions in vacuum
//! let params = TelescopeParams::builder()
//!     .beam_energy(120.0)
//!     .vacuum()
//!     .build()
//!     .unwrap();
//! assert!(!params.has_ambient_medium());
//! ```
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{GeV, Millimeter},
    materials::X0_AIR,
    trackres_errors::TrackResError,
};

/// Beam and environment configuration of a telescope assembly.
///
/// Fields
/// -----------------
/// * `beam_energy` – particle energy in GeV, used by the Highland formula for every scatterer.
/// * `ambient_material` – radiation length (mm) of the medium surrounding the planes.
///   `0.0` selects **vacuum**: gaps are traversed without intermediate scatterers.
///
/// Defaults
/// -----------------
/// * `beam_energy`: 5.0 GeV (DESY test-beam electrons)
/// * `ambient_material`: 304200 mm (dry air)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelescopeParams {
    pub beam_energy: GeV,
    pub ambient_material: Millimeter,
}

impl TelescopeParams {
    /// Parameters for the given beam energy, surrounded by dry air.
    pub fn new(beam_energy: GeV) -> Self {
        TelescopeParams {
            beam_energy,
            ..Self::default()
        }
    }

    pub fn builder() -> TelescopeParamsBuilder {
        TelescopeParamsBuilder::new()
    }

    /// Whether the gaps between planes are filled with a scattering medium.
    pub fn has_ambient_medium(&self) -> bool {
        self.ambient_material > 0.0
    }

    /// Check the parameters, see [`TelescopeParamsBuilder::build`].
    pub fn validate(&self) -> Result<(), TrackResError> {
        if self.beam_energy.partial_cmp(&0.0) != Some(Greater) || !self.beam_energy.is_finite() {
            return Err(TrackResError::InvalidTelescopeParameter(format!(
                "beam_energy must be finite and > 0, got {}",
                self.beam_energy
            )));
        }
        if !matches!(self.ambient_material.partial_cmp(&0.0), Some(Greater) | Some(Equal))
            || !self.ambient_material.is_finite()
        {
            return Err(TrackResError::InvalidTelescopeParameter(format!(
                "ambient_material must be finite and >= 0, got {}",
                self.ambient_material
            )));
        }
        Ok(())
    }
}

impl Default for TelescopeParams {
    fn default() -> Self {
        TelescopeParams {
            beam_energy: 5.0,
            ambient_material: X0_AIR,
        }
    }
}

/// Builder for [`TelescopeParams`], with validation.
#[derive(Debug, Clone)]
pub struct TelescopeParamsBuilder {
    params: TelescopeParams,
}

impl Default for TelescopeParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelescopeParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: TelescopeParams::default(),
        }
    }

    pub fn beam_energy(mut self, v: GeV) -> Self {
        self.params.beam_energy = v;
        self
    }

    pub fn ambient_material(mut self, v: Millimeter) -> Self {
        self.params.ambient_material = v;
        self
    }

    /// Remove the ambient medium (equivalent to `ambient_material(0.0)`).
    pub fn vacuum(self) -> Self {
        self.ambient_material(0.0)
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `beam_energy` finite and `> 0`.
    /// * `ambient_material` finite and `>= 0` (`0` is vacuum).
    ///
    /// Returns
    /// -----------------
    /// * `Ok(TelescopeParams)` if all values are valid.
    /// * `Err(TrackResError::InvalidTelescopeParameter)` otherwise.
    pub fn build(self) -> Result<TelescopeParams, TrackResError> {
        self.params.validate()?;
        Ok(self.params)
    }
}

impl fmt::Display for TelescopeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Telescope Parameters")?;
            writeln!(f, "--------------------")?;
            writeln!(
                f,
                "  beam_energy      = {:.3} GeV        # Highland formula energy",
                self.beam_energy
            )?;
            if self.has_ambient_medium() {
                writeln!(
                    f,
                    "  ambient_material = {:.1} mm     # X0 of the medium between planes",
                    self.ambient_material
                )
            } else {
                writeln!(
                    f,
                    "  ambient_material = vacuum           # no scattering between planes"
                )
            }
        } else {
            write!(
                f,
                "TelescopeParams(beam_energy={:.3}GeV, ambient_material={}mm)",
                self.beam_energy, self.ambient_material
            )
        }
    }
}
