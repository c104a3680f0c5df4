//! # Material radiation lengths
//!
//! Read-only lookup of the **radiation length X0** (in mm) of the materials found in
//! beam-telescope planes and devices under test. Material thickness is turned into the
//! dimensionless **material budget** x/X0 consumed by the Highland formula.
//!
//! ## Public API
//!
//! - [`Material`] – typed enumeration of the supported materials, parsable from a name
//!   (`"Si"`, `"silicon"`, `"kapton"`, …).
//! - [`MaterialTable`] – name → X0 map, for callers that describe their setup with strings.
//! - [`material_budget`] – total x/X0 of a stack of `(Material, thickness)` layers.
//!
//! ```rust
//! use trackres::materials::{material_budget, Material};
//!
//! // MIMOSA26 sensor: 55 µm silicon plus two 25 µm Kapton foils
//! let mim26 = material_budget(&[(Material::Silicon, 55e-3), (Material::Kapton, 50e-3)]);
//! assert!((mim26 - (55e-3 / 93.65 + 50e-3 / 285.6)).abs() < 1e-15);
//! ```
//!
//! ## References
//!
//! Values follow the PDG atomic and nuclear properties tables (X0 in g/cm² divided by density).
use std::{collections::HashMap, fmt, str::FromStr};

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{MaterialBudget, Millimeter},
    trackres_errors::TrackResError,
};

/// Radiation length of dry air at normal conditions, in mm (36.66 g/cm² / 1.204e-3 g/cm³).
pub const X0_AIR: Millimeter = 304_200.0;

/// Materials with a tabulated radiation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    /// X0 Si = 21.82 / 2.33 = 9.365 cm
    Silicon,
    Diamond,
    /// X0 Al = 24.01 / 2.70 = 8.89 cm
    Aluminium,
    /// X0 Cu = 12.86 / 8.96 = 1.435 cm
    Copper,
    /// X0 Au = 6.46 / 19.32 = 0.3344 cm
    Gold,
    /// X0 Ni = 12.68 / 8.902 = 1.424 cm
    Nickel,
    Air,
    /// X0 Kapton = 40.56 / 1.42 = 28.56 cm
    Kapton,
    /// FR4 printed circuit board
    Pcb,
}

impl Material {
    /// Every tabulated material, in declaration order.
    pub const ALL: [Material; 9] = [
        Material::Silicon,
        Material::Diamond,
        Material::Aluminium,
        Material::Copper,
        Material::Gold,
        Material::Nickel,
        Material::Air,
        Material::Kapton,
        Material::Pcb,
    ];

    /// Radiation length X0 of the material, in mm.
    pub const fn radiation_length(self) -> Millimeter {
        match self {
            Material::Silicon => 93.65,
            Material::Diamond => 122.0,
            Material::Aluminium => 88.9,
            Material::Copper => 14.35,
            Material::Gold => 3.344,
            Material::Nickel => 14.24,
            Material::Air => X0_AIR,
            Material::Kapton => 285.6,
            Material::Pcb => 167.608,
        }
    }

    /// Material budget x/X0 of a layer of the given thickness (mm).
    pub fn budget(self, thickness: Millimeter) -> MaterialBudget {
        thickness / self.radiation_length()
    }

    /// Canonical lowercase name, as accepted by [`FromStr`] and [`MaterialTable`].
    pub const fn name(self) -> &'static str {
        match self {
            Material::Silicon => "silicon",
            Material::Diamond => "diamond",
            Material::Aluminium => "aluminium",
            Material::Copper => "copper",
            Material::Gold => "gold",
            Material::Nickel => "nickel",
            Material::Air => "air",
            Material::Kapton => "kapton",
            Material::Pcb => "pcb",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (X0 = {} mm)", self.name(), self.radiation_length())
    }
}

impl FromStr for Material {
    type Err = TrackResError;

    /// Parse a material from its name or element symbol, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "si" | "silicon" => Ok(Material::Silicon),
            "c" | "diamond" => Ok(Material::Diamond),
            "al" | "aluminium" | "aluminum" => Ok(Material::Aluminium),
            "cu" | "copper" => Ok(Material::Copper),
            "au" | "gold" => Ok(Material::Gold),
            "ni" | "nickel" => Ok(Material::Nickel),
            "air" => Ok(Material::Air),
            "kapton" | "polyimide" => Ok(Material::Kapton),
            "pcb" | "fr4" => Ok(Material::Pcb),
            _ => Err(TrackResError::UnknownMaterial(s.to_string())),
        }
    }
}

/// Total material budget of a stack of layers.
///
/// Arguments
/// -----------------
/// * `layers`: `(material, thickness in mm)` pairs.
///
/// Return
/// ----------
/// * The sum of `thickness / X0` over all layers.
pub fn material_budget(layers: &[(Material, Millimeter)]) -> MaterialBudget {
    layers
        .iter()
        .map(|(material, thickness)| material.budget(*thickness))
        .sum()
}

/// Read-only mapping from material name to radiation length (mm).
///
/// Names are matched case-insensitively. The [`Default`] table contains every [`Material`]
/// under its canonical name.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    entries: HashMap<String, Millimeter, RandomState>,
}

impl MaterialTable {
    /// Table of all tabulated [`Material`]s.
    pub fn standard() -> Self {
        Self::from_entries(
            Material::ALL
                .iter()
                .map(|m| (m.name().to_string(), m.radiation_length())),
        )
    }

    /// Build a table from arbitrary `(name, X0)` entries; later duplicates win.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Millimeter)>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, x0)| (name.into().to_ascii_lowercase(), x0))
            .collect();
        MaterialTable { entries }
    }

    /// Radiation length (mm) of the named material.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: Material name, case-insensitive.
    ///
    /// Return
    /// ----------
    /// * `Ok(X0)` when the material is known.
    /// * `Err(TrackResError::UnknownMaterial)` otherwise.
    pub fn radiation_length(&self, name: &str) -> Result<Millimeter, TrackResError> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| TrackResError::UnknownMaterial(name.to_string()))
    }

    /// Material budget x/X0 of a layer of the named material.
    pub fn budget(&self, name: &str, thickness: Millimeter) -> Result<MaterialBudget, TrackResError> {
        Ok(thickness / self.radiation_length(name)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Millimeter)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::standard()
    }
}
