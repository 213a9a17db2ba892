//! Load conditions and load combinations per ASCE 7-22
//!
//! # Overview
//!
//! - [`LoadKind`] - Load categories (D, L, S, W, E, T, Eq)
//! - [`LoadCondition`] - One generated area load with its factors and audit trace
//! - [`generator`] - Derives the load conditions from geometry and site data
//! - [`LoadCombination`] - Code-defined factors applied to the conditions
//!
//! # Example
//!
//! ```
//! use analysis_core::loads::{combinations_for_code, LoadKind};
//!
//! let combos = combinations_for_code("LRFD").unwrap();
//! let lrfd1 = combos.iter().find(|c| c.name == "LRFD-1").unwrap();
//! assert_eq!(lrfd1.get_factor(LoadKind::Dead), 1.4);
//! ```

pub mod combinations;
pub mod generator;

pub use combinations::{combinations_for_code, lrfd_combinations, LoadCombination};
pub use generator::generate_load_conditions;

use serde::{Deserialize, Serialize};

/// Load categories carried through the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoadKind {
    /// D - Dead load (frame, glazing, hung equipment)
    Dead,
    /// L - Live load (roof maintenance)
    Live,
    /// S - Snow load
    Snow,
    /// W - Wind load
    Wind,
    /// E - Seismic load
    Seismic,
    /// T - Thermal (self-straining) load
    Thermal,
    /// Eq - Installed equipment / systems load
    Equipment,
}

impl LoadKind {
    /// All load kinds in standard order
    pub const ALL: [LoadKind; 7] = [
        LoadKind::Dead,
        LoadKind::Live,
        LoadKind::Snow,
        LoadKind::Wind,
        LoadKind::Seismic,
        LoadKind::Thermal,
        LoadKind::Equipment,
    ];

    /// Standard abbreviation code
    pub fn code(&self) -> &'static str {
        match self {
            LoadKind::Dead => "D",
            LoadKind::Live => "L",
            LoadKind::Snow => "S",
            LoadKind::Wind => "W",
            LoadKind::Seismic => "E",
            LoadKind::Thermal => "T",
            LoadKind::Equipment => "Eq",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadKind::Dead => "Dead load",
            LoadKind::Live => "Roof live load",
            LoadKind::Snow => "Snow load",
            LoadKind::Wind => "Wind load",
            LoadKind::Seismic => "Seismic load",
            LoadKind::Thermal => "Thermal load",
            LoadKind::Equipment => "Equipment load",
        }
    }

    /// Load duration factor C_D (NDS Table 2.3.2 convention)
    pub fn duration_factor(&self) -> f64 {
        match self {
            LoadKind::Dead => 0.9,
            LoadKind::Live | LoadKind::Equipment | LoadKind::Thermal => 1.0,
            LoadKind::Snow => 1.15,
            LoadKind::Wind | LoadKind::Seismic => 1.6,
        }
    }
}

impl std::fmt::Display for LoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Load magnitude unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadUnit {
    /// Pounds per square foot
    #[default]
    Psf,
    /// Pounds per linear foot
    Plf,
    /// Pounds
    Lb,
}

/// Direction in which a load acts on the structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadDirection {
    /// Downward (gravity)
    Gravity,
    /// Horizontal, toward the building
    Lateral,
    /// Upward, away from the roof
    Uplift,
}

/// Spatial distribution of a load over its application area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadDistribution {
    #[default]
    Uniform,
    Triangular,
    Point,
}

/// Rectangular plan area a load acts on (ft, origin at a building corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ApplicationArea {
    pub x_ft: f64,
    pub y_ft: f64,
    pub length_ft: f64,
    pub width_ft: f64,
}

impl ApplicationArea {
    /// Whole-building plan rectangle
    pub fn full(length_ft: f64, width_ft: f64) -> Self {
        ApplicationArea {
            x_ft: 0.0,
            y_ft: 0.0,
            length_ft,
            width_ft,
        }
    }

    pub fn area_ft2(&self) -> f64 {
        self.length_ft * self.width_ft
    }
}

/// One generated load condition. Immutable once produced by the generator.
///
/// ## JSON Example
///
/// ```json
/// {
///   "kind": "Snow",
///   "magnitude": 20.0,
///   "unit": "Psf",
///   "direction": "Gravity",
///   "distribution": "Uniform",
///   "area": { "x_ft": 0.0, "y_ft": 0.0, "length_ft": 96.0, "width_ft": 30.0 },
///   "load_factor": 1.0,
///   "importance_factor": 1.0,
///   "duration_factor": 1.15,
///   "code_reference": "ASCE 7-22 Section 7.3",
///   "calculation": "pf = 0.7 x Ce(1.00) x Ct(1.00) x Is(1.00) x pg(25.0) = 17.50 psf; ..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCondition {
    pub kind: LoadKind,
    pub magnitude: f64,
    pub unit: LoadUnit,
    pub direction: LoadDirection,
    pub distribution: LoadDistribution,
    pub area: ApplicationArea,
    pub load_factor: f64,
    pub importance_factor: f64,
    pub duration_factor: f64,
    /// Governing code section
    pub code_reference: String,
    /// Human-readable derivation of the magnitude, for auditability
    pub calculation: String,
}

/// Sum of the magnitudes of all conditions of one kind (psf).
pub fn total_by_kind(conditions: &[LoadCondition], kind: LoadKind) -> f64 {
    conditions
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.magnitude)
        .sum()
}
