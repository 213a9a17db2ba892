//! LRFD Load Combinations
//!
//! A fixed, code-versioned table of factored combinations (ASCE 7-22
//! Section 2.3.1, reduced to the load kinds a greenhouse frame carries).
//! Pure data: the member analysis applies the factors.
//!
//! | Name   | Equation     | Purpose                   |
//! |--------|--------------|---------------------------|
//! | LRFD-1 | 1.4D         | Dead only                 |
//! | LRFD-2 | 1.2D + 1.6L  | Maintenance live          |
//! | LRFD-3 | 1.2D + 1.6S  | Snow                      |
//! | LRFD-4 | 1.2D + 1.0W  | Wind with gravity         |
//! | LRFD-5 | 0.9D + 1.0W  | Stability / overturning   |
//!
//! Equipment (collateral) load rides with the dead factor in every entry.
//!
//! Only the "LRFD" table exists; [`combinations_for_code`] is the extension
//! point for further codes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{LoadCondition, LoadKind};
use crate::errors::{AnalysisError, AnalysisResult};

/// A load combination with factors for each load kind.
///
/// # Example
/// ```
/// use analysis_core::loads::{LoadCombination, LoadKind};
///
/// let combo = LoadCombination::new("LRFD-2", "1.2D + 1.6L")
///     .with_factor(LoadKind::Dead, 1.2)
///     .with_factor(LoadKind::Live, 1.6);
///
/// assert_eq!(combo.get_factor(LoadKind::Live), 1.6);
/// assert_eq!(combo.get_factor(LoadKind::Snow), 0.0);
/// assert!(!combo.governing);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination identifier (e.g., "LRFD-2")
    pub name: String,

    /// Human-readable equation (e.g., "1.2D + 1.6L")
    pub equation: String,

    /// Load factors keyed by load kind
    pub factors: HashMap<LoadKind, f64>,

    /// Set after analysis on the combination that controls the design
    #[serde(default)]
    pub governing: bool,
}

impl LoadCombination {
    /// Create a new load combination
    pub fn new(name: impl Into<String>, equation: impl Into<String>) -> Self {
        LoadCombination {
            name: name.into(),
            equation: equation.into(),
            factors: HashMap::new(),
            governing: false,
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, kind: LoadKind, factor: f64) -> Self {
        self.factors.insert(kind, factor);
        self
    }

    /// Get the factor for a specific load kind (0.0 if not in combination)
    pub fn get_factor(&self, kind: LoadKind) -> f64 {
        self.factors.get(&kind).copied().unwrap_or(0.0)
    }

    /// Factored area load (psf) from the generated load conditions.
    ///
    /// Kinds without a factor contribute nothing.
    pub fn factored_pressure_psf(&self, conditions: &[LoadCondition]) -> f64 {
        conditions
            .iter()
            .map(|c| self.get_factor(c.kind) * c.magnitude)
            .sum()
    }

    /// Display label used as the controlling-load text: "LRFD-2: 1.2D + 1.6L"
    pub fn label(&self) -> String {
        format!("{}: {}", self.name, self.equation)
    }
}

/// ASCE 7-22 LRFD combinations (Section 2.3.1)
///
/// # Example
/// ```
/// use analysis_core::loads::{lrfd_combinations, LoadKind};
///
/// let combos = lrfd_combinations();
/// assert_eq!(combos.len(), 5);
/// assert_eq!(combos[4].get_factor(LoadKind::Dead), 0.9);
/// ```
pub fn lrfd_combinations() -> Vec<LoadCombination> {
    vec![
        // 1. 1.4D
        LoadCombination::new("LRFD-1", "1.4D")
            .with_factor(LoadKind::Dead, 1.4)
            .with_factor(LoadKind::Equipment, 1.4),

        // 2. 1.2D + 1.6L
        LoadCombination::new("LRFD-2", "1.2D + 1.6L")
            .with_factor(LoadKind::Dead, 1.2)
            .with_factor(LoadKind::Equipment, 1.2)
            .with_factor(LoadKind::Live, 1.6),

        // 3. 1.2D + 1.6S
        LoadCombination::new("LRFD-3", "1.2D + 1.6S")
            .with_factor(LoadKind::Dead, 1.2)
            .with_factor(LoadKind::Equipment, 1.2)
            .with_factor(LoadKind::Snow, 1.6),

        // 4. 1.2D + 1.0W
        LoadCombination::new("LRFD-4", "1.2D + 1.0W")
            .with_factor(LoadKind::Dead, 1.2)
            .with_factor(LoadKind::Equipment, 1.2)
            .with_factor(LoadKind::Wind, 1.0),

        // 5. 0.9D + 1.0W (stability checks)
        LoadCombination::new("LRFD-5", "0.9D + 1.0W")
            .with_factor(LoadKind::Dead, 0.9)
            .with_factor(LoadKind::Equipment, 0.9)
            .with_factor(LoadKind::Wind, 1.0),
    ]
}

/// Select the combination table for a building code.
pub fn combinations_for_code(building_code: &str) -> AnalysisResult<Vec<LoadCombination>> {
    match building_code.trim().to_uppercase().as_str() {
        "LRFD" => Ok(lrfd_combinations()),
        _ => Err(AnalysisError::unsupported(
            "building_code",
            building_code,
            "Only the LRFD combination table is defined",
        )),
    }
}
