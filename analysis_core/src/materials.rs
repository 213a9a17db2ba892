//! # Materials Database
//!
//! Material records keyed by id, plus the resolved [`MaterialProperties`]
//! snapshot stored on each structural member.
//!
//! Records may leave fields out; resolution falls back to standard
//! structural steel (ASTM A36) values:
//!
//! | Property            | Fallback        |
//! |---------------------|-----------------|
//! | Elastic modulus E   | 29,000,000 psi  |
//! | Shear modulus G     | 11,200,000 psi  |
//! | Yield strength Fy   | 36,000 psi      |
//! | Ultimate Fu         | 58,000 psi      |
//! | Density             | 490 pcf         |
//! | Thermal expansion   | 6.5e-6 /°F      |
//!
//! ## Example
//!
//! ```rust
//! use analysis_core::materials::{MaterialDatabase, MaterialRecord};
//!
//! let db = MaterialDatabase::new()
//!     .with_record(MaterialRecord::new("alu-6061", "Aluminum 6061-T6")
//!         .with_elastic_modulus(10_000_000.0)
//!         .with_yield_strength(35_000.0)
//!         .with_density(169.0));
//!
//! let props = db.resolve("alu-6061", "R-1").unwrap();
//! assert_eq!(props.elastic_modulus_psi, 10_000_000.0);
//! assert!(db.resolve("unobtainium", "R-1").is_err());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

pub const DEFAULT_ELASTIC_MODULUS_PSI: f64 = 29_000_000.0;
pub const DEFAULT_SHEAR_MODULUS_PSI: f64 = 11_200_000.0;
pub const DEFAULT_YIELD_STRENGTH_PSI: f64 = 36_000.0;
pub const DEFAULT_ULTIMATE_STRENGTH_PSI: f64 = 58_000.0;
pub const DEFAULT_DENSITY_PCF: f64 = 490.0;
pub const DEFAULT_THERMAL_EXPANSION_PER_F: f64 = 6.5e-6;

/// A material as stored in the material database. All properties optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub elastic_modulus_psi: Option<f64>,
    #[serde(default)]
    pub shear_modulus_psi: Option<f64>,
    #[serde(default)]
    pub yield_strength_psi: Option<f64>,
    #[serde(default)]
    pub ultimate_strength_psi: Option<f64>,
    #[serde(default)]
    pub density_pcf: Option<f64>,
    #[serde(default)]
    pub thermal_expansion_per_f: Option<f64>,
}

impl MaterialRecord {
    /// Create a record with no properties set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        MaterialRecord {
            id: id.into(),
            name: name.into(),
            elastic_modulus_psi: None,
            shear_modulus_psi: None,
            yield_strength_psi: None,
            ultimate_strength_psi: None,
            density_pcf: None,
            thermal_expansion_per_f: None,
        }
    }

    pub fn with_elastic_modulus(mut self, e_psi: f64) -> Self {
        self.elastic_modulus_psi = Some(e_psi);
        self
    }

    pub fn with_yield_strength(mut self, fy_psi: f64) -> Self {
        self.yield_strength_psi = Some(fy_psi);
        self
    }

    pub fn with_ultimate_strength(mut self, fu_psi: f64) -> Self {
        self.ultimate_strength_psi = Some(fu_psi);
        self
    }

    pub fn with_density(mut self, density_pcf: f64) -> Self {
        self.density_pcf = Some(density_pcf);
        self
    }

    /// Resolve into a complete property snapshot using steel fallbacks.
    pub fn properties(&self) -> MaterialProperties {
        MaterialProperties {
            elastic_modulus_psi: self.elastic_modulus_psi.unwrap_or(DEFAULT_ELASTIC_MODULUS_PSI),
            shear_modulus_psi: self.shear_modulus_psi.unwrap_or(DEFAULT_SHEAR_MODULUS_PSI),
            yield_strength_psi: self.yield_strength_psi.unwrap_or(DEFAULT_YIELD_STRENGTH_PSI),
            ultimate_strength_psi: self.ultimate_strength_psi.unwrap_or(DEFAULT_ULTIMATE_STRENGTH_PSI),
            density_pcf: self.density_pcf.unwrap_or(DEFAULT_DENSITY_PCF),
            thermal_expansion_per_f: self
                .thermal_expansion_per_f
                .unwrap_or(DEFAULT_THERMAL_EXPANSION_PER_F),
        }
    }
}

/// Material property snapshot carried by a structural member.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Modulus of elasticity E (psi)
    pub elastic_modulus_psi: f64,
    /// Shear modulus G (psi)
    pub shear_modulus_psi: f64,
    /// Yield strength Fy (psi)
    pub yield_strength_psi: f64,
    /// Ultimate strength Fu (psi)
    pub ultimate_strength_psi: f64,
    /// Density (pcf)
    pub density_pcf: f64,
    /// Coefficient of thermal expansion (1/°F)
    pub thermal_expansion_per_f: f64,
}

impl MaterialProperties {
    /// Check that the properties the analysis divides by are usable.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("elastic modulus", self.elastic_modulus_psi),
            ("yield strength", self.yield_strength_psi),
            ("density", self.density_pcf),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be positive, got {}", name, value));
            }
        }
        Ok(())
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        MaterialRecord::new("default", "Structural steel (A36)").properties()
    }
}

/// Material lookup by id.
///
/// Constructed once and passed into the engine through
/// [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialDatabase {
    records: HashMap<String, MaterialRecord>,
}

impl MaterialDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Common greenhouse framing materials.
    pub fn standard() -> Self {
        MaterialDatabase::new()
            .with_record(
                MaterialRecord::new("A36", "ASTM A36 structural steel")
                    .with_elastic_modulus(29_000_000.0)
                    .with_yield_strength(36_000.0)
                    .with_ultimate_strength(58_000.0)
                    .with_density(490.0),
            )
            .with_record(
                MaterialRecord::new("A992", "ASTM A992 wide flange steel")
                    .with_elastic_modulus(29_000_000.0)
                    .with_yield_strength(50_000.0)
                    .with_ultimate_strength(65_000.0)
                    .with_density(490.0),
            )
            .with_record(
                MaterialRecord::new("A500-GrB", "ASTM A500 Gr. B HSS (galvanized tube)")
                    .with_elastic_modulus(29_000_000.0)
                    .with_yield_strength(46_000.0)
                    .with_ultimate_strength(58_000.0)
                    .with_density(490.0),
            )
            .with_record(
                MaterialRecord::new("AL-6063-T6", "Aluminum 6063-T6 extrusion")
                    .with_elastic_modulus(10_000_000.0)
                    .with_yield_strength(25_000.0)
                    .with_ultimate_strength(30_000.0)
                    .with_density(169.0),
            )
    }

    /// Add a record (builder pattern)
    pub fn with_record(mut self, record: MaterialRecord) -> Self {
        self.insert(record);
        self
    }

    pub fn insert(&mut self, record: MaterialRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&MaterialRecord> {
        self.records.get(id)
    }

    /// Resolve a component's material into a property snapshot.
    ///
    /// Fails with `MaterialNotFound` naming both ids when `material_id` is unknown.
    pub fn resolve(&self, material_id: &str, component_id: &str) -> AnalysisResult<MaterialProperties> {
        self.get(material_id)
            .map(MaterialRecord::properties)
            .ok_or_else(|| AnalysisError::material_not_found(material_id, component_id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_applied() {
        let props = MaterialRecord::new("bare", "No data").properties();
        assert_eq!(props.elastic_modulus_psi, 29_000_000.0);
        assert_eq!(props.yield_strength_psi, 36_000.0);
        assert_eq!(props.density_pcf, 490.0);
    }

    #[test]
    fn test_partial_record_keeps_given_fields() {
        let props = MaterialRecord::new("hi-str", "High strength")
            .with_yield_strength(50_000.0)
            .properties();
        assert_eq!(props.yield_strength_psi, 50_000.0);
        assert_eq!(props.elastic_modulus_psi, DEFAULT_ELASTIC_MODULUS_PSI);
    }

    #[test]
    fn test_missing_material() {
        let db = MaterialDatabase::standard();
        let err = db.resolve("wood-ish", "P-4").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::material_not_found("wood-ish", "P-4")
        );
        assert!(db.resolve("A992", "P-4").is_ok());
    }

    #[test]
    fn test_database_json_is_a_plain_map() {
        let db = MaterialDatabase::new().with_record(MaterialRecord::new("A36", "Steel"));
        let json = serde_json::to_string(&db).unwrap();
        assert!(json.starts_with("{\"A36\""));
        let roundtrip: MaterialDatabase = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.len(), 1);
    }

    #[test]
    fn test_property_validation() {
        let mut props = MaterialProperties::default();
        assert!(props.validate().is_ok());
        props.elastic_modulus_psi = 0.0;
        assert!(props.validate().is_err());
    }
}
