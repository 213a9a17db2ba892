//! # Engine Configuration
//!
//! Everything the engine would otherwise look up in module-level tables:
//! the building code, serviceability limits, the simplified global
//! constants, soil defaults, optimization thresholds, the FEA timeout and
//! the material / section databases.
//!
//! Build one [`EngineConfig`] and pass it by reference to
//! [`AnalysisEngine`](crate::engine::AnalysisEngine).
//!
//! ```rust
//! use analysis_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "limits": { "deflection_ratio": 240.0 } }"#).unwrap();
//! assert_eq!(config.limits.deflection_ratio, 240.0);
//! assert_eq!(config.building_code, "LRFD");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calculations::foundation::SoilProperties;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::materials::MaterialDatabase;
use crate::sections::SectionTable;

/// Safety factor dividing Fy for the allowable stress.
///
/// Member demand comes from LRFD-factored loads but is compared against an
/// ASD allowable (Fy / 1.67). The mix is deliberate legacy behavior; changing
/// it means changing this constant and the strength tests together.
pub const LEGACY_MIXED_SAFETY_FACTOR: f64 = 1.67;

/// Serviceability limits checked by the compliance gates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceabilityLimits {
    /// Deflection limit as a span ratio (360 → L/360)
    pub deflection_ratio: f64,
    /// Minimum first-mode member frequency (Hz)
    pub vibration_hz: f64,
    /// Story drift limit (% of height), reported only
    pub drift_percent: f64,
}

impl Default for ServiceabilityLimits {
    fn default() -> Self {
        ServiceabilityLimits {
            deflection_ratio: 360.0,
            vibration_hz: 5.0,
            drift_percent: 2.0,
        }
    }
}

/// Simplified constants used by the member analysis and global aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConstants {
    /// Fy divisor for the allowable stress
    pub safety_factor: f64,
    /// Base shear coefficient (V = Cs·W)
    pub seismic_coefficient: f64,
    /// Lever arm for the overturning moment (ft)
    pub assumed_height_ft: f64,
    /// Period coefficient in T = Ct·√h
    pub period_coefficient: f64,
    /// Gravitational acceleration (in/s²)
    pub gravity_in_s2: f64,
}

impl Default for AnalysisConstants {
    fn default() -> Self {
        AnalysisConstants {
            safety_factor: LEGACY_MIXED_SAFETY_FACTOR,
            seismic_coefficient: 0.1,
            assumed_height_ft: 20.0,
            period_coefficient: 0.1,
            gravity_in_s2: 386.1,
        }
    }
}

/// Thresholds for the optimization advisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationSettings {
    /// Members below this utilization are flagged as over-designed
    pub underutilized_threshold: f64,
    pub downsize_cost_savings: f64,
    pub downsize_weight_savings: f64,
    /// Total frame weight (lb) above which a material upgrade is suggested
    pub upgrade_weight_threshold_lb: f64,
    pub upgrade_weight_savings: f64,
    /// Steel cost used for the savings estimates ($/lb)
    pub steel_cost_per_lb: f64,
    /// Spans above this length (ft) get an intermediate-support suggestion
    pub max_span_ft: f64,
}

impl Default for OptimizationSettings {
    fn default() -> Self {
        OptimizationSettings {
            underutilized_threshold: 0.6,
            downsize_cost_savings: 0.20,
            downsize_weight_savings: 0.15,
            upgrade_weight_threshold_lb: 1000.0,
            upgrade_weight_savings: 0.15,
            steel_cost_per_lb: 2.50,
            max_span_ft: 30.0,
        }
    }
}

/// Engine configuration, constructed once per caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Load combination table name ("LRFD")
    pub building_code: String,
    pub limits: ServiceabilityLimits,
    pub constants: AnalysisConstants,
    /// Soil used when the caller does not supply site-specific values
    pub soil: SoilProperties,
    pub optimization: OptimizationSettings,
    /// Upper bound on an external FEA call (seconds)
    pub fea_timeout_secs: u64,
    pub materials: MaterialDatabase,
    pub sections: SectionTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            building_code: "LRFD".to_string(),
            limits: ServiceabilityLimits::default(),
            constants: AnalysisConstants::default(),
            soil: SoilProperties::default(),
            optimization: OptimizationSettings::default(),
            fea_timeout_secs: 300,
            materials: MaterialDatabase::standard(),
            sections: SectionTable::standard(),
        }
    }
}

impl EngineConfig {
    /// Parse a configuration; omitted fields take their defaults.
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| AnalysisError::file_error("read", path.display().to_string(), e.to_string()))?;
        let config: EngineConfig =
            serde_json::from_str(&contents).map_err(|e| AnalysisError::SerializationError {
                reason: format!("Invalid JSON in {}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every limit and constant the analysis divides by is positive.
    pub fn validate(&self) -> AnalysisResult<()> {
        let positives = [
            ("limits.deflection_ratio", self.limits.deflection_ratio),
            ("constants.safety_factor", self.constants.safety_factor),
            ("constants.gravity_in_s2", self.constants.gravity_in_s2),
            ("constants.seismic_coefficient", self.constants.seismic_coefficient),
            ("constants.assumed_height_ft", self.constants.assumed_height_ft),
            ("constants.period_coefficient", self.constants.period_coefficient),
            ("soil.allowable_bearing_psf", self.soil.allowable_bearing_psf),
        ];
        for (field, value) in positives {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if self.fea_timeout_secs == 0 {
            return Err(AnalysisError::invalid_input(
                "fea_timeout_secs",
                "0",
                "Timeout must be at least one second",
            ));
        }
        Ok(())
    }
}
