//! # Foundation Analyzer
//!
//! Sizes a single spread footing from the aggregate structural results and
//! checks bearing, overturning and sliding.
//!
//! ## Method
//!
//! - Vertical load `P = 1.5 × total weight`
//! - Required area `A = P / q_allow`, aspect ratio 1.5:
//!   `length = √(1.5·A)`, `width = A / length`
//! - Thickness `max(12 in, frost depth / 3)`, rounded up to a whole inch
//! - Minimum steel `As = 0.0018·b·h` each way (ACI 318-19 Table 24.4.3.2)
//!   with #5 bars
//! - Overturning factor `(P·width/2) / M`, sliding factor `P·tan(φ) / H`
//! - `utilization = max(q/q_allow, 1/FS_ot, 1/FS_sl)`, passes at ≤ 1.0
//!
//! Pure: the same aggregate always yields the same footing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::StructuralAnalysis;
use crate::errors::{AnalysisError, AnalysisResult, Stage};
use crate::loads::LoadKind;

/// Vertical load amplification over the frame weight
pub const VERTICAL_LOAD_FACTOR: f64 = 1.5;

/// Footing length / width
pub const FOOTING_ASPECT_RATIO: f64 = 1.5;

/// Minimum footing thickness (in)
pub const MIN_FOOTING_THICKNESS_IN: f64 = 12.0;

/// Dead load factor resisting uplift (0.9D + 1.0W)
pub const UPLIFT_DEAD_FACTOR: f64 = 0.9;

/// Shrinkage and temperature steel ratio
pub const MIN_STEEL_RATIO: f64 = 0.0018;

/// Area of one #5 bar (in²)
pub const NO5_BAR_AREA_IN2: f64 = 0.31;

/// Rounding slack on the utilization limit; bearing sits exactly at 1.0
/// by construction.
const UTILIZATION_TOLERANCE: f64 = 1e-9;

/// Soil parameters for the footing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoilProperties {
    /// Allowable bearing pressure (psf)
    pub allowable_bearing_psf: f64,
    /// Internal friction angle φ (degrees)
    pub friction_angle_deg: f64,
    /// Soil unit weight (pcf)
    pub unit_weight_pcf: f64,
    /// Frost penetration depth (in)
    pub frost_depth_in: f64,
}

impl Default for SoilProperties {
    /// IBC Table 1806.2 presumptive values for sandy/silty soils
    fn default() -> Self {
        SoilProperties {
            allowable_bearing_psf: 2000.0,
            friction_angle_deg: 30.0,
            unit_weight_pcf: 120.0,
            frost_depth_in: 36.0,
        }
    }
}

impl SoilProperties {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !self.allowable_bearing_psf.is_finite() || self.allowable_bearing_psf <= 0.0 {
            return Err(AnalysisError::invalid_input(
                "allowable_bearing_psf",
                self.allowable_bearing_psf.to_string(),
                "Allowable bearing must be positive",
            ));
        }
        if !(self.friction_angle_deg > 0.0 && self.friction_angle_deg < 90.0) {
            return Err(AnalysisError::invalid_input(
                "friction_angle_deg",
                self.friction_angle_deg.to_string(),
                "Friction angle must be in (0, 90) degrees",
            ));
        }
        if !self.frost_depth_in.is_finite() || self.frost_depth_in < 0.0 {
            return Err(AnalysisError::invalid_input(
                "frost_depth_in",
                self.frost_depth_in.to_string(),
                "Frost depth cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Superstructure loads delivered to the footing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoundationLoads {
    pub vertical_lb: f64,
    pub horizontal_lb: f64,
    pub moment_ftlb: f64,
    /// Net wind uplift after the 0.9D counterweight, never negative
    pub uplift_lb: f64,
}

/// Bottom mat reinforcement, same each way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reinforcement {
    pub bar_size: String,
    pub required_area_in2: f64,
    pub bar_count: u32,
    pub spacing_in: f64,
}

/// Footing geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footing {
    pub length_ft: f64,
    pub width_ft: f64,
    pub area_ft2: f64,
    pub thickness_in: f64,
    pub reinforcement: Reinforcement,
}

/// Bearing and stability checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityResults {
    pub bearing_pressure_psf: f64,
    pub overturning_factor: f64,
    pub sliding_factor: f64,
    pub utilization: f64,
    pub passed: bool,
}

/// Complete foundation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundationAnalysis {
    pub soil: SoilProperties,
    pub loads: FoundationLoads,
    pub footing: Footing,
    pub stability: StabilityResults,
}

fn positive(name: &str, value: f64) -> AnalysisResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AnalysisError::domain(
            "foundation",
            None,
            Stage::Foundation,
            format!("{} must be positive, got {}", name, value),
        ))
    }
}

fn reinforcement(width_ft: f64, thickness_in: f64) -> Reinforcement {
    let width_in = width_ft * 12.0;
    let required_area_in2 = MIN_STEEL_RATIO * width_in * thickness_in;
    let bar_count = ((required_area_in2 / NO5_BAR_AREA_IN2).ceil() as u32).max(2);
    Reinforcement {
        bar_size: "#5".to_string(),
        required_area_in2,
        bar_count,
        spacing_in: width_in / bar_count as f64,
    }
}

/// Size the footing for a completed analysis.
///
/// # Errors
///
/// `ComputationDomain` when total weight, base shear or overturning moment
/// is not positive; `InvalidInput` for unusable soil properties.
pub fn analyze_foundation(
    analysis: &StructuralAnalysis,
    soil: &SoilProperties,
) -> AnalysisResult<FoundationAnalysis> {
    soil.validate()?;
    let results = &analysis.results;
    let weight = positive("total weight", results.total_weight_lb)?;
    let horizontal = positive("base shear", results.base_shear_lb)?;
    let moment = positive("overturning moment", results.overturning_moment_ftlb)?;

    let vertical = weight * VERTICAL_LOAD_FACTOR;
    let wind_psf = analysis.load_magnitude(LoadKind::Wind);
    let plan_area = analysis
        .load_conditions
        .iter()
        .find(|c| c.kind == LoadKind::Wind)
        .map(|c| c.area.area_ft2())
        .unwrap_or(0.0);
    let uplift = (wind_psf * plan_area - UPLIFT_DEAD_FACTOR * weight).max(0.0);

    let area = vertical / soil.allowable_bearing_psf;
    let length = (area * FOOTING_ASPECT_RATIO).sqrt();
    let width = area / length;
    let thickness = MIN_FOOTING_THICKNESS_IN.max(soil.frost_depth_in / 3.0).ceil();

    let bearing_pressure = vertical / area;
    let overturning_factor = positive("overturning factor", (vertical * width / 2.0) / moment)?;
    let sliding_factor = positive(
        "sliding factor",
        vertical * soil.friction_angle_deg.to_radians().tan() / horizontal,
    )?;

    let utilization = positive(
        "utilization",
        (bearing_pressure / soil.allowable_bearing_psf)
            .max(1.0 / overturning_factor)
            .max(1.0 / sliding_factor),
    )?;
    let passed = utilization <= 1.0 + UTILIZATION_TOLERANCE;

    debug!(
        length_ft = length,
        width_ft = width,
        utilization,
        passed,
        "footing sized"
    );

    Ok(FoundationAnalysis {
        soil: *soil,
        loads: FoundationLoads {
            vertical_lb: vertical,
            horizontal_lb: horizontal,
            moment_ftlb: moment,
            uplift_lb: uplift,
        },
        footing: Footing {
            length_ft: length,
            width_ft: width,
            area_ft2: area,
            thickness_in: thickness,
            reinforcement: reinforcement(width, thickness),
        },
        stability: StabilityResults {
            bearing_pressure_psf: bearing_pressure,
            overturning_factor,
            sliding_factor,
            utilization,
            passed,
        },
    })
}
