//! # Load Condition Generator
//!
//! Derives dead, live, snow, wind and equipment area loads (psf) from the
//! building geometry, the installed systems and the site parameters.
//!
//! | Load      | Formula                                              | Reference              |
//! |-----------|------------------------------------------------------|------------------------|
//! | Dead      | (frame + glazing + equipment weight) / floor area    | ASCE 7-22 Section 3.1  |
//! | Live      | 20 psf roof maintenance                              | IBC 2021 Table 1607.1  |
//! | Snow      | max(0.7·Ce·Ct·Is·pg, min(20, Is·pg))                 | ASCE 7-22 Section 7.3  |
//! | Wind      | 0.00256·V²·G·Cp·I                                    | ASCE 7-22 Chapter 26-27|
//! | Equipment | heating 2 + lighting 1 + irrigation 1 psf            | Collateral allowance   |
//!
//! Pure and deterministic: identical inputs always give identical output.
//!
//! ## Example
//!
//! ```rust
//! use analysis_core::loads::generator::snow_load_psf;
//! use analysis_core::site::{ExposureCategory, RiskCategory};
//!
//! // pf = 0.7 × 1.0 × 1.0 × 1.0 × 25 = 17.5 psf, floored at min(20, 25) = 20 psf
//! let pf = snow_load_psf(25.0, ExposureCategory::B, RiskCategory::II);
//! assert_eq!(pf, 20.0);
//! ```

use tracing::debug;

use super::{ApplicationArea, LoadCondition, LoadDirection, LoadDistribution, LoadKind, LoadUnit};
use crate::errors::AnalysisResult;
use crate::model::{GlazingType, GreenhouseModel};
use crate::site::{ExposureCategory, RiskCategory, SiteParameters};

/// Steel frame self-weight per unit floor area (psf)
pub const STEEL_FRAME_WEIGHT_PSF: f64 = 3.0;

/// Roof maintenance live load (psf), greenhouse/industrial occupancy
pub const MAINTENANCE_LIVE_LOAD_PSF: f64 = 20.0;

/// Thermal factor Ct for a heated structure
pub const SNOW_THERMAL_FACTOR: f64 = 1.0;

/// Flat roof snow load coefficient
pub const FLAT_ROOF_SNOW_COEFFICIENT: f64 = 0.7;

/// Minimum snow load cap (psf)
pub const MINIMUM_SNOW_LOAD_CAP_PSF: f64 = 20.0;

/// Velocity pressure coefficient: qz = 0.00256·V² (V in mph, qz in psf)
pub const VELOCITY_PRESSURE_COEFFICIENT: f64 = 0.00256;

/// Gust effect factor G for rigid structures
pub const GUST_FACTOR: f64 = 0.85;

/// External pressure coefficient Cp (windward wall)
pub const PRESSURE_COEFFICIENT: f64 = 0.8;

pub const HEATING_LOAD_PSF: f64 = 2.0;
pub const LIGHTING_LOAD_PSF: f64 = 1.0;
pub const IRRIGATION_LOAD_PSF: f64 = 1.0;

/// Flat-roof snow load with the minimum-load floor (psf).
///
/// ```text
/// pf = 0.7 · Ce · Ct · Is · pg
/// result = max(pf, min(20, Is · pg))
/// ```
pub fn snow_load_psf(ground_snow_psf: f64, exposure: ExposureCategory, risk: RiskCategory) -> f64 {
    let ce = exposure.snow_exposure_factor();
    let is = risk.importance_factor();
    let pf = FLAT_ROOF_SNOW_COEFFICIENT * ce * SNOW_THERMAL_FACTOR * is * ground_snow_psf;
    let minimum = MINIMUM_SNOW_LOAD_CAP_PSF.min(is * ground_snow_psf);
    pf.max(minimum)
}

/// Velocity pressure qz = 0.00256·V² (psf)
pub fn velocity_pressure_psf(wind_speed_mph: f64) -> f64 {
    VELOCITY_PRESSURE_COEFFICIENT * wind_speed_mph.powi(2)
}

/// Design wind pressure p = qz·G·Cp·I (psf)
///
/// ```rust
/// use analysis_core::loads::generator::wind_load_psf;
/// use analysis_core::site::RiskCategory;
///
/// let p = wind_load_psf(115.0, RiskCategory::II);
/// assert!((p - 23.02).abs() < 0.01);
/// ```
pub fn wind_load_psf(wind_speed_mph: f64, risk: RiskCategory) -> f64 {
    velocity_pressure_psf(wind_speed_mph) * GUST_FACTOR * PRESSURE_COEFFICIENT * risk.importance_factor()
}

/// Equipment load from installed systems (psf). Lighting is always present.
pub fn equipment_load_psf(heating: bool, irrigation: bool) -> f64 {
    let mut total = LIGHTING_LOAD_PSF;
    if heating {
        total += HEATING_LOAD_PSF;
    }
    if irrigation {
        total += IRRIGATION_LOAD_PSF;
    }
    total
}

/// Generate the full list of load conditions for one analysis run.
///
/// Fails only if the model's glazing type is unsupported; geometry is
/// expected to have passed [`GreenhouseModel::validate`].
pub fn generate_load_conditions(
    model: &GreenhouseModel,
    site: &SiteParameters,
) -> AnalysisResult<Vec<LoadCondition>> {
    let glazing: GlazingType = model.glazing_type.parse()?;
    let dims = &model.dimensions;
    let floor_area = model.floor_area_ft2();
    let area = ApplicationArea::full(dims.length_ft, dims.width_ft);
    let importance = site.risk_category.importance_factor();

    let mut conditions = Vec::with_capacity(5);

    // Dead
    let structure_weight = floor_area * STEEL_FRAME_WEIGHT_PSF;
    let glazed_area = dims.roof_area_ft2() + dims.wall_area_ft2();
    let glazing_weight = glazed_area * glazing.weight_psf();
    let equipment_weight = model.equipment_weight_lb;
    let dead = (structure_weight + glazing_weight + equipment_weight) / floor_area;
    conditions.push(LoadCondition {
        kind: LoadKind::Dead,
        magnitude: dead,
        unit: LoadUnit::Psf,
        direction: LoadDirection::Gravity,
        distribution: LoadDistribution::Uniform,
        area,
        load_factor: 1.0,
        importance_factor: 1.0,
        duration_factor: LoadKind::Dead.duration_factor(),
        code_reference: "ASCE 7-22 Section 3.1".to_string(),
        calculation: format!(
            "D = (frame {:.0} lb + glazing {:.0} lb [{:.0} ft² x {:.1} psf] + equipment {:.0} lb) / {:.0} ft² = {:.2} psf",
            structure_weight,
            glazing_weight,
            glazed_area,
            glazing.weight_psf(),
            equipment_weight,
            floor_area,
            dead
        ),
    });

    // Live
    conditions.push(LoadCondition {
        kind: LoadKind::Live,
        magnitude: MAINTENANCE_LIVE_LOAD_PSF,
        unit: LoadUnit::Psf,
        direction: LoadDirection::Gravity,
        distribution: LoadDistribution::Uniform,
        area,
        load_factor: 1.0,
        importance_factor: 1.0,
        duration_factor: LoadKind::Live.duration_factor(),
        code_reference: "IBC 2021 Table 1607.1 (roof maintenance)".to_string(),
        calculation: format!("L = {:.1} psf maintenance load", MAINTENANCE_LIVE_LOAD_PSF),
    });

    // Snow
    let pg = site.ground_snow_load_psf;
    let ce = site.exposure_category.snow_exposure_factor();
    let pf_raw = FLAT_ROOF_SNOW_COEFFICIENT * ce * SNOW_THERMAL_FACTOR * importance * pg;
    let snow = snow_load_psf(pg, site.exposure_category, site.risk_category);
    conditions.push(LoadCondition {
        kind: LoadKind::Snow,
        magnitude: snow,
        unit: LoadUnit::Psf,
        direction: LoadDirection::Gravity,
        distribution: LoadDistribution::Uniform,
        area,
        load_factor: 1.0,
        importance_factor: importance,
        duration_factor: LoadKind::Snow.duration_factor(),
        code_reference: "ASCE 7-22 Section 7.3".to_string(),
        calculation: format!(
            "pf = 0.7 x Ce({:.2}) x Ct({:.2}) x Is({:.2}) x pg({:.1}) = {:.2} psf; min = min(20, Is x pg) = {:.2} psf; S = {:.2} psf",
            ce,
            SNOW_THERMAL_FACTOR,
            importance,
            pg,
            pf_raw,
            MINIMUM_SNOW_LOAD_CAP_PSF.min(importance * pg),
            snow
        ),
    });

    // Wind
    let v = site.basic_wind_speed_mph;
    let qz = velocity_pressure_psf(v);
    let wind = wind_load_psf(v, site.risk_category);
    conditions.push(LoadCondition {
        kind: LoadKind::Wind,
        magnitude: wind,
        unit: LoadUnit::Psf,
        direction: LoadDirection::Lateral,
        distribution: LoadDistribution::Uniform,
        area,
        load_factor: 1.0,
        importance_factor: importance,
        duration_factor: LoadKind::Wind.duration_factor(),
        code_reference: "ASCE 7-22 Chapters 26-27".to_string(),
        calculation: format!(
            "qz = 0.00256 x {:.0}² = {:.3} psf; p = qz x G({:.2}) x Cp({:.2}) x I({:.2}) = {:.2} psf",
            v, qz, GUST_FACTOR, PRESSURE_COEFFICIENT, importance, wind
        ),
    });

    // Equipment
    let equipment = equipment_load_psf(model.systems.heating, model.systems.irrigation);
    if equipment > 0.0 {
        conditions.push(LoadCondition {
            kind: LoadKind::Equipment,
            magnitude: equipment,
            unit: LoadUnit::Psf,
            direction: LoadDirection::Gravity,
            distribution: LoadDistribution::Uniform,
            area,
            load_factor: 1.0,
            importance_factor: 1.0,
            duration_factor: LoadKind::Equipment.duration_factor(),
            code_reference: "Collateral load allowance (ASCE 7-22 Section 3.1.1)".to_string(),
            calculation: format!(
                "Eq = heating {:.1} + lighting {:.1} + irrigation {:.1} = {:.1} psf",
                if model.systems.heating { HEATING_LOAD_PSF } else { 0.0 },
                LIGHTING_LOAD_PSF,
                if model.systems.irrigation { IRRIGATION_LOAD_PSF } else { 0.0 },
                equipment
            ),
        });
    }

    debug!(
        model = %model.name,
        dead, snow, wind, equipment,
        "generated load conditions"
    );

    Ok(conditions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::total_by_kind;
    use crate::model::{Dimensions, InstalledSystems};

    fn model(glazing: &str, systems: InstalledSystems) -> GreenhouseModel {
        GreenhouseModel {
            name: "Loads".to_string(),
            structure_type: "gable".to_string(),
            glazing_type: glazing.to_string(),
            dimensions: Dimensions {
                length_ft: 100.0,
                width_ft: 30.0,
                eave_height_ft: 10.0,
                ridge_height_ft: 10.0,
            },
            bay_spacing_ft: 6.0,
            frame_components: Vec::new(),
            systems,
            equipment_weight_lb: 0.0,
        }
    }

    #[test]
    fn test_snow_load_floor_governs() {
        assert_eq!(snow_load_psf(25.0, ExposureCategory::B, RiskCategory::II), 20.0);
    }

    #[test]
    fn test_snow_load_formula_governs() {
        // pf = 0.7 × 1.2 × 1.0 × 1.1 × 40 = 36.96; floor = 20
        let pf = snow_load_psf(40.0, ExposureCategory::C, RiskCategory::III);
        assert!((pf - 36.96).abs() < 1e-9);
    }

    #[test]
    fn test_snow_load_light_site() {
        // pg = 10: pf = 7.0, floor = min(20, 10) = 10
        assert_eq!(snow_load_psf(10.0, ExposureCategory::A, RiskCategory::II), 10.0);
        assert_eq!(snow_load_psf(0.0, ExposureCategory::D, RiskCategory::IV), 0.0);
    }

    #[test]
    fn test_wind_load_formula() {
        let qz = velocity_pressure_psf(115.0);
        assert!((qz - 33.856).abs() < 1e-9);
        let p = wind_load_psf(115.0, RiskCategory::II);
        assert!((p - 23.02).abs() < 0.01, "p = {}", p);
    }

    #[test]
    fn test_equipment_load() {
        assert_eq!(equipment_load_psf(true, true), 4.0);
        assert_eq!(equipment_load_psf(false, false), 1.0);
        assert_eq!(equipment_load_psf(true, false), 3.0);
    }

    #[test]
    fn test_dead_load_flat_roof_polycarbonate() {
        let m = model("polycarbonate", InstalledSystems::default());
        let loads = generate_load_conditions(&m, &SiteParameters::default()).unwrap();
        // Flat roof: roof area = floor area = 3000 ft², wall area = 2·130·10 = 2600 ft²
        // D = (3000·3 + 5600·1.2) / 3000 = 5.24 psf
        let dead = total_by_kind(&loads, LoadKind::Dead);
        assert!((dead - 5.24).abs() < 1e-9, "D = {}", dead);
    }

    #[test]
    fn test_glass_is_heavier_than_film() {
        let site = SiteParameters::default();
        let glass = generate_load_conditions(&model("tempered_glass", InstalledSystems::default()), &site).unwrap();
        let film = generate_load_conditions(&model("film", InstalledSystems::default()), &site).unwrap();
        assert!(total_by_kind(&glass, LoadKind::Dead) > total_by_kind(&film, LoadKind::Dead));
    }

    #[test]
    fn test_all_kinds_generated_with_traces() {
        let systems = InstalledSystems {
            heating: true,
            irrigation: true,
            lighting: true,
        };
        let loads = generate_load_conditions(&model("acrylic", systems), &SiteParameters::default()).unwrap();
        let kinds: Vec<LoadKind> = loads.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LoadKind::Dead, LoadKind::Live, LoadKind::Snow, LoadKind::Wind, LoadKind::Equipment]
        );
        assert!(loads.iter().all(|l| !l.calculation.is_empty() && !l.code_reference.is_empty()));
        assert_eq!(total_by_kind(&loads, LoadKind::Live), 20.0);
        assert_eq!(total_by_kind(&loads, LoadKind::Equipment), 4.0);
    }

    #[test]
    fn test_deterministic() {
        let m = model("polycarbonate", InstalledSystems::default());
        let site = SiteParameters::default();
        let a = generate_load_conditions(&m, &site).unwrap();
        let b = generate_load_conditions(&m, &site).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_glazing_rejected() {
        let m = model("bubble_wrap", InstalledSystems::default());
        assert!(generate_load_conditions(&m, &SiteParameters::default()).is_err());
    }
}
