//! # Site Parameters
//!
//! Location and environmental classification data supplied by the caller
//! (often geocoding-derived). Read-only for the engine.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "latitude": 40.79,
//!   "longitude": -77.86,
//!   "elevation_ft": 1150.0,
//!   "ground_snow_load_psf": 25.0,
//!   "basic_wind_speed_mph": 115.0,
//!   "seismic_design_category": "B",
//!   "exposure_category": "B",
//!   "risk_category": "II"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};

/// Site and environmental parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteParameters {
    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: f64,

    /// Site elevation above sea level (ft)
    #[serde(default)]
    pub elevation_ft: f64,

    /// Ground snow load pg (psf) per ASCE 7 Figure 7.2-1
    pub ground_snow_load_psf: f64,

    /// Basic wind speed V (mph) per ASCE 7 Figure 26.5-1
    pub basic_wind_speed_mph: f64,

    /// Seismic design category (A through F)
    #[serde(default)]
    pub seismic_design_category: Option<String>,

    /// Exposure category for terrain roughness
    #[serde(default)]
    pub exposure_category: ExposureCategory,

    /// Risk category for occupancy importance
    #[serde(default)]
    pub risk_category: RiskCategory,
}

impl SiteParameters {
    /// Validate site parameters.
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AnalysisError::invalid_input(
                "latitude",
                self.latitude.to_string(),
                "Latitude must be between -90 and 90 degrees",
            ));
        }
        if !self.ground_snow_load_psf.is_finite() || self.ground_snow_load_psf < 0.0 {
            return Err(AnalysisError::invalid_input(
                "ground_snow_load_psf",
                self.ground_snow_load_psf.to_string(),
                "Ground snow load cannot be negative",
            ));
        }
        if !self.basic_wind_speed_mph.is_finite() || self.basic_wind_speed_mph < 0.0 {
            return Err(AnalysisError::invalid_input(
                "basic_wind_speed_mph",
                self.basic_wind_speed_mph.to_string(),
                "Wind speed cannot be negative",
            ));
        }
        Ok(())
    }
}

impl Default for SiteParameters {
    fn default() -> Self {
        SiteParameters {
            latitude: 40.0,
            longitude: -90.0,
            elevation_ft: 0.0,
            ground_snow_load_psf: 25.0,
            basic_wind_speed_mph: 115.0,
            seismic_design_category: None,
            exposure_category: ExposureCategory::default(),
            risk_category: RiskCategory::default(),
        }
    }
}

/// Exposure category per ASCE 7 Section 26.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExposureCategory {
    A,
    #[default]
    B,
    C,
    D,
}

impl ExposureCategory {
    /// Snow exposure factor Ce used by the load generator.
    ///
    /// | Exposure | Ce  |
    /// |----------|-----|
    /// | A, B     | 1.0 |
    /// | C        | 1.2 |
    /// | D        | 1.3 |
    pub fn snow_exposure_factor(&self) -> f64 {
        match self {
            ExposureCategory::A | ExposureCategory::B => 1.0,
            ExposureCategory::C => 1.2,
            ExposureCategory::D => 1.3,
        }
    }
}

/// Risk category per ASCE 7 Table 1.5-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskCategory {
    I,
    #[default]
    II,
    III,
    IV,
}

impl RiskCategory {
    /// Importance factor applied to snow and wind loads.
    pub fn importance_factor(&self) -> f64 {
        match self {
            RiskCategory::I => 0.8,
            RiskCategory::II => 1.0,
            RiskCategory::III => 1.1,
            RiskCategory::IV => 1.2,
        }
    }
}
