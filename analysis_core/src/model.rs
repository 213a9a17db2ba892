//! # Building Model
//!
//! The read-only geometry/material description handed to the engine by the
//! model-authoring side. Structure and glazing types arrive as free text and
//! are parsed here so that an unknown value becomes a typed
//! [`AnalysisError::UnsupportedModelConfiguration`] instead of a parse failure.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "House 3",
//!   "structure_type": "gable",
//!   "glazing_type": "polycarbonate",
//!   "dimensions": { "length_ft": 96.0, "width_ft": 30.0, "eave_height_ft": 10.0, "ridge_height_ft": 16.0 },
//!   "bay_spacing_ft": 6.0,
//!   "systems": { "heating": true, "irrigation": true, "lighting": true },
//!   "frame_components": [
//!     {
//!       "id": "P-1",
//!       "name": "Corner post",
//!       "role": "Column",
//!       "start": { "x": 0.0, "y": 0.0, "z": 0.0 },
//!       "end": { "x": 0.0, "y": 0.0, "z": 10.0 },
//!       "width_in": 4.0,
//!       "height_in": 4.0,
//!       "material_id": "A500-GrB"
//!     }
//!   ]
//! }
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::members::{EndConditions, MemberRole};

/// Parametric greenhouse / light-industrial building description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreenhouseModel {
    /// User label for the building
    pub name: String,

    /// Structure type text (e.g., "gable", "quonset", "venlo")
    pub structure_type: String,

    /// Glazing type text (e.g., "polycarbonate", "tempered_glass")
    pub glazing_type: String,

    /// Overall building dimensions
    pub dimensions: Dimensions,

    /// Frame spacing along the length (ft); default tributary width for members
    pub bay_spacing_ft: f64,

    /// Frame members (posts, beams, trusses, purlins, ...)
    #[serde(default)]
    pub frame_components: Vec<FrameComponent>,

    /// Installed building systems
    #[serde(default)]
    pub systems: InstalledSystems,

    /// Hung equipment weight carried by the frame (lb)
    #[serde(default)]
    pub equipment_weight_lb: f64,
}

impl GreenhouseModel {
    /// Validate the model and resolve its typed configuration.
    ///
    /// Runs before load generation; any error here aborts the run.
    pub fn validate(&self) -> AnalysisResult<(StructureType, GlazingType)> {
        let structure = self.structure_type.parse::<StructureType>()?;
        let glazing = self.glazing_type.parse::<GlazingType>()?;
        self.dimensions.validate()?;

        if !self.bay_spacing_ft.is_finite() || self.bay_spacing_ft <= 0.0 {
            return Err(AnalysisError::invalid_input(
                "bay_spacing_ft",
                self.bay_spacing_ft.to_string(),
                "Bay spacing must be positive",
            ));
        }
        if !self.equipment_weight_lb.is_finite() || self.equipment_weight_lb < 0.0 {
            return Err(AnalysisError::invalid_input(
                "equipment_weight_lb",
                self.equipment_weight_lb.to_string(),
                "Equipment weight cannot be negative",
            ));
        }
        Ok((structure, glazing))
    }

    /// Plan (floor) area in ft²
    pub fn floor_area_ft2(&self) -> f64 {
        self.dimensions.length_ft * self.dimensions.width_ft
    }
}

/// Overall building dimensions (ft).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_ft: f64,
    pub width_ft: f64,
    pub eave_height_ft: f64,
    pub ridge_height_ft: f64,
}

impl Dimensions {
    pub fn validate(&self) -> AnalysisResult<()> {
        let fields = [
            ("dimensions.length_ft", self.length_ft),
            ("dimensions.width_ft", self.width_ft),
            ("dimensions.eave_height_ft", self.eave_height_ft),
            ("dimensions.ridge_height_ft", self.ridge_height_ft),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimension must be a positive number",
                ));
            }
        }
        if self.ridge_height_ft < self.eave_height_ft {
            return Err(AnalysisError::invalid_input(
                "dimensions.ridge_height_ft",
                self.ridge_height_ft.to_string(),
                "Ridge height cannot be below eave height",
            ));
        }
        Ok(())
    }

    /// Roof surface area (ft²): plan area stretched by the eave-to-ridge slope.
    pub fn roof_area_ft2(&self) -> f64 {
        let rise = self.ridge_height_ft - self.eave_height_ft;
        let half_width = self.width_ft / 2.0;
        let slope_length = (half_width.powi(2) + rise.powi(2)).sqrt();
        self.length_ft * 2.0 * slope_length
    }

    /// Side and end wall area up to the eave (ft²)
    pub fn wall_area_ft2(&self) -> f64 {
        2.0 * (self.length_ft + self.width_ft) * self.eave_height_ft
    }
}

/// Supported structure types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureType {
    Gable,
    Quonset,
    Venlo,
    GutterConnected,
    LeanTo,
}

impl FromStr for StructureType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "gable" => Ok(StructureType::Gable),
            "quonset" | "hoop" | "hoophouse" => Ok(StructureType::Quonset),
            "venlo" => Ok(StructureType::Venlo),
            "gutterconnected" => Ok(StructureType::GutterConnected),
            "leanto" => Ok(StructureType::LeanTo),
            _ => Err(AnalysisError::unsupported(
                "structure_type",
                s,
                "Expected one of: gable, quonset, venlo, gutter-connected, lean-to",
            )),
        }
    }
}

/// Glazing types with their dead weight per unit surface area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlazingType {
    Polycarbonate,
    TemperedGlass,
    Acrylic,
    Film,
}

impl GlazingType {
    /// Dead weight of the glazing (psf)
    pub fn weight_psf(&self) -> f64 {
        match self {
            GlazingType::Polycarbonate => 1.2,
            GlazingType::TemperedGlass => 6.0,
            GlazingType::Acrylic => 1.5,
            GlazingType::Film => 0.1,
        }
    }
}

impl FromStr for GlazingType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "polycarbonate" => Ok(GlazingType::Polycarbonate),
            "temperedglass" | "glass" => Ok(GlazingType::TemperedGlass),
            "acrylic" => Ok(GlazingType::Acrylic),
            "film" | "polyfilm" | "polyethylene" => Ok(GlazingType::Film),
            _ => Err(AnalysisError::unsupported(
                "glazing_type",
                s,
                "Expected one of: polycarbonate, tempered_glass, acrylic, film",
            )),
        }
    }
}

/// Lowercase and strip separators so "Gutter-Connected" == "gutter_connected".
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Installed building systems that add equipment load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InstalledSystems {
    #[serde(default)]
    pub heating: bool,
    #[serde(default)]
    pub irrigation: bool,
    #[serde(default)]
    pub lighting: bool,
}

/// A point in model space (ft)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    pub fn distance_to(&self, other: &Point3) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2) + (other.z - self.z).powi(2)).sqrt()
    }
}

/// One frame component as authored in the geometry model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameComponent {
    /// Stable component id (becomes the member id)
    pub id: String,

    /// Display name; also drives the legacy role fallback
    pub name: String,

    /// Explicit structural role. When absent the name heuristic is used.
    #[serde(default)]
    pub role: Option<MemberRole>,

    /// Start point (ft)
    pub start: Point3,

    /// End point (ft)
    pub end: Point3,

    /// Bounding box width of the cross-section (in)
    pub width_in: f64,

    /// Bounding box height (depth) of the cross-section (in)
    pub height_in: f64,

    /// Material database key
    pub material_id: String,

    /// Section table key (e.g., "W12X26"); bounding box used when absent
    #[serde(default)]
    pub section_id: Option<String>,

    /// End fixity override; pinned-pinned when absent
    #[serde(default)]
    pub boundary: Option<EndConditions>,

    /// Tributary width override (ft); model bay spacing when absent
    #[serde(default)]
    pub tributary_width_ft: Option<f64>,
}

impl FrameComponent {
    /// Component with a bounding-box section and default supports.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: Point3,
        end: Point3,
        width_in: f64,
        height_in: f64,
        material_id: impl Into<String>,
    ) -> Self {
        FrameComponent {
            id: id.into(),
            name: name.into(),
            role: None,
            start,
            end,
            width_in,
            height_in,
            material_id: material_id.into(),
            section_id: None,
            boundary: None,
            tributary_width_ft: None,
        }
    }

    /// Set the structural role (builder pattern)
    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Reference a section table entry (builder pattern)
    pub fn with_section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }

    /// Override end fixity (builder pattern)
    pub fn with_boundary(mut self, boundary: EndConditions) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Override tributary width (builder pattern)
    pub fn with_tributary_width(mut self, width_ft: f64) -> Self {
        self.tributary_width_ft = Some(width_ft);
        self
    }

    pub fn length_ft(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}
