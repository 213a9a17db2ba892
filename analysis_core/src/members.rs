//! # Structural Member Builder
//!
//! Converts frame components plus material records into analyzable
//! [`StructuralMember`]s with section, material and boundary data.
//!
//! ## Role assignment
//!
//! Members carry an explicit [`MemberRole`] tag set at model-authoring time.
//! Components authored before the tag existed fall back to the legacy name
//! heuristic ([`MemberRole::from_legacy_name`]): "post" → column, "beam" →
//! beam, "truss" → truss, anything else → beam.
//!
//! ## Failure handling
//!
//! A component that cannot be built (unknown material, zero length, unusable
//! section) is skipped and reported as a [`BuildDiagnostic`]; the rest of the
//! frame is still analyzed.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{AnalysisError, Stage};
use crate::materials::{MaterialDatabase, MaterialProperties};
use crate::model::{FrameComponent, GreenhouseModel, Point3};
use crate::sections::{Section, SectionTable};

/// Structural role of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberRole {
    Column,
    Beam,
    Truss,
    Rafter,
    Purlin,
    Brace,
}

impl MemberRole {
    /// Legacy classification by substring of the component name.
    pub fn from_legacy_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("post") {
            MemberRole::Column
        } else if lower.contains("beam") {
            MemberRole::Beam
        } else if lower.contains("truss") {
            MemberRole::Truss
        } else {
            MemberRole::Beam
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MemberRole::Column => "Column",
            MemberRole::Beam => "Beam",
            MemberRole::Truss => "Truss",
            MemberRole::Rafter => "Rafter",
            MemberRole::Purlin => "Purlin",
            MemberRole::Brace => "Brace",
        }
    }
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Support type at one member end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fixity {
    Fixed,
    Pinned,
    Roller,
    Free,
}

/// Restraint at one member end. `true` = restrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    pub fixity: Fixity,
    /// Translation restraint about x, y, z
    pub translation: [bool; 3],
    /// Rotation restraint about x, y, z
    pub rotation: [bool; 3],
}

impl BoundaryCondition {
    pub fn fixed() -> Self {
        BoundaryCondition {
            fixity: Fixity::Fixed,
            translation: [true; 3],
            rotation: [true; 3],
        }
    }

    pub fn pinned() -> Self {
        BoundaryCondition {
            fixity: Fixity::Pinned,
            translation: [true; 3],
            rotation: [false; 3],
        }
    }

    /// Vertical support only; free to slide along the member axis
    pub fn roller() -> Self {
        BoundaryCondition {
            fixity: Fixity::Roller,
            translation: [false, false, true],
            rotation: [false; 3],
        }
    }

    pub fn free() -> Self {
        BoundaryCondition {
            fixity: Fixity::Free,
            translation: [false; 3],
            rotation: [false; 3],
        }
    }
}

/// Fixity at both ends of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndConditions {
    pub start: BoundaryCondition,
    pub end: BoundaryCondition,
}

impl EndConditions {
    pub fn new(start: BoundaryCondition, end: BoundaryCondition) -> Self {
        EndConditions { start, end }
    }

    pub fn pinned_pinned() -> Self {
        EndConditions::new(BoundaryCondition::pinned(), BoundaryCondition::pinned())
    }

    pub fn fixed_fixed() -> Self {
        EndConditions::new(BoundaryCondition::fixed(), BoundaryCondition::fixed())
    }

    pub fn fixed_pinned() -> Self {
        EndConditions::new(BoundaryCondition::fixed(), BoundaryCondition::pinned())
    }

    pub fn cantilever() -> Self {
        EndConditions::new(BoundaryCondition::fixed(), BoundaryCondition::free())
    }

    /// Beam idealization implied by the end fixities, or `None` for a
    /// mechanism (no fixed end and at least one free end).
    pub fn idealization(&self) -> Option<SpanIdealization> {
        use Fixity::*;
        match (self.start.fixity, self.end.fixity) {
            (Fixed, Fixed) => Some(SpanIdealization::FixedFixed),
            (Fixed, Free) | (Free, Fixed) => Some(SpanIdealization::Cantilever),
            (Fixed, _) | (_, Fixed) => Some(SpanIdealization::FixedPinned),
            (a, b) if a != Free && b != Free => Some(SpanIdealization::SimplySupported),
            _ => None,
        }
    }

    /// Whether the fixed end of a one-sided idealization is the start end
    pub fn fixed_at_start(&self) -> bool {
        self.start.fixity == Fixity::Fixed
    }

    pub fn is_stable(&self) -> bool {
        self.idealization().is_some()
    }
}

impl Default for EndConditions {
    fn default() -> Self {
        EndConditions::pinned_pinned()
    }
}

/// Uniform-load beam idealization used by the member analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanIdealization {
    SimplySupported,
    FixedFixed,
    FixedPinned,
    Cantilever,
}

impl SpanIdealization {
    /// Effective length factor K for Euler buckling (AISC Table C-A-7.1,
    /// recommended design values).
    pub fn effective_length_factor(&self) -> f64 {
        match self {
            SpanIdealization::SimplySupported => 1.0,
            SpanIdealization::FixedFixed => 0.65,
            SpanIdealization::FixedPinned => 0.8,
            SpanIdealization::Cantilever => 2.1,
        }
    }

    /// First bending mode constant λ²
    pub fn frequency_constant(&self) -> f64 {
        match self {
            SpanIdealization::SimplySupported => std::f64::consts::PI.powi(2),
            SpanIdealization::FixedFixed => 22.373,
            SpanIdealization::FixedPinned => 15.418,
            SpanIdealization::Cantilever => 3.516,
        }
    }
}

/// Write-once analysis results for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResults {
    /// Maximum bending moment over all combinations (ft-lb)
    pub max_moment_ftlb: f64,
    /// Maximum shear over all combinations (lb)
    pub max_shear_lb: f64,
    /// Maximum deflection over all combinations (in)
    pub max_deflection_in: f64,
    /// Maximum bending stress M/Sx (psi)
    pub max_stress_psi: f64,
    /// Allowable stress Fy / Ω (psi)
    pub allowable_stress_psi: f64,
    /// max_stress / allowable; > 1.0 fails
    pub utilization: f64,
    /// Combination that produced the maximum moment ("LRFD-3: 1.2D + 1.6S")
    pub controlling_load: String,
    /// Euler buckling capacity (lb), informational
    pub buckling_capacity_lb: f64,
    /// First-mode bending frequency (Hz), informational
    pub natural_frequency_hz: f64,
}

/// An analyzable member built from one frame component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralMember {
    pub id: String,
    pub name: String,
    pub role: MemberRole,
    pub start: Point3,
    pub end: Point3,
    pub length_ft: f64,
    /// Width of roof/wall area carried by this member (ft)
    pub tributary_width_ft: f64,
    pub section: Section,
    pub material: MaterialProperties,
    pub boundary: EndConditions,
    #[serde(default)]
    pub results: Option<MemberResults>,
}

impl StructuralMember {
    pub fn length_in(&self) -> f64 {
        self.length_ft * 12.0
    }

    /// Self weight (lb): A·L·ρ/1728 with A in in², L in in, ρ in pcf
    pub fn weight_lb(&self) -> f64 {
        self.section.area_in2 * self.length_in() * self.material.density_pcf / 1728.0
    }

    /// Self weight per foot (plf)
    pub fn self_weight_plf(&self) -> f64 {
        self.section.area_in2 * self.material.density_pcf / 144.0
    }

    pub fn utilization(&self) -> Option<f64> {
        self.results.as_ref().map(|r| r.utilization)
    }

    /// Store analysis results. Results are write-once.
    pub fn record_results(&mut self, results: MemberResults) -> Result<(), AnalysisError> {
        if self.results.is_some() {
            return Err(AnalysisError::Internal {
                message: format!("member '{}' already has analysis results", self.id),
            });
        }
        self.results = Some(results);
        Ok(())
    }
}

/// Why a frame component did not become a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildDiagnostic {
    pub component_id: String,
    pub error: AnalysisError,
}

/// Members built from a model, plus the components that were skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub members: Vec<StructuralMember>,
    pub diagnostics: Vec<BuildDiagnostic>,
}

/// Build one member from a component.
pub fn build_member(
    component: &FrameComponent,
    default_tributary_ft: f64,
    materials: &MaterialDatabase,
    sections: &SectionTable,
) -> Result<StructuralMember, AnalysisError> {
    let material = materials.resolve(&component.material_id, &component.id)?;
    material
        .validate()
        .map_err(|reason| AnalysisError::domain(&component.id, None, Stage::MemberBuilding, reason))?;

    let length_ft = component.length_ft();
    if !length_ft.is_finite() || length_ft <= 0.0 {
        return Err(AnalysisError::domain(
            &component.id,
            None,
            Stage::MemberBuilding,
            format!("member length must be positive, got {}", length_ft),
        ));
    }

    let section = match component.section_id.as_deref() {
        Some(label) => match sections.lookup(label) {
            Some(section) => *section,
            None => {
                warn!(component = %component.id, section = label, "section not in table, using bounding box");
                Section::from_bounding_box(component.width_in, component.height_in)
            }
        },
        None => Section::from_bounding_box(component.width_in, component.height_in),
    };
    if !section.is_usable() {
        return Err(AnalysisError::domain(
            &component.id,
            None,
            Stage::MemberBuilding,
            format!("section properties must be positive ({})", section),
        ));
    }

    let role = match component.role {
        Some(role) => role,
        None => {
            let role = MemberRole::from_legacy_name(&component.name);
            debug!(component = %component.id, name = %component.name, %role, "role assigned from legacy name");
            role
        }
    };

    let boundary = component.boundary.unwrap_or_default();
    if !boundary.is_stable() {
        return Err(AnalysisError::domain(
            &component.id,
            None,
            Stage::MemberBuilding,
            "end conditions form a mechanism (no fixed end with a free end)",
        ));
    }

    let tributary_width_ft = component.tributary_width_ft.unwrap_or(default_tributary_ft);
    if !tributary_width_ft.is_finite() || tributary_width_ft < 0.0 {
        return Err(AnalysisError::invalid_input(
            format!("{}.tributary_width_ft", component.id),
            tributary_width_ft.to_string(),
            "Tributary width cannot be negative",
        ));
    }

    Ok(StructuralMember {
        id: component.id.clone(),
        name: component.name.clone(),
        role,
        start: component.start,
        end: component.end,
        length_ft,
        tributary_width_ft,
        section,
        material,
        boundary,
        results: None,
    })
}

/// Build every frame component of the model, skipping the ones that fail.
pub fn build_members(
    model: &GreenhouseModel,
    materials: &MaterialDatabase,
    sections: &SectionTable,
) -> BuildOutcome {
    let mut outcome = BuildOutcome::default();

    for component in &model.frame_components {
        match build_member(component, model.bay_spacing_ft, materials, sections) {
            Ok(member) => outcome.members.push(member),
            Err(error) => {
                warn!(component = %component.id, code = error.error_code(), "skipping component: {}", error);
                outcome.diagnostics.push(BuildDiagnostic {
                    component_id: component.id.clone(),
                    error,
                });
            }
        }
    }

    debug!(
        built = outcome.members.len(),
        skipped = outcome.diagnostics.len(),
        "members built"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialRecord;
    use crate::model::{Dimensions, InstalledSystems};

    fn component(id: &str, name: &str, length_ft: f64, material: &str) -> FrameComponent {
        FrameComponent::new(
            id,
            name,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(length_ft, 0.0, 0.0),
            2.0,
            6.0,
            material,
        )
    }

    fn model(components: Vec<FrameComponent>) -> GreenhouseModel {
        GreenhouseModel {
            name: "Builder".to_string(),
            structure_type: "gable".to_string(),
            glazing_type: "film".to_string(),
            dimensions: Dimensions {
                length_ft: 48.0,
                width_ft: 24.0,
                eave_height_ft: 8.0,
                ridge_height_ft: 12.0,
            },
            bay_spacing_ft: 4.0,
            frame_components: components,
            systems: InstalledSystems::default(),
            equipment_weight_lb: 0.0,
        }
    }

    #[test]
    fn test_legacy_role_names() {
        assert_eq!(MemberRole::from_legacy_name("Corner Post"), MemberRole::Column);
        assert_eq!(MemberRole::from_legacy_name("eave beam"), MemberRole::Beam);
        assert_eq!(MemberRole::from_legacy_name("Bow Truss 3"), MemberRole::Truss);
        assert_eq!(MemberRole::from_legacy_name("purlin"), MemberRole::Beam);
    }

    #[test]
    fn test_explicit_role_wins() {
        let c = component("R-1", "Post-like rafter", 10.0, "A36").with_role(MemberRole::Rafter);
        let m = build_member(&c, 4.0, &MaterialDatabase::standard(), &SectionTable::new()).unwrap();
        assert_eq!(m.role, MemberRole::Rafter);
    }

    #[test]
    fn test_defaults_applied() {
        let c = component("B-1", "Beam", 12.0, "A36");
        let m = build_member(&c, 4.0, &MaterialDatabase::standard(), &SectionTable::new()).unwrap();
        assert_eq!(m.boundary, EndConditions::pinned_pinned());
        assert_eq!(m.tributary_width_ft, 4.0);
        assert_eq!(m.section.area_in2, 12.0);
        assert_eq!(m.material.yield_strength_psi, 36_000.0);
        assert!(m.results.is_none());
    }

    #[test]
    fn test_section_table_used() {
        let c = component("B-2", "Beam", 20.0, "A992").with_section("W12X26");
        let m = build_member(&c, 6.0, &MaterialDatabase::standard(), &SectionTable::standard()).unwrap();
        assert_eq!(m.section.ix_in4, 204.0);

        let c = component("B-3", "Beam", 20.0, "A992").with_section("W99X999");
        let m = build_member(&c, 6.0, &MaterialDatabase::standard(), &SectionTable::standard()).unwrap();
        assert_eq!(m.section.area_in2, 12.0);
    }

    #[test]
    fn test_material_fallbacks_through_builder() {
        let db = MaterialDatabase::new().with_record(MaterialRecord::new("mystery", "Unknown steel"));
        let m = build_member(&component("B-4", "Beam", 10.0, "mystery"), 4.0, &db, &SectionTable::new()).unwrap();
        assert_eq!(m.material.elastic_modulus_psi, 29_000_000.0);
        assert_eq!(m.material.density_pcf, 490.0);
    }

    #[test]
    fn test_missing_material_skips_component() {
        let m = model(vec![
            component("P-1", "Post", 10.0, "A36"),
            component("P-2", "Post", 10.0, "titanium"),
            component("P-3", "Post", 10.0, "A36"),
        ]);
        let outcome = build_members(&m, &MaterialDatabase::standard(), &SectionTable::new());
        assert_eq!(outcome.members.len(), 2);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].component_id, "P-2");
        assert_eq!(outcome.diagnostics[0].error.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_zero_length_rejected() {
        let m = model(vec![component("Z-1", "Beam", 0.0, "A36")]);
        let outcome = build_members(&m, &MaterialDatabase::standard(), &SectionTable::new());
        assert!(outcome.members.is_empty());
        assert_eq!(outcome.diagnostics[0].error.error_code(), "COMPUTATION_DOMAIN");
    }

    #[test]
    fn test_zero_area_rejected() {
        let mut c = component("Z-2", "Beam", 10.0, "A36");
        c.width_in = 0.0;
        let err = build_member(&c, 4.0, &MaterialDatabase::standard(), &SectionTable::new()).unwrap_err();
        assert_eq!(err.error_code(), "COMPUTATION_DOMAIN");
    }

    #[test]
    fn test_mechanism_rejected() {
        let c = component("M-1", "Beam", 10.0, "A36")
            .with_boundary(EndConditions::new(BoundaryCondition::pinned(), BoundaryCondition::free()));
        assert!(build_member(&c, 4.0, &MaterialDatabase::standard(), &SectionTable::new()).is_err());
    }

    #[test]
    fn test_stability_follows_idealization() {
        assert!(EndConditions::pinned_pinned().is_stable());
        assert!(EndConditions::cantilever().is_stable());
        assert!(!EndConditions::new(BoundaryCondition::free(), BoundaryCondition::free()).is_stable());
        assert!(!EndConditions::new(BoundaryCondition::roller(), BoundaryCondition::free()).is_stable());
    }

    #[test]
    fn test_idealization_from_fixity() {
        assert_eq!(EndConditions::pinned_pinned().idealization(), Some(SpanIdealization::SimplySupported));
        assert_eq!(
            EndConditions::new(BoundaryCondition::pinned(), BoundaryCondition::roller()).idealization(),
            Some(SpanIdealization::SimplySupported)
        );
        assert_eq!(EndConditions::fixed_fixed().idealization(), Some(SpanIdealization::FixedFixed));
        assert_eq!(EndConditions::fixed_pinned().idealization(), Some(SpanIdealization::FixedPinned));
        assert_eq!(EndConditions::cantilever().idealization(), Some(SpanIdealization::Cantilever));
        assert_eq!(
            EndConditions::new(BoundaryCondition::free(), BoundaryCondition::fixed()).idealization(),
            Some(SpanIdealization::Cantilever)
        );
        assert_eq!(
            EndConditions::new(BoundaryCondition::free(), BoundaryCondition::free()).idealization(),
            None
        );
    }

    #[test]
    fn test_member_weight() {
        let c = component("W-1", "Beam", 12.0, "A36");
        let m = build_member(&c, 4.0, &MaterialDatabase::standard(), &SectionTable::new()).unwrap();
        // 12 in² × 144 in × 490 / 1728 = 490 lb
        assert!((m.weight_lb() - 490.0).abs() < 1e-9);
        // 12 × 490 / 144 = 40.83 plf
        assert!((m.self_weight_plf() - 40.833).abs() < 0.001);
    }
}
