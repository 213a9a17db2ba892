//! # Structural Analysis Aggregate
//!
//! [`StructuralAnalysis`] is the root value produced by one engine run. It
//! serializes to JSON for the report, drawing and cost modules downstream.
//!
//! ```text
//! StructuralAnalysis
//! ├── id, created, version, building_code
//! ├── site: SiteParameters
//! ├── limits: ServiceabilityLimits
//! ├── load_conditions / load_combinations
//! ├── members: Vec<StructuralMember> (each with write-once results)
//! ├── results: GlobalResults (maxima, weight, base shear, connections)
//! ├── compliance: CodeCompliance
//! ├── optimization: Vec<OptimizationSuggestion>
//! └── diagnostics: Vec<BuildDiagnostic> (components that were skipped)
//! ```
//!
//! Each pipeline stage writes disjoint fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::compliance::CodeCompliance;
use crate::calculations::optimization::OptimizationSuggestion;
use crate::config::ServiceabilityLimits;
use crate::loads::{LoadCombination, LoadCondition, LoadKind};
use crate::members::{BuildDiagnostic, MemberRole, StructuralMember};
use crate::site::SiteParameters;

/// Current schema version of the serialized aggregate
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Compact per-member result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub member_id: String,
    pub role: MemberRole,
    pub max_moment_ftlb: f64,
    pub max_shear_lb: f64,
    pub max_deflection_in: f64,
    pub utilization: f64,
    pub controlling_load: String,
}

/// Which end of a member a connection sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberEnd {
    Start,
    End,
}

/// Design forces at one member end under the controlling combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionResult {
    pub member_id: String,
    pub end: MemberEnd,
    /// End reaction (lb)
    pub reaction_lb: f64,
    /// End moment (ft-lb), zero at pinned ends
    pub moment_ftlb: f64,
    /// Combination producing these forces
    pub combination: String,
}

/// Whole-structure results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalResults {
    pub max_deflection_in: f64,
    pub max_stress_psi: f64,
    pub max_utilization: f64,
    /// Σ A·L·ρ/1728 over all members (lb)
    pub total_weight_lb: f64,
    /// T ≈ Ct·√h (s)
    pub fundamental_period_s: f64,
    /// V = Cs·W (lb)
    pub base_shear_lb: f64,
    /// V × assumed height (ft-lb)
    pub overturning_moment_ftlb: f64,
    pub member_results: Vec<MemberSummary>,
    pub connection_results: Vec<ConnectionResult>,
}

/// Root analysis result for one greenhouse model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralAnalysis {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    /// Schema version (for migration compatibility)
    pub version: String,
    pub building_code: String,
    pub site: SiteParameters,
    pub limits: ServiceabilityLimits,
    pub load_conditions: Vec<LoadCondition>,
    pub load_combinations: Vec<LoadCombination>,
    pub members: Vec<StructuralMember>,
    #[serde(default)]
    pub results: GlobalResults,
    #[serde(default)]
    pub compliance: CodeCompliance,
    #[serde(default)]
    pub optimization: Vec<OptimizationSuggestion>,
    #[serde(default)]
    pub diagnostics: Vec<BuildDiagnostic>,
}

impl StructuralAnalysis {
    /// Start a new aggregate with fresh identity and timestamp.
    pub fn new(
        building_code: impl Into<String>,
        site: SiteParameters,
        limits: ServiceabilityLimits,
    ) -> Self {
        StructuralAnalysis {
            id: Uuid::new_v4(),
            created: Utc::now(),
            version: SCHEMA_VERSION.to_string(),
            building_code: building_code.into(),
            site,
            limits,
            load_conditions: Vec::new(),
            load_combinations: Vec::new(),
            members: Vec::new(),
            results: GlobalResults::default(),
            compliance: CodeCompliance::default(),
            optimization: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Find a member by id.
    pub fn member(&self, id: &str) -> Option<&StructuralMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// The combination flagged as governing, if analysis has run.
    pub fn governing_combination(&self) -> Option<&LoadCombination> {
        self.load_combinations.iter().find(|c| c.governing)
    }

    /// Unfactored magnitude of one load kind (psf), zero if not generated.
    pub fn load_magnitude(&self, kind: LoadKind) -> f64 {
        crate::loads::total_by_kind(&self.load_conditions, kind)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> crate::errors::AnalysisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
