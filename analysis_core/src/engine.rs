//! # Analysis Engine
//!
//! Runs the pipeline for one greenhouse model:
//!
//! ```text
//! validate → loads → members → member analysis → global aggregation
//!          → compliance → optimization
//! ```
//!
//! With an [`FeaBackend`] the member analysis and aggregation are replaced
//! by one awaited backend call; a backend failure, a timeout, or results
//! that are missing, non-finite or negative abort the run before compliance.
//! Compliance always checks against this engine's code, site and limits.
//!
//! The foundation is sized separately from the finished aggregate
//! ([`AnalysisEngine::analyze_foundation`]).
//!
//! Progress is reported through a caller-supplied callback:
//!
//! ```rust
//! use analysis_core::config::EngineConfig;
//! use analysis_core::engine::{AnalysisEngine, AnalysisEvent};
//! # use analysis_core::model::{Dimensions, GreenhouseModel, InstalledSystems};
//! # use analysis_core::site::SiteParameters;
//! # let model = GreenhouseModel {
//! #     name: "Empty".to_string(),
//! #     structure_type: "gable".to_string(),
//! #     glazing_type: "polycarbonate".to_string(),
//! #     dimensions: Dimensions { length_ft: 48.0, width_ft: 24.0, eave_height_ft: 8.0, ridge_height_ft: 12.0 },
//! #     bay_spacing_ft: 4.0,
//! #     frame_components: Vec::new(),
//! #     systems: InstalledSystems::default(),
//! #     equipment_weight_lb: 0.0,
//! # };
//!
//! let config = EngineConfig::default();
//! let engine = AnalysisEngine::new(&config);
//!
//! let mut events = Vec::new();
//! let analysis = engine
//!     .run_with_events(&model, &SiteParameters::default(), |e| events.push(e.clone()))
//!     .unwrap();
//!
//! assert!(matches!(events.first(), Some(AnalysisEvent::Started { .. })));
//! assert!(matches!(events.last(), Some(AnalysisEvent::Completed { .. })));
//! assert_eq!(analysis.load_combinations.len(), 5);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::StructuralAnalysis;
use crate::calculations::{
    aggregate_results, analyze_foundation, analyze_members, check_compliance, mark_governing, suggest_optimizations,
    verify_results, FoundationAnalysis,
};
use crate::config::EngineConfig;
use crate::errors::{AnalysisError, AnalysisResult, Stage};
use crate::fea::{AnalysisType, FeaBackend};
use crate::loads::{combinations_for_code, generate_load_conditions};
use crate::members::build_members;
use crate::model::GreenhouseModel;
use crate::site::SiteParameters;

/// Lifecycle notification delivered to the caller's callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisEvent {
    Started { model: String },
    StageCompleted(Stage),
    Completed { analysis_id: Uuid, overall: bool },
    Failed(AnalysisError),
}

/// Pipeline orchestrator. Holds only a borrowed configuration.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisEngine<'a> {
    config: &'a EngineConfig,
}

impl<'a> AnalysisEngine<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        AnalysisEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        self.config
    }

    /// Run the closed-form pipeline.
    pub fn run(&self, model: &GreenhouseModel, site: &SiteParameters) -> AnalysisResult<StructuralAnalysis> {
        self.run_with_events(model, site, |_| {})
    }

    /// Run the closed-form pipeline, reporting progress to `on_event`.
    pub fn run_with_events<F>(
        &self,
        model: &GreenhouseModel,
        site: &SiteParameters,
        mut on_event: F,
    ) -> AnalysisResult<StructuralAnalysis>
    where
        F: FnMut(&AnalysisEvent),
    {
        self.start(model, &mut on_event);
        let outcome = self.execute_local(model, site, &mut on_event);
        self.finish(outcome, &mut on_event)
    }

    /// Run the pipeline with an external backend in place of the member
    /// analysis.
    ///
    /// # Errors
    ///
    /// `ExternalAnalysisFailure` when the backend errors or exceeds the
    /// configured timeout. No compliance result is produced in that case.
    pub async fn run_with_backend<B, F>(
        &self,
        model: &GreenhouseModel,
        site: &SiteParameters,
        backend: &B,
        analysis_type: AnalysisType,
        mut on_event: F,
    ) -> AnalysisResult<StructuralAnalysis>
    where
        B: FeaBackend,
        F: FnMut(&AnalysisEvent),
    {
        self.start(model, &mut on_event);
        let outcome = self
            .execute_with_backend(model, site, backend, analysis_type, &mut on_event)
            .await;
        self.finish(outcome, &mut on_event)
    }

    /// Size the foundation for a finished analysis with the configured soil.
    pub fn analyze_foundation(&self, analysis: &StructuralAnalysis) -> AnalysisResult<FoundationAnalysis> {
        analyze_foundation(analysis, &self.config.soil)
    }

    fn start<F: FnMut(&AnalysisEvent)>(&self, model: &GreenhouseModel, on_event: &mut F) {
        info!(model = %model.name, code = %self.config.building_code, "starting structural analysis");
        on_event(&AnalysisEvent::Started {
            model: model.name.clone(),
        });
    }

    fn finish<F: FnMut(&AnalysisEvent)>(
        &self,
        outcome: AnalysisResult<StructuralAnalysis>,
        on_event: &mut F,
    ) -> AnalysisResult<StructuralAnalysis> {
        match outcome {
            Ok(analysis) => {
                info!(
                    id = %analysis.id,
                    members = analysis.members.len(),
                    overall = analysis.compliance.overall,
                    "structural analysis completed"
                );
                on_event(&AnalysisEvent::Completed {
                    analysis_id: analysis.id,
                    overall: analysis.compliance.overall,
                });
                Ok(analysis)
            }
            Err(err) => {
                error!(code = err.error_code(), "structural analysis failed: {}", err);
                on_event(&AnalysisEvent::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Validation, loads, combinations and members: everything both paths share.
    fn prepare<F: FnMut(&AnalysisEvent)>(
        &self,
        model: &GreenhouseModel,
        site: &SiteParameters,
        on_event: &mut F,
    ) -> AnalysisResult<StructuralAnalysis> {
        model.validate()?;
        site.validate()?;
        let combinations = combinations_for_code(&self.config.building_code)?;
        on_event(&AnalysisEvent::StageCompleted(Stage::ModelValidation));

        let load_conditions = generate_load_conditions(model, site)?;
        on_event(&AnalysisEvent::StageCompleted(Stage::LoadGeneration));

        let outcome = build_members(model, &self.config.materials, &self.config.sections);
        if !outcome.diagnostics.is_empty() {
            warn!(skipped = outcome.diagnostics.len(), "some frame components were not analyzed");
        }
        on_event(&AnalysisEvent::StageCompleted(Stage::MemberBuilding));

        let mut analysis = StructuralAnalysis::new(self.config.building_code.clone(), site.clone(), self.config.limits);
        analysis.load_conditions = load_conditions;
        analysis.load_combinations = combinations;
        analysis.members = outcome.members;
        analysis.diagnostics = outcome.diagnostics;
        Ok(analysis)
    }

    /// Compliance and optimization over analyzed members.
    fn conclude<F: FnMut(&AnalysisEvent)>(
        &self,
        mut analysis: StructuralAnalysis,
        on_event: &mut F,
    ) -> AnalysisResult<StructuralAnalysis> {
        analysis.compliance = check_compliance(&analysis.members, &analysis.limits)?;
        on_event(&AnalysisEvent::StageCompleted(Stage::Compliance));

        analysis.optimization = suggest_optimizations(&analysis, &self.config.optimization);
        on_event(&AnalysisEvent::StageCompleted(Stage::Optimization));
        Ok(analysis)
    }

    fn execute_local<F: FnMut(&AnalysisEvent)>(
        &self,
        model: &GreenhouseModel,
        site: &SiteParameters,
        on_event: &mut F,
    ) -> AnalysisResult<StructuralAnalysis> {
        let mut analysis = self.prepare(model, site, on_event)?;
        let constants = &self.config.constants;

        let connections = analyze_members(
            &mut analysis.members,
            &analysis.load_combinations,
            &analysis.load_conditions,
            constants,
        )?;
        on_event(&AnalysisEvent::StageCompleted(Stage::MemberAnalysis));

        analysis.results = aggregate_results(
            &analysis.members,
            connections,
            &mut analysis.load_combinations,
            model.dimensions.ridge_height_ft,
            constants,
        )?;
        on_event(&AnalysisEvent::StageCompleted(Stage::GlobalAggregation));

        self.conclude(analysis, on_event)
    }

    async fn execute_with_backend<B, F>(
        &self,
        model: &GreenhouseModel,
        site: &SiteParameters,
        backend: &B,
        analysis_type: AnalysisType,
        on_event: &mut F,
    ) -> AnalysisResult<StructuralAnalysis>
    where
        B: FeaBackend,
        F: FnMut(&AnalysisEvent),
    {
        let prepared = self.prepare(model, site, on_event)?;
        let timeout_secs = self.config.fea_timeout_secs;

        info!(
            backend = backend.name(),
            analysis = analysis_type.display_name(),
            timeout_secs,
            "awaiting external analysis"
        );
        let call = backend.perform_structural_analysis(model, &prepared.load_conditions, analysis_type);
        let mut remote = match tokio::time::timeout(Duration::from_secs(timeout_secs), call).await {
            Ok(Ok(remote)) => remote,
            Ok(Err(err)) => return Err(AnalysisError::external_failure(backend.name(), err.to_string())),
            Err(_) => {
                return Err(AnalysisError::external_failure(
                    backend.name(),
                    format!("timed out after {} s", timeout_secs),
                ))
            }
        };
        verify_results(&remote.members, &remote.results)
            .map_err(|err| AnalysisError::external_failure(backend.name(), err.to_string()))?;
        on_event(&AnalysisEvent::StageCompleted(Stage::ExternalAnalysis));

        // Code checks run against this engine's inputs, never the backend's
        remote.building_code = prepared.building_code;
        remote.site = prepared.site;
        remote.limits = prepared.limits;
        remote.load_conditions = prepared.load_conditions;
        remote.load_combinations = prepared.load_combinations;
        mark_governing(&remote.members, &mut remote.load_combinations);
        remote.diagnostics.extend(prepared.diagnostics);
        self.conclude(remote, on_event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::MemberRole;
    use crate::model::{Dimensions, FrameComponent, InstalledSystems, Point3};

    fn model(components: Vec<FrameComponent>) -> GreenhouseModel {
        GreenhouseModel {
            name: "Engine Test".to_string(),
            structure_type: "gable".to_string(),
            glazing_type: "polycarbonate".to_string(),
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

    fn rafter(id: &str, length_ft: f64, material: &str) -> FrameComponent {
        FrameComponent::new(
            id,
            "Rafter",
            Point3::new(0.0, 0.0, 8.0),
            Point3::new(length_ft, 0.0, 8.0),
            3.0,
            8.0,
            material,
        )
        .with_role(MemberRole::Rafter)
    }

    #[test]
    fn test_stage_order() {
        let config = EngineConfig::default();
        let engine = AnalysisEngine::new(&config);
        let mut events = Vec::new();
        engine
            .run_with_events(&model(vec![rafter("R-1", 12.0, "A36")]), &SiteParameters::default(), |e| {
                events.push(e.clone())
            })
            .unwrap();

        let stages: Vec<Stage> = events
            .iter()
            .filter_map(|e| match e {
                AnalysisEvent::StageCompleted(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(
            stages,
            vec![
                Stage::ModelValidation,
                Stage::LoadGeneration,
                Stage::MemberBuilding,
                Stage::MemberAnalysis,
                Stage::GlobalAggregation,
                Stage::Compliance,
                Stage::Optimization,
            ]
        );
    }

    #[test]
    fn test_unknown_structure_aborts_before_loads() {
        let config = EngineConfig::default();
        let engine = AnalysisEngine::new(&config);
        let mut m = model(vec![rafter("R-1", 12.0, "A36")]);
        m.structure_type = "geodesic dome".to_string();

        let mut events = Vec::new();
        let err = engine
            .run_with_events(&m, &SiteParameters::default(), |e| events.push(e.clone()))
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_MODEL_CONFIGURATION");
        assert!(!events.contains(&AnalysisEvent::StageCompleted(Stage::LoadGeneration)));
        assert!(matches!(events.last(), Some(AnalysisEvent::Failed(_))));
    }

    #[test]
    fn test_unsupported_building_code() {
        let config = EngineConfig {
            building_code: "ASD".to_string(),
            ..EngineConfig::default()
        };
        let err = AnalysisEngine::new(&config)
            .run(&model(Vec::new()), &SiteParameters::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_MODEL_CONFIGURATION");
    }

    #[test]
    fn test_missing_material_is_skipped() {
        let config = EngineConfig::default();
        let analysis = AnalysisEngine::new(&config)
            .run(
                &model(vec![rafter("R-1", 12.0, "A36"), rafter("R-2", 12.0, "unobtainium")]),
                &SiteParameters::default(),
            )
            .unwrap();
        assert_eq!(analysis.members.len(), 1);
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.diagnostics[0].component_id, "R-2");
        assert!(analysis.members[0].results.is_some());
    }

    #[test]
    fn test_governing_flag_set_once() {
        let config = EngineConfig::default();
        let analysis = AnalysisEngine::new(&config)
            .run(&model(vec![rafter("R-1", 12.0, "A36")]), &SiteParameters::default())
            .unwrap();
        assert_eq!(analysis.load_combinations.iter().filter(|c| c.governing).count(), 1);
        let governing = analysis.governing_combination().unwrap();
        assert_eq!(governing.label(), analysis.members[0].results.as_ref().unwrap().controlling_load);
    }
}
