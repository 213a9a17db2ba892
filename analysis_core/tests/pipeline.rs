//! End-to-end checks of the analysis pipeline through the public API.

use std::time::Duration;

use analysis_core::analysis::StructuralAnalysis;
use analysis_core::calculations::{analyze_foundation, analyze_member, Severity, ViolationKind};
use analysis_core::config::{AnalysisConstants, EngineConfig};
use analysis_core::engine::{AnalysisEngine, AnalysisEvent};
use analysis_core::errors::Stage;
use analysis_core::fea::{AnalysisType, BackendError, FeaBackend};
use analysis_core::loads::generator::{snow_load_psf, wind_load_psf};
use analysis_core::loads::{generate_load_conditions, lrfd_combinations, LoadCondition, LoadKind};
use analysis_core::materials::{MaterialDatabase, MaterialRecord};
use analysis_core::members::{build_member, EndConditions, MemberRole};
use analysis_core::model::{Dimensions, FrameComponent, GreenhouseModel, InstalledSystems, Point3};
use analysis_core::sections::{Section, SectionTable};
use analysis_core::site::{ExposureCategory, RiskCategory, SiteParameters};
use approx::assert_relative_eq;

fn site() -> SiteParameters {
    SiteParameters {
        latitude: 40.79,
        longitude: -77.86,
        elevation_ft: 1150.0,
        ground_snow_load_psf: 25.0,
        basic_wind_speed_mph: 115.0,
        seismic_design_category: Some("B".to_string()),
        exposure_category: ExposureCategory::B,
        risk_category: RiskCategory::II,
    }
}

fn component(id: &str, role: MemberRole, length_ft: f64, width_in: f64, height_in: f64) -> FrameComponent {
    FrameComponent::new(
        id,
        id,
        Point3::new(0.0, 0.0, 10.0),
        Point3::new(length_ft, 0.0, 10.0),
        width_in,
        height_in,
        "A36",
    )
    .with_role(role)
}

/// 96 x 30 ft gable house with members ranging from slender to stocky.
fn greenhouse() -> GreenhouseModel {
    GreenhouseModel {
        name: "Research Range 2".to_string(),
        structure_type: "Gutter-Connected".to_string(),
        glazing_type: "polycarbonate".to_string(),
        dimensions: Dimensions {
            length_ft: 96.0,
            width_ft: 30.0,
            eave_height_ft: 12.0,
            ridge_height_ft: 18.0,
        },
        bay_spacing_ft: 6.0,
        frame_components: vec![
            component("C-1", MemberRole::Column, 12.0, 4.0, 4.0),
            component("R-1", MemberRole::Rafter, 16.0, 1.0, 3.0),
            component("R-2", MemberRole::Rafter, 16.0, 1.5, 4.0),
            component("P-1", MemberRole::Purlin, 6.0, 2.0, 4.0),
            component("T-1", MemberRole::Truss, 32.0, 3.0, 10.0),
            component("B-1", MemberRole::Beam, 20.0, 2.0, 6.0).with_section("W12X26"),
        ],
        systems: InstalledSystems {
            heating: true,
            irrigation: true,
            lighting: true,
        },
        equipment_weight_lb: 1500.0,
    }
}

#[test]
fn snow_load_determinism() {
    assert_relative_eq!(snow_load_psf(25.0, ExposureCategory::B, RiskCategory::II), 20.0);

    let conditions = generate_load_conditions(&greenhouse(), &site()).unwrap();
    let snow = conditions.iter().find(|c| c.kind == LoadKind::Snow).unwrap();
    assert_relative_eq!(snow.magnitude, 20.0);
    assert!(snow.calculation.contains("17.50"));
}

#[test]
fn wind_load_formula() {
    let p = wind_load_psf(115.0, RiskCategory::II);
    assert!((p - 23.02).abs() < 0.01);
}

#[test]
fn deflection_matches_closed_form() {
    // (L ft, E psi, section)
    let triples = [
        (20.0, 29_000_000.0, SectionTable::standard().lookup("W12X26").copied().unwrap()),
        (12.0, 10_000_000.0, Section::from_bounding_box(2.0, 6.0)),
        (30.0, 29_000_000.0, Section::from_bounding_box(4.0, 10.0)),
    ];
    let conditions = vec![condition(LoadKind::Dead, 8.0), condition(LoadKind::Live, 20.0)];
    let lrfd2: Vec<_> = lrfd_combinations().into_iter().filter(|c| c.name == "LRFD-2").collect();
    let tributary_ft = 5.0;

    for (length_ft, e_psi, section) in triples {
        let mut sections = SectionTable::new();
        sections.insert("CASE", section);
        let materials = MaterialDatabase::new().with_record(MaterialRecord::new("M", "case").with_elastic_modulus(e_psi));
        let c = FrameComponent::new("M-1", "Beam", Point3::new(0.0, 0.0, 0.0), Point3::new(length_ft, 0.0, 0.0), 1.0, 1.0, "M")
            .with_section("CASE")
            .with_tributary_width(tributary_ft);
        let member = build_member(&c, 4.0, &materials, &sections).unwrap();

        let result = analyze_member(&member, &lrfd2, &conditions, &AnalysisConstants::default()).unwrap().results;

        let w_lb_in = (1.2 * 8.0 + 1.6 * 20.0) * tributary_ft / 12.0;
        let l_in = length_ft * 12.0;
        let expected = 5.0 * w_lb_in * l_in.powi(4) / (384.0 * e_psi * section.ix_in4);
        assert_relative_eq!(result.max_deflection_in, expected, max_relative = 1e-12);
    }
}

#[test]
fn utilization_implies_strength_violation() {
    let config = EngineConfig::default();
    let analysis = AnalysisEngine::new(&config).run(&greenhouse(), &site()).unwrap();

    assert!(analysis.members.iter().any(|m| m.utilization().unwrap() > 1.2));
    for member in &analysis.members {
        let utilization = member.utilization().unwrap();
        assert!(utilization >= 0.0);
        let strength: Vec<_> = analysis
            .compliance
            .violations_for(&member.id)
            .filter(|v| v.kind == ViolationKind::Strength)
            .collect();
        if utilization > 1.0 {
            assert_eq!(strength.len(), 1, "member {}", member.id);
            assert_eq!(strength[0].severity == Severity::Critical, utilization > 1.2);
        } else {
            assert!(strength.is_empty());
        }
    }
}

#[test]
fn reduction_is_commutative_over_all_orderings() {
    let member = build_member(
        &component("R-9", MemberRole::Rafter, 18.0, 2.0, 6.0),
        6.0,
        &MaterialDatabase::standard(),
        &SectionTable::new(),
    )
    .unwrap();
    let conditions = generate_load_conditions(&greenhouse(), &site()).unwrap();
    let constants = AnalysisConstants::default();
    let base = lrfd_combinations();
    let reference = analyze_member(&member, &base, &conditions, &constants).unwrap();

    for order in permutations(base.len()) {
        let shuffled: Vec<_> = order.iter().map(|&i| base[i].clone()).collect();
        let result = analyze_member(&member, &shuffled, &conditions, &constants).unwrap();
        assert_eq!(result.results, reference.results);
    }
}

#[test]
fn foundation_is_idempotent() {
    let config = EngineConfig::default();
    let engine = AnalysisEngine::new(&config);
    let analysis = engine.run(&greenhouse(), &site()).unwrap();

    let first = engine.analyze_foundation(&analysis).unwrap();
    let second = analyze_foundation(&analysis, &config.soil).unwrap();
    assert_eq!(first, second);
    assert_relative_eq!(first.loads.vertical_lb, analysis.results.total_weight_lb * 1.5);
    assert_relative_eq!(first.loads.horizontal_lb, analysis.results.base_shear_lb);
}

#[test]
fn overall_is_deflection_and_strength() {
    let config = EngineConfig::default();
    let engine = AnalysisEngine::new(&config);

    let failing = engine.run(&greenhouse(), &site()).unwrap();
    assert!(!failing.compliance.overall);

    let mut sturdy = greenhouse();
    sturdy.frame_components = vec![component("P-1", MemberRole::Purlin, 4.0, 4.0, 8.0)];
    let passing = engine.run(&sturdy, &site()).unwrap();

    for analysis in [&failing, &passing] {
        let c = &analysis.compliance;
        assert_eq!(c.overall, c.deflection && c.strength);
    }
    assert!(passing.compliance.overall);
}

#[test]
fn zero_length_member_reported_not_analyzed() {
    let mut model = greenhouse();
    model.frame_components.push(FrameComponent::new(
        "Z-1",
        "Collapsed brace",
        Point3::new(5.0, 5.0, 5.0),
        Point3::new(5.0, 5.0, 5.0),
        2.0,
        2.0,
        "A36",
    ));
    let config = EngineConfig::default();
    let analysis = AnalysisEngine::new(&config).run(&model, &site()).unwrap();

    assert!(analysis.member("Z-1").is_none());
    assert_eq!(analysis.diagnostics.len(), 1);
    assert_eq!(analysis.diagnostics[0].error.error_code(), "COMPUTATION_DOMAIN");
    assert!(analysis.members.iter().all(|m| m.results.as_ref().unwrap().max_deflection_in.is_finite()));
}

#[test]
fn aggregate_serializes() {
    let config = EngineConfig::default();
    let analysis = AnalysisEngine::new(&config).run(&greenhouse(), &site()).unwrap();
    let json = analysis.to_json().unwrap();
    let parsed: StructuralAnalysis = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.members.len(), analysis.members.len());
    assert_eq!(parsed.results.member_results.len(), analysis.results.member_results.len());
    assert_eq!(parsed.results.connection_results.len(), analysis.results.connection_results.len());
    assert_relative_eq!(parsed.results.total_weight_lb, analysis.results.total_weight_lb, max_relative = 1e-12);
    assert_relative_eq!(parsed.results.max_utilization, analysis.results.max_utilization, max_relative = 1e-12);
    assert_eq!(parsed.compliance.overall, analysis.compliance.overall);
}

struct SlowBackend;

impl FeaBackend for SlowBackend {
    fn name(&self) -> &str {
        "slow-fea"
    }

    async fn perform_structural_analysis(
        &self,
        _model: &GreenhouseModel,
        _load_conditions: &[LoadCondition],
        _analysis_type: AnalysisType,
    ) -> Result<StructuralAnalysis, BackendError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Err(BackendError::from("unreachable"))
    }
}

struct BrokenBackend;

impl FeaBackend for BrokenBackend {
    fn name(&self) -> &str {
        "broken-fea"
    }

    async fn perform_structural_analysis(
        &self,
        _model: &GreenhouseModel,
        _load_conditions: &[LoadCondition],
        _analysis_type: AnalysisType,
    ) -> Result<StructuralAnalysis, BackendError> {
        Err(BackendError::from("solver diverged"))
    }
}

/// Replays a precomputed analysis, as a remote solver would return it.
struct ReplayBackend(StructuralAnalysis);

impl FeaBackend for ReplayBackend {
    fn name(&self) -> &str {
        "replay"
    }

    async fn perform_structural_analysis(
        &self,
        _model: &GreenhouseModel,
        _load_conditions: &[LoadCondition],
        _analysis_type: AnalysisType,
    ) -> Result<StructuralAnalysis, BackendError> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn backend_timeout_is_external_failure() {
    let config = EngineConfig {
        fea_timeout_secs: 1,
        ..EngineConfig::default()
    };
    let engine = AnalysisEngine::new(&config);
    let mut events = Vec::new();

    let err = engine
        .run_with_backend(&greenhouse(), &site(), &SlowBackend, AnalysisType::LinearStatic, |e| {
            events.push(e.clone())
        })
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "ANALYSIS_FAILED");
    assert!(err.to_string().contains("slow-fea"));
    assert!(!events.contains(&AnalysisEvent::StageCompleted(Stage::Compliance)));
    assert!(matches!(events.last(), Some(AnalysisEvent::Failed(_))));
}

#[tokio::test]
async fn backend_error_is_external_failure() {
    let config = EngineConfig::default();
    let err = AnalysisEngine::new(&config)
        .run_with_backend(&greenhouse(), &site(), &BrokenBackend, AnalysisType::Modal, |_| {})
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ANALYSIS_FAILED");
    assert!(err.to_string().contains("solver diverged"));
}

#[tokio::test]
async fn backend_result_feeds_compliance() {
    let config = EngineConfig::default();
    let engine = AnalysisEngine::new(&config);
    let local = engine.run(&greenhouse(), &site()).unwrap();
    let backend = ReplayBackend(local.clone());

    let mut events = Vec::new();
    let remote = engine
        .run_with_backend(&greenhouse(), &site(), &backend, AnalysisType::LinearStatic, |e| {
            events.push(e.clone())
        })
        .await
        .unwrap();

    assert_eq!(remote.id, local.id);
    assert_eq!(remote.compliance, local.compliance);
    assert!(events.contains(&AnalysisEvent::StageCompleted(Stage::ExternalAnalysis)));
    assert!(!events.contains(&AnalysisEvent::StageCompleted(Stage::MemberAnalysis)));
}

#[tokio::test]
async fn backend_nan_results_are_rejected() {
    let config = EngineConfig::default();
    let engine = AnalysisEngine::new(&config);
    let mut corrupted = engine.run(&greenhouse(), &site()).unwrap();
    if let Some(results) = corrupted.members[0].results.as_mut() {
        results.utilization = f64::NAN;
        results.max_deflection_in = f64::NAN;
    }

    let mut events = Vec::new();
    let err = engine
        .run_with_backend(&greenhouse(), &site(), &ReplayBackend(corrupted), AnalysisType::LinearStatic, |e| {
            events.push(e.clone())
        })
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "ANALYSIS_FAILED");
    assert!(err.to_string().contains("replay"));
    assert!(!events.contains(&AnalysisEvent::StageCompleted(Stage::Compliance)));
}

#[tokio::test]
async fn backend_negative_results_are_rejected() {
    let config = EngineConfig::default();
    let engine = AnalysisEngine::new(&config);
    let mut corrupted = engine.run(&greenhouse(), &site()).unwrap();
    corrupted.results.total_weight_lb = -1.0;

    let err = engine
        .run_with_backend(&greenhouse(), &site(), &ReplayBackend(corrupted), AnalysisType::LinearStatic, |_| {})
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ANALYSIS_FAILED");
}

#[tokio::test]
async fn backend_cannot_loosen_code_limits() {
    let config = EngineConfig::default();
    let engine = AnalysisEngine::new(&config);
    let local = engine.run(&greenhouse(), &site()).unwrap();

    let mut loosened = local.clone();
    loosened.limits.deflection_ratio = 1.0;
    loosened.limits.vibration_hz = 0.0;
    loosened.building_code = "NONE".to_string();
    loosened.load_combinations.clear();

    let remote = engine
        .run_with_backend(&greenhouse(), &site(), &ReplayBackend(loosened), AnalysisType::LinearStatic, |_| {})
        .await
        .unwrap();

    assert_eq!(remote.limits, config.limits);
    assert_eq!(remote.building_code, "LRFD");
    assert_eq!(remote.site, site());
    assert_eq!(remote.load_combinations.len(), local.load_combinations.len());
    assert_eq!(
        remote.governing_combination().map(|c| c.name.clone()),
        local.governing_combination().map(|c| c.name.clone())
    );
    assert_eq!(remote.compliance, local.compliance);
}

fn condition(kind: LoadKind, magnitude: f64) -> LoadCondition {
    use analysis_core::loads::{ApplicationArea, LoadDirection, LoadDistribution, LoadUnit};
    LoadCondition {
        kind,
        magnitude,
        unit: LoadUnit::Psf,
        direction: LoadDirection::Gravity,
        distribution: LoadDistribution::Uniform,
        area: ApplicationArea::full(96.0, 30.0),
        load_factor: 1.0,
        importance_factor: 1.0,
        duration_factor: kind.duration_factor(),
        code_reference: String::new(),
        calculation: String::new(),
    }
}

/// Every ordering of `0..n` (Heap's algorithm).
fn permutations(n: usize) -> Vec<Vec<usize>> {
    let mut items: Vec<usize> = (0..n).collect();
    let mut counters = vec![0; n];
    let mut out = vec![items.clone()];
    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            out.push(items.clone());
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    out
}
