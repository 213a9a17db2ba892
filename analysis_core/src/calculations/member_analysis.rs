//! # Member Analysis Core
//!
//! Evaluates every member under every load combination and reduces the
//! per-combination responses into one [`MemberResults`] envelope.
//!
//! ## Method
//!
//! 1. Line load: `w (plf) = Σ factor × magnitude (psf) × tributary width (ft)`
//! 2. Span idealization from end fixity (simply supported, fixed-fixed,
//!    propped cantilever, cantilever) selects the moment, shear and
//!    deflection formulas
//! 3. `stress = M / Sx`, `allowable = Fy / Ω`, `utilization = stress / allowable`
//! 4. Elementwise maximum across combinations. The controlling combination
//!    is the one with the largest moment; equal moments resolve to the
//!    lexicographically smaller label, so evaluation order never matters.
//!
//! Members and combinations fan out over rayon and are combined with the
//! same reduction operator.
//!
//! Buckling capacity and natural frequency are informational; only the
//! natural frequency feeds a (non-blocking) serviceability check.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{ConnectionResult, GlobalResults, MemberEnd, MemberSummary};
use crate::config::AnalysisConstants;
use crate::equations::beam;
use crate::errors::{AnalysisError, AnalysisResult, Stage};
use crate::loads::{total_by_kind, LoadCombination, LoadCondition, LoadKind};
use crate::members::{MemberResults, SpanIdealization, StructuralMember};

/// Forces and deflection for a uniform load on one idealized span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanResponse {
    /// Governing moment magnitude (ft-lb)
    pub moment_ftlb: f64,
    /// Governing shear magnitude (lb)
    pub shear_lb: f64,
    /// Maximum deflection (in)
    pub deflection_in: f64,
    pub start_reaction_lb: f64,
    pub end_reaction_lb: f64,
    pub start_moment_ftlb: f64,
    pub end_moment_ftlb: f64,
}

/// Uniform-load response of an idealized span.
///
/// `w_plf` in lb/ft and `length_ft` in ft; deflection is evaluated in
/// lb/in and in against E (psi) and I (in⁴). `fixed_at_start` orients the
/// one-sided idealizations.
pub fn span_response(
    idealization: SpanIdealization,
    fixed_at_start: bool,
    w_plf: f64,
    length_ft: f64,
    e_psi: f64,
    i_in4: f64,
) -> SpanResponse {
    let w_in = w_plf / 12.0;
    let l_in = length_ft * 12.0;

    let (moment, shear, deflection, fixed_end, far_end, fixed_moment, far_moment) = match idealization {
        SpanIdealization::SimplySupported => {
            let (r1, r2) = beam::uniform_load_reactions(w_plf, length_ft);
            (
                beam::uniform_load_max_moment(w_plf, length_ft),
                r1,
                beam::uniform_load_max_deflection(w_in, l_in, e_psi, i_in4),
                r1,
                r2,
                0.0,
                0.0,
            )
        }
        SpanIdealization::FixedFixed => {
            let (r1, r2) = beam::uniform_load_reactions(w_plf, length_ft);
            let m = beam::fixed_fixed_uniform_end_moment(w_plf, length_ft);
            (
                m,
                r1,
                beam::fixed_fixed_uniform_max_deflection(w_in, l_in, e_psi, i_in4),
                r1,
                r2,
                m,
                m,
            )
        }
        SpanIdealization::FixedPinned => {
            let (r_fixed, r_prop) = beam::fixed_pinned_uniform_reactions(w_plf, length_ft);
            let m = beam::fixed_pinned_uniform_end_moment(w_plf, length_ft);
            (
                m,
                r_fixed,
                beam::fixed_pinned_uniform_max_deflection(w_in, l_in, e_psi, i_in4),
                r_fixed,
                r_prop,
                m,
                0.0,
            )
        }
        SpanIdealization::Cantilever => {
            let r = beam::cantilever_uniform_reaction(w_plf, length_ft);
            let m = beam::cantilever_uniform_moment(w_plf, length_ft);
            (
                m,
                r,
                beam::cantilever_uniform_max_deflection(w_in, l_in, e_psi, i_in4),
                r,
                0.0,
                m,
                0.0,
            )
        }
    };

    let (start_reaction_lb, end_reaction_lb, start_moment_ftlb, end_moment_ftlb) = if fixed_at_start {
        (fixed_end, far_end, fixed_moment, far_moment)
    } else {
        (far_end, fixed_end, far_moment, fixed_moment)
    };

    SpanResponse {
        moment_ftlb: moment.abs(),
        shear_lb: shear.abs(),
        deflection_in: deflection.abs(),
        start_reaction_lb,
        end_reaction_lb,
        start_moment_ftlb,
        end_moment_ftlb,
    }
}

/// Per-combination response, and the running envelope once reduced.
#[derive(Debug, Clone, PartialEq)]
struct Envelope {
    moment_ftlb: f64,
    shear_lb: f64,
    deflection_in: f64,
    stress_psi: f64,
    utilization: f64,
    controlling_load: String,
    controlling_plf: f64,
}

impl Envelope {
    /// Elementwise max; associative and commutative.
    fn merge(self, other: Envelope) -> Envelope {
        let other_controls = other.moment_ftlb > self.moment_ftlb
            || (other.moment_ftlb == self.moment_ftlb && other.controlling_load < self.controlling_load);
        let (controlling_load, controlling_plf) = if other_controls {
            (other.controlling_load, other.controlling_plf)
        } else {
            (self.controlling_load, self.controlling_plf)
        };
        Envelope {
            moment_ftlb: self.moment_ftlb.max(other.moment_ftlb),
            shear_lb: self.shear_lb.max(other.shear_lb),
            deflection_in: self.deflection_in.max(other.deflection_in),
            stress_psi: self.stress_psi.max(other.stress_psi),
            utilization: self.utilization.max(other.utilization),
            controlling_load,
            controlling_plf,
        }
    }
}

/// Results for one member plus its end connection forces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberOutcome {
    pub results: MemberResults,
    pub connections: Vec<ConnectionResult>,
}

fn ensure_finite(
    member: &StructuralMember,
    combination: Option<&str>,
    stage: Stage,
    values: &[(&str, f64)],
) -> AnalysisResult<()> {
    for (name, value) in values {
        if !value.is_finite() {
            return Err(AnalysisError::domain(
                &member.id,
                combination,
                stage,
                format!("{} is not finite ({})", name, value),
            ));
        }
    }
    Ok(())
}

/// Reject analyzed results that are missing, non-finite or negative.
///
/// Applied to aggregates produced outside the closed-form path, where
/// nothing else has checked the numbers before compliance compares them.
pub fn verify_results(members: &[StructuralMember], global: &GlobalResults) -> AnalysisResult<()> {
    for member in members {
        let results = member.results.as_ref().ok_or_else(|| {
            AnalysisError::domain(&member.id, None, Stage::ExternalAnalysis, "member has no results")
        })?;
        let values = [
            ("moment", results.max_moment_ftlb),
            ("shear", results.max_shear_lb),
            ("deflection", results.max_deflection_in),
            ("stress", results.max_stress_psi),
            ("allowable stress", results.allowable_stress_psi),
            ("utilization", results.utilization),
            ("buckling capacity", results.buckling_capacity_lb),
            ("natural frequency", results.natural_frequency_hz),
        ];
        ensure_finite(member, Some(results.controlling_load.as_str()), Stage::ExternalAnalysis, &values)?;
        if let Some((name, value)) = values.iter().find(|(_, v)| *v < 0.0) {
            return Err(AnalysisError::domain(
                &member.id,
                Some(results.controlling_load.as_str()),
                Stage::ExternalAnalysis,
                format!("{} is negative ({})", name, value),
            ));
        }
    }

    for (name, value) in [
        ("max deflection", global.max_deflection_in),
        ("max stress", global.max_stress_psi),
        ("max utilization", global.max_utilization),
        ("total weight", global.total_weight_lb),
        ("fundamental period", global.fundamental_period_s),
        ("base shear", global.base_shear_lb),
        ("overturning moment", global.overturning_moment_ftlb),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(AnalysisError::domain(
                "structure",
                None,
                Stage::ExternalAnalysis,
                format!("{} must be finite and non-negative, got {}", name, value),
            ));
        }
    }
    Ok(())
}

fn idealization_of(member: &StructuralMember) -> AnalysisResult<SpanIdealization> {
    member.boundary.idealization().ok_or_else(|| {
        AnalysisError::domain(
            &member.id,
            None,
            Stage::MemberAnalysis,
            "end conditions form a mechanism",
        )
    })
}

fn evaluate(
    member: &StructuralMember,
    idealization: SpanIdealization,
    combination: &LoadCombination,
    conditions: &[LoadCondition],
    allowable_psi: f64,
) -> AnalysisResult<Envelope> {
    let w_plf = combination.factored_pressure_psf(conditions) * member.tributary_width_ft;
    let span = span_response(
        idealization,
        member.boundary.fixed_at_start(),
        w_plf,
        member.length_ft,
        member.material.elastic_modulus_psi,
        member.section.ix_in4,
    );

    // M in ft-lb, Sx in in³
    let stress_psi = span.moment_ftlb * 12.0 / member.section.sx_in3;
    let utilization = stress_psi / allowable_psi;

    ensure_finite(
        member,
        Some(combination.name.as_str()),
        Stage::MemberAnalysis,
        &[
            ("line load", w_plf),
            ("moment", span.moment_ftlb),
            ("shear", span.shear_lb),
            ("deflection", span.deflection_in),
            ("utilization", utilization),
        ],
    )?;

    Ok(Envelope {
        moment_ftlb: span.moment_ftlb,
        shear_lb: span.shear_lb,
        deflection_in: span.deflection_in,
        stress_psi,
        utilization,
        controlling_load: combination.label(),
        controlling_plf: w_plf,
    })
}

/// Analyze one member under every combination.
///
/// # Errors
///
/// `ComputationDomain` when the end conditions form a mechanism, no
/// combinations are supplied, or any intermediate value is non-finite.
pub fn analyze_member(
    member: &StructuralMember,
    combinations: &[LoadCombination],
    conditions: &[LoadCondition],
    constants: &AnalysisConstants,
) -> AnalysisResult<MemberOutcome> {
    let idealization = idealization_of(member)?;
    let allowable_psi = member.material.yield_strength_psi / constants.safety_factor;

    let envelope = combinations
        .par_iter()
        .map(|combo| evaluate(member, idealization, combo, conditions, allowable_psi))
        .try_reduce_with(|a, b| Ok(a.merge(b)))
        .ok_or_else(|| {
            AnalysisError::domain(&member.id, None, Stage::MemberAnalysis, "no load combinations to evaluate")
        })??;

    let length_in = member.length_in();
    let buckling_capacity_lb = beam::euler_buckling_load(
        member.material.elastic_modulus_psi,
        member.section.i_min(),
        idealization.effective_length_factor(),
        length_in,
    );

    // Unfactored dead line load plus self weight, as lb/in
    let dead_plf = total_by_kind(conditions, LoadKind::Dead) * member.tributary_width_ft + member.self_weight_plf();
    let natural_frequency_hz = beam::natural_frequency_hz(
        idealization.frequency_constant(),
        member.material.elastic_modulus_psi,
        member.section.ix_in4,
        dead_plf / 12.0,
        length_in,
        constants.gravity_in_s2,
    );

    ensure_finite(
        member,
        None,
        Stage::MemberAnalysis,
        &[
            ("buckling capacity", buckling_capacity_lb),
            ("natural frequency", natural_frequency_hz),
        ],
    )?;

    let span = span_response(
        idealization,
        member.boundary.fixed_at_start(),
        envelope.controlling_plf,
        member.length_ft,
        member.material.elastic_modulus_psi,
        member.section.ix_in4,
    );
    let connections = vec![
        ConnectionResult {
            member_id: member.id.clone(),
            end: MemberEnd::Start,
            reaction_lb: span.start_reaction_lb,
            moment_ftlb: span.start_moment_ftlb,
            combination: envelope.controlling_load.clone(),
        },
        ConnectionResult {
            member_id: member.id.clone(),
            end: MemberEnd::End,
            reaction_lb: span.end_reaction_lb,
            moment_ftlb: span.end_moment_ftlb,
            combination: envelope.controlling_load.clone(),
        },
    ];

    debug!(
        member = %member.id,
        utilization = envelope.utilization,
        controlling = %envelope.controlling_load,
        "member analyzed"
    );

    Ok(MemberOutcome {
        results: MemberResults {
            max_moment_ftlb: envelope.moment_ftlb,
            max_shear_lb: envelope.shear_lb,
            max_deflection_in: envelope.deflection_in,
            max_stress_psi: envelope.stress_psi,
            allowable_stress_psi: allowable_psi,
            utilization: envelope.utilization,
            controlling_load: envelope.controlling_load,
            buckling_capacity_lb,
            natural_frequency_hz,
        },
        connections,
    })
}

/// Analyze every member in parallel and store its results.
///
/// Results are write-once: a member that already carries results is an
/// internal error. Returns the connection table in member order.
pub fn analyze_members(
    members: &mut [StructuralMember],
    combinations: &[LoadCombination],
    conditions: &[LoadCondition],
    constants: &AnalysisConstants,
) -> AnalysisResult<Vec<ConnectionResult>> {
    let outcomes = members
        .par_iter()
        .map(|member| analyze_member(member, combinations, conditions, constants))
        .collect::<AnalysisResult<Vec<_>>>()?;

    let mut connections = Vec::with_capacity(outcomes.len() * 2);
    for (member, outcome) in members.iter_mut().zip(outcomes) {
        member.record_results(outcome.results)?;
        connections.extend(outcome.connections);
    }
    Ok(connections)
}

/// Whole-structure maxima, weight and simplified lateral quantities.
///
/// Also marks the combination controlling the most utilized member as
/// governing (all others are cleared).
pub fn aggregate_results(
    members: &[StructuralMember],
    connections: Vec<ConnectionResult>,
    combinations: &mut [LoadCombination],
    height_ft: f64,
    constants: &AnalysisConstants,
) -> AnalysisResult<GlobalResults> {
    let mut global = GlobalResults::default();

    for member in members {
        let Some(results) = member.results.as_ref() else {
            return Err(AnalysisError::domain(
                &member.id,
                None,
                Stage::GlobalAggregation,
                "member has not been analyzed",
            ));
        };

        global.max_deflection_in = global.max_deflection_in.max(results.max_deflection_in);
        global.max_stress_psi = global.max_stress_psi.max(results.max_stress_psi);
        global.max_utilization = global.max_utilization.max(results.utilization);
        global.total_weight_lb += member.weight_lb();

        global.member_results.push(MemberSummary {
            member_id: member.id.clone(),
            role: member.role,
            max_moment_ftlb: results.max_moment_ftlb,
            max_shear_lb: results.max_shear_lb,
            max_deflection_in: results.max_deflection_in,
            utilization: results.utilization,
            controlling_load: results.controlling_load.clone(),
        });
    }

    global.fundamental_period_s = constants.period_coefficient * height_ft.max(0.0).sqrt();
    global.base_shear_lb = global.total_weight_lb * constants.seismic_coefficient;
    global.overturning_moment_ftlb = global.base_shear_lb * constants.assumed_height_ft;
    global.connection_results = connections;

    for (name, value) in [
        ("total weight", global.total_weight_lb),
        ("fundamental period", global.fundamental_period_s),
        ("base shear", global.base_shear_lb),
        ("overturning moment", global.overturning_moment_ftlb),
    ] {
        if !value.is_finite() {
            return Err(AnalysisError::domain(
                "structure",
                None,
                Stage::GlobalAggregation,
                format!("{} is not finite ({})", name, value),
            ));
        }
    }

    mark_governing(members, combinations);

    debug!(
        members = members.len(),
        total_weight_lb = global.total_weight_lb,
        max_utilization = global.max_utilization,
        "global results aggregated"
    );
    Ok(global)
}

/// Flag the combination controlling the most utilized member as governing
/// and clear all others. Equal utilizations resolve to the smaller member id.
pub fn mark_governing(members: &[StructuralMember], combinations: &mut [LoadCombination]) {
    let mut governing: Option<(f64, &str, &str)> = None;
    for member in members {
        let Some(results) = member.results.as_ref() else {
            continue;
        };
        let replaces = match governing {
            None => true,
            Some((u, id, _)) => results.utilization > u || (results.utilization == u && member.id.as_str() < id),
        };
        if replaces {
            governing = Some((results.utilization, member.id.as_str(), results.controlling_load.as_str()));
        }
    }

    let governing_label = governing.map(|(_, _, label)| label);
    for combo in combinations.iter_mut() {
        combo.governing = governing_label == Some(combo.label().as_str());
    }
}
