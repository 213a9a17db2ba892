//! # Optimization Advisor
//!
//! Post-hoc scan of an analyzed structure. Suggestions are advisory and
//! never affect compliance.
//!
//! - Over-designed members (`utilization < 0.6`): downsize, 20 % cost and
//!   15 % weight savings on the member
//! - Heavy frame (`total weight > 1000 lb`): higher-strength material,
//!   15 % weight savings
//! - Long spans (`length > 30 ft`): add an intermediate support

use serde::{Deserialize, Serialize};

use crate::analysis::StructuralAnalysis;
use crate::config::OptimizationSettings;

/// Suggestion category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestionKind {
    Downsize,
    MaterialUpgrade,
    IntermediateSupport,
}

/// One advisory suggestion with its savings estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub kind: SuggestionKind,
    /// Member concerned; `None` for structure-wide suggestions
    pub member_id: Option<String>,
    pub description: String,
    pub weight_savings_lb: f64,
    pub cost_savings_usd: f64,
}

/// Scan members and totals for savings opportunities.
pub fn suggest_optimizations(
    analysis: &StructuralAnalysis,
    settings: &OptimizationSettings,
) -> Vec<OptimizationSuggestion> {
    let mut suggestions = Vec::new();

    for member in &analysis.members {
        let Some(results) = member.results.as_ref() else {
            continue;
        };
        if results.utilization < settings.underutilized_threshold {
            let weight = member.weight_lb();
            suggestions.push(OptimizationSuggestion {
                kind: SuggestionKind::Downsize,
                member_id: Some(member.id.clone()),
                description: format!(
                    "{} '{}' is {:.0}% utilized; a smaller section would suffice",
                    member.role,
                    member.id,
                    results.utilization * 100.0
                ),
                weight_savings_lb: weight * settings.downsize_weight_savings,
                cost_savings_usd: weight * settings.steel_cost_per_lb * settings.downsize_cost_savings,
            });
        }
    }

    let total_weight = analysis.results.total_weight_lb;
    if total_weight > settings.upgrade_weight_threshold_lb {
        let saved = total_weight * settings.upgrade_weight_savings;
        suggestions.push(OptimizationSuggestion {
            kind: SuggestionKind::MaterialUpgrade,
            member_id: None,
            description: format!(
                "Frame weighs {:.0} lb; higher-strength steel could save about {:.0} lb",
                total_weight, saved
            ),
            weight_savings_lb: saved,
            cost_savings_usd: saved * settings.steel_cost_per_lb,
        });
    }

    for member in &analysis.members {
        if member.length_ft > settings.max_span_ft {
            suggestions.push(OptimizationSuggestion {
                kind: SuggestionKind::IntermediateSupport,
                member_id: Some(member.id.clone()),
                description: format!(
                    "Span of {:.1} ft exceeds {:.0} ft; add an intermediate support",
                    member.length_ft, settings.max_span_ft
                ),
                weight_savings_lb: 0.0,
                cost_savings_usd: 0.0,
            });
        }
    }

    suggestions
}
