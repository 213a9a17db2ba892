//! # Structural Calculations
//!
//! The numeric stages of the pipeline. Each is a pure function over
//! serializable inputs:
//!
//! - [`member_analysis`] - Per-member envelope across combinations, global aggregation
//! - [`compliance`] - Deflection, strength and serviceability gates
//! - [`foundation`] - Spread footing sizing and stability
//! - [`optimization`] - Advisory savings suggestions

pub mod compliance;
pub mod foundation;
pub mod member_analysis;
pub mod optimization;

pub use compliance::{check_compliance, CodeCompliance, Severity, Violation, ViolationKind};
pub use foundation::{analyze_foundation, FoundationAnalysis, SoilProperties};
pub use member_analysis::{
    aggregate_results, analyze_member, analyze_members, mark_governing, span_response, verify_results,
    MemberOutcome,
};
pub use optimization::{suggest_optimizations, OptimizationSuggestion, SuggestionKind};
