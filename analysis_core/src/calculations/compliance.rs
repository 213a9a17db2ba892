//! # Code Compliance Checker
//!
//! Three independent gates, each true until its first violation:
//!
//! | Gate           | Check                                 | Severity                     |
//! |----------------|---------------------------------------|------------------------------|
//! | Deflection     | `max_deflection > L_in / ratio`       | Error                        |
//! | Strength       | `utilization > 1.0`                   | Critical above 1.2, else Error |
//! | Serviceability | `natural_frequency < vibration_hz`    | Warning                      |
//!
//! `overall = deflection && strength`. A serviceability violation flips the
//! serviceability flag only; it never fails the structure on its own.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ServiceabilityLimits;
use crate::errors::{AnalysisError, AnalysisResult, Stage};
use crate::members::StructuralMember;

/// Utilization above which a strength violation is critical
pub const CRITICAL_UTILIZATION: f64 = 1.2;

/// Violation severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
    Critical,
}

impl Severity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Gate a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    Deflection,
    Strength,
    Serviceability,
}

impl ViolationKind {
    /// Fixed remediation text for this kind of violation
    pub fn suggestion(&self) -> &'static str {
        match self {
            ViolationKind::Deflection => "Increase member depth or add intermediate supports",
            ViolationKind::Strength => "Increase section size or use a higher-strength material",
            ViolationKind::Serviceability => "Stiffen the member or add bracing to raise its natural frequency",
        }
    }
}

/// One failed check on one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub member_id: String,
    pub kind: ViolationKind,
    pub description: String,
    pub severity: Severity,
    pub suggestion: String,
}

impl Violation {
    fn new(member_id: &str, kind: ViolationKind, severity: Severity, description: String) -> Self {
        Violation {
            member_id: member_id.to_string(),
            kind,
            description,
            severity,
            suggestion: kind.suggestion().to_string(),
        }
    }
}

/// Compliance verdict for the structure.
///
/// `overall` follows the deflection and strength gates only. The
/// serviceability gate is advisory: it records warnings and clears
/// `serviceability`, but `overall` stays true when it is the only gate
/// that fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeCompliance {
    pub overall: bool,
    pub deflection: bool,
    pub strength: bool,
    pub serviceability: bool,
    pub violations: Vec<Violation>,
}

impl Default for CodeCompliance {
    fn default() -> Self {
        CodeCompliance {
            overall: true,
            deflection: true,
            strength: true,
            serviceability: true,
            violations: Vec::new(),
        }
    }
}

impl CodeCompliance {
    /// Violations for one member
    pub fn violations_for<'a>(&'a self, member_id: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.member_id == member_id)
    }

    /// Most severe violation, if any
    pub fn worst_severity(&self) -> Option<Severity> {
        self.violations.iter().map(|v| v.severity).max()
    }

    fn record(&mut self, violation: Violation) {
        match violation.kind {
            ViolationKind::Deflection => self.deflection = false,
            ViolationKind::Strength => self.strength = false,
            ViolationKind::Serviceability => self.serviceability = false,
        }
        self.overall = self.deflection && self.strength;
        self.violations.push(violation);
    }
}

/// Run the three gates over every analyzed member.
///
/// # Errors
///
/// `ComputationDomain` if a member has no results; compliance is only
/// meaningful after the member analysis.
pub fn check_compliance(
    members: &[StructuralMember],
    limits: &ServiceabilityLimits,
) -> AnalysisResult<CodeCompliance> {
    let mut compliance = CodeCompliance::default();

    for member in members {
        let results = member.results.as_ref().ok_or_else(|| {
            AnalysisError::domain(&member.id, None, Stage::Compliance, "member has not been analyzed")
        })?;

        let allowable_defl = member.length_in() / limits.deflection_ratio;
        if results.max_deflection_in > allowable_defl {
            compliance.record(Violation::new(
                &member.id,
                ViolationKind::Deflection,
                Severity::Error,
                format!(
                    "Deflection {:.3} in exceeds L/{:.0} = {:.3} in",
                    results.max_deflection_in, limits.deflection_ratio, allowable_defl
                ),
            ));
        }

        if results.utilization > 1.0 {
            let severity = if results.utilization > CRITICAL_UTILIZATION {
                Severity::Critical
            } else {
                Severity::Error
            };
            compliance.record(Violation::new(
                &member.id,
                ViolationKind::Strength,
                severity,
                format!(
                    "Stress {:.0} psi exceeds allowable {:.0} psi (utilization {:.2}, {})",
                    results.max_stress_psi, results.allowable_stress_psi, results.utilization, results.controlling_load
                ),
            ));
        }

        if results.natural_frequency_hz < limits.vibration_hz {
            compliance.record(Violation::new(
                &member.id,
                ViolationKind::Serviceability,
                Severity::Warning,
                format!(
                    "Natural frequency {:.2} Hz is below the {:.1} Hz limit",
                    results.natural_frequency_hz, limits.vibration_hz
                ),
            ));
        }
    }

    if compliance.overall {
        debug!(violations = compliance.violations.len(), "compliance passed");
    } else {
        warn!(
            violations = compliance.violations.len(),
            deflection = compliance.deflection,
            strength = compliance.strength,
            "compliance failed"
        );
    }
    Ok(compliance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialProperties;
    use crate::members::{EndConditions, MemberResults, MemberRole};
    use crate::model::Point3;
    use crate::sections::Section;

    fn analyzed(id: &str, length_ft: f64, deflection_in: f64, utilization: f64, frequency_hz: f64) -> StructuralMember {
        StructuralMember {
            id: id.to_string(),
            name: id.to_string(),
            role: MemberRole::Beam,
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(length_ft, 0.0, 0.0),
            length_ft,
            tributary_width_ft: 4.0,
            section: Section::from_bounding_box(2.0, 6.0),
            material: MaterialProperties::default(),
            boundary: EndConditions::default(),
            results: Some(MemberResults {
                max_moment_ftlb: 1000.0,
                max_shear_lb: 400.0,
                max_deflection_in: deflection_in,
                max_stress_psi: utilization * 21_556.9,
                allowable_stress_psi: 21_556.9,
                utilization,
                controlling_load: "LRFD-2: 1.2D + 1.6L".to_string(),
                buckling_capacity_lb: 10_000.0,
                natural_frequency_hz: frequency_hz,
            }),
        }
    }

    #[test]
    fn test_all_gates_pass() {
        let members = vec![analyzed("B-1", 20.0, 0.2, 0.5, 12.0)];
        let c = check_compliance(&members, &ServiceabilityLimits::default()).unwrap();
        assert!(c.overall && c.deflection && c.strength && c.serviceability);
        assert!(c.violations.is_empty());
        assert_eq!(c.worst_severity(), None);
    }

    #[test]
    fn test_deflection_gate() {
        // L/360 for 20 ft = 0.667 in
        let members = vec![analyzed("B-1", 20.0, 0.7, 0.5, 12.0)];
        let c = check_compliance(&members, &ServiceabilityLimits::default()).unwrap();
        assert!(!c.deflection);
        assert!(!c.overall);
        assert_eq!(c.violations[0].kind, ViolationKind::Deflection);
        assert_eq!(c.violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_strength_severity() {
        let members = vec![
            analyzed("B-1", 10.0, 0.0, 1.0, 12.0),
            analyzed("B-2", 10.0, 0.0, 1.1, 12.0),
            analyzed("B-3", 10.0, 0.0, 1.2, 12.0),
            analyzed("B-4", 10.0, 0.0, 1.25, 12.0),
        ];
        let c = check_compliance(&members, &ServiceabilityLimits::default()).unwrap();
        assert!(!c.strength);
        assert_eq!(c.violations_for("B-1").count(), 0);
        assert_eq!(c.violations_for("B-2").next().unwrap().severity, Severity::Error);
        assert_eq!(c.violations_for("B-3").next().unwrap().severity, Severity::Error);
        assert_eq!(c.violations_for("B-4").next().unwrap().severity, Severity::Critical);
        assert_eq!(c.worst_severity(), Some(Severity::Critical));
    }

    #[test]
    fn test_serviceability_is_advisory() {
        let members = vec![analyzed("B-1", 20.0, 0.1, 0.5, 2.0)];
        let c = check_compliance(&members, &ServiceabilityLimits::default()).unwrap();
        assert!(!c.serviceability);
        assert!(c.overall);
        assert_eq!(c.violations.len(), 1);
        assert_eq!(c.violations[0].severity, Severity::Warning);
        assert_eq!(c.violations[0].suggestion, ViolationKind::Serviceability.suggestion());
    }

    #[test]
    fn test_overall_law() {
        let cases = [
            (0.1, 0.5, 2.0),
            (0.9, 0.5, 12.0),
            (0.1, 1.5, 12.0),
            (0.9, 1.5, 2.0),
        ];
        for (defl, util, freq) in cases {
            let c = check_compliance(&[analyzed("B", 20.0, defl, util, freq)], &ServiceabilityLimits::default())
                .unwrap();
            assert_eq!(c.overall, c.deflection && c.strength);
        }
    }

    #[test]
    fn test_unanalyzed_member() {
        let mut member = analyzed("B-1", 20.0, 0.1, 0.5, 12.0);
        member.results = None;
        assert!(check_compliance(&[member], &ServiceabilityLimits::default()).is_err());
    }
}
